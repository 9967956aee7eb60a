//! Integration tests for the text -> report -> row pipeline and the batch driver.
//!
//! Uses a MockConverter in place of mutool, so these tests run without MuPDF.

use dexa_core::batch::{run_batch, BatchOptions, BatchSummary, Progress};
use dexa_core::error::DexaError;
use dexa_core::extraction::DocumentConverter;
use dexa_core::generate::formula::ERROR_MARKER;
use dexa_core::generate::Dialect;
use dexa_core::model::{Region, ReportFormat};
use dexa_core::parsing::parse_report;
use dexa_core::{convert_pair_texts, convert_text};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const STANDARD_REPORT: &str = "\
Patient: Doe, Jane          Birth Date: 01/02/1970
Scanned: 03/04/2024 09:12   Height: 165.0 cm
BODY COMPOSITION: Total Body (Enhanced Analysis)
Region    Tissue (%Fat)    Region (%Fat)    Tissue (g)    Fat (g)    Lean (g)    BMC (g)    Fat Free (g)    Total Mass (kg)
Arms
30.0    29.1    7,900    2,370    5,530    410    5,940    8.3
Legs
33.4    32.5    23,400    7,816    15,584    1,010    16,594    24.4
Trunk (e)
35.2    34.6    31,300    11,020    20,280    880    21,160    32.2
Android
40.2    39.8    5,102    2,051    3,051    61    3,112    5.2
Gynoid
36.0    35.5    11,800    4,248    7,552    230    7,782    12.0
Total
32.1    31.0    70,512    22,634    47,878    2,650    50,528    73.2
Fat Mass Ratios: Trunk/Total 0.49    Legs/Total 0.35

Estimated Visceral Adipose Tissue
Volume    Mass    Area
1,012 cm³    955 g    171 cm²
";

const NUMERIC_REPORT: &str = "\
Total Body Custom Results
Region    Tissue (%Fat)    Region (%Fat)    Tissue (g)    Fat (g)    Lean (g)    BMC (g)    Fat Free (g)    Total Mass (kg)
1
28.4    27.9    3,210    912    2,298    58    2,356    3.3
2
41.0    40.6    4,802    1,969    2,833    27    2,860    4.8
";

struct MockConverter {
    documents: HashMap<Vec<u8>, String>,
}

impl DocumentConverter for MockConverter {
    fn convert(&self, document: &[u8]) -> Result<String, DexaError> {
        self.documents
            .get(document)
            .cloned()
            .ok_or_else(|| DexaError::Extraction("unreadable document".into()))
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn mock_converter() -> MockConverter {
    let mut documents = HashMap::new();
    documents.insert(b"xps:numeric".to_vec(), NUMERIC_REPORT.to_string());
    documents.insert(b"xps:standard".to_vec(), STANDARD_REPORT.to_string());
    MockConverter { documents }
}

fn write_input(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn read_csv(path: &Path) -> HashMap<String, String> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().clone();
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1, "exactly one data row");
    headers
        .iter()
        .zip(records[0].iter())
        .map(|(h, v)| (h.to_string(), v.to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------
#[test]
fn standard_report_regions() {
    let report = parse_report(STANDARD_REPORT).unwrap();
    assert_eq!(report.format, ReportFormat::Standard);
    for region in [
        Region::Arms,
        Region::Legs,
        Region::Trunk,
        Region::Android,
        Region::Gynoid,
        Region::Total,
        Region::VisceralFat,
    ] {
        assert!(report.contains(&region), "missing {region}");
    }
    // "Volume Mass Area" heading picks up the visceral numbers and is dropped.
    assert!(report
        .warnings
        .iter()
        .any(|w| w.label == "Volume    Mass    Area"));
}

#[test]
fn numeric_report_regions() {
    let report = parse_report(NUMERIC_REPORT).unwrap();
    assert_eq!(report.format, ReportFormat::Numeric);
    assert_eq!(
        report.regions.keys().cloned().collect::<Vec<_>>(),
        vec![Region::RoiRib, Region::RoiAbdomen]
    );
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------
#[test]
fn merged_pair_dialect_a() {
    let row = convert_pair_texts(NUMERIC_REPORT, STANDARD_REPORT, Dialect::A).unwrap();
    assert_eq!(row.get("DEXA Weight kg"), Some("73.2"));
    assert_eq!(row.get("ASMM kg"), Some("21.114"));
    assert_eq!(row.get("Trunk Fat Perc BodyFat"), Some("48.69"));
    assert_eq!(row.get("ROI Rib Fat kg"), Some("0.912"));
    assert_eq!(row.get("ROI Chest Wall Fat kg"), Some("2.881"));
    assert_eq!(row.get("ROI Chest Wall Fat Perc BodyFat"), Some("12.73"));
    assert_eq!(row.get("Visceral Fat Of Android Region kg"), Some("0.955"));
    assert_eq!(
        row.get("Calc Subcutaneous Fat of Android Region kg"),
        Some("1.096")
    );
    assert_eq!(row.get("LMI / BMI"), Some(""));
}

#[test]
fn merged_pair_dialect_b() {
    let row = convert_pair_texts(STANDARD_REPORT, NUMERIC_REPORT, Dialect::B).unwrap();
    assert_eq!(row.len(), 38);
    assert_eq!(row.get("Total %RegionFat"), Some("31.0"));
    assert_eq!(row.get("ROI Abdomen Fat %BodyFat"), Some("8.7"));
    assert_eq!(
        row.get("Calc Subcutaneous Fat of Android Region kg"),
        Some("1.096")
    );
}

#[test]
fn standard_only_dialect_a_marks_roi_formulas() {
    let row = convert_text(STANDARD_REPORT, Dialect::A).unwrap();
    assert_eq!(row.get("ROI Rib Fat kg"), Some(""));
    assert_eq!(row.get("ROI Chest Wall Fat kg"), Some(ERROR_MARKER));
    assert_eq!(row.get("ROI Rib Fat Perc BodyFat"), Some(ERROR_MARKER));
    assert_eq!(row.get("Gynoid Fat Perc BodyFat"), Some("18.77"));
}

#[test]
fn repeated_conversion_is_identical() {
    let first = convert_text(STANDARD_REPORT, Dialect::A).unwrap();
    let second = convert_text(STANDARD_REPORT, Dialect::A).unwrap();
    let (mut a, mut b) = (Vec::new(), Vec::new());
    dexa_core::generate::write_row(&first, &mut a).unwrap();
    dexa_core::generate::write_row(&second, &mut b).unwrap();
    assert_eq!(a, b);
}

#[test]
fn unrecognized_text_fails() {
    assert!(matches!(
        convert_text("Lumbar spine BMD 1.02 g/cm²", Dialect::A),
        Err(DexaError::UnrecognizedLayout)
    ));
}

#[test]
fn pair_of_same_layout_fails() {
    assert!(matches!(
        convert_pair_texts(STANDARD_REPORT, STANDARD_REPORT, Dialect::A),
        Err(DexaError::MergeFormat(_))
    ));
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------
#[test]
fn batch_counts_and_outputs() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let files = vec![
        write_input(input.path(), "1042_whole.txt", STANDARD_REPORT),
        write_input(input.path(), "1042_roi.txt", NUMERIC_REPORT),
        write_input(input.path(), "2001.txt", STANDARD_REPORT),
        write_input(input.path(), "3003.XPS", "xps:numeric"),
        write_input(input.path(), "4004.xps", "corrupt"),
        write_input(input.path(), "notes.txt", "nothing to see here"),
    ];

    let progress = Mutex::new(Vec::<Progress>::new());
    let options = BatchOptions::new(output.path(), Dialect::A);
    let summary = run_batch(&files, &options, &mock_converter(), &|p| {
        progress.lock().unwrap().push(p)
    })
    .unwrap();

    assert_eq!(
        summary,
        BatchSummary {
            succeeded: 4,
            failed: 2,
            merged: 1,
        }
    );

    let progress = progress.into_inner().unwrap();
    assert_eq!(progress.len(), 5);
    assert!(progress.iter().all(|p| p.total == 6));
    assert_eq!(progress.iter().map(|p| p.completed).max(), Some(6));

    let merged = read_csv(&output.path().join("1042_merged_output.csv"));
    assert_eq!(merged["ROI Chest Wall Fat kg"], "2.881");
    assert_eq!(merged.len(), 55);

    let single = read_csv(&output.path().join("2001_output.csv"));
    assert_eq!(single["ROI Chest Wall Fat kg"], ERROR_MARKER);

    assert!(output.path().join("3003_output.csv").exists());
    assert!(!output.path().join("4004_output.csv").exists());
    assert!(!output.path().join("notes_output.csv").exists());
}

#[test]
fn batch_failed_pair_counts_both_files() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let files = vec![
        write_input(input.path(), "55_a.txt", STANDARD_REPORT),
        write_input(input.path(), "55_b.txt", "no anchor here"),
    ];

    let options = BatchOptions::new(output.path(), Dialect::B);
    let summary = run_batch(&files, &options, &mock_converter(), &|_| {}).unwrap();

    assert_eq!(
        summary,
        BatchSummary {
            succeeded: 0,
            failed: 2,
            merged: 0,
        }
    );
    assert!(!output.path().join("55_merged_output.csv").exists());
}

#[test]
fn batch_with_dedicated_pool() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let files: Vec<PathBuf> = (0..8)
        .map(|i| write_input(input.path(), &format!("scan{i}.txt"), STANDARD_REPORT))
        .collect();

    let mut options = BatchOptions::new(output.path(), Dialect::B);
    options.jobs = Some(2);
    let summary = run_batch(&files, &options, &mock_converter(), &|_| {}).unwrap();

    assert_eq!(summary.succeeded, 8);
    assert_eq!(summary.failed, 0);
    for i in 0..8 {
        assert!(output.path().join(format!("scan{i}_output.csv")).exists());
    }
}

#[test]
fn batch_requires_output_dir() {
    let options = BatchOptions::new("/nonexistent/dexa/out", Dialect::A);
    assert!(matches!(
        run_batch(&[], &options, &mock_converter(), &|_| {}),
        Err(DexaError::MissingOutputDir(_))
    ));
}
