pub mod locate;
pub mod normalize;
pub mod values;

use crate::error::DexaError;
use crate::model::{Field, FieldValues, ParseWarning, ParsedReport, Region, RegionRecord, ReportFormat};
use locate::locate_section;
use log::{debug, trace, warn};
use normalize::{is_numeric_region_code, normalize_region};
use regex::Regex;
use std::sync::LazyLock;
use values::numeric_tokens;

/// Lines starting with this belong to an unrelated ratio table and are skipped.
const FAT_MASS_RATIOS: &str = "Fat Mass Ratios:";

/// Annotation the scanner appends to estimated region labels.
const ESTIMATED_MARKER: &str = "(e)";

static VISCERAL_FAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Estimated Visceral Adipose Tissue\s+Volume\s+Mass\s+Area\s+[\d,.]+\s*cm\S*\s+([\d,]+)\s*g",
    )
    .expect("valid visceral fat pattern")
});

/// Tunables for the region tokenizer.
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Number of values a region must hold to be committed when the next region starts.
    ///
    /// The final region of a report is instead checked against the length of
    /// the field ordering; the two are equal for the shipped vocabulary.
    pub region_value_count: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            region_value_count: 8,
        }
    }
}

/// Parse report text into a ParsedReport using default options.
pub fn parse_report(text: &str) -> Result<ParsedReport, DexaError> {
    parse_report_with(text, &ParserOptions::default())
}

/// Parse report text into a ParsedReport.
///
/// Fails with `UnrecognizedLayout` when no anchor phrase is present and with
/// `EmptyReport` when no region could be committed.
pub fn parse_report_with(text: &str, options: &ParserOptions) -> Result<ParsedReport, DexaError> {
    let Some(section) = locate_section(text) else {
        warn!("could not find either report anchor in text");
        return Err(DexaError::UnrecognizedLayout);
    };
    debug!("found {} layout anchor", section.format);

    let fields = field_order(section.text);
    let format = section.format;
    let mut report = ParsedReport::new(format);
    let mut current: Option<Accumulator> = None;

    // First line is the anchor/header line.
    for line in section.text.split('\n').skip(1) {
        let line = line.trim();
        if line.is_empty() || line.starts_with(FAT_MASS_RATIOS) {
            continue;
        }
        trace!("line: {line}");

        if is_region_line(line, format) {
            if let Some(acc) = current.take() {
                if acc.values.len() == options.region_value_count {
                    acc.commit(&mut report, &fields);
                } else {
                    acc.drop_partial(&mut report, options.region_value_count);
                }
            }
            current = Some(Accumulator::new(clean_label(line)));
        } else if let Some(acc) = current.as_mut() {
            acc.values.extend(numeric_tokens(line));
        }
    }

    if let Some(acc) = current.take() {
        if acc.values.len() == fields.len() {
            acc.commit(&mut report, &fields);
        } else {
            acc.drop_partial(&mut report, fields.len());
        }
    }

    if let Some(mass_g) = extract_visceral_fat(section.text) {
        debug!("visceral fat mass: {mass_g} g");
        report
            .regions
            .insert(Region::VisceralFat, RegionRecord::Visceral { mass_g });
    }

    if report.regions.is_empty() {
        warn!("no region data parsed from {format} report");
        return Err(DexaError::EmptyReport);
    }

    debug!(
        "parsed {} region(s) from {format} report",
        report.regions.len()
    );
    Ok(report)
}

/// Order the field vocabulary by first appearance in the whitespace-collapsed text.
///
/// Fields that never appear keep their vocabulary order at the end.
pub fn field_order(text: &str) -> Vec<Field> {
    let collapsed: String = text.split_whitespace().collect();
    let mut fields = Field::ALL.to_vec();
    fields.sort_by_key(|field| {
        let label: String = field.label().split_whitespace().collect();
        collapsed.find(&label).unwrap_or(usize::MAX)
    });
    fields
}

/// A line starts a new region when it carries no digits, or when it is a
/// bare ROI code in the numeric layout.
fn is_region_line(line: &str, format: ReportFormat) -> bool {
    !line.chars().any(char::is_numeric)
        || (format == ReportFormat::Numeric && is_numeric_region_code(line))
}

fn clean_label(line: &str) -> String {
    line.replace(ESTIMATED_MARKER, "").trim().to_string()
}

fn extract_visceral_fat(text: &str) -> Option<String> {
    VISCERAL_FAT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Values collected for the region currently being read.
struct Accumulator {
    label: String,
    values: Vec<String>,
}

impl Accumulator {
    fn new(label: String) -> Self {
        Self {
            label,
            values: Vec::new(),
        }
    }

    fn commit(self, report: &mut ParsedReport, fields: &[Field]) {
        if self.label.is_empty() {
            return;
        }
        let region = normalize_region(&self.label, report.format);
        debug!("stored region {region}");
        report.regions.insert(
            region,
            RegionRecord::Composition(FieldValues::zip(fields, self.values)),
        );
    }

    /// Heading lines collect no values; only regions with partial data are reported.
    fn drop_partial(self, report: &mut ParsedReport, expected: usize) {
        if self.label.is_empty() || self.values.is_empty() {
            return;
        }
        let warning = ParseWarning {
            label: self.label,
            value_count: self.values.len(),
            expected,
        };
        warn!("{warning}");
        report.warnings.push(warning);
    }
}
