use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Which of the two known report templates produced a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// "BODY COMPOSITION: Total Body (Enhanced Analysis)", descriptive region names.
    Standard,
    /// "Total Body Custom Results", ROI regions labelled "1".."4".
    Numeric,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Standard => write!(f, "standard"),
            ReportFormat::Numeric => write!(f, "numeric"),
        }
    }
}

/// Canonical, layout-independent region name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Region {
    Total,
    Arms,
    Legs,
    Trunk,
    Android,
    Gynoid,
    RoiRib,
    RoiAbdomen,
    RoiHip,
    RoiFemur,
    VisceralFat,
    /// Any label outside the known vocabulary, kept verbatim.
    Other(String),
}

impl Region {
    /// The ROI sub-regions carried by the numeric layout, in code order "1".."4".
    pub const NUMERIC_ROIS: [Region; 4] = [
        Region::RoiRib,
        Region::RoiAbdomen,
        Region::RoiHip,
        Region::RoiFemur,
    ];

    pub fn from_label(label: &str) -> Region {
        match label {
            "Total" => Region::Total,
            "Arms" => Region::Arms,
            "Legs" => Region::Legs,
            "Trunk" => Region::Trunk,
            "Android" => Region::Android,
            "Gynoid" => Region::Gynoid,
            "ROI Rib" => Region::RoiRib,
            "ROI Abdomen" => Region::RoiAbdomen,
            "ROI Hip" => Region::RoiHip,
            "ROI Femur" => Region::RoiFemur,
            "Visceral Fat" => Region::VisceralFat,
            other => Region::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Region::Total => "Total",
            Region::Arms => "Arms",
            Region::Legs => "Legs",
            Region::Trunk => "Trunk",
            Region::Android => "Android",
            Region::Gynoid => "Gynoid",
            Region::RoiRib => "ROI Rib",
            Region::RoiAbdomen => "ROI Abdomen",
            Region::RoiHip => "ROI Hip",
            Region::RoiFemur => "ROI Femur",
            Region::VisceralFat => "Visceral Fat",
            Region::Other(name) => name,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Region> for String {
    fn from(region: Region) -> String {
        region.name().to_string()
    }
}

impl From<String> for Region {
    fn from(label: String) -> Region {
        Region::from_label(&label)
    }
}

/// One of the eight per-region measurement columns printed by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    RegionTissuePctFat,
    RegionPctFat,
    TissueG,
    FatG,
    LeanG,
    BmcG,
    FatFreeG,
    TotalMassKg,
}

impl Field {
    /// Candidate vocabulary in its fallback order (used for names absent from a report).
    pub const ALL: [Field; 8] = [
        Field::RegionTissuePctFat,
        Field::RegionPctFat,
        Field::TissueG,
        Field::FatG,
        Field::LeanG,
        Field::BmcG,
        Field::FatFreeG,
        Field::TotalMassKg,
    ];

    /// Column heading as printed in the report.
    pub fn label(&self) -> &'static str {
        match self {
            Field::RegionTissuePctFat => "Region Tissue (%Fat)",
            Field::RegionPctFat => "Region (%Fat)",
            Field::TissueG => "Tissue (g)",
            Field::FatG => "Fat (g)",
            Field::LeanG => "Lean (g)",
            Field::BmcG => "BMC (g)",
            Field::FatFreeG => "Fat Free (g)",
            Field::TotalMassKg => "Total Mass (kg)",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw string values of one region, in report column order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldValues(Vec<(Field, String)>);

impl FieldValues {
    /// Pair values positionally with a field ordering. Extra entries on either side are ignored.
    pub fn zip(fields: &[Field], values: Vec<String>) -> FieldValues {
        FieldValues(fields.iter().copied().zip(values).collect())
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, v)| (*f, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Per-region record. Visceral fat only ever carries a single mass value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionRecord {
    Composition(FieldValues),
    Visceral { mass_g: String },
}

impl Serialize for RegionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RegionRecord::Composition(values) => {
                let mut map = serializer.serialize_map(Some(values.len()))?;
                for (field, value) in values.iter() {
                    map.serialize_entry(field.label(), value)?;
                }
                map.end()
            }
            RegionRecord::Visceral { mass_g } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Mass (g)", mass_g)?;
                map.end()
            }
        }
    }
}

/// A region whose value count did not match the expected count and was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    pub label: String,
    pub value_count: usize,
    pub expected: usize,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dropped region '{}': {} values, expected {}",
            self.label, self.value_count, self.expected
        )
    }
}

/// Parsed snapshot of one scan report.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedReport {
    pub format: ReportFormat,
    pub regions: BTreeMap<Region, RegionRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ParseWarning>,
}

impl ParsedReport {
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            regions: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn get(&self, region: &Region) -> Option<&RegionRecord> {
        self.regions.get(region)
    }

    pub fn contains(&self, region: &Region) -> bool {
        self.regions.contains_key(region)
    }
}

/// One output row: every declared column, in declared order, always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    cells: Vec<(&'static str, String)>,
}

impl OutputRow {
    /// A row with every column blank.
    pub fn blank(columns: &[&'static str]) -> Self {
        Self {
            cells: columns.iter().map(|c| (*c, String::new())).collect(),
        }
    }

    /// Set a declared column. Undeclared columns are ignored.
    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        match self.cells.iter_mut().find(|(c, _)| *c == column) {
            Some((_, cell)) => *cell = value.into(),
            None => debug_assert!(false, "column '{column}' is not declared"),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.cells.iter().map(|(c, _)| *c)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
