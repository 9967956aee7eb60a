use crate::model::{Region, ReportFormat};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Resolve a raw region label to its canonical region.
///
/// The numeric layout labels its ROI sub-regions "1".."4"; everything else
/// (and every label in the standard layout) passes through unchanged.
pub fn normalize_region(label: &str, format: ReportFormat) -> Region {
    match format {
        ReportFormat::Numeric => match NUMERIC_REGION_CODES.get(label) {
            Some(region) => region.clone(),
            None => Region::from_label(label),
        },
        ReportFormat::Standard => Region::from_label(label),
    }
}

/// True when a trimmed line is exactly one of the numeric-layout region codes.
pub fn is_numeric_region_code(line: &str) -> bool {
    NUMERIC_REGION_CODES.contains_key(line)
}

static NUMERIC_REGION_CODES: LazyLock<HashMap<&'static str, Region>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert("1", Region::RoiRib);
    m.insert("2", Region::RoiAbdomen);
    m.insert("3", Region::RoiHip);
    m.insert("4", Region::RoiFemur);
    m
});
