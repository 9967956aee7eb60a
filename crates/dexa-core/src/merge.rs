use crate::error::DexaError;
use crate::model::{ParsedReport, Region, ReportFormat};
use log::debug;

/// Overlay the numeric report's ROI regions onto a copy of the standard report.
///
/// Whole-body regions come from `standard`; ROI Rib/Abdomen/Hip/Femur present
/// in `numeric` replace (or add to) the standard ones. Neither input is
/// modified. Returns None when either input is missing.
pub fn merge_reports(
    standard: Option<&ParsedReport>,
    numeric: Option<&ParsedReport>,
) -> Option<ParsedReport> {
    let (standard, numeric) = (standard?, numeric?);
    let mut merged = standard.clone();
    for region in Region::NUMERIC_ROIS {
        if let Some(record) = numeric.get(&region) {
            debug!("overlaying {region} from numeric report");
            merged.regions.insert(region, record.clone());
        }
    }
    merged.warnings.extend(numeric.warnings.iter().cloned());
    Some(merged)
}

/// Merge two reports of the same scan, picking base and overlay by format tag.
///
/// The pair must hold exactly one standard and one numeric report.
pub fn merge_pair(first: &ParsedReport, second: &ParsedReport) -> Result<ParsedReport, DexaError> {
    let (standard, numeric) = match (first.format, second.format) {
        (ReportFormat::Standard, ReportFormat::Numeric) => (first, second),
        (ReportFormat::Numeric, ReportFormat::Standard) => (second, first),
        (a, b) => {
            return Err(DexaError::MergeFormat(format!(
                "expected one standard and one numeric report, got {a} and {b}"
            )))
        }
    };
    merge_reports(Some(standard), Some(numeric))
        .ok_or_else(|| DexaError::MergeFormat("missing report".into()))
}
