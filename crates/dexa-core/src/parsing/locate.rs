use crate::model::ReportFormat;

pub const STANDARD_ANCHOR: &str = "BODY COMPOSITION: Total Body (Enhanced Analysis)";
pub const NUMERIC_ANCHOR: &str = "Total Body Custom Results";

/// The body-composition section of a report, starting at its anchor phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedSection<'a> {
    pub format: ReportFormat,
    pub text: &'a str,
}

/// Find the report section within arbitrary text.
///
/// The standard anchor is checked first and wins whenever it is present.
/// Returns None when neither anchor occurs.
pub fn locate_section(text: &str) -> Option<LocatedSection<'_>> {
    if let Some(idx) = text.find(STANDARD_ANCHOR) {
        return Some(LocatedSection {
            format: ReportFormat::Standard,
            text: &text[idx..],
        });
    }
    text.find(NUMERIC_ANCHOR).map(|idx| LocatedSection {
        format: ReportFormat::Numeric,
        text: &text[idx..],
    })
}
