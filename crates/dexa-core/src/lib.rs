pub mod batch;
pub mod error;
pub mod extraction;
pub mod generate;
pub mod merge;
pub mod model;
pub mod parsing;

use error::DexaError;
use generate::Dialect;
use merge::merge_pair;
use model::OutputRow;
use parsing::parse_report;

/// Main API entry point: convert the text of one report into an output row.
///
/// Locates the body-composition section, splits it into regions and maps
/// the regions into the dialect's columns.
pub fn convert_text(text: &str, dialect: Dialect) -> Result<OutputRow, DexaError> {
    let report = parse_report(text)?;
    dialect.generate(&report)
}

/// Convert the two reports of one scan (one standard, one numeric layout,
/// in either order) into a single merged output row.
pub fn convert_pair_texts(
    first: &str,
    second: &str,
    dialect: Dialect,
) -> Result<OutputRow, DexaError> {
    let first = parse_report(first)?;
    let second = parse_report(second)?;
    let merged = merge_pair(&first, &second)?;
    dialect.generate(&merged)
}
