use dexa_core::error::DexaError;
use dexa_core::extraction::load_text;
use dexa_core::extraction::mutool::MutoolConverter;
use dexa_core::parsing::parse_report;
use std::path::PathBuf;

use crate::output;

pub fn run(input_file: PathBuf, output_format: &str) -> Result<(), DexaError> {
    let text = load_text(&input_file, &MutoolConverter::new())?;
    let report = parse_report(&text)?;

    match output_format {
        "json" => output::json::print(&report)?,
        _ => print!("{}", output::table::format_parsed(&report)),
    }

    Ok(())
}
