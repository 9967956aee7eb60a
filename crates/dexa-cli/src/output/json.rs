use dexa_core::error::DexaError;
use dexa_core::model::ParsedReport;

pub fn print(report: &ParsedReport) -> Result<(), DexaError> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}
