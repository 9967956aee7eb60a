use dexa_core::model::{Field, ParsedReport, RegionRecord};
use std::fmt::Write;

/// Render a parsed report as one indented block per region.
pub fn format_parsed(report: &ParsedReport) -> String {
    let width = Field::ALL
        .iter()
        .map(|f| f.label().len())
        .max()
        .unwrap_or(20);

    let mut out = String::new();
    let _ = writeln!(out, "Layout: {}\n", report.format);

    for (region, record) in &report.regions {
        let _ = writeln!(out, "{region}");
        match record {
            RegionRecord::Composition(values) => {
                for (field, value) in values.iter() {
                    let _ = writeln!(out, "  {:<width$}  {value}", field.label());
                }
            }
            RegionRecord::Visceral { mass_g } => {
                let _ = writeln!(out, "  {:<width$}  {mass_g}", "Mass (g)");
            }
        }
        out.push('\n');
    }

    for warning in &report.warnings {
        let _ = writeln!(out, "warning: {warning}");
    }
    out
}
