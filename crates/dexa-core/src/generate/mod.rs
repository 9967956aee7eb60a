pub mod dialect_a;
pub mod dialect_b;
pub mod formula;

use crate::error::DexaError;
use crate::model::{Field, FieldValues, OutputRow, ParsedReport, Region};
use crate::parsing::values::parse_number;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Output column set and derived formulas to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// 55 columns, formula table with explicit "ERROR" markers.
    A,
    /// 38 columns, guarded body-fat shares left blank on failure.
    B,
}

impl Dialect {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Dialect::A => &dialect_a::COLUMNS,
            Dialect::B => &dialect_b::COLUMNS,
        }
    }

    /// Map a parsed report into this dialect's output row.
    pub fn generate(&self, report: &ParsedReport) -> Result<OutputRow, DexaError> {
        match self {
            Dialect::A => dialect_a::generate(report),
            Dialect::B => dialect_b::generate(report),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::A => write!(f, "A"),
            Dialect::B => write!(f, "B"),
        }
    }
}

/// Round half away from zero and print in shortest form, keeping at least one
/// fractional digit: 7.000 -> "7.0", 2.3450 -> "2.345".
pub fn format_rounded(value: Decimal, places: u32) -> String {
    let rounded = value
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    if rounded.scale() == 0 {
        format!("{rounded}.0")
    } else {
        rounded.to_string()
    }
}

/// Round half away from zero and print exactly `places` fractional digits.
pub fn format_fixed(value: Decimal, places: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(places);
    rounded.to_string()
}

/// Convert a gram reading such as "22,634" to kilograms, rounded to 3 places.
pub fn grams_to_kg(grams: &str) -> Result<String, DexaError> {
    let grams = parse_number(grams)?;
    Ok(format_rounded(grams / Decimal::ONE_THOUSAND, 3))
}

/// Output columns fed by one composition region.
pub(crate) struct RegionColumns {
    pub pct_fat: &'static str,
    pub fat_kg: &'static str,
    pub lean_kg: &'static str,
    pub mass_kg: &'static str,
    pub ffm_kg: &'static str,
}

/// Write the five standard columns of a region: %fat, fat, lean, total mass, fat-free mass.
pub(crate) fn fill_region(
    row: &mut OutputRow,
    region: &Region,
    values: &FieldValues,
    columns: &RegionColumns,
    pct_places: u32,
) -> Result<(), DexaError> {
    let pct = parse_number(field(region, values, Field::RegionPctFat)?)
        .map_err(|_| invalid(region, Field::RegionPctFat))?;
    row.set(columns.pct_fat, format_fixed(pct, pct_places));
    row.set(columns.fat_kg, field_kg(region, values, Field::FatG)?);
    row.set(columns.lean_kg, field_kg(region, values, Field::LeanG)?);
    row.set(columns.mass_kg, field(region, values, Field::TotalMassKg)?);
    row.set(columns.ffm_kg, field_kg(region, values, Field::FatFreeG)?);
    Ok(())
}

/// A gram-valued field of a region, converted to kilograms.
pub(crate) fn field_kg(region: &Region, values: &FieldValues, f: Field) -> Result<String, DexaError> {
    grams_to_kg(field(region, values, f)?).map_err(|_| invalid(region, f))
}

fn field<'a>(region: &Region, values: &'a FieldValues, f: Field) -> Result<&'a str, DexaError> {
    values.get(f).ok_or_else(|| invalid(region, f))
}

fn invalid(region: &Region, f: Field) -> DexaError {
    DexaError::InvalidField {
        region: region.to_string(),
        field: f.label().to_string(),
    }
}

/// Write a header row and one data row as CSV.
pub fn write_row<W: Write>(row: &OutputRow, writer: W) -> Result<(), DexaError> {
    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);
    csv.write_record(row.columns())?;
    csv.write_record(row.values())?;
    csv.flush()?;
    Ok(())
}

/// Write a row to a CSV file, replacing any existing file.
pub fn write_csv(row: &OutputRow, path: &Path) -> Result<(), DexaError> {
    let file = File::create(path)?;
    write_row(row, file)
}
