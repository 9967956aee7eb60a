//! Dialect B: region metrics plus body-fat shares.
//!
//! Derived columns that cannot be computed stay blank.

use super::{field_kg, fill_region, format_fixed, grams_to_kg, RegionColumns};
use crate::error::DexaError;
use crate::model::{Field, OutputRow, ParsedReport, Region, RegionRecord};
use crate::parsing::values::parse_number;
use log::debug;
use rust_decimal::Decimal;

pub const COLUMNS: [&str; 38] = [
    "Total %RegionFat",
    "Total Fat kg",
    "Total Lean kg",
    "Total BMC kg",
    "DEXA Weight kg",
    "Total FFM kg",
    "Trunk Fat %RegionFat",
    "Trunk Fat kg",
    "Trunk Lean kg",
    "Total Trunk Mass kg",
    "Trunk FFM kg",
    "Trunk Fat %BodyFat",
    "Android Fat %RegionFat",
    "Android Fat kg",
    "Android Lean kg",
    "Total Android Mass kg",
    "Android FFM kg",
    "Android Fat %BodyFat",
    "Gynoid Fat %RegionFat",
    "Gynoid Fat kg",
    "Gynoid Lean kg",
    "Total Gynoid Mass kg",
    "Gynoid FFM kg",
    "Gynoid Fat %BodyFat",
    "ROI Rib Fat %RegionFat",
    "ROI Rib Fat kg",
    "ROI Rib Lean kg",
    "ROI Total Rib Mass kg",
    "ROI Rib FFM kg",
    "ROI Rib Fat %BodyFat",
    "ROI Abdomen Fat %RegionFat",
    "ROI Abdomen Fat kg",
    "ROI Abdomen Lean kg",
    "ROI Total Abdomen Mass kg",
    "ROI Abdomen FFM kg",
    "ROI Abdomen Fat %BodyFat",
    "Visceral Fat Of Android Region kg",
    "Calc Subcutaneous Fat of Android Region kg",
];

const PCT_PLACES: u32 = 1;

const TOTAL_FAT: &str = "Total Fat kg";
const ANDROID_FAT: &str = "Android Fat kg";
const VISCERAL_FAT: &str = "Visceral Fat Of Android Region kg";
const SUBCUTANEOUS_FAT: &str = "Calc Subcutaneous Fat of Android Region kg";

/// (region fat column, share-of-total-fat column)
const BODY_FAT_SHARES: [(&str, &str); 5] = [
    ("Trunk Fat kg", "Trunk Fat %BodyFat"),
    ("Android Fat kg", "Android Fat %BodyFat"),
    ("Gynoid Fat kg", "Gynoid Fat %BodyFat"),
    ("ROI Rib Fat kg", "ROI Rib Fat %BodyFat"),
    ("ROI Abdomen Fat kg", "ROI Abdomen Fat %BodyFat"),
];

const TOTAL: RegionColumns = RegionColumns {
    pct_fat: "Total %RegionFat",
    fat_kg: "Total Fat kg",
    lean_kg: "Total Lean kg",
    mass_kg: "DEXA Weight kg",
    ffm_kg: "Total FFM kg",
};

const TRUNK: RegionColumns = RegionColumns {
    pct_fat: "Trunk Fat %RegionFat",
    fat_kg: "Trunk Fat kg",
    lean_kg: "Trunk Lean kg",
    mass_kg: "Total Trunk Mass kg",
    ffm_kg: "Trunk FFM kg",
};

const ANDROID: RegionColumns = RegionColumns {
    pct_fat: "Android Fat %RegionFat",
    fat_kg: "Android Fat kg",
    lean_kg: "Android Lean kg",
    mass_kg: "Total Android Mass kg",
    ffm_kg: "Android FFM kg",
};

const GYNOID: RegionColumns = RegionColumns {
    pct_fat: "Gynoid Fat %RegionFat",
    fat_kg: "Gynoid Fat kg",
    lean_kg: "Gynoid Lean kg",
    mass_kg: "Total Gynoid Mass kg",
    ffm_kg: "Gynoid FFM kg",
};

const ROI_RIB: RegionColumns = RegionColumns {
    pct_fat: "ROI Rib Fat %RegionFat",
    fat_kg: "ROI Rib Fat kg",
    lean_kg: "ROI Rib Lean kg",
    mass_kg: "ROI Total Rib Mass kg",
    ffm_kg: "ROI Rib FFM kg",
};

const ROI_ABDOMEN: RegionColumns = RegionColumns {
    pct_fat: "ROI Abdomen Fat %RegionFat",
    fat_kg: "ROI Abdomen Fat kg",
    lean_kg: "ROI Abdomen Lean kg",
    mass_kg: "ROI Total Abdomen Mass kg",
    ffm_kg: "ROI Abdomen FFM kg",
};

pub fn generate(report: &ParsedReport) -> Result<OutputRow, DexaError> {
    let mut row = OutputRow::blank(&COLUMNS);

    for (region, record) in &report.regions {
        let RegionRecord::Composition(values) = record else {
            continue;
        };
        match region {
            Region::Total => {
                fill_region(&mut row, region, values, &TOTAL, PCT_PLACES)?;
                row.set("Total BMC kg", field_kg(region, values, Field::BmcG)?);
            }
            Region::Trunk => fill_region(&mut row, region, values, &TRUNK, PCT_PLACES)?,
            Region::Android => fill_region(&mut row, region, values, &ANDROID, PCT_PLACES)?,
            Region::Gynoid => fill_region(&mut row, region, values, &GYNOID, PCT_PLACES)?,
            Region::RoiRib => fill_region(&mut row, region, values, &ROI_RIB, PCT_PLACES)?,
            Region::RoiAbdomen => fill_region(&mut row, region, values, &ROI_ABDOMEN, PCT_PLACES)?,
            _ => {}
        }
    }

    if let Some(RegionRecord::Visceral { mass_g }) = report.get(&Region::VisceralFat) {
        let vat_kg = grams_to_kg(mass_g).map_err(|_| DexaError::InvalidField {
            region: Region::VisceralFat.to_string(),
            field: "Mass (g)".into(),
        })?;
        if let (Some(android), Ok(vat)) = (number_in(&row, ANDROID_FAT), parse_number(&vat_kg)) {
            row.set(SUBCUTANEOUS_FAT, format_fixed(android - vat, 3));
        }
        row.set(VISCERAL_FAT, vat_kg);
    }

    fill_body_fat_shares(&mut row);
    Ok(row)
}

/// Region fat as a percentage of total fat, only when total fat is positive.
fn fill_body_fat_shares(row: &mut OutputRow) {
    let total_fat = match number_in(row, TOTAL_FAT) {
        Some(total) if total > Decimal::ZERO => total,
        _ => {
            debug!("total fat unavailable or zero, leaving body fat shares blank");
            return;
        }
    };
    for (fat_column, share_column) in BODY_FAT_SHARES {
        if let Some(fat) = number_in(row, fat_column) {
            let share = fat / total_fat * Decimal::ONE_HUNDRED;
            row.set(share_column, format_fixed(share, PCT_PLACES));
        }
    }
}

/// The numeric value of a non-blank column.
fn number_in(row: &OutputRow, column: &str) -> Option<Decimal> {
    row.get(column)
        .filter(|v| !v.is_empty())
        .and_then(|v| parse_number(v).ok())
}
