//! Dialect A: whole-body, ROI and chest-wall metrics with a formula table.
//!
//! Formula failures are written as "ERROR" into the affected column only.

use super::formula::{self, combined_percent_of, difference, percent_of, sum, Formula};
use super::{field_kg, fill_region, grams_to_kg, RegionColumns};
use crate::error::DexaError;
use crate::model::{Field, OutputRow, ParsedReport, Region, RegionRecord};

pub const COLUMNS: [&str; 55] = [
    "Total Fat PercBodyWeight",
    "Total Fat kg",
    "Total Lean kg",
    "Total BMC kg",
    "DEXA Weight kg",
    "Total FFM kg",
    "Total Lean Arms kg",
    "Total Lean Legs kg",
    "ASMM kg",
    "Trunk Fat Perc RegionFat",
    "Trunk Fat kg",
    "Trunk Lean kg",
    "Total Trunk Mass kg",
    "Trunk FFM kg",
    "Trunk Fat Perc BodyFat",
    "Android Fat Perc RegionFat",
    "Android Fat kg",
    "Android Lean kg",
    "Total Android Mass kg",
    "Android FFM kg",
    "Android Fat Perc BodyFat",
    "Gynoid Fat Perc RegionFat",
    "Gynoid Fat kg",
    "Gynoid Lean kg",
    "Total Gynoid Mass kg",
    "Gynoid FFM kg",
    "Gynoid Fat Perc BodyFat",
    "ROI Rib Fat Perc RegionFat",
    "ROI Rib Fat kg",
    "ROI Rib Lean kg",
    "ROI Total Rib Mass kg",
    "ROI Rib FFM kg",
    "ROI Rib Fat Perc BodyFat",
    "ROI Abdomen Fat Perc RegionFat",
    "ROI Abdomen Fat kg",
    "ROI Abdomen Lean kg",
    "ROI Total Abdomen Mass kg",
    "ROI Abdomen FFM kg",
    "ROI Abdomen Fat Perc BodyFat",
    "ROI Chest Wall Fat Perc RegionFat",
    "ROI Chest Wall Fat kg",
    "ROI Chest Wall Lean kg",
    "ROI Chest Wall Total Mass kg",
    "ROI Chest Wall FFM kg",
    "ROI Chest Wall Fat Perc BodyFat",
    "Visceral Fat Of Android Region kg",
    "Calc Subcutaneous Fat of Android Region kg",
    // Index columns need stature or BMI, which the report text does not carry.
    "FMI (kg/m2)",
    "FFMI (kg/m2)",
    "LMI (kg/m2)",
    "ASMI (kg/m2)",
    "ASM-to-Wt Ratio",
    "FMI / LMI",
    "LMI / FMI",
    "LMI / BMI",
];

const PCT_PLACES: u32 = 2;

const TOTAL: RegionColumns = RegionColumns {
    pct_fat: "Total Fat PercBodyWeight",
    fat_kg: "Total Fat kg",
    lean_kg: "Total Lean kg",
    mass_kg: "DEXA Weight kg",
    ffm_kg: "Total FFM kg",
};

const TRUNK: RegionColumns = RegionColumns {
    pct_fat: "Trunk Fat Perc RegionFat",
    fat_kg: "Trunk Fat kg",
    lean_kg: "Trunk Lean kg",
    mass_kg: "Total Trunk Mass kg",
    ffm_kg: "Trunk FFM kg",
};

const ANDROID: RegionColumns = RegionColumns {
    pct_fat: "Android Fat Perc RegionFat",
    fat_kg: "Android Fat kg",
    lean_kg: "Android Lean kg",
    mass_kg: "Total Android Mass kg",
    ffm_kg: "Android FFM kg",
};

const GYNOID: RegionColumns = RegionColumns {
    pct_fat: "Gynoid Fat Perc RegionFat",
    fat_kg: "Gynoid Fat kg",
    lean_kg: "Gynoid Lean kg",
    mass_kg: "Total Gynoid Mass kg",
    ffm_kg: "Gynoid FFM kg",
};

const ROI_RIB: RegionColumns = RegionColumns {
    pct_fat: "ROI Rib Fat Perc RegionFat",
    fat_kg: "ROI Rib Fat kg",
    lean_kg: "ROI Rib Lean kg",
    mass_kg: "ROI Total Rib Mass kg",
    ffm_kg: "ROI Rib FFM kg",
};

const ROI_ABDOMEN: RegionColumns = RegionColumns {
    pct_fat: "ROI Abdomen Fat Perc RegionFat",
    fat_kg: "ROI Abdomen Fat kg",
    lean_kg: "ROI Abdomen Lean kg",
    mass_kg: "ROI Total Abdomen Mass kg",
    ffm_kg: "ROI Abdomen FFM kg",
};

/// Derived columns, evaluated top to bottom after the region columns are filled.
pub const FORMULAS: &[Formula] = &[
    Formula {
        column: "ASMM kg",
        inputs: &["Total Lean Arms kg", "Total Lean Legs kg"],
        compute: sum,
        places: 3,
    },
    Formula {
        column: "Trunk Fat Perc BodyFat",
        inputs: &["Trunk Fat kg", "Total Fat kg"],
        compute: percent_of,
        places: 2,
    },
    Formula {
        column: "Android Fat Perc BodyFat",
        inputs: &["Android Fat kg", "Total Fat kg"],
        compute: percent_of,
        places: 2,
    },
    Formula {
        column: "Gynoid Fat Perc BodyFat",
        inputs: &["Gynoid Fat kg", "Total Fat kg"],
        compute: percent_of,
        places: 2,
    },
    Formula {
        column: "ROI Rib Fat Perc BodyFat",
        inputs: &["ROI Rib Fat kg", "Total Fat kg"],
        compute: percent_of,
        places: 2,
    },
    Formula {
        column: "ROI Abdomen Fat Perc BodyFat",
        inputs: &["ROI Abdomen Fat kg", "Total Fat kg"],
        compute: percent_of,
        places: 1,
    },
    Formula {
        column: "Calc Subcutaneous Fat of Android Region kg",
        inputs: &["Android Fat kg", "Visceral Fat Of Android Region kg"],
        compute: difference,
        places: 3,
    },
    Formula {
        column: "ROI Chest Wall Fat Perc RegionFat",
        inputs: &[
            "ROI Rib Fat kg",
            "ROI Abdomen Fat kg",
            "ROI Total Rib Mass kg",
            "ROI Total Abdomen Mass kg",
        ],
        compute: combined_percent_of,
        places: 1,
    },
    Formula {
        column: "ROI Chest Wall Fat kg",
        inputs: &["ROI Rib Fat kg", "ROI Abdomen Fat kg"],
        compute: sum,
        places: 3,
    },
    Formula {
        column: "ROI Chest Wall Lean kg",
        inputs: &["ROI Rib Lean kg", "ROI Abdomen Lean kg"],
        compute: sum,
        places: 3,
    },
    Formula {
        column: "ROI Chest Wall Total Mass kg",
        inputs: &["ROI Total Rib Mass kg", "ROI Total Abdomen Mass kg"],
        compute: sum,
        places: 3,
    },
    Formula {
        column: "ROI Chest Wall FFM kg",
        inputs: &["ROI Rib FFM kg", "ROI Abdomen FFM kg"],
        compute: sum,
        places: 3,
    },
    Formula {
        column: "ROI Chest Wall Fat Perc BodyFat",
        inputs: &["ROI Chest Wall Fat kg", "Total Fat kg"],
        compute: percent_of,
        places: 2,
    },
];

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
            Region::Arms => row.set("Total Lean Arms kg", field_kg(region, values, Field::LeanG)?),
            Region::Legs => row.set("Total Lean Legs kg", field_kg(region, values, Field::LeanG)?),
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
        row.set("Visceral Fat Of Android Region kg", vat_kg);
    }

    formula::apply(&mut row, FORMULAS);
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::formula::ERROR_MARKER;
    use crate::model::{FieldValues, ReportFormat};

    fn composition(values: [&str; 8]) -> RegionRecord {
        RegionRecord::Composition(FieldValues::zip(
            &Field::ALL,
            values.iter().map(|v| v.to_string()).collect(),
        ))
    }

    fn full_report() -> ParsedReport {
        let mut report = ParsedReport::new(ReportFormat::Standard);
        let regions = [
            (Region::Total, ["32.1", "31.0", "70,512", "22,634", "47,878", "2,650", "50,528", "73.2"]),
            (Region::Arms, ["30.0", "29.1", "7,900", "2,370", "5,530", "410", "5,940", "8.3"]),
            (Region::Legs, ["33.4", "32.5", "23,400", "7,816", "15,584", "1,010", "16,594", "24.4"]),
            (Region::Trunk, ["35.2", "34.6", "31,300", "11,020", "20,280", "880", "21,160", "32.2"]),
            (Region::Android, ["40.2", "39.8", "5,102", "2,051", "3,051", "61", "3,112", "5.2"]),
            (Region::Gynoid, ["36.0", "35.5", "11,800", "4,248", "7,552", "230", "7,782", "12.0"]),
            (Region::RoiRib, ["28.4", "27.9", "3,210", "912", "2,298", "58", "2,356", "3.3"]),
            (Region::RoiAbdomen, ["41.0", "40.6", "4,802", "1,969", "2,833", "27", "2,860", "4.8"]),
        ];
        for (region, values) in regions {
            report.regions.insert(region, composition(values));
        }
        report.regions.insert(
            Region::VisceralFat,
            RegionRecord::Visceral {
                mass_g: "955".into(),
            },
        );
        report
    }

    #[test]
    fn test_region_columns() {
        let row = generate(&full_report()).unwrap();
        assert_eq!(row.get("Total Fat PercBodyWeight"), Some("31.00"));
        assert_eq!(row.get("Total Fat kg"), Some("22.634"));
        assert_eq!(row.get("Total BMC kg"), Some("2.65"));
        assert_eq!(row.get("DEXA Weight kg"), Some("73.2"));
        assert_eq!(row.get("Total FFM kg"), Some("50.528"));
        assert_eq!(row.get("Total Lean Arms kg"), Some("5.53"));
        assert_eq!(row.get("ROI Total Rib Mass kg"), Some("3.3"));
        assert_eq!(row.get("Visceral Fat Of Android Region kg"), Some("0.955"));
    }

    #[test]
    fn test_formulas() {
        let row = generate(&full_report()).unwrap();
        // 5.530 + 15.584
        assert_eq!(row.get("ASMM kg"), Some("21.114"));
        // 100 * 11.02 / 22.634
        assert_eq!(row.get("Trunk Fat Perc BodyFat"), Some("48.69"));
        // 100 * 1.969 / 22.634, one place
        assert_eq!(row.get("ROI Abdomen Fat Perc BodyFat"), Some("8.7"));
        // 2.051 - 0.955
        assert_eq!(row.get("Calc Subcutaneous Fat of Android Region kg"), Some("1.096"));
        assert_eq!(row.get("ROI Chest Wall Fat kg"), Some("2.881"));
        assert_eq!(row.get("ROI Chest Wall Total Mass kg"), Some("8.1"));
        // 100 * 2.881 / 8.1
        assert_eq!(row.get("ROI Chest Wall Fat Perc RegionFat"), Some("35.6"));
        // 100 * 2.881 / 22.634
        assert_eq!(row.get("ROI Chest Wall Fat Perc BodyFat"), Some("12.73"));
    }

    #[test]
    fn test_asmm_from_row_values() {
        let mut row = OutputRow::blank(&COLUMNS);
        row.set("Total Lean Arms kg", "2.345");
        row.set("Total Lean Legs kg", "7.000");
        formula::apply(&mut row, &FORMULAS[..1]);
        assert_eq!(row.get("ASMM kg"), Some("9.345"));
    }

    #[test]
    fn test_missing_trunk_marks_error_only_there() {
        let mut report = full_report();
        report.regions.remove(&Region::Trunk);
        let row = generate(&report).unwrap();
        assert_eq!(row.get("Trunk Fat kg"), Some(""));
        assert_eq!(row.get("Trunk Fat Perc BodyFat"), Some(ERROR_MARKER));
        assert_eq!(row.get("DEXA Weight kg"), Some("73.2"));
        assert_eq!(row.get("Android Fat Perc BodyFat"), Some("9.06"));
    }

    #[test]
    fn test_total_only_report() {
        let mut report = ParsedReport::new(ReportFormat::Standard);
        report.regions.insert(
            Region::Total,
            composition(["32.1", "31.0", "70,512", "22,634", "47,878", "2,650", "50,528", "73.2"]),
        );
        let row = generate(&report).unwrap();
        assert_eq!(row.len(), COLUMNS.len());
        assert_eq!(row.get("ASMM kg"), Some(ERROR_MARKER));
        assert_eq!(row.get("ROI Chest Wall Fat Perc BodyFat"), Some(ERROR_MARKER));
        assert_eq!(row.get("FMI (kg/m2)"), Some(""));
        assert_eq!(row.get("Total Lean kg"), Some("47.878"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let report = full_report();
        let first = generate(&report).unwrap();
        let second = generate(&report).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_numeric_region_field_fails() {
        let mut report = ParsedReport::new(ReportFormat::Standard);
        report.regions.insert(
            Region::Trunk,
            composition(["35.2", "34.6", "31,300", "1.2.3", "20,280", "880", "21,160", "32.2"]),
        );
        assert!(matches!(
            generate(&report),
            Err(DexaError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_unknown_regions_ignored() {
        let mut report = full_report();
        report.regions.insert(
            Region::Other("Head".into()),
            composition(["20.0", "19.0", "4,000", "800", "3,200", "500", "3,700", "4.5"]),
        );
        let row = generate(&report).unwrap();
        assert_eq!(row, generate(&full_report()).unwrap());
    }
}
