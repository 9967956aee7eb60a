use crate::generate::format_rounded;
use crate::model::OutputRow;
use crate::parsing::values::parse_number;
use log::warn;
use rust_decimal::Decimal;

/// Written into a formula column whose inputs are missing or unusable.
pub const ERROR_MARKER: &str = "ERROR";

/// A derived column computed from other columns of the same row.
pub struct Formula {
    pub column: &'static str,
    pub inputs: &'static [&'static str],
    /// Returns None when the result is undefined (division by zero, overflow).
    pub compute: fn(&[Decimal]) -> Option<Decimal>,
    pub places: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum FormulaError {
    #[error("input column '{0}' is blank")]
    Blank(&'static str),

    #[error("input column '{column}' is not a number: '{value}'")]
    NotNumeric { column: &'static str, value: String },

    #[error("result is undefined")]
    Undefined,
}

/// Evaluate formulas in order, each seeing the results of the ones before it.
///
/// A failing formula sets its column to `ERROR_MARKER`; the rest still run.
pub fn apply(row: &mut OutputRow, formulas: &[Formula]) {
    for formula in formulas {
        let value = match evaluate(row, formula) {
            Ok(v) => format_rounded(v, formula.places),
            Err(e) => {
                warn!("error calculating {}: {e}", formula.column);
                ERROR_MARKER.to_string()
            }
        };
        row.set(formula.column, value);
    }
}

pub fn evaluate(row: &OutputRow, formula: &Formula) -> Result<Decimal, FormulaError> {
    let inputs = formula
        .inputs
        .iter()
        .map(|&column| {
            let value = row.get(column).unwrap_or_default();
            if value.is_empty() {
                return Err(FormulaError::Blank(column));
            }
            parse_number(value).map_err(|_| FormulaError::NotNumeric {
                column,
                value: value.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    (formula.compute)(&inputs).ok_or(FormulaError::Undefined)
}

/// a + b
pub fn sum(v: &[Decimal]) -> Option<Decimal> {
    v[0].checked_add(v[1])
}

/// a - b
pub fn difference(v: &[Decimal]) -> Option<Decimal> {
    v[0].checked_sub(v[1])
}

/// 100 * a / b
pub fn percent_of(v: &[Decimal]) -> Option<Decimal> {
    Decimal::ONE_HUNDRED.checked_mul(v[0])?.checked_div(v[1])
}

/// 100 * (a + b) / (c + d)
pub fn combined_percent_of(v: &[Decimal]) -> Option<Decimal> {
    let part = v[0].checked_add(v[1])?;
    let whole = v[2].checked_add(v[3])?;
    Decimal::ONE_HUNDRED.checked_mul(part)?.checked_div(whole)
}
