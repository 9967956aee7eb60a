use crate::error::DexaError;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

/// Numeric tokens on a data line: optional minus, digits, thousands commas and decimal points.
static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\d,.]+").expect("valid numeric token pattern"));

/// Parse a report number, stripping thousands separators.
///
/// - "68" -> 68
/// - "1,234.5" -> 1234.5
/// - "-0.4" -> -0.4
pub fn parse_number(s: &str) -> Result<Decimal, DexaError> {
    let s = s.trim();
    let normalized = s.replace(',', "");
    Decimal::from_str(&normalized).map_err(|_| DexaError::InvalidNumber(s.to_string()))
}

/// Extract every numeric token from a line, in order of appearance.
///
/// Tokens are returned verbatim; they are only normalized when a value is consumed.
pub fn numeric_tokens(line: &str) -> Vec<String> {
    NUMERIC_TOKEN
        .find_iter(line)
        .map(|m| m.as_str().to_string())
        .collect()
}
