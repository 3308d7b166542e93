//! Rating-percentage codec.
//!
//! Numeric cells are trusted as fractions and returned unchanged, even above
//! 1. Only text is rescaled: `"50"` and `"50%"` both mean one half. Existing
//! goal evaluations depend on this asymmetry.

use crate::models::Cell;

/// Decode a cell into a fraction.
///
/// Returns 0.0 for empty cells, time cells, blank or unparseable text and
/// non-finite values.
pub fn parse_percent(cell: &Cell) -> f64 {
    match cell {
        Cell::Number(value) if value.is_finite() => *value,
        Cell::Text(text) => parse_percent_str(text),
        _ => 0.0,
    }
}

/// Decode percentage text such as `"50%"`, `"0,5"` or `" 12.5 % "`
pub fn parse_percent_str(text: &str) -> f64 {
    let cleaned = text.replace('%', "").replace(',', ".");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return 0.0;
    }

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if value > 1.0 {
                value / 100.0
            } else {
                value
            }
        }
        _ => 0.0,
    }
}
