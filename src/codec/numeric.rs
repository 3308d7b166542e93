//! Numeric coercion for volume and rating columns.

use crate::constants::RATING_SCALE_LIMIT;
use crate::models::Cell;

/// Coerce a cell to a finite number; anything else is 0.0
pub fn to_number(cell: &Cell) -> f64 {
    let value = match cell {
        Cell::Number(value) => *value,
        Cell::Text(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if value.is_finite() { value } else { 0.0 }
}

/// Coerce a cell to a contact count, rounding to the nearest integer.
/// Negative values clamp to zero.
pub fn to_count(cell: &Cell) -> u64 {
    count_from(to_number(cell))
}

pub(crate) fn count_from(value: f64) -> u64 {
    if value <= 0.0 || !value.is_finite() {
        0
    } else {
        value.round() as u64
    }
}

/// Coerce a cell to a rating on the 0-5 scale
pub fn to_rating(cell: &Cell) -> f64 {
    rescale_rating(to_number(cell))
}

/// Bring a 0-10 rating down to 0-5.
///
/// Heuristic only: any value above 5 is divided by 10, so a genuine 4/10
/// stays 4.
pub fn rescale_rating(value: f64) -> f64 {
    if value > RATING_SCALE_LIMIT {
        value / 10.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_rescale() {
        assert_eq!(rescale_rating(8.0), 0.8);
        assert_eq!(rescale_rating(4.5), 4.5);
        assert_eq!(rescale_rating(5.0), 5.0);
        assert_eq!(to_rating(&Cell::Number(9.0)), 0.9);
        assert_eq!(to_rating(&Cell::from("4.8")), 4.8);
    }

    #[test]
    fn test_non_numeric_is_zero() {
        assert_eq!(to_number(&Cell::from("abc")), 0.0);
        assert_eq!(to_number(&Cell::from("4,5")), 0.0);
        assert_eq!(to_number(&Cell::Empty), 0.0);
        assert_eq!(to_number(&Cell::from("inf")), 0.0);
        assert_eq!(to_number(&Cell::from(" 12 ")), 12.0);
    }

    #[test]
    fn test_counts_round_and_clamp() {
        assert_eq!(to_count(&Cell::Number(12.0)), 12);
        assert_eq!(to_count(&Cell::Number(12.6)), 13);
        assert_eq!(to_count(&Cell::Number(-3.0)), 0);
        assert_eq!(to_count(&Cell::from("7")), 7);
        assert_eq!(to_count(&Cell::from("-")), 0);
    }
}
