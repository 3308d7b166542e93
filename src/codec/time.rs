//! Response-time codec.
//!
//! Zero seconds means "no data" throughout the dashboard, so the formatter
//! renders it as the `-` placeholder and the parser maps every unusable input
//! to zero.

use crate::constants::TIME_PLACEHOLDER;
use crate::models::Cell;
use chrono::Timelike;

/// Decode a cell into a whole number of seconds.
///
/// Zero is returned for: empty cells, the `-` placeholder, blank text, text
/// that does not split into exactly three `:`-separated parts, parts that are
/// not non-negative integers, numeric cells, and arithmetic overflow.
/// Structured time-of-day cells contribute their hour, minute and second.
pub fn parse_time_to_seconds(cell: &Cell) -> u64 {
    match cell {
        Cell::Empty | Cell::Number(_) => 0,
        Cell::Time(time) => seconds_of_day(time.hour(), time.minute(), time.second()),
        Cell::DateTime(datetime) => {
            seconds_of_day(datetime.hour(), datetime.minute(), datetime.second())
        }
        Cell::Text(text) => parse_time_str(text),
    }
}

/// Decode `HH:MM:SS` text; see [`parse_time_to_seconds`] for the zero cases
pub fn parse_time_str(text: &str) -> u64 {
    if text == TIME_PLACEHOLDER || text.trim().is_empty() {
        return 0;
    }

    let parts: Vec<&str> = text.trim().split(':').collect();
    if parts.len() != 3 {
        return 0;
    }

    let mut fields = [0u64; 3];
    for (field, part) in fields.iter_mut().zip(&parts) {
        match part.trim().parse::<u64>() {
            Ok(value) => *field = value,
            Err(_) => return 0,
        }
    }

    let [hours, minutes, seconds] = fields;
    hours
        .checked_mul(3600)
        .and_then(|total| total.checked_add(minutes.checked_mul(60)?))
        .and_then(|total| total.checked_add(seconds))
        .unwrap_or(0)
}

/// Format seconds as zero-padded `HH:MM:SS`, or `-` for zero
pub fn format_seconds_to_time(seconds: u64) -> String {
    if seconds == 0 {
        return TIME_PLACEHOLDER.to_string();
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

fn seconds_of_day(hour: u32, minute: u32, second: u32) -> u64 {
    u64::from(hour) * 3600 + u64::from(minute) * 60 + u64::from(second)
}
