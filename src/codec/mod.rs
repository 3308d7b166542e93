//! Total decoding functions for spreadsheet cells
//!
//! Every function here maps any input to a value. Blank cells, placeholders
//! and malformed text decode to zero; nothing in this module returns an error.
//!
//! - [`time`] - response times (`HH:MM:SS`, time-of-day cells) to seconds
//! - [`percent`] - rating percentages to a fraction
//! - [`numeric`] - counts and ratings

pub mod numeric;
pub mod percent;
pub mod time;

pub use numeric::{rescale_rating, to_count, to_number, to_rating};
pub use percent::{parse_percent, parse_percent_str};
pub use time::{format_seconds_to_time, parse_time_str, parse_time_to_seconds};
