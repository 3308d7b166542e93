//! Spreadsheet files (xlsx, xls, ods) read with calamine

use crate::codec::format_seconds_to_time;
use crate::error::{GoalsError, Result};
use crate::models::{Cell, RawSheet, Workbook};
use calamine::{Data, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveTime, TimeDelta};
use std::path::PathBuf;
use tracing::debug;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// A workbook file on disk; every sheet is read, the first row is the header
#[derive(Debug, Clone)]
pub struct SpreadsheetFile {
    path: PathBuf,
}

impl SpreadsheetFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl super::WorkbookSource for SpreadsheetFile {
    fn fetch(&self) -> Result<Workbook> {
        let mut reader = open_workbook_auto(&self.path).map_err(|e| GoalsError::InvalidWorkbook {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let mut workbook = Workbook::new();
        for name in reader.sheet_names() {
            let range = reader.worksheet_range(&name)?;
            let mut rows = range.rows();

            let columns: Vec<String> = match rows.next() {
                Some(header) => header.iter().map(header_text).collect(),
                None => Vec::new(),
            };
            let data: Vec<Vec<Cell>> = rows
                .map(|row| row.iter().map(cell_from_data).collect())
                .collect();

            debug!(
                "Read sheet '{}': {} columns, {} rows",
                name,
                columns.len(),
                data.len()
            );
            workbook.insert(name, RawSheet::new(columns, data));
        }

        Ok(workbook)
    }

    fn describe(&self) -> String {
        format!("spreadsheet {}", self.path.display())
    }
}

fn header_text(data: &Data) -> String {
    cell_from_data(data).display_text().unwrap_or_default()
}

/// Map one calamine value onto a [`Cell`]
pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(text) => Cell::Text(text.clone()),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Float(value) => Cell::Number(*value),
        Data::Bool(value) => Cell::Number(if *value { 1.0 } else { 0.0 }),
        Data::DateTime(datetime) if datetime.is_duration() => {
            Cell::Text(duration_text(datetime.as_f64()))
        }
        Data::DateTime(datetime) => cell_from_serial(datetime.as_f64()),
        Data::DateTimeIso(text) | Data::DurationIso(text) => Cell::Text(text.clone()),
    }
}

/// A duration in days rendered as `HH:MM:SS`; hours may exceed 24
fn duration_text(days: f64) -> String {
    if !days.is_finite() || days <= 0.0 {
        return format_seconds_to_time(0);
    }
    format_seconds_to_time((days * SECONDS_PER_DAY).round() as u64)
}

/// An Excel date serial (days since 1899-12-30). A serial below one day is a
/// bare time cell; anything larger carries a date.
pub fn cell_from_serial(serial: f64) -> Cell {
    if !serial.is_finite() || serial < 0.0 {
        return Cell::Number(serial);
    }

    let total_seconds = (serial * SECONDS_PER_DAY).round() as i64;
    if total_seconds < SECONDS_PER_DAY as i64 {
        return NaiveTime::from_num_seconds_from_midnight_opt(total_seconds as u32, 0)
            .map_or(Cell::Number(serial), Cell::Time);
    }

    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|epoch| epoch.and_hms_opt(0, 0, 0))
        .zip(TimeDelta::try_seconds(total_seconds))
        .and_then(|(epoch, offset)| epoch.checked_add_signed(offset))
        .map_or(Cell::Number(serial), Cell::DateTime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::parse_time_to_seconds;

    #[test]
    fn test_plain_values() {
        assert_eq!(cell_from_data(&Data::Empty), Cell::Empty);
        assert_eq!(cell_from_data(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(cell_from_data(&Data::Float(4.5)), Cell::Number(4.5));
        assert_eq!(cell_from_data(&Data::Bool(true)), Cell::Number(1.0));
        assert_eq!(
            cell_from_data(&Data::String("00:01:30".to_string())),
            Cell::Text("00:01:30".to_string())
        );
    }

    #[test]
    fn test_integral_header_renders_without_fraction() {
        assert_eq!(header_text(&Data::Float(2024.0)), "2024");
        assert_eq!(header_text(&Data::Empty), "");
        assert_eq!(header_text(&Data::String(" Nome ".to_string())), "Nome");
    }

    #[test]
    fn test_time_serial_becomes_time_of_day() {
        // 90 seconds is 90 / 86400 of a day
        let cell = cell_from_serial(90.0 / 86_400.0);
        assert_eq!(cell, Cell::Time(NaiveTime::from_hms_opt(0, 1, 30).unwrap()));
        assert_eq!(parse_time_to_seconds(&cell), 90);
    }

    #[test]
    fn test_date_serial_keeps_time_part() {
        // 45000.5 is 2023-03-15 at noon
        let cell = cell_from_serial(45_000.5);
        let expected = NaiveDate::from_ymd_opt(2023, 3, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(cell, Cell::DateTime(expected));
        assert_eq!(parse_time_to_seconds(&cell), 12 * 3600);
    }

    #[test]
    fn test_negative_serial_stays_numeric() {
        assert_eq!(cell_from_serial(-1.0), Cell::Number(-1.0));
    }

    #[test]
    fn test_duration_text() {
        assert_eq!(duration_text(1.5), "36:00:00");
        assert_eq!(duration_text(0.0), "-");
    }
}
