//! A directory of per-sheet CSV exports (`Suporte.csv`, `SAC.csv`, ...)
//!
//! Each file is read with polars, so column types are inferred the way a
//! dataframe reader would: numeric columns arrive as numbers, everything
//! else (times, `50%`, `4,5`) as text for the codecs to decode.
//!
//! A percentage column holding only plain numbers (`55`, `70`) is therefore
//! numeric here and is not divided by 100, while the same cells stored as text
//! in a workbook are. Writing the `%` sign keeps both sources consistent.

use crate::error::Result;
use crate::models::{Cell, RawSheet, Workbook};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Rows used for type inference
const INFER_SCHEMA_ROWS: usize = 100;

#[derive(Debug, Clone)]
pub struct CsvDirectory {
    dir: PathBuf,
}

impl CsvDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `*.csv` files in the directory, sorted by name
    fn csv_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if path.is_file() && is_csv {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl super::WorkbookSource for CsvDirectory {
    fn fetch(&self) -> Result<Workbook> {
        let mut workbook = Workbook::new();

        for path in self.csv_files()? {
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let sheet = read_csv_sheet(&path)?;
            debug!(
                "Read sheet '{}' from {}: {} columns, {} rows",
                name,
                path.display(),
                sheet.column_count(),
                sheet.row_count()
            );
            workbook.insert(name, sheet);
        }

        Ok(workbook)
    }

    fn describe(&self) -> String {
        format!("CSV directory {}", self.dir.display())
    }
}

/// Read one CSV file into a raw sheet
pub fn read_csv_sheet(path: &Path) -> Result<RawSheet> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    dataframe_to_sheet(&df)
}

/// Convert a DataFrame into a raw sheet, row-major
pub fn dataframe_to_sheet(df: &DataFrame) -> Result<RawSheet> {
    let columns: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();

    let mut rows = vec![Vec::with_capacity(columns.len()); df.height()];
    for column in df.get_columns() {
        for (index, row) in rows.iter_mut().enumerate() {
            row.push(cell_from_any(&column.get(index)?));
        }
    }

    Ok(RawSheet::new(columns, rows))
}

fn cell_from_any(value: &AnyValue) -> Cell {
    match value {
        AnyValue::Null => Cell::Empty,
        AnyValue::Boolean(flag) => Cell::Number(if *flag { 1.0 } else { 0.0 }),
        AnyValue::String(text) => Cell::Text(text.to_string()),
        AnyValue::StringOwned(text) => Cell::Text(text.to_string()),
        other => match other.extract::<f64>() {
            Some(number) => Cell::Number(number),
            None => Cell::Text(other.to_string()),
        },
    }
}
