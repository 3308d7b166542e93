//! Writing evaluated sheets to files
//!
//! Tables go out through polars (CSV or Parquet); full sheet reports go out
//! as JSON.

use crate::dashboard::{SheetReport, SheetView, detail_table, goal_table};
use crate::error::{GoalsError, Result};
use crate::evaluator::SelectionFilter;
use polars::prelude::{CsvWriter, DataFrame, ParquetCompression, ParquetWriter, SerWriter};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    Csv,
    Parquet,
}

/// What to write and where
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    /// `None` writes a JSON report instead of tables
    pub table_format: Option<TableFormat>,
    pub overwrite: bool,
    pub ranking_size: usize,
}

impl ExportOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            table_format: Some(TableFormat::Csv),
            overwrite: false,
            ranking_size: crate::constants::DEFAULT_RANKING_SIZE,
        }
    }

    pub fn with_table_format(mut self, format: Option<TableFormat>) -> Self {
        self.table_format = format;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// File-name stem for a sheet: lowercased, non-alphanumerics as `_`
pub fn file_stem(sheet: &str) -> String {
    sheet
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                '_'
            }
        })
        .collect()
}

/// Export one sheet under `filter`. An empty selection writes nothing.
pub fn export_sheet(
    view: &SheetView<'_>,
    filter: &SelectionFilter,
    options: &ExportOptions,
) -> Result<Vec<PathBuf>> {
    let Some(report) = SheetReport::build(view, filter, options.ranking_size) else {
        warn!("No data for the selected filters in sheet '{}', nothing exported", view.name());
        return Ok(Vec::new());
    };

    std::fs::create_dir_all(&options.output_dir)?;
    let stem = file_stem(view.name());

    let written = match options.table_format {
        Some(format) => {
            let extension = match format {
                TableFormat::Csv => "csv",
                TableFormat::Parquet => "parquet",
            };
            let goals_path = options.output_dir.join(format!("{}_goals.{}", stem, extension));
            let detail_path = options.output_dir.join(format!("{}_detail.{}", stem, extension));
            check_targets(&[goals_path.as_path(), detail_path.as_path()], options.overwrite)?;

            let mut goals = goal_table(&report.evaluation)?;
            let mut detail = detail_table(&report.evaluation, &view.detail_queues())?;
            write_table(&mut goals, &goals_path, format, options.overwrite)?;
            write_table(&mut detail, &detail_path, format, options.overwrite)?;
            vec![goals_path, detail_path]
        }
        None => {
            let path = options.output_dir.join(format!("{}.json", stem));
            let file = create_output(&path, options.overwrite)?;
            serde_json::to_writer_pretty(file, &report)?;
            vec![path]
        }
    };

    info!(
        "Exported sheet '{}' ({} records) to {} file(s)",
        view.name(),
        report.evaluation.records.len(),
        written.len()
    );
    Ok(written)
}

/// Write a DataFrame as CSV (with header) or Snappy-compressed Parquet
pub fn write_table(
    df: &mut DataFrame,
    path: &Path,
    format: TableFormat,
    overwrite: bool,
) -> Result<()> {
    let mut file = create_output(path, overwrite)?;
    match format {
        TableFormat::Csv => {
            CsvWriter::new(&mut file).include_header(true).finish(df)?;
        }
        TableFormat::Parquet => {
            ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(df)?;
        }
    }
    debug!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

/// Refuse before writing anything when any target already exists
fn check_targets(paths: &[&Path], overwrite: bool) -> Result<()> {
    if overwrite {
        return Ok(());
    }
    match paths.iter().find(|path| path.exists()) {
        Some(path) => Err(GoalsError::OutputExists {
            path: path.to_path_buf(),
        }),
        None => Ok(()),
    }
}

fn create_output(path: &Path, overwrite: bool) -> Result<File> {
    if path.exists() && !overwrite {
        return Err(GoalsError::OutputExists {
            path: path.to_path_buf(),
        });
    }
    Ok(File::create(path)?)
}
