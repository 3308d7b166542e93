//! Workbook loading: fetch every sheet, check the required ones, normalize
//!
//! A [`WorkbookSource`] produces a [`Workbook`] (sheet name to raw sheet).
//! Loading is all-or-nothing: if any required sheet is missing, or the
//! workbook cannot be read at all, no sheet is returned.

pub mod csv_dir;
pub mod spreadsheet;

pub use csv_dir::CsvDirectory;
pub use spreadsheet::SpreadsheetFile;

use crate::config::GoalsConfig;
use crate::error::{GoalsError, Result};
use crate::models::Workbook;
use crate::normalizer::{NormalizedSheet, SheetNormalizer};
use std::path::Path;
use tracing::{debug, info, warn};

/// Spreadsheet extensions readable by [`SpreadsheetFile`]
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Anything that can produce a fresh workbook on demand
pub trait WorkbookSource: Send + Sync {
    fn fetch(&self) -> Result<Workbook>;

    /// Human-readable origin, for logs and the status line
    fn describe(&self) -> String;
}

/// An in-memory workbook is its own source
impl WorkbookSource for Workbook {
    fn fetch(&self) -> Result<Workbook> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory workbook ({} sheets)", self.len())
    }
}

/// Pick a source for `path`: a directory of CSV exports or a spreadsheet file
pub fn open_source(path: &Path) -> Result<Box<dyn WorkbookSource>> {
    if !path.exists() {
        return Err(GoalsError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    if path.is_dir() {
        return Ok(Box::new(CsvDirectory::new(path)));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        Ok(Box::new(SpreadsheetFile::new(path)))
    } else {
        Err(GoalsError::InvalidWorkbook {
            path: path.to_path_buf(),
            reason: format!(
                "unsupported file type '{}' (expected one of: {}, or a directory of CSV files)",
                extension,
                SPREADSHEET_EXTENSIONS.join(", ")
            ),
        })
    }
}

/// Fail with every missing name, in `required` order
pub fn require_sheets(workbook: &Workbook, required: &[&str]) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !workbook.contains(name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        warn!(
            "Workbook is missing {} required sheet(s); sheets present: {:?}",
            missing.len(),
            workbook.sheet_names()
        );
        Err(GoalsError::MissingSheets { missing })
    }
}

/// Fetch from `source` and normalize the configured sheets, in config order
pub fn load_sheets(
    source: &dyn WorkbookSource,
    config: &GoalsConfig,
    normalizer: &SheetNormalizer,
) -> Result<Vec<NormalizedSheet>> {
    info!("Loading workbook from {}", source.describe());
    let workbook = source.fetch()?;
    debug!("Workbook sheets: {:?}", workbook.sheet_names());

    normalize_workbook(&workbook, config, normalizer)
}

/// Normalize the configured sheets of an already fetched workbook
pub fn normalize_workbook(
    workbook: &Workbook,
    config: &GoalsConfig,
    normalizer: &SheetNormalizer,
) -> Result<Vec<NormalizedSheet>> {
    require_sheets(workbook, &config.sheet_names())?;

    let sheets = config
        .sheets
        .iter()
        .filter_map(|sheet| {
            workbook
                .sheet(&sheet.name)
                .map(|raw| normalizer.normalize(&sheet.name, raw, &sheet.queues))
        })
        .collect();

    Ok(sheets)
}
