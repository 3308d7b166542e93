//! Error handling for workbook loading and configuration.
//!
//! Only structural failures live here. Cell-level decode problems never
//! surface as errors: the codecs degrade the affected field to zero instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GoalsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Workbook source not found at path: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Unreadable workbook {path}: {reason}")]
    InvalidWorkbook { path: PathBuf, reason: String },

    #[error("Required sheet(s) not found in workbook: {}", missing.join(", "))]
    MissingSheets { missing: Vec<String> },

    #[error("Refusing to overwrite existing file: {path} (use --force)")]
    OutputExists { path: PathBuf },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl GoalsError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GoalsError>;
