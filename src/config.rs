//! Configuration management and validation.
//!
//! Goal values, the two required sheet definitions and the refresh window.
//! Layering is defaults, then an optional JSON file, then CLI overrides
//! applied by the command layer.

use crate::codec::parse_time_str;
use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, CUSTOMER_SERVICE_QUEUES, DEFAULT_CACHE_TTL_SECS,
    DEFAULT_CUSTOMER_SERVICE_MIN_RATING, DEFAULT_MAX_CHAT_RESPONSE_TIME,
    DEFAULT_MAX_PHONE_RESPONSE_TIME, DEFAULT_MIN_RATING_PCT, DEFAULT_SUPPORT_MIN_RATING,
    SHEET_CUSTOMER_SERVICE, SHEET_SUPPORT, SUPPORT_QUEUES,
};
use crate::error::{GoalsError, Result};
use crate::evaluator::GoalThresholds;
use crate::models::QueueDefinition;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// One required sheet and its sheet-specific goals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Exact worksheet name in the workbook
    pub name: String,

    pub min_chat_rating: f64,

    /// Falls back to `min_chat_rating` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_phone_rating: Option<f64>,

    /// Known chat queues, in display order
    #[serde(default)]
    pub queues: Vec<QueueDefinition>,
}

impl SheetConfig {
    pub fn new(name: impl Into<String>, min_chat_rating: f64) -> Self {
        Self {
            name: name.into(),
            min_chat_rating,
            min_phone_rating: None,
            queues: Vec::new(),
        }
    }

    pub fn with_queues(mut self, queues: Vec<QueueDefinition>) -> Self {
        self.queues = queues;
        self
    }
}

/// Global configuration for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalsConfig {
    /// Spreadsheet file or CSV directory to read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,

    /// Seconds a loaded snapshot stays fresh
    pub cache_ttl_secs: u64,

    /// Exactly two sheets are required
    pub sheets: Vec<SheetConfig>,

    /// Minimum chat rating percentage, as a fraction
    pub min_rating_pct: f64,

    /// `HH:MM:SS`
    pub max_chat_response_time: String,

    /// `HH:MM:SS`
    pub max_phone_response_time: String,
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            source: None,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            sheets: vec![
                SheetConfig::new(SHEET_SUPPORT, DEFAULT_SUPPORT_MIN_RATING)
                    .with_queues(QueueDefinition::catalog(SUPPORT_QUEUES)),
                SheetConfig::new(SHEET_CUSTOMER_SERVICE, DEFAULT_CUSTOMER_SERVICE_MIN_RATING)
                    .with_queues(QueueDefinition::catalog(CUSTOMER_SERVICE_QUEUES)),
            ],
            min_rating_pct: DEFAULT_MIN_RATING_PCT,
            max_chat_response_time: DEFAULT_MAX_CHAT_RESPONSE_TIME.to_string(),
            max_phone_response_time: DEFAULT_MAX_PHONE_RESPONSE_TIME.to_string(),
        }
    }
}

impl GoalsConfig {
    /// `<user config dir>/support-goals/goals.json`
    pub fn default_config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            GoalsError::configuration("Could not determine user configuration directory")
        })?;
        Ok(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Read a JSON config file; missing keys take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            GoalsError::configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Self = serde_json::from_str(&contents)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Explicit file if given, else the default location when it exists,
    /// else built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => {
                info!("Using config file: {}", path.display());
                Self::from_file(path)?
            }
            None => match Self::default_config_path() {
                Ok(path) if path.exists() => {
                    info!("Using config file: {}", path.display());
                    Self::from_file(&path)?
                }
                _ => {
                    info!("No config file found, using defaults");
                    Self::default()
                }
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Write this configuration as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.sheets.len() != 2 {
            return Err(GoalsError::configuration(format!(
                "Exactly two sheets must be configured, found {}",
                self.sheets.len()
            )));
        }

        let mut seen = HashSet::new();
        for sheet in &self.sheets {
            if sheet.name.trim().is_empty() {
                return Err(GoalsError::configuration("Sheet names must not be empty"));
            }
            if !seen.insert(sheet.name.as_str()) {
                return Err(GoalsError::configuration(format!(
                    "Sheet '{}' is configured twice",
                    sheet.name
                )));
            }
            let ratings = std::iter::once(sheet.min_chat_rating).chain(sheet.min_phone_rating);
            for rating in ratings {
                if !rating.is_finite() || rating < 0.0 {
                    return Err(GoalsError::configuration(format!(
                        "Minimum ratings for sheet '{}' must be non-negative, got {}",
                        sheet.name, rating
                    )));
                }
            }
        }

        if !(0.0..=1.0).contains(&self.min_rating_pct) {
            return Err(GoalsError::configuration(format!(
                "min_rating_pct must be between 0 and 1, got {}",
                self.min_rating_pct
            )));
        }

        if self.cache_ttl_secs == 0 {
            return Err(GoalsError::configuration(
                "cache_ttl_secs must be greater than zero",
            ));
        }

        Ok(())
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetConfig> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Goal thresholds for `sheet`. Response-time maxima go through the time
    /// codec, so a malformed value becomes 0.
    pub fn thresholds_for(&self, sheet: &SheetConfig) -> GoalThresholds {
        GoalThresholds {
            min_chat_rating: sheet.min_chat_rating,
            min_phone_rating: sheet.min_phone_rating.unwrap_or(sheet.min_chat_rating),
            min_rating_pct: self.min_rating_pct,
            max_chat_response_secs: parse_time_str(&self.max_chat_response_time),
            max_phone_response_secs: parse_time_str(&self.max_phone_response_time),
        }
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.cache_ttl_secs = secs;
        self
    }

    pub fn with_min_rating_pct(mut self, pct: f64) -> Self {
        self.min_rating_pct = pct;
        self
    }

    pub fn with_max_chat_response_time(mut self, time: impl Into<String>) -> Self {
        self.max_chat_response_time = time.into();
        self
    }

    pub fn with_max_phone_response_time(mut self, time: impl Into<String>) -> Self {
        self.max_phone_response_time = time.into();
        self
    }

    /// Override the minimum chat rating of one sheet
    pub fn with_min_chat_rating(mut self, sheet: &str, rating: f64) -> Result<Self> {
        let entry = self
            .sheets
            .iter_mut()
            .find(|s| s.name == sheet)
            .ok_or_else(|| GoalsError::configuration(format!("Unknown sheet '{}'", sheet)))?;
        entry.min_chat_rating = rating;
        Ok(self)
    }
}
