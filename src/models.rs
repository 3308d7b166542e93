//! Core data structures shared by the loader, normalizer and evaluator.
//!
//! A [`Workbook`] holds raw, untyped [`RawSheet`]s exactly as authored. The
//! normalizer turns each sheet into [`CanonicalRecord`]s, one per agent row.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A single spreadsheet cell as delivered by a workbook source
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    /// Structured time-of-day (an Excel time cell)
    Time(NaiveTime),
    /// Structured date-time; only its time-of-day part is meaningful here
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Empty cells and whitespace-only text count as blank
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the cell as an identity string (name, team, shift).
    ///
    /// Integral numbers drop their fractional part so a shift authored as `8`
    /// reads "8" rather than "8.0". Blank cells yield `None`.
    pub fn display_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::Number(value) => {
                if value.is_finite() && value.fract() == 0.0 {
                    Some(format!("{}", *value as i64))
                } else {
                    Some(value.to_string())
                }
            }
            Cell::Time(time) => Some(time.format("%H:%M:%S").to_string()),
            Cell::DateTime(datetime) => Some(datetime.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<NaiveTime> for Cell {
    fn from(value: NaiveTime) -> Self {
        Cell::Time(value)
    }
}

/// Shared blank cell for out-of-range reads
pub static EMPTY_CELL: Cell = Cell::Empty;

/// One worksheet: a header row plus data rows, positions aligned with `columns`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    /// Column names as authored (case and whitespace untouched)
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    /// Cell at `(row, column)`; short rows read as empty
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Sheet name to raw sheet, as produced by one fetch
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: HashMap<String, RawSheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, sheet: RawSheet) {
        self.sheets.insert(name.into(), sheet);
    }

    pub fn with_sheet(mut self, name: impl Into<String>, sheet: RawSheet) -> Self {
        self.insert(name, sheet);
        self
    }

    pub fn sheet(&self, name: &str) -> Option<&RawSheet> {
        self.sheets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    /// Sheet names in sorted order
    pub fn sheet_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sheets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// A chat queue known to a sheet: column slug plus display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueDefinition {
    /// Suffix of the `qtde_chat_<slug>` / `tme_chat_<slug>` columns
    pub slug: String,
    pub label: String,
}

impl QueueDefinition {
    pub fn new(slug: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            label: label.into(),
        }
    }

    /// Definition for a queue the catalog does not list; `migracao_br`
    /// becomes "Migracao Br"
    pub fn from_slug(slug: &str) -> Self {
        let label = slug
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        Self::new(slug, label)
    }

    /// Build a catalog from `(slug, label)` pairs
    pub fn catalog(pairs: &[(&str, &str)]) -> Vec<Self> {
        pairs
            .iter()
            .map(|(slug, label)| Self::new(*slug, *label))
            .collect()
    }
}

/// Normalized metrics for one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub name: String,
    pub team: String,
    pub shift: String,

    pub chat_volume: u64,
    /// Always on the 0-5 scale
    pub chat_rating: f64,
    pub chat_rating_pct: f64,
    pub chat_response_time_secs: u64,

    pub phone_volume: u64,
    pub phone_rating: f64,
    pub phone_rating_pct: f64,
    pub phone_response_time_secs: u64,
    pub phone_received: u64,
    pub phone_made: u64,

    /// Per-queue chat volume, only for queues the sheet actually has
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub queue_volume: BTreeMap<String, u64>,

    /// Per-queue chat response time, only for queues the sheet actually has
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub queue_response_time_secs: BTreeMap<String, u64>,
}

impl CanonicalRecord {
    /// A record with the identity defaults and every metric at zero
    pub fn empty() -> Self {
        Self {
            name: crate::constants::DEFAULT_NAME.to_string(),
            team: crate::constants::DEFAULT_TEAM.to_string(),
            shift: crate::constants::DEFAULT_SHIFT.to_string(),
            chat_volume: 0,
            chat_rating: 0.0,
            chat_rating_pct: 0.0,
            chat_response_time_secs: 0,
            phone_volume: 0,
            phone_rating: 0.0,
            phone_rating_pct: 0.0,
            phone_response_time_secs: 0,
            phone_received: 0,
            phone_made: 0,
            queue_volume: BTreeMap::new(),
            queue_response_time_secs: BTreeMap::new(),
        }
    }

    pub fn with_identity(
        name: impl Into<String>,
        team: impl Into<String>,
        shift: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            team: team.into(),
            shift: shift.into(),
            ..Self::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text_drops_integral_fraction() {
        assert_eq!(Cell::Number(8.0).display_text(), Some("8".to_string()));
        assert_eq!(Cell::Number(8.5).display_text(), Some("8.5".to_string()));
        assert_eq!(Cell::from("  Ana  ").display_text(), Some("Ana".to_string()));
        assert_eq!(Cell::from("   ").display_text(), None);
        assert_eq!(Cell::Empty.display_text(), None);
    }

    #[test]
    fn test_short_rows_read_as_empty() {
        let sheet = RawSheet::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Cell::from("x")]],
        );
        assert_eq!(sheet.cell(0, 0), &Cell::from("x"));
        assert_eq!(sheet.cell(0, 1), &Cell::Empty);
        assert_eq!(sheet.cell(5, 0), &Cell::Empty);
    }

    #[test]
    fn test_queue_label_from_slug() {
        assert_eq!(QueueDefinition::from_slug("migracao_br").label, "Migracao Br");
        assert_eq!(QueueDefinition::from_slug("suporte").label, "Suporte");
    }

    #[test]
    fn test_workbook_sheet_names_sorted() {
        let workbook = Workbook::new()
            .with_sheet("SAC", RawSheet::default())
            .with_sheet("Suporte", RawSheet::default());
        assert_eq!(workbook.sheet_names(), vec!["SAC", "Suporte"]);
        assert!(workbook.contains("SAC"));
        assert!(!workbook.contains("sac"));
    }
}
