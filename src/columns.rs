//! Column resolution for a drifting, hand-maintained header row
//!
//! Identity columns are found through an ordered chain of strategies: first a
//! list of candidate names, then a legacy column position, then a constant.
//! Metric columns are looked up by exact name only.

use crate::constants::{
    DEFAULT_NAME, DEFAULT_SHIFT, DEFAULT_TEAM, NAME_CANDIDATES, NAME_POSITION, SHIFT_CANDIDATES,
    SHIFT_POSITION, TEAM_CANDIDATES, TEAM_POSITION,
};
use regex::Regex;
use std::collections::HashMap;

/// Lowercase and trim a raw header cell
pub fn normalize_column_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalized header names with a name-to-position lookup
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    names: Vec<String>,
    name_to_index: HashMap<String, usize>,
}

impl ColumnIndex {
    /// Build an index from raw header names. When two headers normalize to
    /// the same name, the leftmost one is kept.
    pub fn new<S: AsRef<str>>(raw_names: &[S]) -> Self {
        let names: Vec<String> = raw_names
            .iter()
            .map(|name| normalize_column_name(name.as_ref()))
            .collect();

        let mut name_to_index = HashMap::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            name_to_index.entry(name.clone()).or_insert(index);
        }

        Self {
            names,
            name_to_index,
        }
    }

    pub fn get_index(&self, column_name: &str) -> Option<usize> {
        self.name_to_index.get(column_name).copied()
    }

    pub fn has_column(&self, column_name: &str) -> bool {
        self.name_to_index.contains_key(column_name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Columns whose name matches `pattern`, paired with the first capture
    /// group, in sheet order. `exclude` names are skipped.
    pub fn matching(&self, pattern: &Regex, exclude: &[&str]) -> Vec<(usize, String)> {
        self.names
            .iter()
            .enumerate()
            .filter(|(index, name)| {
                !exclude.contains(&name.as_str()) && self.get_index(name) == Some(*index)
            })
            .filter_map(|(index, name)| {
                let captures = pattern.captures(name)?;
                let key = captures.get(1)?.as_str().to_string();
                Some((index, key))
            })
            .collect()
    }
}

/// Where a resolved field reads its values from
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSelector {
    /// Column at this position in the sheet
    Column(usize),
    /// The same value for every row
    Constant(String),
}

/// One step of a resolution chain
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionStrategy {
    /// First of these names present in the header, in listed order
    Candidates(Vec<String>),
    /// Literal position, when the sheet is wide enough
    Position(usize),
    /// Always succeeds
    Constant(String),
}

impl ResolutionStrategy {
    pub fn apply(&self, columns: &ColumnIndex) -> Option<ColumnSelector> {
        match self {
            ResolutionStrategy::Candidates(candidates) => candidates
                .iter()
                .find_map(|candidate| columns.get_index(candidate))
                .map(ColumnSelector::Column),
            ResolutionStrategy::Position(position) => {
                (columns.len() > *position).then_some(ColumnSelector::Column(*position))
            }
            ResolutionStrategy::Constant(value) => Some(ColumnSelector::Constant(value.clone())),
        }
    }
}

/// Strategies evaluated in sequence; the first success wins
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionChain {
    strategies: Vec<ResolutionStrategy>,
    default_value: String,
}

impl ResolutionChain {
    /// The standard three-tier chain: candidate names, position, constant
    pub fn new(candidates: &[&str], fallback_position: usize, default_value: &str) -> Self {
        Self {
            strategies: vec![
                ResolutionStrategy::Candidates(
                    candidates.iter().map(|c| normalize_column_name(c)).collect(),
                ),
                ResolutionStrategy::Position(fallback_position),
                ResolutionStrategy::Constant(default_value.to_string()),
            ],
            default_value: default_value.to_string(),
        }
    }

    pub fn resolve(&self, columns: &ColumnIndex) -> ColumnSelector {
        self.strategies
            .iter()
            .find_map(|strategy| strategy.apply(columns))
            .unwrap_or_else(|| ColumnSelector::Constant(self.default_value.clone()))
    }

    /// Value substituted for blank cells and for the constant tier
    pub fn default_value(&self) -> &str {
        &self.default_value
    }
}

/// Resolve one column: candidate names, then position, then a constant
pub fn resolve_column(
    columns: &ColumnIndex,
    candidates: &[&str],
    fallback_position: usize,
    default_value: &str,
) -> ColumnSelector {
    ResolutionChain::new(candidates, fallback_position, default_value).resolve(columns)
}

/// Resolution chains for the three identity fields
#[derive(Debug, Clone)]
pub struct IdentityResolvers {
    pub name: ResolutionChain,
    pub team: ResolutionChain,
    pub shift: ResolutionChain,
}

impl Default for IdentityResolvers {
    fn default() -> Self {
        Self {
            name: ResolutionChain::new(NAME_CANDIDATES, NAME_POSITION, DEFAULT_NAME),
            team: ResolutionChain::new(TEAM_CANDIDATES, TEAM_POSITION, DEFAULT_TEAM),
            shift: ResolutionChain::new(SHIFT_CANDIDATES, SHIFT_POSITION, DEFAULT_SHIFT),
        }
    }
}
