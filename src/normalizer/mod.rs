//! Sheet normalizer: one raw worksheet in, canonical agent records out
//!
//! The normalizer never fails. Blank rows and columns are dropped, identity
//! columns are resolved through [`crate::columns::IdentityResolvers`], and
//! every metric is decoded with the total codecs in [`crate::codec`], so a
//! malformed cell only zeroes its own field.
//!
//! ## Fallbacks
//!
//! - Chat volume: without `qtde_chat_total`, the per-queue `qtde_chat_*`
//!   volumes are summed.
//! - Chat response time: without `tme_chat`, the per-queue `tme_chat_*`
//!   times are averaged (each decoded first).

pub mod stats;

#[cfg(test)]
mod tests;

pub use stats::NormalizeStats;

use crate::codec::numeric::count_from;
use crate::codec::{parse_percent, parse_time_to_seconds, to_count, to_number, to_rating};
use crate::columns::{ColumnIndex, ColumnSelector, IdentityResolvers, ResolutionChain};
use crate::constants::columns;
use crate::models::{CanonicalRecord, EMPTY_CELL, QueueDefinition, RawSheet};
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;
use tracing::debug;

static QUEUE_VOLUME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(columns::QUEUE_VOLUME_PATTERN).expect("queue volume pattern is valid")
});

static QUEUE_RESPONSE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(columns::QUEUE_RESPONSE_TIME_PATTERN).expect("queue time pattern is valid")
});

/// Canonical records of one sheet plus what was learned about its layout
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedSheet {
    pub name: String,
    pub records: Vec<CanonicalRecord>,
    /// Queues this sheet has columns for: catalog order first, then unlisted
    /// queues by slug
    pub queues: Vec<QueueDefinition>,
    #[serde(skip)]
    pub stats: NormalizeStats,
}

impl NormalizedSheet {
    /// Distinct team values, sorted, for building a selector
    pub fn distinct_teams(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.team.as_str()))
    }

    /// Distinct shift values, sorted, for building a selector
    pub fn distinct_shifts(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.shift.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Turns raw worksheets into canonical records
#[derive(Debug, Clone, Default)]
pub struct SheetNormalizer {
    resolvers: IdentityResolvers,
}

impl SheetNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `sheet`, labelling queues from `catalog`
    pub fn normalize(
        &self,
        name: &str,
        sheet: &RawSheet,
        catalog: &[QueueDefinition],
    ) -> NormalizedSheet {
        let mut stats = NormalizeStats {
            rows_read: sheet.row_count(),
            columns_read: sheet.column_count(),
            ..NormalizeStats::default()
        };

        let compact = drop_blank(sheet);
        stats.rows_dropped = stats.rows_read - compact.row_count();
        stats.columns_dropped = stats.columns_read.saturating_sub(compact.column_count());

        let index = ColumnIndex::new(&compact.columns);
        let layout = SheetLayout::resolve(&index, &self.resolvers);
        stats.name_source = describe(&layout.name, &index);
        stats.team_source = describe(&layout.team, &index);
        stats.shift_source = describe(&layout.shift, &index);
        stats.chat_volume_from_queues =
            layout.chat_total.is_none() && !layout.queue_volumes.is_empty();
        stats.chat_response_time_from_queues =
            layout.chat_response_time.is_none() && !layout.queue_times.is_empty();

        let records: Vec<CanonicalRecord> = (0..compact.row_count())
            .map(|row| layout.record(&compact, row, &self.resolvers))
            .collect();
        stats.records = records.len();

        let queues = layout.queue_definitions(catalog);

        debug!(
            "Normalized sheet '{}': {} records ({} rows, {} columns dropped as blank); name from {}, team from {}, shift from {}",
            name,
            stats.records,
            stats.rows_dropped,
            stats.columns_dropped,
            stats.name_source,
            stats.team_source,
            stats.shift_source
        );

        NormalizedSheet {
            name: name.to_string(),
            records,
            queues,
            stats,
        }
    }
}

/// Column positions of every field, resolved once per sheet
struct SheetLayout {
    name: ColumnSelector,
    team: ColumnSelector,
    shift: ColumnSelector,
    chat_total: Option<usize>,
    chat_rating: Option<usize>,
    chat_rating_pct: Option<usize>,
    chat_response_time: Option<usize>,
    phone_total: Option<usize>,
    phone_rating: Option<usize>,
    phone_rating_pct: Option<usize>,
    phone_response_time: Option<usize>,
    phone_received: Option<usize>,
    phone_made: Option<usize>,
    queue_volumes: Vec<(usize, String)>,
    queue_times: Vec<(usize, String)>,
}

impl SheetLayout {
    fn resolve(index: &ColumnIndex, resolvers: &IdentityResolvers) -> Self {
        Self {
            name: resolvers.name.resolve(index),
            team: resolvers.team.resolve(index),
            shift: resolvers.shift.resolve(index),
            chat_total: index.get_index(columns::CHAT_TOTAL),
            chat_rating: index.get_index(columns::CHAT_RATING),
            chat_rating_pct: index.get_index(columns::CHAT_RATING_PCT),
            chat_response_time: index.get_index(columns::CHAT_RESPONSE_TIME),
            phone_total: index.get_index(columns::PHONE_TOTAL),
            phone_rating: index.get_index(columns::PHONE_RATING),
            phone_rating_pct: index.get_index(columns::PHONE_RATING_PCT),
            phone_response_time: index.get_index(columns::PHONE_RESPONSE_TIME),
            phone_received: index.get_index(columns::PHONE_RECEIVED),
            phone_made: index.get_index(columns::PHONE_MADE),
            queue_volumes: index.matching(&QUEUE_VOLUME, &[columns::CHAT_TOTAL]),
            queue_times: index.matching(&QUEUE_RESPONSE_TIME, &[columns::CHAT_RESPONSE_TIME]),
        }
    }

    fn record(&self, sheet: &RawSheet, row: usize, resolvers: &IdentityResolvers) -> CanonicalRecord {
        let cell = |column: Option<usize>| column.map_or(&EMPTY_CELL, |c| sheet.cell(row, c));

        let mut record = CanonicalRecord {
            name: identity(sheet, row, &self.name, &resolvers.name),
            team: identity(sheet, row, &self.team, &resolvers.team),
            shift: identity(sheet, row, &self.shift, &resolvers.shift),
            chat_rating: to_rating(cell(self.chat_rating)),
            chat_rating_pct: parse_percent(cell(self.chat_rating_pct)),
            phone_volume: to_count(cell(self.phone_total)),
            phone_rating: to_rating(cell(self.phone_rating)),
            phone_rating_pct: parse_percent(cell(self.phone_rating_pct)),
            phone_response_time_secs: parse_time_to_seconds(cell(self.phone_response_time)),
            phone_received: to_count(cell(self.phone_received)),
            phone_made: to_count(cell(self.phone_made)),
            ..CanonicalRecord::empty()
        };

        for (column, slug) in &self.queue_volumes {
            record
                .queue_volume
                .insert(slug.clone(), to_count(sheet.cell(row, *column)));
        }
        for (column, slug) in &self.queue_times {
            record
                .queue_response_time_secs
                .insert(slug.clone(), parse_time_to_seconds(sheet.cell(row, *column)));
        }

        record.chat_volume = match self.chat_total {
            Some(column) => to_count(sheet.cell(row, column)),
            None => count_from(
                self.queue_volumes
                    .iter()
                    .map(|(column, _)| to_number(sheet.cell(row, *column)))
                    .sum(),
            ),
        };

        record.chat_response_time_secs = match self.chat_response_time {
            Some(column) => parse_time_to_seconds(sheet.cell(row, column)),
            None if self.queue_times.is_empty() => 0,
            None => {
                // Widened: each queue time may be anywhere up to u64::MAX
                let total: u128 = self
                    .queue_times
                    .iter()
                    .map(|(column, _)| u128::from(parse_time_to_seconds(sheet.cell(row, *column))))
                    .sum();
                let count = self.queue_times.len() as u128;
                u64::try_from((total + count / 2) / count).unwrap_or(u64::MAX)
            }
        };

        record
    }

    /// Catalog queues present in the sheet, then any others by slug
    fn queue_definitions(&self, catalog: &[QueueDefinition]) -> Vec<QueueDefinition> {
        let present: BTreeSet<&str> = self
            .queue_volumes
            .iter()
            .chain(&self.queue_times)
            .map(|(_, slug)| slug.as_str())
            .collect();

        let mut queues: Vec<QueueDefinition> = catalog
            .iter()
            .filter(|queue| present.contains(queue.slug.as_str()))
            .cloned()
            .collect();

        let listed: HashSet<&str> = catalog.iter().map(|queue| queue.slug.as_str()).collect();
        queues.extend(
            present
                .into_iter()
                .filter(|slug| !listed.contains(slug))
                .map(QueueDefinition::from_slug),
        );
        queues
    }
}

fn identity(sheet: &RawSheet, row: usize, selector: &ColumnSelector, chain: &ResolutionChain) -> String {
    match selector {
        ColumnSelector::Column(column) => sheet
            .cell(row, *column)
            .display_text()
            .unwrap_or_else(|| chain.default_value().to_string()),
        ColumnSelector::Constant(value) => value.clone(),
    }
}

fn describe(selector: &ColumnSelector, index: &ColumnIndex) -> String {
    match selector {
        ColumnSelector::Column(column) => format!(
            "column '{}' (#{})",
            index.names().get(*column).map(String::as_str).unwrap_or("?"),
            column
        ),
        ColumnSelector::Constant(value) => format!("default '{}'", value),
    }
}

/// Drop columns whose data cells are all blank, then rows that are all blank.
///
/// Headers are not data: a named column with no values is dropped, which
/// shifts the positions used by the legacy fallback. Blank headers are named
/// `unnamed: <original index>`.
pub fn drop_blank(sheet: &RawSheet) -> RawSheet {
    let width = sheet
        .rows
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .max(sheet.column_count());

    let kept: Vec<usize> = (0..width)
        .filter(|&column| (0..sheet.row_count()).any(|row| !sheet.cell(row, column).is_blank()))
        .collect();

    let columns = kept
        .iter()
        .map(|&column| match sheet.columns.get(column) {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("unnamed: {}", column),
        })
        .collect();

    let rows = (0..sheet.row_count())
        .map(|row| {
            kept.iter()
                .map(|&column| sheet.cell(row, column).clone())
                .collect::<Vec<_>>()
        })
        .filter(|cells| cells.iter().any(|cell| !cell.is_blank()))
        .collect();

    RawSheet::new(columns, rows)
}
