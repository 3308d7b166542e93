//! Output boundary for the rendering layer
//!
//! Per sheet, a [`SheetView`] exposes the normalized records, the distinct
//! team and shift values for building selectors, and `evaluate`. The
//! functions over an [`Evaluation`] derive what the dashboard shows: summary
//! KPIs, rankings, the active goal rules, and the goal and per-queue detail
//! tables as polars DataFrames.

use crate::cache::Snapshot;
use crate::codec::format_seconds_to_time;
use crate::config::{GoalsConfig, SheetConfig};
use crate::error::Result;
use crate::evaluator::{
    DynamicAverages, EvaluatedRecord, Evaluation, EvaluationOutcome, GoalStatus, GoalThresholds,
    MetricStatuses, SelectionFilter, evaluate,
};
use crate::models::{CanonicalRecord, QueueDefinition};
use crate::normalizer::NormalizedSheet;
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

/// One normalized sheet with its configured goals
#[derive(Debug, Clone)]
pub struct SheetView<'a> {
    sheet: &'a NormalizedSheet,
    config: &'a SheetConfig,
    thresholds: GoalThresholds,
}

impl<'a> SheetView<'a> {
    pub fn new(sheet: &'a NormalizedSheet, config: &'a SheetConfig, goals: &GoalsConfig) -> Self {
        Self {
            sheet,
            config,
            thresholds: goals.thresholds_for(config),
        }
    }

    pub fn name(&self) -> &str {
        &self.sheet.name
    }

    pub fn records(&self) -> &'a [CanonicalRecord] {
        &self.sheet.records
    }

    pub fn distinct_teams(&self) -> Vec<String> {
        self.sheet.distinct_teams()
    }

    pub fn distinct_shifts(&self) -> Vec<String> {
        self.sheet.distinct_shifts()
    }

    pub fn thresholds(&self) -> &GoalThresholds {
        &self.thresholds
    }

    /// Every team and every shift selected
    pub fn default_filter(&self) -> SelectionFilter {
        SelectionFilter::all(&self.sheet.records)
    }

    pub fn evaluate(&self, filter: &SelectionFilter) -> EvaluationOutcome {
        evaluate(&self.sheet.records, filter, &self.thresholds)
    }

    /// Queues for the detail table: the whole catalog in order, then queues
    /// the sheet has that the catalog does not list
    pub fn detail_queues(&self) -> Vec<QueueDefinition> {
        let listed: HashSet<&str> = self.config.queues.iter().map(|q| q.slug.as_str()).collect();
        self.config
            .queues
            .iter()
            .cloned()
            .chain(
                self.sheet
                    .queues
                    .iter()
                    .filter(|queue| !listed.contains(queue.slug.as_str()))
                    .cloned(),
            )
            .collect()
    }
}

/// Views over every configured sheet present in `snapshot`, in config order
pub fn sheet_views<'a>(snapshot: &'a Snapshot, config: &'a GoalsConfig) -> Vec<SheetView<'a>> {
    config
        .sheets
        .iter()
        .filter_map(|sheet_config| {
            snapshot
                .sheet(&sheet_config.name)
                .map(|sheet| SheetView::new(sheet, sheet_config, config))
        })
        .collect()
}

// =============================================================================
// Formatting
// =============================================================================

pub fn format_volume(value: u64) -> String {
    value.to_string()
}

/// Two decimals
pub fn format_rating(value: f64) -> String {
    format!("{:.2}", value)
}

/// A fraction as a percentage with one decimal: 0.5 is "50.0%"
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

pub fn status_label(status: GoalStatus) -> &'static str {
    match status {
        GoalStatus::Meets => "meets",
        GoalStatus::Fails => "fails",
        GoalStatus::NotApplicable => "n/a",
    }
}

// =============================================================================
// Summary and rankings
// =============================================================================

/// Headline numbers for the selected records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryKpis {
    pub agents: usize,
    pub total_chat_volume: u64,
    /// Mean over records with chat volume; `None` when there are none
    pub mean_chat_rating: Option<f64>,
    pub total_phone_volume: u64,
    /// Mean over records with phone volume; `None` when there are none
    pub mean_phone_rating: Option<f64>,
    pub goals_met: usize,
    pub goals_applicable: usize,
}

impl SummaryKpis {
    pub fn compute(evaluation: &Evaluation) -> Self {
        let records = || evaluation.records.iter().map(|r| &r.record);
        let (goals_met, goals_applicable) = evaluation
            .records
            .iter()
            .map(|r| r.statuses.tally())
            .fold((0, 0), |(met, total), (m, t)| (met + m, total + t));

        Self {
            agents: evaluation.records.len(),
            total_chat_volume: records().map(|r| r.chat_volume).fold(0, u64::saturating_add),
            mean_chat_rating: mean(records().filter(|r| r.chat_volume > 0).map(|r| r.chat_rating)),
            total_phone_volume: records().map(|r| r.phone_volume).fold(0, u64::saturating_add),
            mean_phone_rating: mean(
                records()
                    .filter(|r| r.phone_volume > 0)
                    .map(|r| r.phone_rating),
            ),
            goals_met,
            goals_applicable,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankEntry {
    pub name: String,
    pub team: String,
    pub value: f64,
}

/// Top-N lists for the four ranking charts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rankings {
    pub chat_rating: Vec<RankEntry>,
    pub phone_rating: Vec<RankEntry>,
    pub chat_volume: Vec<RankEntry>,
    pub phone_volume: Vec<RankEntry>,
}

impl Rankings {
    /// Ratings rank only records with volume on that channel. Ties keep
    /// sheet order.
    pub fn compute(evaluation: &Evaluation, size: usize) -> Self {
        let records: Vec<&CanonicalRecord> = evaluation.records.iter().map(|r| &r.record).collect();
        Self {
            chat_rating: top(&records, size, |r| {
                (r.chat_volume > 0).then_some(r.chat_rating)
            }),
            phone_rating: top(&records, size, |r| {
                (r.phone_volume > 0).then_some(r.phone_rating)
            }),
            chat_volume: top(&records, size, |r| Some(r.chat_volume as f64)),
            phone_volume: top(&records, size, |r| Some(r.phone_volume as f64)),
        }
    }
}

fn top(
    records: &[&CanonicalRecord],
    size: usize,
    value: impl Fn(&CanonicalRecord) -> Option<f64>,
) -> Vec<RankEntry> {
    let mut entries: Vec<RankEntry> = records
        .iter()
        .filter_map(|record| {
            value(record).map(|value| RankEntry {
                name: record.name.clone(),
                team: record.team.clone(),
                value,
            })
        })
        .collect();
    // Stable sort: equal values stay in sheet order
    entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    entries.truncate(size);
    entries
}

/// The active goal rules, one line each
pub fn goal_rules(averages: &DynamicAverages, thresholds: &GoalThresholds) -> Vec<String> {
    vec![
        format!(
            "Chat/phone volume: at or above the selection average (chat average: {:.0} | phone average: {:.0})",
            averages.chat_volume.unwrap_or(0.0),
            averages.phone_volume.unwrap_or(0.0)
        ),
        format!("Chat rating: >= {}", thresholds.min_chat_rating),
        format!("Phone rating: >= {}", thresholds.min_phone_rating),
        format!("Chat rating %: >= {:.0}%", thresholds.min_rating_pct * 100.0),
        format!(
            "Chat TME: <= {} | Phone TME: <= {}",
            format_seconds_to_time(thresholds.max_chat_response_secs),
            format_seconds_to_time(thresholds.max_phone_response_secs)
        ),
    ]
}

// =============================================================================
// Tables
// =============================================================================

/// Status column names of the goal table, in [`status_values`] order
pub const STATUS_COLUMNS: [&str; 7] = [
    "Chat volume goal",
    "Chat rating goal",
    "Rating % goal",
    "Chat TME goal",
    "Phone volume goal",
    "Phone rating goal",
    "Phone TME goal",
];

pub fn status_values(statuses: &MetricStatuses) -> [GoalStatus; 7] {
    [
        statuses.chat_volume,
        statuses.chat_rating,
        statuses.chat_rating_pct,
        statuses.chat_response_time,
        statuses.phone_volume,
        statuses.phone_rating,
        statuses.phone_response_time,
    ]
}

/// Main goal table: identity, goal metrics, then one status column per goal
pub fn goal_table(evaluation: &Evaluation) -> Result<DataFrame> {
    let rows = &evaluation.records;
    let mut columns = identity_columns(rows);
    columns.extend([
        u64_column("Chat", rows, |r| r.chat_volume),
        f64_column("Chat rating", rows, |r| r.chat_rating),
        f64_column("Rating %", rows, |r| r.chat_rating_pct),
        time_column("Chat TME", rows, |r| r.chat_response_time_secs),
        u64_column("Phone", rows, |r| r.phone_volume),
        f64_column("Phone rating", rows, |r| r.phone_rating),
        time_column("Phone TME", rows, |r| r.phone_response_time_secs),
    ]);
    for (index, name) in STATUS_COLUMNS.iter().enumerate() {
        let labels: Vec<&str> = rows
            .iter()
            .map(|r| status_label(status_values(&r.statuses)[index]))
            .collect();
        columns.push(Column::new((*name).into(), labels));
    }

    Ok(DataFrame::new(columns)?)
}

/// Per-queue breakdown, display only. Queues the sheet lacks read as 0
/// volume and `-` time.
pub fn detail_table(evaluation: &Evaluation, queues: &[QueueDefinition]) -> Result<DataFrame> {
    let rows = &evaluation.records;
    let mut columns = identity_columns(rows);

    for queue in queues {
        columns.push(u64_column(&format!("Chat - {}", queue.label), rows, |r| {
            r.queue_volume.get(&queue.slug).copied().unwrap_or(0)
        }));
    }
    columns.push(u64_column("Chat - Total", rows, |r| r.chat_volume));

    for queue in queues {
        columns.push(time_column(&format!("TME - {}", queue.label), rows, |r| {
            r.queue_response_time_secs
                .get(&queue.slug)
                .copied()
                .unwrap_or(0)
        }));
    }
    columns.extend([
        time_column("TME - Mean", rows, |r| r.chat_response_time_secs),
        u64_column("Phone - Received", rows, |r| r.phone_received),
        u64_column("Phone - Made", rows, |r| r.phone_made),
        u64_column("Phone - Total", rows, |r| r.phone_volume),
        time_column("Phone - TME", rows, |r| r.phone_response_time_secs),
        f64_column("Chat - Rating", rows, |r| r.chat_rating),
        f64_column("Chat - Rating %", rows, |r| r.chat_rating_pct),
        f64_column("Phone - Rating", rows, |r| r.phone_rating),
        f64_column("Phone - Rating %", rows, |r| r.phone_rating_pct),
    ]);

    Ok(DataFrame::new(columns)?)
}

fn identity_columns(rows: &[EvaluatedRecord]) -> Vec<Column> {
    vec![
        string_column("Name", rows, |r| r.name.clone()),
        string_column("Team", rows, |r| r.team.clone()),
        string_column("Shift", rows, |r| r.shift.clone()),
    ]
}

fn string_column(
    name: &str,
    rows: &[EvaluatedRecord],
    value: impl Fn(&CanonicalRecord) -> String,
) -> Column {
    let values: Vec<String> = rows.iter().map(|r| value(&r.record)).collect();
    Column::new(name.into(), values)
}

fn time_column(
    name: &str,
    rows: &[EvaluatedRecord],
    seconds: impl Fn(&CanonicalRecord) -> u64,
) -> Column {
    string_column(name, rows, |r| format_seconds_to_time(seconds(r)))
}

fn u64_column(
    name: &str,
    rows: &[EvaluatedRecord],
    value: impl Fn(&CanonicalRecord) -> u64,
) -> Column {
    let values: Vec<u64> = rows.iter().map(|r| value(&r.record)).collect();
    Column::new(name.into(), values)
}

fn f64_column(
    name: &str,
    rows: &[EvaluatedRecord],
    value: impl Fn(&CanonicalRecord) -> f64,
) -> Column {
    let values: Vec<f64> = rows.iter().map(|r| value(&r.record)).collect();
    Column::new(name.into(), values)
}

// =============================================================================
// Reports
// =============================================================================

/// Everything the dashboard shows for one sheet and selection
#[derive(Debug, Clone, Serialize)]
pub struct SheetReport {
    pub sheet: String,
    pub summary: SummaryKpis,
    pub rankings: Rankings,
    pub rules: Vec<String>,
    pub evaluation: Evaluation,
}

impl SheetReport {
    /// `None` when the selection matches no record
    pub fn build(view: &SheetView<'_>, filter: &SelectionFilter, ranking_size: usize) -> Option<Self> {
        match view.evaluate(filter) {
            EvaluationOutcome::NoDataForSelection => None,
            EvaluationOutcome::Evaluated(evaluation) => Some(Self {
                sheet: view.name().to_string(),
                summary: SummaryKpis::compute(&evaluation),
                rankings: Rankings::compute(&evaluation, ranking_size),
                rules: goal_rules(&evaluation.averages, &evaluation.thresholds),
                evaluation,
            }),
        }
    }
}
