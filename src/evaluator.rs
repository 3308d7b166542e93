//! Goal evaluation over normalized records
//!
//! Applies a team/shift selection, computes the dynamic volume targets
//! (mean of the selected population) and classifies every goal metric of
//! every selected record as meeting, failing or not applicable.

use crate::models::CanonicalRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Outcome of one goal check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Meets,
    Fails,
    /// No data to judge (zero response time, or no volume average)
    NotApplicable,
}

impl GoalStatus {
    fn from_bool(ok: bool) -> Self {
        if ok { GoalStatus::Meets } else { GoalStatus::Fails }
    }

    pub fn is_met(self) -> bool {
        self == GoalStatus::Meets
    }
}

/// Static goal values for one sheet. Volume goals are not here: they are
/// derived from the selected records on every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalThresholds {
    pub min_chat_rating: f64,
    pub min_phone_rating: f64,
    /// Fraction in [0, 1]
    pub min_rating_pct: f64,
    pub max_chat_response_secs: u64,
    pub max_phone_response_secs: u64,
}

/// Inclusion filter over team and shift values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionFilter {
    pub teams: BTreeSet<String>,
    pub shifts: BTreeSet<String>,
}

impl SelectionFilter {
    pub fn new<T, S>(teams: T, shifts: S) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            teams: teams.into_iter().map(Into::into).collect(),
            shifts: shifts.into_iter().map(Into::into).collect(),
        }
    }

    /// Select every team and shift present in `records`
    pub fn all(records: &[CanonicalRecord]) -> Self {
        Self {
            teams: records.iter().map(|r| r.team.clone()).collect(),
            shifts: records.iter().map(|r| r.shift.clone()).collect(),
        }
    }

    pub fn matches(&self, record: &CanonicalRecord) -> bool {
        self.teams.contains(&record.team) && self.shifts.contains(&record.shift)
    }
}

/// Volume targets of the current selection
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DynamicAverages {
    /// `None` when the selection is empty
    pub chat_volume: Option<f64>,
    pub phone_volume: Option<f64>,
}

impl DynamicAverages {
    pub fn compute(records: &[&CanonicalRecord]) -> Self {
        Self {
            chat_volume: mean(records.iter().map(|r| r.chat_volume)),
            phone_volume: mean(records.iter().map(|r| r.phone_volume)),
        }
    }
}

fn mean(values: impl Iterator<Item = u64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0_f64, 0usize), |(sum, count), value| {
        (sum + value as f64, count + 1)
    });
    (count > 0).then(|| sum / count as f64)
}

/// Status of each goal metric for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricStatuses {
    pub chat_volume: GoalStatus,
    pub chat_rating: GoalStatus,
    pub chat_rating_pct: GoalStatus,
    pub chat_response_time: GoalStatus,
    pub phone_volume: GoalStatus,
    pub phone_rating: GoalStatus,
    pub phone_response_time: GoalStatus,
}

impl MetricStatuses {
    pub fn classify(
        record: &CanonicalRecord,
        averages: &DynamicAverages,
        thresholds: &GoalThresholds,
    ) -> Self {
        Self {
            chat_volume: classify_volume(record.chat_volume, averages.chat_volume),
            chat_rating: classify_minimum(record.chat_rating, thresholds.min_chat_rating),
            chat_rating_pct: classify_minimum(record.chat_rating_pct, thresholds.min_rating_pct),
            chat_response_time: classify_response_time(
                record.chat_response_time_secs,
                thresholds.max_chat_response_secs,
            ),
            phone_volume: classify_volume(record.phone_volume, averages.phone_volume),
            phone_rating: classify_minimum(record.phone_rating, thresholds.min_phone_rating),
            phone_response_time: classify_response_time(
                record.phone_response_time_secs,
                thresholds.max_phone_response_secs,
            ),
        }
    }

    /// Count of goals met, out of the applicable ones
    pub fn tally(&self) -> (usize, usize) {
        let all = [
            self.chat_volume,
            self.chat_rating,
            self.chat_rating_pct,
            self.chat_response_time,
            self.phone_volume,
            self.phone_rating,
            self.phone_response_time,
        ];
        let applicable = all.iter().filter(|s| **s != GoalStatus::NotApplicable).count();
        let met = all.iter().filter(|s| s.is_met()).count();
        (met, applicable)
    }
}

/// Inclusive: a volume exactly at the average meets the goal
pub fn classify_volume(value: u64, average: Option<f64>) -> GoalStatus {
    match average {
        Some(average) => GoalStatus::from_bool(value as f64 >= average),
        None => GoalStatus::NotApplicable,
    }
}

/// Inclusive lower bound for ratings and rating percentages
pub fn classify_minimum(value: f64, minimum: f64) -> GoalStatus {
    GoalStatus::from_bool(value >= minimum)
}

/// Zero seconds is "no data"; otherwise inclusive upper bound
pub fn classify_response_time(seconds: u64, maximum: u64) -> GoalStatus {
    if seconds == 0 {
        GoalStatus::NotApplicable
    } else {
        GoalStatus::from_bool(seconds <= maximum)
    }
}

/// A selected record with its goal statuses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedRecord {
    #[serde(flatten)]
    pub record: CanonicalRecord,
    pub statuses: MetricStatuses,
}

/// Non-empty evaluation of a selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub records: Vec<EvaluatedRecord>,
    pub averages: DynamicAverages,
    pub thresholds: GoalThresholds,
}

/// Result of [`evaluate`]; an empty selection is a state, not an error
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationOutcome {
    NoDataForSelection,
    Evaluated(Evaluation),
}

impl EvaluationOutcome {
    pub fn evaluation(&self) -> Option<&Evaluation> {
        match self {
            EvaluationOutcome::Evaluated(evaluation) => Some(evaluation),
            EvaluationOutcome::NoDataForSelection => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, EvaluationOutcome::NoDataForSelection)
    }
}

/// Filter, average and classify.
///
/// Records keep their sheet order. Averages are computed over the filtered
/// records only.
pub fn evaluate(
    records: &[CanonicalRecord],
    filter: &SelectionFilter,
    thresholds: &GoalThresholds,
) -> EvaluationOutcome {
    let selected: Vec<&CanonicalRecord> = records.iter().filter(|r| filter.matches(r)).collect();

    if selected.is_empty() {
        debug!(
            "Selection matched none of {} records ({} teams, {} shifts selected)",
            records.len(),
            filter.teams.len(),
            filter.shifts.len()
        );
        return EvaluationOutcome::NoDataForSelection;
    }

    let averages = DynamicAverages::compute(&selected);
    let evaluated = selected
        .into_iter()
        .map(|record| EvaluatedRecord {
            statuses: MetricStatuses::classify(record, &averages, thresholds),
            record: record.clone(),
        })
        .collect::<Vec<_>>();

    debug!(
        "Evaluated {} of {} records; chat average {:?}, phone average {:?}",
        evaluated.len(),
        records.len(),
        averages.chat_volume,
        averages.phone_volume
    );

    EvaluationOutcome::Evaluated(Evaluation {
        records: evaluated,
        averages,
        thresholds: thresholds.clone(),
    })
}
