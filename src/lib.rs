//! Support Goals Library
//!
//! Normalizes the hand-maintained performance workbook of a support center
//! and evaluates every agent against the team goals.
//!
//! This library provides tools for:
//! - Decoding drifting cell formats (times, percentages, ratings) with total codecs
//! - Resolving identity columns through an ordered strategy chain
//! - Normalizing each sheet into canonical per-agent records
//! - Classifying goal metrics against static and dynamic (average) targets
//! - Caching normalized snapshots with a refresh window
//! - Building the tables the dashboard renders or exports

pub mod cache;
pub mod codec;
pub mod columns;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod evaluator;
pub mod export;
pub mod loader;
pub mod models;
pub mod normalizer;
pub mod render;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use cache::{Snapshot, SnapshotCache};
pub use config::{GoalsConfig, SheetConfig};
pub use error::{GoalsError, Result};
pub use evaluator::{
    EvaluationOutcome, GoalStatus, GoalThresholds, SelectionFilter, evaluate,
};
pub use loader::{WorkbookSource, load_sheets};
pub use models::{CanonicalRecord, Cell, RawSheet, Workbook};
pub use normalizer::{NormalizedSheet, SheetNormalizer};
