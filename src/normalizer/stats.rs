//! Normalization statistics for logging and diagnostics

use serde::{Deserialize, Serialize};

/// What happened while normalizing one sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizeStats {
    /// Data rows in the raw sheet
    pub rows_read: usize,

    /// Rows dropped because every cell was blank
    pub rows_dropped: usize,

    /// Header width of the raw sheet
    pub columns_read: usize,

    /// Columns dropped because every data cell was blank
    pub columns_dropped: usize,

    /// Records produced
    pub records: usize,

    /// How each identity field was resolved, e.g. "column 'nome' (#0)"
    pub name_source: String,
    pub team_source: String,
    pub shift_source: String,

    /// Chat volume was summed from per-queue columns
    pub chat_volume_from_queues: bool,

    /// Chat response time was averaged from per-queue columns
    pub chat_response_time_from_queues: bool,
}
