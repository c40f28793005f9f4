//! Extraction run results and statistics

use super::{Artist, ArtistWithSongs};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Counters accumulated during one extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Non-empty input lines before filtering
    pub lines_total: usize,
    /// Content lines that survived the noise filter
    pub lines_kept: usize,
    /// Catalog resolver calls issued (retries included)
    pub lookups: usize,
    pub matched: usize,
    pub not_found: usize,
    pub failed: usize,
    /// Retries issued for failed lookups
    pub retried: usize,
}

/// Complete result of one extraction run
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Confirmed artists in confirmation order
    pub artists: Vec<Artist>,
    /// Artist+songs pairs, same order as `artists`
    pub results: Vec<ArtistWithSongs>,
    pub stats: RunStats,
    /// True when the run was cancelled and results are partial
    pub cancelled: bool,
}

impl ExtractionReport {
    /// Run duration in milliseconds
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
