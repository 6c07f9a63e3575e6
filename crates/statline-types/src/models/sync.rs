use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::league::{FeedKind, TierRank};
use super::record::CorrectedRecord;
use crate::error::{FetchError, SyncError};

/// Terminal status of one league in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Success,
    PartialSuccess,
    Failed,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Success => "success",
            SyncStatus::PartialSuccess => "partial_success",
            SyncStatus::Failed => "failed",
        }
    }

    /// Success and PartialSuccess both produced usable data.
    pub fn is_usable(&self) -> bool {
        !matches!(self, SyncStatus::Failed)
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of fetching one feed of a league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedOutcome {
    pub path: String,
    pub kind: FeedKind,
    pub source_used: Option<TierRank>,
    pub record_count: usize,
    pub latency_ms: u64,
    #[serde(default)]
    pub error: Option<FetchError>,
}

/// Result of one league's sync within one cycle. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueSyncResult {
    pub league_id: String,
    pub status: SyncStatus,
    pub records: Vec<CorrectedRecord>,
    /// Records excluded for temporal inconsistency, with their correction entry
    #[serde(default)]
    pub excluded: Vec<CorrectedRecord>,
    /// Least authoritative tier used by any successful feed
    pub source_used: Option<TierRank>,
    pub latency_ms: u64,
    #[serde(default)]
    pub error: Option<SyncError>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub rejected_count: usize,
    #[serde(default)]
    pub feeds: Vec<FeedOutcome>,
    pub confidence_score: f64,
    pub synced_at: DateTime<Utc>,
    /// Whether the snapshot write to the data cache succeeded
    #[serde(default)]
    pub cached: bool,
}

impl LeagueSyncResult {
    /// Build a `Failed` result carrying `error`.
    pub fn failed(league_id: impl Into<String>, error: SyncError, latency_ms: u64) -> Self {
        Self {
            league_id: league_id.into(),
            status: SyncStatus::Failed,
            records: Vec::new(),
            excluded: Vec::new(),
            source_used: None,
            latency_ms,
            error: Some(error),
            warnings: Vec::new(),
            rejected_count: 0,
            feeds: Vec::new(),
            confidence_score: 0.0,
            synced_at: Utc::now(),
            cached: false,
        }
    }

    pub fn with_feeds(mut self, feeds: Vec<FeedOutcome>) -> Self {
        self.feeds = feeds;
        self
    }

    pub fn correction_count(&self) -> usize {
        self.records.iter().map(|r| r.corrections.len()).sum::<usize>()
            + self.excluded.iter().map(|r| r.corrections.len()).sum::<usize>()
    }
}

/// Cross-league aggregates of one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub total_records: usize,
    pub total_corrections: usize,
    pub total_rejected: usize,
    pub total_excluded: usize,
    pub average_latency_ms: f64,
    /// accepted / (accepted + rejected + excluded); 1.0 when nothing was seen
    pub data_quality: f64,
}

/// Terminal artifact of one orchestration cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    pub cycle_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub total_duration_ms: u64,
    pub per_league: BTreeMap<String, LeagueSyncResult>,
    /// Leagues with usable data (Success or PartialSuccess)
    pub success_count: usize,
    /// Subset of `success_count` that degraded to PartialSuccess
    pub partial_count: usize,
    pub failure_count: usize,
    pub summary: SyncSummary,
}

impl SyncReport {
    pub fn league(&self, league_id: &str) -> Option<&LeagueSyncResult> {
        self.per_league.get(league_id)
    }

    pub fn is_total_outage(&self) -> bool {
        self.success_count == 0 && self.failure_count > 0
    }
}
