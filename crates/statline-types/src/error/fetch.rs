//! Upstream fetch errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::TierRank;

/// Why a single attempt against one tier failed.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum SourceFailure {
    /// Request exceeded the per-request timeout
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Connection, DNS or TLS failure
    #[error("network error: {message}")]
    Network { message: String },

    /// Upstream answered with a non-2xx status
    #[error("upstream returned HTTP {status}")]
    Status { status: u16 },

    /// 2xx response whose body is not valid JSON
    #[error("unparseable body: {message}")]
    Parse { message: String },

    /// Request could not be built (bad URL, bad header value)
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

/// A failed attempt, tagged with the tier it was made against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TierFailure {
    pub tier: TierRank,
    pub failure: SourceFailure,
}

impl std::fmt::Display for TierFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.tier, self.failure)
    }
}

/// Errors produced by the fallback fetcher.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum FetchError {
    /// One tier failed; the fetcher recovers by moving on to the next tier
    #[error("{tier} source for {league_id} unavailable: {failure}")]
    SourceUnavailable { league_id: String, tier: TierRank, failure: SourceFailure },

    /// Every configured tier failed for this path
    #[error(
        "All sources exhausted for {league_id}/{path} ({} tiers tried): {}",
        .attempted_tiers.len(),
        .last_errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    AllSourcesExhausted {
        league_id: String,
        path: String,
        attempted_tiers: Vec<TierRank>,
        last_errors: Vec<TierFailure>,
    },

    /// League is not present in the endpoint registry
    #[error("Unknown league: {league_id}")]
    UnknownLeague { league_id: String },
}

impl FetchError {
    /// Tiers that were actually attempted before giving up.
    pub fn attempted_tiers(&self) -> &[TierRank] {
        match self {
            Self::AllSourcesExhausted { attempted_tiers, .. } => attempted_tiers,
            Self::SourceUnavailable { tier, .. } => std::slice::from_ref(tier),
            Self::UnknownLeague { .. } => &[],
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::AllSourcesExhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_display_lists_every_tier() {
        let err = FetchError::AllSourcesExhausted {
            league_id: "nfl".to_string(),
            path: "scores/live".to_string(),
            attempted_tiers: vec![TierRank::Primary, TierRank::Secondary, TierRank::Backup],
            last_errors: vec![
                TierFailure { tier: TierRank::Primary, failure: SourceFailure::Status { status: 500 } },
                TierFailure {
                    tier: TierRank::Secondary,
                    failure: SourceFailure::Timeout { timeout_ms: 10_000 },
                },
                TierFailure {
                    tier: TierRank::Backup,
                    failure: SourceFailure::Parse { message: "expected value".to_string() },
                },
            ],
        };

        let msg = err.to_string();
        assert!(msg.contains("nfl/scores/live"));
        assert!(msg.contains("3 tiers tried"));
        assert!(msg.contains("primary: upstream returned HTTP 500"));
        assert!(msg.contains("backup: unparseable body"));
        assert_eq!(err.attempted_tiers().len(), 3);
        assert!(err.is_exhausted());
    }
}
