//! Typed error definitions for statline.
//!
//! Errors are serializable so a failed league can carry its cause inside the
//! JSON sync report, and matchable so the orchestrator can classify outcomes.

mod cache;
mod config;
mod fetch;

pub use cache::CacheError;
pub use config::ConfigError;
pub use fetch::{FetchError, SourceFailure, TierFailure};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Terminal error attached to a `Failed` league result.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "error")]
pub enum SyncError {
    /// Every feed of the league failed to fetch
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The orchestration cycle deadline elapsed before the league settled
    #[error("League sync did not settle within the {deadline_ms}ms cycle deadline")]
    Timeout { deadline_ms: u64 },

    /// The league task panicked or was cancelled unexpectedly
    #[error("Internal sync error: {message}")]
    Internal { message: String },

    /// Snapshot persistence failed
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Standard Result type using SyncError.
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::TierRank;

    #[test]
    fn test_error_serialization() {
        let err = SyncError::Fetch(FetchError::AllSourcesExhausted {
            league_id: "mlb".to_string(),
            path: "standings".to_string(),
            attempted_tiers: vec![TierRank::Primary, TierRank::Secondary],
            last_errors: vec![TierFailure {
                tier: TierRank::Primary,
                failure: SourceFailure::Status { status: 503 },
            }],
        });

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("AllSourcesExhausted"));
        assert!(json.contains("standings"));

        let deserialized: SyncError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, deserialized);
    }

    #[test]
    fn test_error_display() {
        let err = SyncError::Timeout { deadline_ms: 120_000 };
        assert!(err.to_string().contains("120000ms"));

        let err = SyncError::Internal { message: "task panicked".to_string() };
        assert!(err.to_string().contains("task panicked"));
    }
}
