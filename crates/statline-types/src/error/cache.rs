//! Snapshot cache errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while persisting or loading league snapshots.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum CacheError {
    /// Filesystem failure in a file-backed cache
    #[error("Cache I/O failed for {league_id}: {message}")]
    Io { league_id: String, message: String },

    /// Snapshot could not be encoded or decoded
    #[error("Cache serialization failed for {league_id}: {message}")]
    Serialization { league_id: String, message: String },

    /// Write did not complete within the configured timeout
    #[error("Cache write for {league_id} timed out after {timeout_ms}ms")]
    Timeout { league_id: String, timeout_ms: u64 },

    /// Backend refused the write
    #[error("Cache unavailable: {message}")]
    Unavailable { message: String },
}
