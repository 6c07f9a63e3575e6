//! League snapshot cache.
//!
//! The pipeline only needs `put`/`get`; storage is pluggable behind
//! [`DataCache`]. Two backends ship: an in-process map and a JSON file per
//! league.

mod file;
mod memory;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use statline_types::models::{CacheBackend, CacheConfig};
use statline_types::{CacheError, FeedSpec, LeagueSyncResult};

pub use file::FileDataCache;
pub use memory::InMemoryDataCache;

/// A stored league result with freshness metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedSnapshot {
    pub league_id: String,
    pub result: LeagueSyncResult,
    pub stored_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CachedSnapshot {
    pub fn new(league_id: &str, result: &LeagueSyncResult, ttl: Duration) -> Self {
        let stored_at = Utc::now();
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::seconds(0));
        let mut result = result.clone();
        result.cached = true;
        Self { league_id: league_id.to_string(), result, stored_at, expires_at: stored_at + ttl }
    }

    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Utc::now())
    }

    pub fn age_secs(&self) -> i64 {
        (Utc::now() - self.stored_at).num_seconds().max(0)
    }
}

#[async_trait]
pub trait DataCache: Send + Sync {
    async fn put(
        &self,
        league_id: &str,
        result: &LeagueSyncResult,
        ttl: Duration,
    ) -> Result<CachedSnapshot, CacheError>;

    async fn get(&self, league_id: &str) -> Result<Option<CachedSnapshot>, CacheError>;

    fn backend_name(&self) -> &'static str;
}

/// Snapshot TTL for a league: the shortest TTL among its feeds.
pub fn ttl_for_feeds(config: &CacheConfig, feeds: &[FeedSpec]) -> Duration {
    let secs = feeds.iter().map(|f| config.ttl_secs(f.kind)).min().unwrap_or(300);
    Duration::from_secs(secs)
}

/// Build the configured backend. `default_dir` is used by the file backend
/// when no directory is configured.
pub fn build_cache(config: &CacheConfig, default_dir: std::path::PathBuf) -> Arc<dyn DataCache> {
    match config.backend {
        CacheBackend::Memory => Arc::new(InMemoryDataCache::new()),
        CacheBackend::File => {
            Arc::new(FileDataCache::new(config.directory.clone().unwrap_or(default_dir)))
        },
    }
}
