use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;

use statline_types::{CacheError, LeagueSyncResult};

use super::{CachedSnapshot, DataCache};

#[derive(Debug, Default)]
pub struct InMemoryDataCache {
    snapshots: DashMap<String, CachedSnapshot>,
}

impl InMemoryDataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[async_trait]
impl DataCache for InMemoryDataCache {
    async fn put(
        &self,
        league_id: &str,
        result: &LeagueSyncResult,
        ttl: Duration,
    ) -> Result<CachedSnapshot, CacheError> {
        let snapshot = CachedSnapshot::new(league_id, result, ttl);
        self.snapshots.insert(league_id.to_string(), snapshot.clone());
        Ok(snapshot)
    }

    async fn get(&self, league_id: &str) -> Result<Option<CachedSnapshot>, CacheError> {
        Ok(self.snapshots.get(league_id).map(|entry| entry.value().clone()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
