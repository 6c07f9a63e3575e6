//! Per-source sliding-window rate limiting.
//!
//! Each upstream provider (`sportsDataIO`, `espnAPI`, ...) gets its own
//! partition: a queue of grant instants behind its own async mutex, so two
//! providers never wait on each other. Each grant is also published to a
//! short-lived sync copy that usage reporting reads without queueing behind
//! waiters.

use dashmap::DashMap;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use statline_types::models::RateLimitSpec;
use statline_types::{ConfigError, SyncConfig};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WindowLimit {
    max_requests: usize,
    window: Duration,
}

impl WindowLimit {
    fn from_spec(spec: &RateLimitSpec) -> Result<Self, ConfigError> {
        Ok(Self { max_requests: spec.max_requests.max(1) as usize, window: spec.window_duration()? })
    }
}

/// Current usage of one partition, for the limits endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitUsage {
    pub source_key: String,
    pub in_window: usize,
    pub max_requests: usize,
    pub window_secs: u64,
}

#[derive(Default)]
struct Partition {
    granted: Mutex<VecDeque<Instant>>,
    /// Grants as of the last `acquire`, kept for `usage`
    published: parking_lot::Mutex<VecDeque<Instant>>,
}

impl Partition {
    fn publish(&self, grant: Instant, window: Duration) {
        let mut published = self.published.lock();
        published.push_back(grant);
        prune(&mut published, grant, window);
    }
}

fn prune(grants: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while grants.front().is_some_and(|oldest| now.duration_since(*oldest) >= window) {
        grants.pop_front();
    }
}

pub struct RateLimiter {
    limits: BTreeMap<String, WindowLimit>,
    default_limit: WindowLimit,
    partitions: DashMap<String, Arc<Partition>>,
}

impl RateLimiter {
    pub fn new(
        limits: &BTreeMap<String, RateLimitSpec>,
        default_limit: &RateLimitSpec,
    ) -> Result<Self, ConfigError> {
        let limits = limits
            .iter()
            .map(|(key, spec)| Ok((key.clone(), WindowLimit::from_spec(spec)?)))
            .collect::<Result<BTreeMap<_, _>, ConfigError>>()?;
        Ok(Self {
            limits,
            default_limit: WindowLimit::from_spec(default_limit)?,
            partitions: DashMap::new(),
        })
    }

    pub fn from_config(config: &SyncConfig) -> Result<Self, ConfigError> {
        Self::new(&config.rate_limits, &config.default_rate_limit)
    }

    fn limit_for(&self, source_key: &str) -> WindowLimit {
        self.limits.get(source_key).copied().unwrap_or(self.default_limit)
    }

    fn partition(&self, source_key: &str) -> Arc<Partition> {
        // Clone the Arc out so no DashMap shard guard is held across an await.
        Arc::clone(self.partitions.entry(source_key.to_string()).or_default().value())
    }

    /// Wait until a request against `source_key` is permitted, then record it.
    ///
    /// The partition lock is held while sleeping, so waiters on one key are
    /// granted in arrival order and each waiter wakes exactly once per
    /// window opening.
    pub async fn acquire(&self, source_key: &str) {
        let limit = self.limit_for(source_key);
        let partition = self.partition(source_key);
        let mut granted = partition.granted.lock().await;

        loop {
            let now = Instant::now();
            prune(&mut granted, now, limit.window);

            if granted.len() < limit.max_requests {
                granted.push_back(now);
                partition.publish(now, limit.window);
                return;
            }

            let Some(oldest) = granted.front().copied() else {
                continue;
            };
            let wait = limit.window.saturating_sub(now.duration_since(oldest));
            tracing::debug!(
                "Rate limit reached for {} ({}/{}), waiting {}ms",
                source_key,
                granted.len(),
                limit.max_requests,
                wait.as_millis()
            );
            tokio::time::sleep(wait).await;
        }
    }

    /// Usage of one partition, counted from the last published grants so a
    /// caller sleeping on the partition never blocks or skews the report.
    pub fn usage(&self, source_key: &str) -> RateLimitUsage {
        let limit = self.limit_for(source_key);
        let in_window = match self.partitions.get(source_key).map(|p| Arc::clone(p.value())) {
            None => 0,
            Some(partition) => {
                let now = Instant::now();
                let published = partition.published.lock();
                published.iter().filter(|t| now.duration_since(**t) < limit.window).count()
            },
        };
        RateLimitUsage {
            source_key: source_key.to_string(),
            in_window,
            max_requests: limit.max_requests,
            window_secs: limit.window.as_secs(),
        }
    }

    /// Usage of every configured or previously used partition, sorted by key.
    pub fn snapshot(&self) -> Vec<RateLimitUsage> {
        let mut keys: Vec<String> = self.limits.keys().cloned().collect();
        for entry in &self.partitions {
            if !self.limits.contains_key(entry.key()) {
                keys.push(entry.key().clone());
            }
        }
        keys.sort();
        keys.iter().map(|key| self.usage(key)).collect()
    }
}
