use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::models::FeedKind;

/// Tier health classification thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Rolling window length, in observations (default: 20)
    pub window_size: usize,
    /// Observations required before a tier may be classified Degraded (default: 3)
    pub min_observations: usize,
    /// Failure share at or above which a tier is Degraded (default: 0.5)
    pub failure_rate_threshold: f64,
    /// Mean latency at or above which a tier is Degraded (default: 5000)
    pub latency_threshold_ms: u64,
    /// Consecutive successes needed to leave Recovering (default: 2)
    pub recovery_successes: u32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            window_size: 20,
            min_observations: 3,
            failure_rate_threshold: 0.5,
            latency_threshold_ms: 5000,
            recovery_successes: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionConfig {
    /// |z| above which a value is an outlier (default: 3.0)
    pub z_threshold: f64,
    /// Samples needed before a field's statistics are trusted (default: 2)
    pub min_samples: usize,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self { z_threshold: 3.0, min_samples: 2 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// Snapshot directory for the file backend (default: `<data dir>/snapshots`)
    pub directory: Option<PathBuf>,
    /// Per-feed-kind TTL overrides, seconds
    pub ttl_overrides: BTreeMap<FeedKind, u64>,
}

impl CacheConfig {
    pub fn ttl_secs(&self, kind: FeedKind) -> u64 {
        self.ttl_overrides.get(&kind).copied().unwrap_or_else(|| kind.default_ttl_secs())
    }
}
