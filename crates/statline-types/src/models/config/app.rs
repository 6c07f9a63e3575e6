//! Top-level sync configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use super::rate_limit::RateLimitSpec;
use super::sections::{CacheConfig, CorrectionConfig, HealthConfig};
use crate::error::ConfigError;

/// Default request budgets per upstream provider.
fn default_rate_limits() -> BTreeMap<String, RateLimitSpec> {
    [
        ("sportsDataIO", 100),
        ("espnAPI", 200),
        ("collegeFB", 150),
        ("perfectGame", 50),
        ("maxPreps", 75),
        ("sportradar", 60),
        ("nbaStats", 60),
        ("baseballAmerica", 60),
        ("daveCampbell", 60),
    ]
    .into_iter()
    .map(|(key, max)| (key.to_string(), RateLimitSpec::new(max, "1m")))
    .collect()
}

/// Full pipeline configuration, persisted as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Per-attempt upstream timeout in seconds
    pub request_timeout_secs: u64,
    /// Bound on one orchestration cycle in seconds
    pub cycle_deadline_secs: u64,
    /// Interval between scheduled cycles in seconds
    pub cycle_interval_secs: u64,
    /// Best-effort bound on one snapshot write in seconds
    pub cache_write_timeout_secs: u64,
    /// Recompute field statistics from each cycle's accepted records
    pub refresh_statistics: bool,
    /// Move Degraded/Down tiers behind healthy ones (they are still attempted)
    pub deprioritize_degraded: bool,
    pub rate_limits: BTreeMap<String, RateLimitSpec>,
    /// Budget for source keys missing from `rate_limits`
    pub default_rate_limit: RateLimitSpec,
    pub health: HealthConfig,
    pub correction: CorrectionConfig,
    pub cache: CacheConfig,
    /// League ids to synchronize; empty means all
    pub enabled_leagues: Vec<String>,
    /// Replacement base URLs per league, applied in rank order
    pub base_url_overrides: BTreeMap<String, Vec<String>>,
}

impl SyncConfig {
    pub fn new() -> Self {
        Self {
            request_timeout_secs: 10,
            cycle_deadline_secs: 120,
            cycle_interval_secs: 300,
            cache_write_timeout_secs: 5,
            refresh_statistics: true,
            deprioritize_degraded: true,
            rate_limits: default_rate_limits(),
            default_rate_limit: RateLimitSpec::default(),
            health: HealthConfig::default(),
            correction: CorrectionConfig::default(),
            cache: CacheConfig::default(),
            enabled_leagues: Vec::new(),
            base_url_overrides: BTreeMap::new(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cycle_deadline(&self) -> Duration {
        Duration::from_secs(self.cycle_deadline_secs)
    }

    pub fn cycle_interval(&self) -> Duration {
        Duration::from_secs(self.cycle_interval_secs)
    }

    pub fn cache_write_timeout(&self) -> Duration {
        Duration::from_secs(self.cache_write_timeout_secs)
    }

    pub fn is_league_enabled(&self, league_id: &str) -> bool {
        self.enabled_leagues.is_empty() || self.enabled_leagues.iter().any(|l| l == league_id)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("request_timeout_secs", self.request_timeout_secs),
            ("cycle_deadline_secs", self.cycle_deadline_secs),
            ("cycle_interval_secs", self.cycle_interval_secs),
            ("cache_write_timeout_secs", self.cache_write_timeout_secs),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "must be greater than zero".to_string(),
                });
            }
        }

        let limits = self
            .rate_limits
            .iter()
            .map(|(key, spec)| (key.as_str(), spec))
            .chain(std::iter::once(("default", &self.default_rate_limit)));
        for (key, spec) in limits {
            if spec.max_requests == 0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("rate_limits.{key}.max_requests"),
                    message: "must be greater than zero".to_string(),
                });
            }
            spec.window_duration()?;
        }

        if self.correction.z_threshold.is_nan() || self.correction.z_threshold <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "correction.z_threshold".to_string(),
                message: "must be a positive number".to_string(),
            });
        }

        if self.health.window_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "health.window_size".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}
