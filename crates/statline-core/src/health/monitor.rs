//! Health Monitor implementation.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use statline_types::models::HealthConfig;
use statline_types::{HealthState, LeagueHealthOverview, TierHealthSnapshot, TierRank};

#[derive(Debug, Clone, Copy)]
struct Observation {
    success: bool,
    latency_ms: u64,
}

#[derive(Debug)]
struct TierHealth {
    window: VecDeque<Observation>,
    state: HealthState,
    consecutive_successes: u32,
    consecutive_failures: u32,
    total_successes: u64,
    total_failures: u64,
    last_error: Option<String>,
}

impl TierHealth {
    fn new() -> Self {
        Self {
            window: VecDeque::new(),
            state: HealthState::Healthy,
            consecutive_successes: 0,
            consecutive_failures: 0,
            total_successes: 0,
            total_failures: 0,
            last_error: None,
        }
    }

    fn push(&mut self, observation: Observation, window_size: usize) {
        self.window.push_back(observation);
        while self.window.len() > window_size {
            self.window.pop_front();
        }
    }

    fn failure_rate(&self) -> f64 {
        if self.window.is_empty() {
            return 0.0;
        }
        let failures = self.window.iter().filter(|o| !o.success).count();
        failures as f64 / self.window.len() as f64
    }

    fn mean_latency_ms(&self) -> f64 {
        if self.window.is_empty() {
            return 0.0;
        }
        self.window.iter().map(|o| o.latency_ms as f64).sum::<f64>() / self.window.len() as f64
    }

    fn window_degraded(&self, config: &HealthConfig) -> bool {
        self.window.len() >= config.min_observations
            && (self.failure_rate() >= config.failure_rate_threshold
                || self.mean_latency_ms() >= config.latency_threshold_ms as f64)
    }

    fn evaluate_window(&self, config: &HealthConfig) -> HealthState {
        if self.window_degraded(config) {
            HealthState::Degraded
        } else {
            HealthState::Healthy
        }
    }
}

/// Health Monitor for tracking source tier health
pub struct HealthMonitor {
    tiers: DashMap<(String, TierRank), Mutex<TierHealth>>,
    config: HealthConfig,
}

impl HealthMonitor {
    /// Create a new health monitor with default configuration
    pub fn new() -> Arc<Self> {
        Self::with_config(HealthConfig::default())
    }

    /// Create a new health monitor with custom config
    pub fn with_config(config: HealthConfig) -> Arc<Self> {
        Arc::new(Self { tiers: DashMap::new(), config })
    }

    pub fn config(&self) -> &HealthConfig {
        &self.config
    }

    fn update<F>(&self, league_id: &str, tier: TierRank, apply: F)
    where
        F: FnOnce(&mut TierHealth, &HealthConfig),
    {
        let entry = self
            .tiers
            .entry((league_id.to_string(), tier))
            .or_insert_with(|| Mutex::new(TierHealth::new()));
        let mut health = entry.lock();
        let before = health.state;
        apply(&mut health, &self.config);
        let after = health.state;
        drop(health);

        if before != after {
            match after {
                HealthState::Degraded | HealthState::Down => tracing::warn!(
                    "Source health changed for {}/{}: {} -> {}",
                    league_id,
                    tier,
                    before,
                    after
                ),
                HealthState::Healthy | HealthState::Recovering => tracing::info!(
                    "Source health changed for {}/{}: {} -> {}",
                    league_id,
                    tier,
                    before,
                    after
                ),
            }
        }
    }

    /// Record a successful attempt
    pub fn record_success(&self, league_id: &str, tier: TierRank, latency: Duration) {
        self.update(league_id, tier, |health, config| {
            health.push(
                Observation { success: true, latency_ms: latency.as_millis() as u64 },
                config.window_size,
            );
            health.total_successes += 1;
            health.consecutive_successes = health.consecutive_successes.saturating_add(1);
            health.consecutive_failures = 0;

            health.state = match health.state {
                HealthState::Down => HealthState::Recovering,
                HealthState::Recovering => {
                    if health.consecutive_successes >= config.recovery_successes
                        && !health.window_degraded(config)
                    {
                        HealthState::Healthy
                    } else {
                        HealthState::Recovering
                    }
                },
                HealthState::Healthy | HealthState::Degraded => health.evaluate_window(config),
            };
        });
    }

    /// Record a failed attempt
    pub fn record_failure(&self, league_id: &str, tier: TierRank, latency: Duration, error: &str) {
        self.update(league_id, tier, |health, config| {
            health.push(
                Observation { success: false, latency_ms: latency.as_millis() as u64 },
                config.window_size,
            );
            health.total_failures += 1;
            health.consecutive_successes = 0;
            health.consecutive_failures = health.consecutive_failures.saturating_add(1);
            health.last_error = Some(error.to_string());

            // Down is only left through a success
            if health.state != HealthState::Down {
                health.state = health.evaluate_window(config);
            }
        });
    }

    /// Mark tiers Down after every one of them failed within a single fetch.
    ///
    /// A tier whose only recent failure came right after a success elsewhere
    /// in the league is failing one path, not the whole source, so it keeps
    /// its window-evaluated state.
    pub fn mark_down(&self, league_id: &str, tiers: &[TierRank]) {
        for tier in tiers {
            self.update(league_id, *tier, |health, _| {
                if health.consecutive_failures <= 1 && health.total_successes > 0 {
                    return;
                }
                health.state = HealthState::Down;
                health.consecutive_successes = 0;
            });
        }
    }

    /// Current state; pairs never observed are Healthy.
    pub fn get_health(&self, league_id: &str, tier: TierRank) -> HealthState {
        match self.tiers.get(&(league_id.to_string(), tier)) {
            Some(entry) => {
                let state = entry.lock().state;
                state
            },
            None => HealthState::Healthy,
        }
    }

    pub fn snapshot(&self, league_id: &str, tier: TierRank) -> Option<TierHealthSnapshot> {
        let entry = self.tiers.get(&(league_id.to_string(), tier))?;
        let health = entry.lock();
        Some(TierHealthSnapshot {
            league_id: league_id.to_string(),
            tier,
            state: health.state,
            observations: health.window.len(),
            failure_rate: health.failure_rate(),
            mean_latency_ms: health.mean_latency_ms(),
            consecutive_successes: health.consecutive_successes,
            total_successes: health.total_successes,
            total_failures: health.total_failures,
            last_error: health.last_error.clone(),
        })
    }

    /// Per-league roll-up over every observed tier, sorted by league id.
    pub fn overview(&self) -> Vec<LeagueHealthOverview> {
        let mut observed: BTreeMap<String, Vec<TierRank>> = BTreeMap::new();
        for entry in &self.tiers {
            let (league_id, tier) = entry.key();
            observed.entry(league_id.clone()).or_default().push(*tier);
        }

        observed
            .into_iter()
            .map(|(league_id, mut ranks)| {
                ranks.sort();
                self.league_overview_for(&league_id, &ranks)
            })
            .collect()
    }

    pub fn league_overview(&self, league_id: &str) -> LeagueHealthOverview {
        self.league_overview_for(league_id, &TierRank::ALL)
    }

    fn league_overview_for(&self, league_id: &str, ranks: &[TierRank]) -> LeagueHealthOverview {
        let mut observations = 0usize;
        let mut successes = 0usize;
        let mut latency_total = 0f64;
        let mut tiers = Vec::new();

        for rank in ranks {
            let Some(entry) = self.tiers.get(&(league_id.to_string(), *rank)) else {
                continue;
            };
            {
                let health = entry.lock();
                observations += health.window.len();
                successes += health.window.iter().filter(|o| o.success).count();
                latency_total += health.window.iter().map(|o| o.latency_ms as f64).sum::<f64>();
            }
            drop(entry);
            if let Some(snapshot) = self.snapshot(league_id, *rank) {
                tiers.push(snapshot);
            }
        }

        let (uptime_percent, average_response_ms, error_rate) = if observations == 0 {
            (100.0, 0.0, 0.0)
        } else {
            let n = observations as f64;
            let success_ratio = successes as f64 / n;
            (success_ratio * 100.0, latency_total / n, 1.0 - success_ratio)
        };

        LeagueHealthOverview {
            league_id: league_id.to_string(),
            uptime_percent,
            average_response_ms,
            error_rate,
            tiers,
        }
    }
}
