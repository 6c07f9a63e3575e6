//! Source tier health types.

use serde::{Deserialize, Serialize};

use super::league::TierRank;

/// Advisory health classification of one (league, tier) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthState {
    /// Tier is answering normally
    Healthy,
    /// Elevated failure rate or latency over the observation window
    Degraded,
    /// Every tier of the league failed in the most recent fetch
    Down,
    /// First success after being Down
    Recovering,
}

impl HealthState {
    /// Sort key for advisory tier ordering: lower is preferred.
    pub fn preference(&self) -> u8 {
        match self {
            HealthState::Healthy | HealthState::Recovering => 0,
            HealthState::Degraded => 1,
            HealthState::Down => 2,
        }
    }
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthState::Healthy => write!(f, "healthy"),
            HealthState::Degraded => write!(f, "degraded"),
            HealthState::Down => write!(f, "down"),
            HealthState::Recovering => write!(f, "recovering"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierHealthSnapshot {
    pub league_id: String,
    pub tier: TierRank,
    pub state: HealthState,
    pub observations: usize,
    pub failure_rate: f64,
    pub mean_latency_ms: f64,
    pub consecutive_successes: u32,
    pub total_successes: u64,
    pub total_failures: u64,
    pub last_error: Option<String>,
}

/// Per-league roll-up for dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueHealthOverview {
    pub league_id: String,
    /// Share of successful attempts in the window, percent
    pub uptime_percent: f64,
    pub average_response_ms: f64,
    pub error_rate: f64,
    pub tiers: Vec<TierHealthSnapshot>,
}
