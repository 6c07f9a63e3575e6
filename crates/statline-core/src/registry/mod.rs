//! Endpoint registry: the read-only set of leagues and their ranked tiers.

pub mod catalog;


use std::collections::BTreeMap;
use std::sync::Arc;

use statline_types::{LeagueConfig, SourceTier, SyncConfig};

use crate::health::HealthMonitor;

/// Leagues in catalog order. Built once at startup, never mutated.
#[derive(Debug, Clone, Default)]
pub struct EndpointRegistry {
    leagues: Vec<Arc<LeagueConfig>>,
}

impl EndpointRegistry {
    pub fn new(leagues: Vec<LeagueConfig>) -> Self {
        let leagues = leagues
            .into_iter()
            .map(|mut league| {
                league.tiers.sort_by_key(|t| t.rank);
                Arc::new(league)
            })
            .collect();
        Self { leagues }
    }

    /// Built-in catalog with auth headers taken from the process environment.
    pub fn builtin() -> Self {
        Self::new(catalog::builtin_leagues(|name| std::env::var(name).ok()))
    }

    /// Built-in catalog narrowed to `enabled_leagues` with URL overrides applied.
    pub fn from_config(config: &SyncConfig) -> Self {
        Self::from_leagues_with_config(catalog::builtin_leagues(|name| std::env::var(name).ok()), config)
    }

    pub fn from_leagues_with_config(leagues: Vec<LeagueConfig>, config: &SyncConfig) -> Self {
        let leagues = leagues
            .into_iter()
            .filter(|league| config.is_league_enabled(&league.league_id))
            .map(|league| apply_overrides(league, &config.base_url_overrides))
            .collect();
        Self::new(leagues)
    }

    pub fn league(&self, league_id: &str) -> Option<&Arc<LeagueConfig>> {
        self.leagues.iter().find(|l| l.league_id == league_id)
    }

    pub fn leagues(&self) -> &[Arc<LeagueConfig>] {
        &self.leagues
    }

    pub fn league_ids(&self) -> Vec<String> {
        self.leagues.iter().map(|l| l.league_id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.leagues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leagues.is_empty()
    }

    /// Tiers in attempt order.
    ///
    /// With `deprioritize` set, Degraded and Down tiers are stably moved behind
    /// healthy ones; no tier is ever dropped.
    pub fn ordered_tiers(
        &self,
        league_id: &str,
        health: &HealthMonitor,
        deprioritize: bool,
    ) -> Option<Vec<SourceTier>> {
        let league = self.league(league_id)?;
        Some(order_tiers(league, health, deprioritize))
    }
}

pub(crate) fn order_tiers(
    league: &LeagueConfig,
    health: &HealthMonitor,
    deprioritize: bool,
) -> Vec<SourceTier> {
    let mut tiers = league.tiers.clone();
    if deprioritize {
        tiers.sort_by_key(|t| (health.get_health(&league.league_id, t.rank).preference(), t.rank));
    }
    tiers
}

fn apply_overrides(mut league: LeagueConfig, overrides: &BTreeMap<String, Vec<String>>) -> LeagueConfig {
    let Some(urls) = overrides.get(&league.league_id) else {
        return league;
    };
    if urls.len() > league.tiers.len() {
        tracing::warn!(
            "{} base URL overrides given for {} but it has {} tiers; extras ignored",
            urls.len(),
            league.league_id,
            league.tiers.len()
        );
    }
    for (tier, raw) in league.tiers.iter_mut().zip(urls) {
        match url::Url::parse(raw) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                tracing::debug!("Overriding {} {} tier URL with {}", league.league_id, tier.rank, raw);
                tier.base_url = raw.clone();
            },
            _ => tracing::warn!(
                "Ignoring invalid base URL override '{}' for {} {} tier",
                raw,
                league.league_id,
                tier.rank
            ),
        }
    }
    league
}
