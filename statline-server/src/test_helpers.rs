//! Test helpers for statline-server unit tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use statline_core::sync::OrchestratorParts;
use statline_core::{
    EndpointRegistry, HealthMonitor, InMemoryDataCache, RateLimiter, SourceClient,
    StatisticsStore, SyncOrchestrator,
};
use statline_types::models::RateLimitSpec;
use statline_types::{
    FeedKind, FeedSpec, LeagueConfig, SourceFailure, SourceTier, SyncConfig, TierRank,
    ValidationRule,
};

use crate::state::AppState;

/// Answers every URL under `ok_prefix` with `payload`, everything else with 503.
pub struct StaticClient {
    ok_prefix: String,
    payload: Value,
}

#[async_trait]
impl SourceClient for StaticClient {
    async fn get_json(
        &self,
        url: &str,
        _headers: &BTreeMap<String, String>,
        _timeout: Duration,
    ) -> Result<Value, SourceFailure> {
        if url.starts_with(&self.ok_prefix) {
            Ok(self.payload.clone())
        } else {
            Err(SourceFailure::Status { status: 503 })
        }
    }
}

pub fn test_league(league_id: &str) -> LeagueConfig {
    LeagueConfig {
        league_id: league_id.to_string(),
        display_name: league_id.to_uppercase(),
        tiers: TierRank::ALL
            .iter()
            .map(|rank| SourceTier::new(*rank, format!("http://{}.{league_id}.test", rank.as_str())))
            .collect(),
        feeds: vec![FeedSpec::new("standings", FeedKind::Standings)],
        validation_rules: BTreeMap::from([(
            FeedKind::Standings,
            ValidationRule::new().require(["team", "wins"]).range("wins", 0.0, 162.0),
        )]),
        rate_limit_key: format!("{league_id}-api"),
    }
}

/// `AppState` over two leagues: `mlb` answers from its secondary tier, `nfl` never answers.
pub fn test_app_state() -> AppState {
    let client = StaticClient {
        ok_prefix: "http://secondary.mlb.test".to_string(),
        payload: serde_json::json!({"standings": [
            {"team": "Cardinals", "wins": 83},
            {"team": "Cubs", "wins": 92},
        ]}),
    };
    let config = SyncConfig::default();
    let limiter = RateLimiter::new(&BTreeMap::new(), &RateLimitSpec::new(1_000, "1m"))
        .expect("valid test limiter");

    let orchestrator = SyncOrchestrator::new(
        &config,
        OrchestratorParts {
            registry: Arc::new(EndpointRegistry::new(vec![test_league("mlb"), test_league("nfl")])),
            client: Arc::new(client),
            limiter: Arc::new(limiter),
            cache: Arc::new(InMemoryDataCache::new()),
            health: HealthMonitor::new(),
            statistics: StatisticsStore::new(),
        },
    );
    AppState::new(orchestrator, config)
}
