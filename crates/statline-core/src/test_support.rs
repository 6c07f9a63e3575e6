//! Shared fixtures for unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use statline_types::models::RateLimitSpec;
use statline_types::{
    FeedKind, FeedSpec, LeagueConfig, SourceFailure, SourceTier, TierRank, ValidationRule,
};

use crate::health::HealthMonitor;
use crate::rate_limit::RateLimiter;
use crate::registry::EndpointRegistry;
use crate::upstream::{FallbackFetcher, SourceClient};

#[derive(Debug, Clone)]
pub enum Behavior {
    Json(Value),
    Fail(SourceFailure),
    /// Sleep, then answer with the payload
    Slow(Duration, Value),
    Panic,
}

/// SourceClient answering from a table keyed by URL prefix.
#[derive(Default)]
pub struct ScriptedClient {
    routes: Mutex<Vec<(String, Behavior)>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, prefix: &str, behavior: Behavior) {
        self.routes.lock().push((prefix.to_string(), behavior));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, prefix: &str) -> usize {
        self.calls.lock().iter().filter(|url| url.starts_with(prefix)).count()
    }
}

#[async_trait]
impl SourceClient for ScriptedClient {
    async fn get_json(
        &self,
        url: &str,
        _headers: &BTreeMap<String, String>,
        _timeout: Duration,
    ) -> Result<Value, SourceFailure> {
        self.calls.lock().push(url.to_string());
        // Longest matching prefix wins so per-path routes override per-tier ones.
        let behavior = self
            .routes
            .lock()
            .iter()
            .filter(|(prefix, _)| url.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, behavior)| behavior.clone());

        match behavior {
            Some(Behavior::Json(value)) => Ok(value),
            Some(Behavior::Fail(failure)) => Err(failure),
            Some(Behavior::Slow(delay, value)) => {
                tokio::time::sleep(delay).await;
                Ok(value)
            },
            Some(Behavior::Panic) => panic!("scripted panic for {url}"),
            None => Err(SourceFailure::Status { status: 404 }),
        }
    }
}

pub fn tier_url(league_id: &str, rank: TierRank) -> String {
    format!("http://{}.{league_id}.test", rank.as_str())
}

/// Three-tier league with a single live-scores feed.
pub fn scores_league(league_id: &str) -> LeagueConfig {
    LeagueConfig {
        league_id: league_id.to_string(),
        display_name: league_id.to_uppercase(),
        tiers: TierRank::ALL
            .iter()
            .map(|rank| SourceTier::new(*rank, tier_url(league_id, *rank)))
            .collect(),
        feeds: vec![FeedSpec::new("scores/live", FeedKind::LiveScores)],
        validation_rules: BTreeMap::from([(
            FeedKind::LiveScores,
            ValidationRule::new()
                .require(["team", "score", "timestamp"])
                .expect(["inning"])
                .range("score", 0.0, 200.0),
        )]),
        rate_limit_key: format!("{league_id}-api"),
    }
}

pub fn permissive_limiter() -> Arc<RateLimiter> {
    Arc::new(RateLimiter::new(&BTreeMap::new(), &RateLimitSpec::new(10_000, "1s")).unwrap())
}

pub fn fetcher_for(
    leagues: Vec<LeagueConfig>,
    client: Arc<ScriptedClient>,
) -> (FallbackFetcher, Arc<HealthMonitor>) {
    let health = HealthMonitor::new();
    let fetcher = FallbackFetcher::new(
        Arc::new(EndpointRegistry::new(leagues)),
        client,
        permissive_limiter(),
        Arc::clone(&health),
    );
    (fetcher, health)
}
