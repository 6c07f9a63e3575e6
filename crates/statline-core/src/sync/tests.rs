use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use super::{OrchestratorParts, SyncOrchestrator};
use crate::cache::{CachedSnapshot, DataCache, InMemoryDataCache};
use crate::correction::StatisticsStore;
use crate::health::HealthMonitor;
use crate::registry::EndpointRegistry;
use crate::test_support::{permissive_limiter, scores_league, tier_url, Behavior, ScriptedClient};
use statline_types::{
    CacheError, FeedKind, FeedSpec, LeagueConfig, LeagueSyncResult, SourceFailure, SyncConfig,
    SyncError, SyncStatus, TierRank,
};

struct FailingCache;

#[async_trait]
impl DataCache for FailingCache {
    async fn put(
        &self,
        _league_id: &str,
        _result: &LeagueSyncResult,
        _ttl: Duration,
    ) -> Result<CachedSnapshot, CacheError> {
        Err(CacheError::Unavailable { message: "disk full".to_string() })
    }

    async fn get(&self, _league_id: &str) -> Result<Option<CachedSnapshot>, CacheError> {
        Ok(None)
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

fn orchestrator(
    leagues: Vec<LeagueConfig>,
    client: Arc<ScriptedClient>,
    cache: Arc<dyn DataCache>,
    config: &SyncConfig,
) -> SyncOrchestrator {
    SyncOrchestrator::new(
        config,
        OrchestratorParts {
            registry: Arc::new(EndpointRegistry::new(leagues)),
            client,
            limiter: permissive_limiter(),
            cache,
            health: HealthMonitor::new(),
            statistics: StatisticsStore::new(),
        },
    )
}

fn games() -> Value {
    json!({"games": [
        {"team": "STL", "score": 4, "inning": 7, "timestamp": "2025-09-25T19:40:00Z"},
        {"team": "CHC", "score": 2, "inning": 7, "timestamp": "2025-09-25T19:40:00Z"},
    ]})
}

fn fail_all_tiers(client: &ScriptedClient, league_id: &str) {
    for rank in TierRank::ALL {
        client.route(&tier_url(league_id, rank), Behavior::Fail(SourceFailure::Status { status: 502 }));
    }
}

#[tokio::test]
async fn test_failed_league_does_not_affect_others() {
    let client = ScriptedClient::new();
    fail_all_tiers(&client, "nfl");
    client.route(&tier_url("mlb", TierRank::Primary), Behavior::Json(games()));

    let cache = Arc::new(InMemoryDataCache::new());
    let orchestrator = orchestrator(
        vec![scores_league("mlb"), scores_league("nfl")],
        client,
        cache.clone(),
        &SyncConfig::default(),
    );
    let report = orchestrator.run().await;

    assert_eq!(report.per_league.len(), 2);
    assert_eq!(report.success_count, 1);
    assert_eq!(report.failure_count, 1);

    let mlb = report.league("mlb").unwrap();
    assert_eq!(mlb.status, SyncStatus::Success);
    assert_eq!(mlb.records.len(), 2);
    assert_eq!(mlb.source_used, Some(TierRank::Primary));
    assert!(mlb.cached);

    let nfl = report.league("nfl").unwrap();
    assert_eq!(nfl.status, SyncStatus::Failed);
    assert!(matches!(&nfl.error, Some(SyncError::Fetch(err)) if err.attempted_tiers().len() == 3));
    assert!(nfl.source_used.is_none());

    assert!(cache.get("mlb").await.unwrap().is_some());
    assert!(cache.get("nfl").await.unwrap().is_none());
    assert!(orchestrator.last_sync().contains_key("mlb"));
    assert!(!orchestrator.last_sync().contains_key("nfl"));
}

#[tokio::test]
async fn test_total_outage_still_reports() {
    let client = ScriptedClient::new();
    fail_all_tiers(&client, "mlb");
    let orchestrator = orchestrator(
        vec![scores_league("mlb")],
        client,
        Arc::new(InMemoryDataCache::new()),
        &SyncConfig::default(),
    );
    let report = orchestrator.run().await;
    assert!(report.is_total_outage());
    assert_eq!(report.summary.data_quality, 1.0);
}

#[tokio::test]
async fn test_repeated_runs_report_same_counts() {
    let client = ScriptedClient::new();
    fail_all_tiers(&client, "nba");
    client.route(&tier_url("mlb", TierRank::Secondary), Behavior::Json(games()));
    client.route(&tier_url("nfl", TierRank::Primary), Behavior::Json(games()));

    let orchestrator = orchestrator(
        vec![scores_league("mlb"), scores_league("nfl"), scores_league("nba")],
        client,
        Arc::new(InMemoryDataCache::new()),
        &SyncConfig::default(),
    );
    let first = orchestrator.run().await;
    let second = orchestrator.run().await;

    assert_ne!(first.cycle_id, second.cycle_id);
    assert_eq!(first.success_count, second.success_count);
    assert_eq!(first.failure_count, second.failure_count);
    assert_eq!((first.success_count, first.failure_count), (2, 1));
}

#[tokio::test]
async fn test_cache_failure_degrades_to_partial() {
    let client = ScriptedClient::new();
    client.route(&tier_url("mlb", TierRank::Primary), Behavior::Json(games()));
    let orchestrator =
        orchestrator(vec![scores_league("mlb")], client, Arc::new(FailingCache), &SyncConfig::default());

    let report = orchestrator.run().await;
    let mlb = report.league("mlb").unwrap();
    assert_eq!(mlb.status, SyncStatus::PartialSuccess);
    assert_eq!(mlb.records.len(), 2);
    assert!(!mlb.cached);
    assert!(matches!(mlb.error, Some(SyncError::Cache(CacheError::Unavailable { .. }))));
    assert_eq!(report.success_count, 1);
    assert_eq!(report.partial_count, 1);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_marks_pending_league_timed_out() {
    let client = ScriptedClient::new();
    client.route(&tier_url("mlb", TierRank::Primary), Behavior::Json(games()));
    client.route(&tier_url("nfl", TierRank::Primary), Behavior::Slow(Duration::from_secs(300), games()));

    let config = SyncConfig { cycle_deadline_secs: 2, ..SyncConfig::default() };
    let orchestrator =
        orchestrator(vec![scores_league("mlb"), scores_league("nfl")], client, Arc::new(InMemoryDataCache::new()), &config);
    let report = orchestrator.run().await;

    assert_eq!(report.league("mlb").map(|r| r.status), Some(SyncStatus::Success));
    let nfl = report.league("nfl").unwrap();
    assert_eq!(nfl.status, SyncStatus::Failed);
    assert_eq!(nfl.error, Some(SyncError::Timeout { deadline_ms: 2000 }));
    assert!(report.total_duration_ms >= 2000 && report.total_duration_ms < 3000);
}

#[tokio::test]
async fn test_panicking_league_is_isolated() {
    let client = ScriptedClient::new();
    client.route(&tier_url("mlb", TierRank::Primary), Behavior::Json(games()));
    client.route(&tier_url("nba", TierRank::Primary), Behavior::Panic);

    let orchestrator = orchestrator(
        vec![scores_league("mlb"), scores_league("nba")],
        client,
        Arc::new(InMemoryDataCache::new()),
        &SyncConfig::default(),
    );
    let report = orchestrator.run().await;

    assert_eq!(report.league("mlb").map(|r| r.status), Some(SyncStatus::Success));
    let nba = report.league("nba").unwrap();
    assert!(matches!(&nba.error, Some(SyncError::Internal { message }) if message.contains("panicked")));
}

#[tokio::test]
async fn test_partial_feed_failure() {
    let mut league = scores_league("ncaa");
    league.feeds.push(FeedSpec::new("standings", FeedKind::Standings));

    let client = ScriptedClient::new();
    client.route(&tier_url("ncaa", TierRank::Primary), Behavior::Json(games()));
    for rank in TierRank::ALL {
        client.route(
            &format!("{}/standings", tier_url("ncaa", rank)),
            Behavior::Fail(SourceFailure::Timeout { timeout_ms: 10_000 }),
        );
    }

    let orchestrator =
        orchestrator(vec![league], client, Arc::new(InMemoryDataCache::new()), &SyncConfig::default());
    let report = orchestrator.run().await;
    let ncaa = report.league("ncaa").unwrap();

    assert_eq!(ncaa.status, SyncStatus::PartialSuccess);
    assert_eq!(ncaa.feeds.len(), 2);
    assert_eq!(ncaa.feeds[0].record_count, 2);
    assert!(ncaa.feeds[1].error.as_ref().is_some_and(|e| e.is_exhausted()));
    assert!(ncaa.warnings.iter().any(|w| w.starts_with("standings:")));
    assert!(ncaa.error.is_none());
}

#[tokio::test]
async fn test_rejections_and_statistics_refresh() {
    let client = ScriptedClient::new();
    client.route(
        &tier_url("mlb", TierRank::Primary),
        Behavior::Json(json!([
            {"team": "STL", "score": 4, "inning": 7, "timestamp": 1000},
            {"team": "CHC", "score": 6, "inning": 7, "timestamp": 1000},
            {"team": "MIL", "inning": 7, "timestamp": 1000},
        ])),
    );

    let orchestrator =
        orchestrator(vec![scores_league("mlb")], client, Arc::new(InMemoryDataCache::new()), &SyncConfig::default());
    let report = orchestrator.run().await;
    let mlb = report.league("mlb").unwrap();

    assert_eq!(mlb.status, SyncStatus::PartialSuccess);
    assert_eq!(mlb.rejected_count, 1);
    assert!((report.summary.data_quality - 2.0 / 3.0).abs() < 1e-9);

    let stats = orchestrator.statistics().get("mlb", "score").unwrap();
    assert_eq!(stats.mean, 5.0);
    assert_eq!(stats.sample_count, 2);
    assert!(orchestrator.statistics().get("mlb", "timestamp").is_none());
}
