use serde_json::json;
use std::time::Duration;

use super::extract_records;
use crate::test_support::{fetcher_for, scores_league, tier_url, Behavior, ScriptedClient};
use statline_types::{FetchError, HealthState, SourceFailure, TierRank};

#[tokio::test]
async fn test_secondary_used_when_primary_fails() {
    let client = ScriptedClient::new();
    client.route(&tier_url("mlb", TierRank::Primary), Behavior::Fail(SourceFailure::Status { status: 503 }));
    client.route(&tier_url("mlb", TierRank::Secondary), Behavior::Json(json!([{"team": "STL"}])));
    client.route(&tier_url("mlb", TierRank::Backup), Behavior::Json(json!([{"team": "CHC"}])));

    let (fetcher, health) = fetcher_for(vec![scores_league("mlb")], client.clone());
    let fetched = fetcher.fetch("mlb", "scores/live").await.unwrap();

    assert_eq!(fetched.tier, TierRank::Secondary);
    assert_eq!(fetched.payload, json!([{"team": "STL"}]));
    assert_eq!(fetched.attempts, 2);
    assert_eq!(client.calls_to(&tier_url("mlb", TierRank::Backup)), 0);
    assert_eq!(
        client.calls(),
        vec![
            format!("{}/scores/live", tier_url("mlb", TierRank::Primary)),
            format!("{}/scores/live", tier_url("mlb", TierRank::Secondary)),
        ]
    );

    let primary = health.snapshot("mlb", TierRank::Primary).unwrap();
    assert_eq!(primary.total_failures, 1);
    assert_eq!(health.snapshot("mlb", TierRank::Secondary).unwrap().total_successes, 1);
}

#[tokio::test]
async fn test_all_tiers_failing_is_exhaustion() {
    let client = ScriptedClient::new();
    client.route(&tier_url("nfl", TierRank::Primary), Behavior::Fail(SourceFailure::Status { status: 500 }));
    client.route(
        &tier_url("nfl", TierRank::Secondary),
        Behavior::Fail(SourceFailure::Network { message: "connection refused".to_string() }),
    );
    client.route(
        &tier_url("nfl", TierRank::Backup),
        Behavior::Fail(SourceFailure::Parse { message: "expected value at line 1".to_string() }),
    );

    let (fetcher, health) = fetcher_for(vec![scores_league("nfl")], client.clone());
    let err = fetcher.fetch("nfl", "standings").await.unwrap_err();

    match &err {
        FetchError::AllSourcesExhausted { league_id, path, attempted_tiers, last_errors } => {
            assert_eq!(league_id, "nfl");
            assert_eq!(path, "standings");
            assert_eq!(attempted_tiers, &TierRank::ALL.to_vec());
            assert_eq!(last_errors.len(), 3);
            assert_eq!(last_errors[0].failure, SourceFailure::Status { status: 500 });
        },
        other => panic!("expected exhaustion, got {other:?}"),
    }
    assert_eq!(client.calls().len(), 3);
    for rank in TierRank::ALL {
        assert_eq!(health.get_health("nfl", rank), HealthState::Down);
    }
}

#[tokio::test]
async fn test_dead_path_leaves_serving_tier_up() {
    let client = ScriptedClient::new();
    client.route(&tier_url("mlb", TierRank::Primary), Behavior::Json(json!([{"team": "STL"}])));
    client.route(
        &format!("{}/scores/live", tier_url("mlb", TierRank::Primary)),
        Behavior::Fail(SourceFailure::Status { status: 404 }),
    );
    client.route(&tier_url("mlb", TierRank::Secondary), Behavior::Fail(SourceFailure::Status { status: 500 }));
    client.route(&tier_url("mlb", TierRank::Backup), Behavior::Fail(SourceFailure::Status { status: 500 }));

    let (fetcher, health) = fetcher_for(vec![scores_league("mlb")], client.clone());
    let fetched = fetcher.fetch("mlb", "standings").await.unwrap();
    assert_eq!(fetched.tier, TierRank::Primary);

    let err = fetcher.fetch("mlb", "scores/live").await.unwrap_err();
    assert!(matches!(err, FetchError::AllSourcesExhausted { .. }));

    assert_ne!(health.get_health("mlb", TierRank::Primary), HealthState::Down);
    assert_eq!(health.get_health("mlb", TierRank::Secondary), HealthState::Down);
    assert_eq!(health.get_health("mlb", TierRank::Backup), HealthState::Down);
}

#[tokio::test(start_paused = true)]
async fn test_slow_tier_times_out() {
    let client = ScriptedClient::new();
    client.route(
        &tier_url("nba", TierRank::Primary),
        Behavior::Slow(Duration::from_secs(30), json!({"team": "MEM"})),
    );
    client.route(&tier_url("nba", TierRank::Secondary), Behavior::Json(json!({"team": "MEM"})));

    let (fetcher, _) = fetcher_for(vec![scores_league("nba")], client.clone());
    let fetcher = fetcher.with_request_timeout(Duration::from_secs(10));

    let start = tokio::time::Instant::now();
    let fetched = fetcher.fetch("nba", "scores/live").await.unwrap();
    assert_eq!(fetched.tier, TierRank::Secondary);
    let waited = start.elapsed();
    assert!(waited >= Duration::from_secs(10) && waited < Duration::from_secs(11), "{waited:?}");
}

#[tokio::test]
async fn test_unknown_league() {
    let (fetcher, _) = fetcher_for(vec![scores_league("mlb")], ScriptedClient::new());
    let err = fetcher.fetch("cricket", "scores/live").await.unwrap_err();
    assert_eq!(err, FetchError::UnknownLeague { league_id: "cricket".to_string() });
}

#[test]
fn test_extract_records_shapes() {
    let top_level = extract_records(&json!([{"team": "A"}, 7, {"team": "B"}]));
    assert_eq!(top_level.records.len(), 2);
    assert_eq!(top_level.non_objects, 1);

    let wrapped = extract_records(&json!({"meta": {"page": 1}, "games": [{"team": "A"}]}));
    assert_eq!(wrapped.records.len(), 1);
    assert_eq!(wrapped.records[0].get("team"), Some(&json!("A")));

    let single = extract_records(&json!({"team": "STL", "battingAverage": 0.262}));
    assert_eq!(single.records.len(), 1);
    assert!(single.records[0].contains_key("battingAverage"));

    assert_eq!(extract_records(&json!("ok")).records.len(), 0);
    assert_eq!(extract_records(&json!(null)).non_objects, 0);
}
