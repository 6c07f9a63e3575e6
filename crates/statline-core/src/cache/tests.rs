use chrono::Utc;
use std::collections::BTreeMap;
use std::time::Duration;

use super::{ttl_for_feeds, DataCache, FileDataCache, InMemoryDataCache};
use statline_types::models::CacheConfig;
use statline_types::{FeedKind, FeedSpec, LeagueSyncResult, SyncError, SyncStatus};

fn sample_result(league_id: &str) -> LeagueSyncResult {
    let mut result =
        LeagueSyncResult::failed(league_id, SyncError::Internal { message: "fixture".to_string() }, 12);
    result.status = SyncStatus::Success;
    result.error = None;
    result.confidence_score = 0.9;
    result
}

#[tokio::test]
async fn test_memory_put_get() {
    let cache = InMemoryDataCache::new();
    assert!(cache.get("mlb").await.unwrap().is_none());

    let stored = cache.put("mlb", &sample_result("mlb"), Duration::from_secs(30)).await.unwrap();
    assert!(stored.result.cached);
    assert_eq!((stored.expires_at - stored.stored_at).num_seconds(), 30);

    let loaded = cache.get("mlb").await.unwrap().unwrap();
    assert_eq!(loaded, stored);
    assert!(loaded.is_fresh());
    assert!(!loaded.is_fresh_at(Utc::now() + chrono::Duration::seconds(31)));
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_file_cache_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FileDataCache::new(dir.path().join("snapshots"));

    assert!(cache.get("texas_hs").await.unwrap().is_none());
    let stored = cache.put("texas_hs", &sample_result("texas_hs"), Duration::from_secs(600)).await.unwrap();

    assert!(dir.path().join("snapshots/texas_hs.json").exists());
    assert!(!dir.path().join("snapshots/texas_hs.json.tmp").exists());

    let loaded = cache.get("texas_hs").await.unwrap().unwrap();
    assert_eq!(loaded.result.confidence_score, stored.result.confidence_score);
    assert_eq!(loaded.expires_at, stored.expires_at);
}

#[tokio::test]
async fn test_file_cache_rejects_path_like_ids() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FileDataCache::new(dir.path());
    assert!(cache.put("../etc", &sample_result("x"), Duration::from_secs(1)).await.is_err());
}

#[test]
fn test_ttl_is_minimum_over_feeds() {
    let feeds = vec![
        FeedSpec::new("standings", FeedKind::Standings),
        FeedSpec::new("scores/live", FeedKind::LiveScores),
        FeedSpec::new("recruiting/2026", FeedKind::Recruiting),
    ];
    let config = CacheConfig::default();
    assert_eq!(ttl_for_feeds(&config, &feeds), Duration::from_secs(30));
    assert_eq!(ttl_for_feeds(&config, &feeds[2..]), Duration::from_secs(6 * 3600));

    let overridden =
        CacheConfig { ttl_overrides: BTreeMap::from([(FeedKind::LiveScores, 90)]), ..CacheConfig::default() };
    assert_eq!(ttl_for_feeds(&overridden, &feeds), Duration::from_secs(90));
}
