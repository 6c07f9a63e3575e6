use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

use super::report::{get_latest_report, get_status, trigger_sync};
use crate::test_helpers::test_app_state;
use statline_types::{SyncStatus, TierRank};

#[tokio::test]
async fn test_report_missing_before_first_cycle() {
    let state = test_app_state();
    let result = get_latest_report(State(state)).await;
    assert!(matches!(result, Err((StatusCode::NOT_FOUND, _))));
}

#[tokio::test]
async fn test_trigger_sync_publishes_report() {
    let state = test_app_state();
    let Json(report) = trigger_sync(State(state.clone())).await;

    assert_eq!(report.success_count, 1);
    assert_eq!(report.failure_count, 1);
    let mlb = report.league("mlb").expect("mlb entry");
    assert_eq!(mlb.status, SyncStatus::Success);
    assert_eq!(mlb.source_used, Some(TierRank::Secondary));
    assert_eq!(mlb.records.len(), 2);
    assert_eq!(report.league("nfl").map(|r| r.status), Some(SyncStatus::Failed));

    let Json(latest) = get_latest_report(State(state)).await.expect("report published");
    assert_eq!(latest.cycle_id, report.cycle_id);
}

#[tokio::test]
async fn test_status_reflects_last_cycle() {
    let state = test_app_state();
    let Json(before) = get_status(State(state.clone())).await;
    assert!(before.last_cycle.is_none());
    assert_eq!(before.leagues, vec!["mlb".to_string(), "nfl".to_string()]);
    assert_eq!(before.cache_backend, "memory");

    state.run_cycle().await;
    let Json(after) = get_status(State(state)).await;
    let last = after.last_cycle.expect("cycle recorded");
    assert_eq!(last.success_count, 1);
    assert_eq!(last.failure_count, 1);
    assert!(!after.cycle_running);
}
