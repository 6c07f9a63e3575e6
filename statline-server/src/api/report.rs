//! Sync report handlers: status, latest report, manual trigger

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use statline_types::SyncReport;

use crate::state::AppState;

#[derive(Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub uptime_secs: i64,
    pub leagues: Vec<String>,
    pub cache_backend: String,
    pub cycle_running: bool,
    pub cycle_interval_secs: u64,
    pub last_cycle: Option<LastCycle>,
}

#[derive(Serialize)]
pub struct LastCycle {
    pub cycle_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub total_duration_ms: u64,
    pub success_count: usize,
    pub partial_count: usize,
    pub failure_count: usize,
    pub data_quality: f64,
}

pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let last_cycle = state.latest_report().await.map(|report| LastCycle {
        cycle_id: report.cycle_id,
        timestamp: report.timestamp,
        total_duration_ms: report.total_duration_ms,
        success_count: report.success_count,
        partial_count: report.partial_count,
        failure_count: report.failure_count,
        data_quality: report.summary.data_quality,
    });
    let orchestrator = state.orchestrator();

    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
        leagues: orchestrator.registry().league_ids(),
        cache_backend: orchestrator.cache().backend_name().to_string(),
        cycle_running: state.is_cycle_running(),
        cycle_interval_secs: state.config().cycle_interval_secs,
        last_cycle,
    })
}

pub async fn get_latest_report(
    State(state): State<AppState>,
) -> Result<Json<SyncReport>, (StatusCode, String)> {
    state
        .latest_report()
        .await
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, "No sync cycle has completed yet".to_string()))
}

pub async fn trigger_sync(State(state): State<AppState>) -> Json<SyncReport> {
    tracing::info!("🔁 Manual sync requested via API");
    Json(state.run_cycle().await)
}
