//! API Routes
//!
//! Read-mostly REST endpoints over the orchestrator's shared state, plus a
//! manual sync trigger.

mod health;
mod leagues;
pub mod metrics;
mod report;

#[cfg(test)]
mod report_tests;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        // Status & reports
        .route("/status", get(report::get_status))
        .route("/report", get(report::get_latest_report))
        .route("/sync", post(report::trigger_sync))
        // Leagues
        .route("/leagues", get(leagues::list_leagues))
        .route("/leagues/:league_id", get(leagues::get_league))
        // Source health & limits
        .route("/health", get(health::get_health_overview))
        .route("/health/:league_id/:tier", get(health::get_tier_health))
        .route("/limits", get(health::get_rate_limits))
        // API fallback: return 404 for unknown API endpoints
        .fallback(api_not_found)
}

async fn api_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({"error": "Not found"})))
}
