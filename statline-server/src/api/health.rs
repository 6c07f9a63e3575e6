//! Source health and rate limit handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;

use statline_core::rate_limit::RateLimitUsage;
use statline_types::{HealthState, LeagueHealthOverview, TierHealthSnapshot, TierRank};

use crate::state::AppState;

pub async fn get_health_overview(State(state): State<AppState>) -> Json<Vec<LeagueHealthOverview>> {
    let health = state.orchestrator().health();
    let overview = state
        .orchestrator()
        .registry()
        .league_ids()
        .iter()
        .map(|league_id| health.league_overview(league_id))
        .collect();
    Json(overview)
}

#[derive(Serialize)]
pub struct TierHealthResponse {
    pub league_id: String,
    pub tier: TierRank,
    pub state: HealthState,
    /// None until the tier has been called at least once
    pub details: Option<TierHealthSnapshot>,
}

pub async fn get_tier_health(
    State(state): State<AppState>,
    Path((league_id, tier)): Path<(String, String)>,
) -> Result<Json<TierHealthResponse>, (StatusCode, String)> {
    let tier: TierRank = tier.parse().map_err(|e: String| (StatusCode::BAD_REQUEST, e))?;
    let orchestrator = state.orchestrator();
    let league = orchestrator
        .registry()
        .league(&league_id)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Unknown league: {league_id}")))?;
    if league.tier(tier).is_none() {
        return Err((StatusCode::NOT_FOUND, format!("{league_id} has no {tier} tier")));
    }

    let health = orchestrator.health();
    Ok(Json(TierHealthResponse {
        state: health.get_health(&league_id, tier),
        details: health.snapshot(&league_id, tier),
        league_id,
        tier,
    }))
}

pub async fn get_rate_limits(State(state): State<AppState>) -> Json<Vec<RateLimitUsage>> {
    Json(state.orchestrator().limiter().snapshot())
}
