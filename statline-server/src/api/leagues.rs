//! League handlers: catalog listing and per-league cached snapshot

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use statline_core::CachedSnapshot;
use statline_types::{FeedSpec, HealthState, LeagueConfig, TierRank};

use crate::state::AppState;

#[derive(Serialize)]
pub struct TierSummary {
    pub rank: TierRank,
    pub base_url: String,
    pub source_key: String,
    pub state: HealthState,
}

#[derive(Serialize)]
pub struct LeagueSummary {
    pub league_id: String,
    pub display_name: String,
    pub feeds: Vec<FeedSpec>,
    pub tiers: Vec<TierSummary>,
    pub last_sync: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct LeagueDetail {
    #[serde(flatten)]
    pub league: LeagueSummary,
    pub snapshot: Option<CachedSnapshot>,
    pub fresh: bool,
    pub age_secs: Option<i64>,
}

fn summarize(state: &AppState, league: &LeagueConfig, last_sync: Option<DateTime<Utc>>) -> LeagueSummary {
    let health = state.orchestrator().health();
    LeagueSummary {
        league_id: league.league_id.clone(),
        display_name: league.display_name.clone(),
        feeds: league.feeds.clone(),
        tiers: league
            .tiers
            .iter()
            .map(|tier| TierSummary {
                rank: tier.rank,
                base_url: tier.base_url.clone(),
                source_key: league.source_key_for(tier).to_string(),
                state: health.get_health(&league.league_id, tier.rank),
            })
            .collect(),
        last_sync,
    }
}

pub async fn list_leagues(State(state): State<AppState>) -> Json<Vec<LeagueSummary>> {
    let last_sync = state.orchestrator().last_sync();
    let leagues = state
        .orchestrator()
        .registry()
        .leagues()
        .iter()
        .map(|league| summarize(&state, league, last_sync.get(&league.league_id).copied()))
        .collect();
    Json(leagues)
}

pub async fn get_league(
    State(state): State<AppState>,
    Path(league_id): Path<String>,
) -> Result<Json<LeagueDetail>, (StatusCode, String)> {
    let orchestrator = state.orchestrator();
    let league = orchestrator
        .registry()
        .league(&league_id)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Unknown league: {league_id}")))?;

    let snapshot = orchestrator
        .cache()
        .get(&league_id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let last_sync = orchestrator.last_sync().get(&league_id).copied();
    Ok(Json(LeagueDetail {
        league: summarize(&state, league, last_sync),
        fresh: snapshot.as_ref().is_some_and(CachedSnapshot::is_fresh),
        age_secs: snapshot.as_ref().map(CachedSnapshot::age_secs),
        snapshot,
    }))
}
