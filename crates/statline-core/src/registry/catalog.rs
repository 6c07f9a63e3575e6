//! Built-in league catalog.
//!
//! Base URLs, feed paths and validation rules for the six supported leagues.
//! Auth header values come from the environment at construction time and are
//! attached per tier, keyed by the provider behind it.

use std::collections::BTreeMap;

use statline_types::{FeedKind, FeedSpec, LeagueConfig, SourceTier, TierRank, ValidationRule};

pub const MLB: &str = "mlb";
pub const NFL: &str = "nfl";
pub const NBA: &str = "nba";
pub const NCAA: &str = "ncaa";
pub const PERFECT_GAME: &str = "perfect_game";
pub const TEXAS_HS: &str = "texas_hs";

/// Static auth header resolved from an environment variable.
struct AuthHeader {
    env_var: &'static str,
    header: &'static str,
    bearer: bool,
}

const SPORTSDATAIO_AUTH: AuthHeader =
    AuthHeader { env_var: "SPORTSDATAIO_API_KEY", header: "Ocp-Apim-Subscription-Key", bearer: false };
const COLLEGEFOOTBALLDATA_AUTH: AuthHeader =
    AuthHeader { env_var: "COLLEGEFOOTBALLDATA_API_KEY", header: "Authorization", bearer: true };
const PERFECT_GAME_AUTH: AuthHeader =
    AuthHeader { env_var: "PERFECT_GAME_API_KEY", header: "X-API-Key", bearer: false };
const MAXPREPS_AUTH: AuthHeader =
    AuthHeader { env_var: "MAXPREPS_API_KEY", header: "Authorization", bearer: true };

fn tier(rank: TierRank, base_url: &str, source_key: &str) -> SourceTier {
    SourceTier::new(rank, base_url).with_source_key(source_key)
}

/// Auth header for the provider behind `source_key`, if it needs one.
fn provider_auth(source_key: &str) -> Option<&'static AuthHeader> {
    match source_key {
        "sportsDataIO" => Some(&SPORTSDATAIO_AUTH),
        "collegeFB" => Some(&COLLEGEFOOTBALLDATA_AUTH),
        "perfectGame" => Some(&PERFECT_GAME_AUTH),
        "maxPreps" => Some(&MAXPREPS_AUTH),
        _ => None,
    }
}

/// Attach each tier's own provider credential, or warn and leave it off.
fn authorize<F>(league_id: &str, tiers: Vec<SourceTier>, lookup: &F) -> Vec<SourceTier>
where
    F: Fn(&str) -> Option<String>,
{
    tiers
        .into_iter()
        .map(|tier| {
            let Some(auth) = tier.source_key.as_deref().and_then(provider_auth) else {
                return tier;
            };
            let Some(key) = lookup(auth.env_var).filter(|v| !v.trim().is_empty()) else {
                tracing::warn!(
                    "{} not set; {} requests to {} will be sent without the {} header",
                    auth.env_var,
                    league_id,
                    tier.base_url,
                    auth.header
                );
                return tier;
            };
            let value = if auth.bearer { format!("Bearer {}", key.trim()) } else { key.trim().to_string() };
            tier.with_header(auth.header, value)
        })
        .collect()
}

fn live_scores(period_field: &str, max_score: f64) -> ValidationRule {
    ValidationRule::new()
        .require(["team", "score", period_field, "timestamp"])
        .expect(["opponent"])
        .range("score", 0.0, max_score)
}

fn standings(team_count: usize) -> ValidationRule {
    ValidationRule::new().require(["team"]).expect(["wins", "losses"]).team_count(team_count)
}

fn recruiting() -> ValidationRule {
    ValidationRule::new()
        .require(["player"])
        .entity_key("player")
        .expect(["position", "grade", "starRating", "height", "weight"])
        .range("starRating", 1.0, 5.0)
        .range("height", 60.0, 84.0)
        .range("weight", 120.0, 400.0)
        .allow("grade", ["FR", "SO", "JR", "SR"])
}

fn rankings(entity: &str, max_rank: f64) -> ValidationRule {
    ValidationRule::new()
        .require([entity, "rank"])
        .entity_key(entity)
        .range("rank", 1.0, max_rank)
}

fn mlb() -> LeagueConfig {
    LeagueConfig {
        league_id: MLB.to_string(),
        display_name: "MLB".to_string(),
        tiers: vec![
            tier(TierRank::Primary, "https://api.sportsdata.io/v3/mlb", "sportsDataIO"),
            tier(TierRank::Secondary, "https://api.sportradar.com/mlb", "sportradar"),
            tier(TierRank::Backup, "https://api.espn.com/v1/sports/baseball/mlb", "espnAPI"),
        ],
        feeds: vec![
            FeedSpec::new("scores/live", FeedKind::LiveScores),
            FeedSpec::new("standings", FeedKind::Standings),
            FeedSpec::new("teams/STL/stats", FeedKind::TeamStats),
        ],
        validation_rules: BTreeMap::from([
            (FeedKind::LiveScores, live_scores("inning", 50.0)),
            (FeedKind::Standings, standings(30)),
            (
                FeedKind::TeamStats,
                ValidationRule::new()
                    .require(["team"])
                    .expect(["battingAverage", "era", "homeRuns"])
                    .range("battingAverage", 0.0, 1.0)
                    .range("era", 0.0, 15.0)
                    .range("homeRuns", 0.0, 80.0),
            ),
        ]),
        rate_limit_key: "sportsDataIO".to_string(),
    }
}

fn nfl() -> LeagueConfig {
    LeagueConfig {
        league_id: NFL.to_string(),
        display_name: "NFL".to_string(),
        tiers: vec![
            tier(TierRank::Primary, "https://api.sportsdata.io/v3/nfl", "sportsDataIO"),
            tier(TierRank::Secondary, "https://api.sportradar.com/nfl", "sportradar"),
            tier(TierRank::Backup, "https://api.espn.com/v1/sports/football/nfl", "espnAPI"),
        ],
        feeds: vec![
            FeedSpec::new("scores/live", FeedKind::LiveScores),
            FeedSpec::new("standings", FeedKind::Standings),
            FeedSpec::new("teams/TEN/stats", FeedKind::TeamStats),
        ],
        validation_rules: BTreeMap::from([
            (FeedKind::LiveScores, live_scores("quarter", 80.0)),
            (FeedKind::Standings, standings(32)),
            (FeedKind::TeamStats, football_stats()),
        ]),
        rate_limit_key: "sportsDataIO".to_string(),
    }
}

fn football_stats() -> ValidationRule {
    ValidationRule::new()
        .require(["team"])
        .expect(["passingYards", "rushingYards", "touchdowns"])
        .range("passingYards", 0.0, 600.0)
        .range("rushingYards", 0.0, 400.0)
        .range("touchdowns", 0.0, 8.0)
}

fn nba() -> LeagueConfig {
    LeagueConfig {
        league_id: NBA.to_string(),
        display_name: "NBA".to_string(),
        tiers: vec![
            tier(TierRank::Primary, "https://api.sportsdata.io/v3/nba", "sportsDataIO"),
            tier(TierRank::Secondary, "https://stats.nba.com/stats", "nbaStats"),
            tier(TierRank::Backup, "https://api.espn.com/v1/sports/basketball/nba", "espnAPI"),
        ],
        feeds: vec![
            FeedSpec::new("scores/live", FeedKind::LiveScores),
            FeedSpec::new("standings", FeedKind::Standings),
            FeedSpec::new("teams/MEM/stats", FeedKind::TeamStats),
        ],
        validation_rules: BTreeMap::from([
            // Lower bound 0: in-progress games start at zero
            (FeedKind::LiveScores, live_scores("quarter", 200.0)),
            (FeedKind::Standings, standings(30)),
            (
                FeedKind::TeamStats,
                ValidationRule::new()
                    .require(["team"])
                    .expect(["points", "assists", "rebounds"])
                    .range("points", 0.0, 100.0)
                    .range("assists", 0.0, 30.0)
                    .range("rebounds", 0.0, 30.0),
            ),
        ]),
        rate_limit_key: "sportsDataIO".to_string(),
    }
}

fn ncaa() -> LeagueConfig {
    LeagueConfig {
        league_id: NCAA.to_string(),
        display_name: "NCAA Football".to_string(),
        tiers: vec![
            tier(TierRank::Primary, "https://api.collegefootballdata.com", "collegeFB"),
            tier(TierRank::Secondary, "https://api.sportsdata.io/v3/cfb", "sportsDataIO"),
            tier(TierRank::Backup, "https://api.espn.com/v1/sports/football/college-football", "espnAPI"),
        ],
        feeds: vec![
            FeedSpec::new("rankings", FeedKind::Rankings),
            FeedSpec::new("conferences/SEC/standings", FeedKind::Standings),
            FeedSpec::new("teams/Texas/stats", FeedKind::TeamStats),
            FeedSpec::new("recruiting/2026", FeedKind::Recruiting),
        ],
        validation_rules: BTreeMap::from([
            (FeedKind::Rankings, rankings("team", 25.0)),
            (FeedKind::Standings, standings(16)),
            (FeedKind::TeamStats, football_stats()),
            (FeedKind::Recruiting, recruiting()),
        ]),
        rate_limit_key: "collegeFB".to_string(),
    }
}

fn perfect_game() -> LeagueConfig {
    LeagueConfig {
        league_id: PERFECT_GAME.to_string(),
        display_name: "Perfect Game".to_string(),
        tiers: vec![
            tier(TierRank::Primary, "https://api.perfectgame.org/v2", "perfectGame"),
            tier(TierRank::Secondary, "https://api.baseballamerica.com", "baseballAmerica"),
        ],
        feeds: vec![
            FeedSpec::new("prospects/TX/2026", FeedKind::Recruiting),
            FeedSpec::new("tournaments/current", FeedKind::Tournaments),
            FeedSpec::new("rankings/national", FeedKind::Rankings),
        ],
        validation_rules: BTreeMap::from([
            (FeedKind::Recruiting, recruiting()),
            (
                FeedKind::Tournaments,
                ValidationRule::new()
                    .require(["name"])
                    .entity_key("name")
                    .expect(["location", "startDate"]),
            ),
            (FeedKind::Rankings, rankings("player", 1000.0)),
        ]),
        rate_limit_key: "perfectGame".to_string(),
    }
}

fn texas_hs() -> LeagueConfig {
    LeagueConfig {
        league_id: TEXAS_HS.to_string(),
        display_name: "Texas HS Football".to_string(),
        tiers: vec![
            tier(TierRank::Primary, "https://api.maxpreps.com/v1/tx", "maxPreps"),
            tier(TierRank::Secondary, "https://api.davecampbell.com", "daveCampbell"),
        ],
        feeds: vec![
            FeedSpec::new("scores/current", FeedKind::LiveScores),
            FeedSpec::new("rankings/all-classifications", FeedKind::Rankings),
            FeedSpec::new("playoffs/brackets", FeedKind::Playoffs),
            FeedSpec::new("recruiting/uncommitted", FeedKind::Recruiting),
        ],
        validation_rules: BTreeMap::from([
            (
                FeedKind::LiveScores,
                ValidationRule::new()
                    .require(["team", "score", "timestamp"])
                    .expect(["opponent", "quarter"])
                    .range("score", 0.0, 100.0),
            ),
            (
                FeedKind::Rankings,
                rankings("team", 100.0).expect(["classification"]),
            ),
            (
                FeedKind::Playoffs,
                ValidationRule::new().require(["team"]).expect(["round", "seed", "classification"]),
            ),
            (FeedKind::Recruiting, recruiting()),
        ]),
        rate_limit_key: "maxPreps".to_string(),
    }
}

/// Every built-in league with auth headers resolved through `lookup`.
pub fn builtin_leagues<F>(lookup: F) -> Vec<LeagueConfig>
where
    F: Fn(&str) -> Option<String>,
{
    [mlb(), nfl(), nba(), ncaa(), perfect_game(), texas_hs()]
        .into_iter()
        .map(|mut league| {
            let tiers = std::mem::take(&mut league.tiers);
            league.tiers = authorize(&league.league_id, tiers, &lookup);
            league
        })
        .collect()
}
