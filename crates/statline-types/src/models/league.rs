//! League, tier and feed definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use super::rules::ValidationRule;

/// Priority of an upstream source within a league.
///
/// Ordering follows declaration order, so sorting tiers by rank yields
/// Primary, Secondary, Backup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierRank {
    Primary,
    Secondary,
    Backup,
}

impl TierRank {
    pub const ALL: [TierRank; 3] = [TierRank::Primary, TierRank::Secondary, TierRank::Backup];

    pub fn as_str(&self) -> &'static str {
        match self {
            TierRank::Primary => "primary",
            TierRank::Secondary => "secondary",
            TierRank::Backup => "backup",
        }
    }
}

impl std::fmt::Display for TierRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TierRank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "primary" => Ok(TierRank::Primary),
            "secondary" => Ok(TierRank::Secondary),
            "backup" => Ok(TierRank::Backup),
            other => Err(format!("unknown tier '{other}'")),
        }
    }
}

/// One ranked upstream endpoint for a league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTier {
    pub rank: TierRank,
    pub base_url: String,
    /// Rate-limit partition (upstream provider). Falls back to the league's key.
    #[serde(default)]
    pub source_key: Option<String>,
    /// Static auth headers. Never serialized: values are secrets.
    #[serde(skip)]
    pub auth_headers: BTreeMap<String, String>,
}

impl SourceTier {
    pub fn new(rank: TierRank, base_url: impl Into<String>) -> Self {
        Self { rank, base_url: base_url.into(), source_key: None, auth_headers: BTreeMap::new() }
    }

    pub fn with_source_key(mut self, key: impl Into<String>) -> Self {
        self.source_key = Some(key.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth_headers.insert(name.into(), value.into());
        self
    }

    /// Join the base URL and a relative path with exactly one separator.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

/// Shape of a feed, used to select validation rules and cache TTLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    LiveScores,
    Standings,
    TeamStats,
    Rankings,
    Recruiting,
    Tournaments,
    Playoffs,
}

impl FeedKind {
    /// Default freshness window for a snapshot containing this feed.
    pub fn default_ttl_secs(&self) -> u64 {
        match self {
            FeedKind::LiveScores => 30,
            FeedKind::Standings => 5 * 60,
            FeedKind::TeamStats => 15 * 60,
            FeedKind::Rankings | FeedKind::Playoffs => 10 * 60,
            FeedKind::Tournaments => 2 * 3600,
            FeedKind::Recruiting => 6 * 3600,
        }
    }
}

/// A relative path synchronized every cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSpec {
    pub path: String,
    pub kind: FeedKind,
}

impl FeedSpec {
    pub fn new(path: impl Into<String>, kind: FeedKind) -> Self {
        Self { path: path.into(), kind }
    }
}

/// Static per-league configuration. Built once at startup, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueConfig {
    pub league_id: String,
    pub display_name: String,
    /// Ordered by rank
    pub tiers: Vec<SourceTier>,
    pub feeds: Vec<FeedSpec>,
    pub validation_rules: BTreeMap<FeedKind, ValidationRule>,
    pub rate_limit_key: String,
}

impl LeagueConfig {
    pub fn tier(&self, rank: TierRank) -> Option<&SourceTier> {
        self.tiers.iter().find(|t| t.rank == rank)
    }

    pub fn rule_for(&self, kind: FeedKind) -> Option<&ValidationRule> {
        self.validation_rules.get(&kind)
    }

    /// Rate-limit key used when calling the given tier.
    pub fn source_key_for<'a>(&'a self, tier: &'a SourceTier) -> &'a str {
        tier.source_key.as_deref().unwrap_or(&self.rate_limit_key)
    }
}
