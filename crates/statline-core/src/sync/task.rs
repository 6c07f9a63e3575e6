//! One league's pass through fetch, validate, correct and cache.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use chrono::Utc;
use statline_types::models::CacheConfig;
use statline_types::{
    CacheError, FeedOutcome, FeedSpec, FetchError, LeagueConfig, LeagueSyncResult, SyncError,
    SyncStatus, ValidationRule,
};

use crate::cache::{ttl_for_feeds, DataCache};
use crate::correction::{Corrected, ErrorCorrectionEngine, LeagueStatistics};
use crate::upstream::{FallbackFetcher, FetchedPayload};
use crate::validation::{ValidationEngine, ValidationOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    Pending,
    Fetching,
    Validating,
    Correcting,
    Cached,
    Done(SyncStatus),
}

/// Collaborators shared by every league task of a cycle.
pub struct TaskContext {
    pub fetcher: Arc<FallbackFetcher>,
    pub cache: Arc<dyn DataCache>,
    pub correction: Arc<ErrorCorrectionEngine>,
    pub cache_config: CacheConfig,
    pub cache_write_timeout: Duration,
}

pub struct LeagueSyncTask {
    league: Arc<LeagueConfig>,
    stats: Arc<LeagueStatistics>,
    ctx: Arc<TaskContext>,
    stage: SyncStage,
}

impl LeagueSyncTask {
    pub fn new(league: Arc<LeagueConfig>, stats: Arc<LeagueStatistics>, ctx: Arc<TaskContext>) -> Self {
        Self { league, stats, ctx, stage: SyncStage::Pending }
    }

    pub fn stage(&self) -> SyncStage {
        self.stage
    }

    fn transition(&mut self, next: SyncStage) {
        tracing::debug!("[{}] {:?} -> {:?}", self.league.league_id, self.stage, next);
        self.stage = next;
    }

    async fn fetch_all(&self) -> Vec<(FeedSpec, Result<FetchedPayload, FetchError>)> {
        let league_id = self.league.league_id.as_str();
        let fetches = self.league.feeds.iter().map(|feed| async move {
            let outcome = self.ctx.fetcher.fetch(league_id, &feed.path).await;
            (feed.clone(), outcome)
        });
        futures::future::join_all(fetches).await
    }

    pub async fn run(mut self) -> LeagueSyncResult {
        let started = Instant::now();
        let league_id = self.league.league_id.clone();

        self.transition(SyncStage::Fetching);
        let fetched = self.fetch_all().await;

        let mut feeds = Vec::with_capacity(fetched.len());
        let mut payloads = Vec::new();
        let mut first_error = None;
        for (spec, outcome) in fetched {
            match outcome {
                Ok(payload) => {
                    feeds.push(FeedOutcome {
                        path: spec.path.clone(),
                        kind: spec.kind,
                        source_used: Some(payload.tier),
                        record_count: 0,
                        latency_ms: payload.latency.as_millis() as u64,
                        error: None,
                    });
                    payloads.push((feeds.len() - 1, spec, payload));
                },
                Err(err) => {
                    feeds.push(FeedOutcome {
                        path: spec.path.clone(),
                        kind: spec.kind,
                        source_used: None,
                        record_count: 0,
                        latency_ms: 0,
                        error: Some(err.clone()),
                    });
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                },
            }
        }

        if payloads.is_empty() {
            let error = match first_error {
                Some(err) => SyncError::Fetch(err),
                None => SyncError::Internal { message: "league has no feeds configured".to_string() },
            };
            self.transition(SyncStage::Done(SyncStatus::Failed));
            tracing::warn!("[{}] sync failed: {}", league_id, error);
            return LeagueSyncResult::failed(league_id, error, started.elapsed().as_millis() as u64)
                .with_feeds(feeds);
        }

        self.transition(SyncStage::Validating);
        let default_rule = ValidationRule::default();
        let validated: Vec<(usize, FeedSpec, ValidationOutcome)> = payloads
            .iter()
            .map(|(idx, spec, payload)| {
                let rule = self.league.rule_for(spec.kind).unwrap_or(&default_rule);
                (*idx, spec.clone(), ValidationEngine::validate_payload(&spec.path, &payload.payload, rule))
            })
            .collect();

        self.transition(SyncStage::Correcting);
        let mut session = self.ctx.correction.begin(Arc::clone(&self.stats));
        let mut records = Vec::new();
        let mut excluded = Vec::new();
        let mut warnings = Vec::new();
        let mut rejected_count = 0;

        for (idx, spec, outcome) in validated {
            let rule = self.league.rule_for(spec.kind).unwrap_or(&default_rule);
            rejected_count += outcome.rejected_count;
            warnings.extend(outcome.warnings);
            feeds[idx].record_count = outcome.accepted.len();
            for record in outcome.accepted {
                match session.correct(&spec.path, rule, record) {
                    Corrected::Accepted(corrected) => records.push(corrected),
                    Corrected::Excluded(corrected) => excluded.push(corrected),
                }
            }
        }
        let summary = session.finish();
        warnings.extend(summary.warnings);
        for feed in feeds.iter().filter(|f| f.error.is_some()) {
            if let Some(err) = &feed.error {
                warnings.push(format!("{}: {}", feed.path, err));
            }
        }

        let feeds_failed = feeds.iter().any(|f| f.error.is_some());
        let mut status = if feeds_failed || rejected_count > 0 || !excluded.is_empty() {
            SyncStatus::PartialSuccess
        } else {
            SyncStatus::Success
        };

        let source_used = payloads.iter().map(|(_, _, p)| p.tier).max();
        let mut result = LeagueSyncResult {
            league_id: league_id.clone(),
            status,
            records,
            excluded,
            source_used,
            latency_ms: 0,
            error: None,
            warnings,
            rejected_count,
            feeds,
            confidence_score: summary.confidence_score,
            synced_at: Utc::now(),
            cached: false,
        };

        result.latency_ms = started.elapsed().as_millis() as u64;
        let ttl = ttl_for_feeds(&self.ctx.cache_config, &self.league.feeds);
        let write = tokio::time::timeout(
            self.ctx.cache_write_timeout,
            self.ctx.cache.put(&league_id, &result, ttl),
        )
        .await;
        let cache_error = match write {
            Ok(Ok(_)) => None,
            Ok(Err(err)) => Some(err),
            Err(_) => Some(CacheError::Timeout {
                league_id: league_id.clone(),
                timeout_ms: self.ctx.cache_write_timeout.as_millis() as u64,
            }),
        };

        match cache_error {
            None => {
                result.cached = true;
                self.transition(SyncStage::Cached);
            },
            Some(err) => {
                tracing::warn!("[{}] cache write failed, returning uncached result: {}", league_id, err);
                status = SyncStatus::PartialSuccess;
                result.warnings.push(format!("cache write failed: {err}"));
                result.error = Some(SyncError::Cache(err));
            },
        }

        result.status = status;
        result.latency_ms = started.elapsed().as_millis() as u64;
        self.transition(SyncStage::Done(status));
        tracing::debug!(
            "[{}] {} with {} record(s), {} rejected, {} excluded in {}ms",
            league_id,
            status,
            result.records.len(),
            result.rejected_count,
            result.excluded.len(),
            result.latency_ms
        );
        result
    }
}
