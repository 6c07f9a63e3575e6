use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use uuid::Uuid;

use statline_types::{
    ConfigError, CorrectionReason, LeagueSyncResult, SyncConfig, SyncError, SyncReport,
};

use super::report::build_report;
use super::task::{LeagueSyncTask, TaskContext};
use crate::cache::DataCache;
use crate::correction::{ErrorCorrectionEngine, StatisticsStore};
use crate::health::HealthMonitor;
use crate::prometheus;
use crate::rate_limit::RateLimiter;
use crate::registry::EndpointRegistry;
use crate::upstream::{FallbackFetcher, SourceClient};

/// Long-lived collaborators injected into the orchestrator.
pub struct OrchestratorParts {
    pub registry: Arc<EndpointRegistry>,
    pub client: Arc<dyn SourceClient>,
    pub limiter: Arc<RateLimiter>,
    pub cache: Arc<dyn DataCache>,
    pub health: Arc<HealthMonitor>,
    pub statistics: Arc<StatisticsStore>,
}

/// Fans out one task per league and joins them into a [`SyncReport`].
pub struct SyncOrchestrator {
    registry: Arc<EndpointRegistry>,
    limiter: Arc<RateLimiter>,
    health: Arc<HealthMonitor>,
    statistics: Arc<StatisticsStore>,
    ctx: Arc<TaskContext>,
    cycle_deadline: Duration,
    refresh_statistics: bool,
    last_sync: DashMap<String, DateTime<Utc>>,
}

impl SyncOrchestrator {
    pub fn new(config: &SyncConfig, parts: OrchestratorParts) -> Self {
        let fetcher = FallbackFetcher::new(
            Arc::clone(&parts.registry),
            parts.client,
            Arc::clone(&parts.limiter),
            Arc::clone(&parts.health),
        )
        .with_request_timeout(config.request_timeout())
        .with_deprioritize_degraded(config.deprioritize_degraded);

        let ctx = TaskContext {
            fetcher: Arc::new(fetcher),
            cache: parts.cache,
            correction: Arc::new(ErrorCorrectionEngine::new(config.correction.clone())),
            cache_config: config.cache.clone(),
            cache_write_timeout: config.cache_write_timeout(),
        };

        Self {
            registry: parts.registry,
            limiter: parts.limiter,
            health: parts.health,
            statistics: parts.statistics,
            ctx: Arc::new(ctx),
            cycle_deadline: config.cycle_deadline(),
            refresh_statistics: config.refresh_statistics,
            last_sync: DashMap::new(),
        }
    }

    /// Build every collaborator except transport and cache from `config`.
    pub fn from_config(
        config: &SyncConfig,
        client: Arc<dyn SourceClient>,
        cache: Arc<dyn DataCache>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let parts = OrchestratorParts {
            registry: Arc::new(EndpointRegistry::from_config(config)),
            client,
            limiter: Arc::new(RateLimiter::from_config(config)?),
            cache,
            health: HealthMonitor::with_config(config.health.clone()),
            statistics: StatisticsStore::new(),
        };
        Ok(Self::new(config, parts))
    }

    pub fn registry(&self) -> &Arc<EndpointRegistry> {
        &self.registry
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn health(&self) -> &Arc<HealthMonitor> {
        &self.health
    }

    pub fn statistics(&self) -> &Arc<StatisticsStore> {
        &self.statistics
    }

    pub fn cache(&self) -> &Arc<dyn DataCache> {
        &self.ctx.cache
    }

    /// Last completion time of each league that produced usable data.
    pub fn last_sync(&self) -> BTreeMap<String, DateTime<Utc>> {
        self.last_sync.iter().map(|e| (e.key().clone(), *e.value())).collect()
    }

    /// Run one cycle. Never fails: every league gets an entry in the report.
    pub async fn run(&self) -> SyncReport {
        let cycle_id = Uuid::new_v4();
        let timestamp = Utc::now();
        let started = Instant::now();
        let deadline = started + self.cycle_deadline;

        tracing::info!(
            "Starting sync cycle {} for {} league(s)",
            cycle_id,
            self.registry.len()
        );

        let mut tasks = JoinSet::new();
        let mut pending: HashMap<tokio::task::Id, String> = HashMap::new();
        for league in self.registry.leagues() {
            let stats = self.statistics.snapshot(&league.league_id);
            let task = LeagueSyncTask::new(Arc::clone(league), stats, Arc::clone(&self.ctx));
            let handle = tasks.spawn(task.run());
            pending.insert(handle.id(), league.league_id.clone());
        }

        let mut per_league = BTreeMap::new();
        loop {
            match tokio::time::timeout_at(deadline, tasks.join_next_with_id()).await {
                Ok(None) => break,
                Ok(Some(Ok((id, result)))) => {
                    pending.remove(&id);
                    per_league.insert(result.league_id.clone(), result);
                },
                Ok(Some(Err(err))) => {
                    let Some(league_id) = pending.remove(&err.id()) else {
                        continue;
                    };
                    let message = if err.is_panic() {
                        let payload = err.into_panic();
                        let detail = payload
                            .downcast_ref::<&str>()
                            .map(ToString::to_string)
                            .or_else(|| payload.downcast_ref::<String>().cloned())
                            .unwrap_or_else(|| "unknown panic payload".to_string());
                        format!("league task panicked: {detail}")
                    } else {
                        "league task was cancelled".to_string()
                    };
                    tracing::error!("[{}] {}", league_id, message);
                    let failed = LeagueSyncResult::failed(
                        league_id.clone(),
                        SyncError::Internal { message },
                        started.elapsed().as_millis() as u64,
                    );
                    per_league.insert(league_id, failed);
                },
                Err(_) => {
                    tasks.abort_all();
                    let deadline_ms = self.cycle_deadline.as_millis() as u64;
                    for (_, league_id) in pending.drain() {
                        tracing::warn!(
                            "[{}] did not settle within the {}ms cycle deadline, aborting",
                            league_id,
                            deadline_ms
                        );
                        let failed = LeagueSyncResult::failed(
                            league_id.clone(),
                            SyncError::Timeout { deadline_ms },
                            deadline_ms,
                        );
                        per_league.insert(league_id, failed);
                    }
                    break;
                },
            }
        }

        let elapsed = started.elapsed();
        let report = build_report(cycle_id, timestamp, elapsed.as_millis() as u64, per_league);
        self.after_cycle(&report, elapsed);

        tracing::info!(
            "Sync cycle {} finished in {}ms: {} usable ({} partial), {} failed, {} records, data quality {:.3}",
            cycle_id,
            report.total_duration_ms,
            report.success_count,
            report.partial_count,
            report.failure_count,
            report.summary.total_records,
            report.summary.data_quality
        );
        report
    }

    fn after_cycle(&self, report: &SyncReport, elapsed: Duration) {
        prometheus::record_cycle(elapsed);

        for (league_id, result) in &report.per_league {
            prometheus::record_league_sync(league_id, result.status, result.confidence_score);
            for reason in [
                CorrectionReason::Outlier,
                CorrectionReason::Imputed,
                CorrectionReason::TemporalInconsistency,
            ] {
                let count = result.records.iter().map(|r| r.corrections_for(reason)).sum::<usize>()
                    + result.excluded.iter().map(|r| r.corrections_for(reason)).sum::<usize>();
                prometheus::record_corrections(league_id, reason, count);
            }

            if !result.status.is_usable() {
                continue;
            }
            self.last_sync.insert(league_id.clone(), result.synced_at);

            if self.refresh_statistics && !result.records.is_empty() {
                let skip: Vec<&str> = self
                    .registry
                    .league(league_id)
                    .map(|league| {
                        league
                            .validation_rules
                            .values()
                            .flat_map(|rule| [rule.entity_key.as_str(), rule.timestamp_field.as_str()])
                            .collect()
                    })
                    .unwrap_or_default();
                self.statistics.refresh_from(league_id, &result.records, &skip);
            }
        }
    }
}
