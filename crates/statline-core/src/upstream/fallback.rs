use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use statline_types::{FetchError, SourceFailure, TierFailure, TierRank};

use super::client::SourceClient;
use crate::health::HealthMonitor;
use crate::prometheus;
use crate::rate_limit::RateLimiter;
use crate::registry::{order_tiers, EndpointRegistry};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The first successful payload for one (league, path) fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPayload {
    pub payload: Value,
    pub tier: TierRank,
    /// Duration of the successful attempt, excluding rate-limit waits
    pub latency: Duration,
    /// Attempts made, including the successful one
    pub attempts: usize,
}

/// Tries a league's tiers in order until one answers with 2xx JSON.
pub struct FallbackFetcher {
    registry: Arc<EndpointRegistry>,
    client: Arc<dyn SourceClient>,
    limiter: Arc<RateLimiter>,
    health: Arc<HealthMonitor>,
    request_timeout: Duration,
    deprioritize_degraded: bool,
}

impl FallbackFetcher {
    pub fn new(
        registry: Arc<EndpointRegistry>,
        client: Arc<dyn SourceClient>,
        limiter: Arc<RateLimiter>,
        health: Arc<HealthMonitor>,
    ) -> Self {
        Self {
            registry,
            client,
            limiter,
            health,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            deprioritize_degraded: false,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_deprioritize_degraded(mut self, enabled: bool) -> Self {
        self.deprioritize_degraded = enabled;
        self
    }

    pub fn registry(&self) -> &Arc<EndpointRegistry> {
        &self.registry
    }

    pub fn health(&self) -> &Arc<HealthMonitor> {
        &self.health
    }

    /// Fetch `path` for `league_id`, at most one attempt per tier.
    pub async fn fetch(&self, league_id: &str, path: &str) -> Result<FetchedPayload, FetchError> {
        let league = self
            .registry
            .league(league_id)
            .ok_or_else(|| FetchError::UnknownLeague { league_id: league_id.to_string() })?;
        let tiers = order_tiers(league, &self.health, self.deprioritize_degraded);
        let total = tiers.len();

        let mut attempted_tiers = Vec::with_capacity(total);
        let mut last_errors = Vec::with_capacity(total);

        for (idx, tier) in tiers.iter().enumerate() {
            let source_key = league.source_key_for(tier);
            self.limiter.acquire(source_key).await;

            let url = tier.url_for(path);
            attempted_tiers.push(tier.rank);
            let started = Instant::now();

            let outcome = match tokio::time::timeout(
                self.request_timeout,
                self.client.get_json(&url, &tier.auth_headers, self.request_timeout),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(SourceFailure::Timeout {
                    timeout_ms: self.request_timeout.as_millis() as u64,
                }),
            };
            let latency = started.elapsed();

            match outcome {
                Ok(payload) => {
                    self.health.record_success(league_id, tier.rank, latency);
                    prometheus::record_fetch_attempt(league_id, tier.rank, true, latency);

                    if idx > 0 {
                        tracing::info!(
                            "Upstream fallback succeeded | League: {} | Path: {} | Tier: {} | Attempt: {}/{}",
                            league_id,
                            path,
                            tier.rank,
                            idx + 1,
                            total
                        );
                    } else {
                        tracing::debug!(
                            "Upstream request succeeded | League: {} | Path: {} | Tier: {} | {}ms",
                            league_id,
                            path,
                            tier.rank,
                            latency.as_millis()
                        );
                    }
                    return Ok(FetchedPayload { payload, tier: tier.rank, latency, attempts: idx + 1 });
                },
                Err(failure) => {
                    let unavailable = FetchError::SourceUnavailable {
                        league_id: league_id.to_string(),
                        tier: tier.rank,
                        failure: failure.clone(),
                    };
                    self.health.record_failure(league_id, tier.rank, latency, &failure.to_string());
                    prometheus::record_fetch_attempt(league_id, tier.rank, false, latency);

                    if idx + 1 < total {
                        tracing::warn!("{} at {}, trying next tier", unavailable, url);
                    } else {
                        tracing::warn!("{} at {}", unavailable, url);
                    }
                    last_errors.push(TierFailure { tier: tier.rank, failure });
                },
            }
        }

        self.health.mark_down(league_id, &attempted_tiers);
        let err = FetchError::AllSourcesExhausted {
            league_id: league_id.to_string(),
            path: path.to_string(),
            attempted_tiers,
            last_errors,
        };
        tracing::error!("{}", err);
        Err(err)
    }
}
