//! Prometheus metrics for statline sync observability.
//!
//! Exposes metrics compatible with Prometheus/OpenMetrics format:
//! - `statline_fetch_attempts_total{league,tier,outcome}` - Counter of upstream attempts
//! - `statline_fetch_duration_seconds{league,tier}` - Histogram of attempt durations
//! - `statline_league_syncs_total{league,status}` - Counter of league sync outcomes
//! - `statline_corrections_total{league,reason}` - Counter of applied corrections
//! - `statline_league_confidence{league}` - Gauge of the latest confidence score
//! - `statline_sync_cycles_total` - Counter of orchestration cycles
//! - `statline_cycle_duration_seconds` - Histogram of cycle durations
//! - `statline_uptime_seconds` - Gauge of process uptime

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use statline_types::{CorrectionReason, SyncStatus, TierRank};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

static METRICS_START_TIME: OnceLock<Instant> = OnceLock::new();

/// Histogram buckets for upstream sports API latency.
///
/// Healthy feeds answer in well under a second; the top buckets cover the
/// 10s per-request timeout and multi-league cycles.
const LATENCY_BUCKETS: &[f64] = &[
    0.05, // 50ms - cached edge responses
    0.1,  // 100ms
    0.25, // 250ms - typical feed
    0.5,  // 500ms
    1.0,  // 1s
    2.5,  // 2.5s - slow provider
    5.0,  // 5s - degraded threshold
    10.0, // 10s - request timeout
    30.0, // 30s - slow cycle
    120.0, // 120s - cycle deadline
];

fn describe_metrics() {
    describe_counter!("statline_fetch_attempts_total", "Upstream fetch attempts by tier and outcome");
    describe_histogram!("statline_fetch_duration_seconds", "Upstream attempt duration in seconds");
    describe_counter!("statline_league_syncs_total", "League sync outcomes by status");
    describe_counter!("statline_corrections_total", "Corrections applied by reason");
    describe_gauge!("statline_league_confidence", "Confidence score of the latest league sync");
    describe_counter!("statline_sync_cycles_total", "Completed orchestration cycles");
    describe_histogram!("statline_cycle_duration_seconds", "Orchestration cycle duration in seconds");
    describe_gauge!("statline_uptime_seconds", "Process uptime in seconds");
}

/// Install the Prometheus recorder. Call once at startup; later calls return
/// the installed handle.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        return Ok(handle.clone());
    }
    let _ = METRICS_START_TIME.get_or_init(Instant::now);

    let handle = PrometheusBuilder::new().set_buckets(LATENCY_BUCKETS)?.install_recorder()?;
    describe_metrics();

    Ok(PROMETHEUS_HANDLE.get_or_init(|| handle).clone())
}

/// Returns None if metrics have not been initialized.
pub fn get_prometheus_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

pub fn record_fetch_attempt(league_id: &str, tier: TierRank, success: bool, duration: Duration) {
    let outcome = if success { "success" } else { "failure" };
    counter!(
        "statline_fetch_attempts_total",
        "league" => league_id.to_string(),
        "tier" => tier.as_str(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "statline_fetch_duration_seconds",
        "league" => league_id.to_string(),
        "tier" => tier.as_str()
    )
    .record(duration.as_secs_f64());
}

pub fn record_league_sync(league_id: &str, status: SyncStatus, confidence: f64) {
    counter!(
        "statline_league_syncs_total",
        "league" => league_id.to_string(),
        "status" => status.as_str()
    )
    .increment(1);
    gauge!("statline_league_confidence", "league" => league_id.to_string()).set(confidence);
}

pub fn record_corrections(league_id: &str, reason: CorrectionReason, count: usize) {
    if count == 0 {
        return;
    }
    counter!(
        "statline_corrections_total",
        "league" => league_id.to_string(),
        "reason" => reason.as_str()
    )
    .increment(count as u64);
}

pub fn record_cycle(duration: Duration) {
    counter!("statline_sync_cycles_total").increment(1);
    histogram!("statline_cycle_duration_seconds").record(duration.as_secs_f64());
}

/// Should be called on metrics render.
pub fn update_uptime_gauge() {
    if let Some(start) = METRICS_START_TIME.get() {
        gauge!("statline_uptime_seconds").set(start.elapsed().as_secs_f64());
    }
}

/// Render the exposition text, refreshing the uptime gauge first.
pub fn render_metrics() -> String {
    update_uptime_gauge();

    if let Some(handle) = get_prometheus_handle() {
        handle.render()
    } else {
        String::from("# Metrics not initialized\n")
    }
}
