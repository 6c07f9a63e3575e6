//! Sync Scheduler
//!
//! Background task that runs one orchestration cycle every
//! `cycle_interval_secs`. The first cycle starts immediately. A cycle that
//! overruns the interval delays the next tick rather than stacking runs.

use tokio::time::{interval, MissedTickBehavior};

use crate::state::AppState;

/// Start the sync scheduler as a background tokio task
pub fn start(state: AppState) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let period = state.config().cycle_interval();
        tracing::info!("⏱️ [Scheduler] Sync scheduler started (every {}s)", period.as_secs());

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let report = state.run_cycle().await;

            if report.is_total_outage() {
                tracing::error!(
                    "❌ [Scheduler] Cycle {}: every league failed ({} leagues)",
                    report.cycle_id,
                    report.failure_count
                );
            } else if report.failure_count > 0 || report.partial_count > 0 {
                tracing::warn!(
                    "⚠️ [Scheduler] Cycle {}: {} usable ({} partial), {} failed",
                    report.cycle_id,
                    report.success_count,
                    report.partial_count,
                    report.failure_count
                );
            } else {
                tracing::info!(
                    "✅ [Scheduler] Cycle {}: {} leagues synced in {}ms",
                    report.cycle_id,
                    report.success_count,
                    report.total_duration_ms
                );
            }
        }
    })
}
