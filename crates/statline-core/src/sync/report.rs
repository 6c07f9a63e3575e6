use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

use statline_types::{LeagueSyncResult, SyncReport, SyncStatus, SyncSummary};

pub fn summarize(per_league: &BTreeMap<String, LeagueSyncResult>) -> SyncSummary {
    let total_records: usize = per_league.values().map(|r| r.records.len()).sum();
    let total_rejected: usize = per_league.values().map(|r| r.rejected_count).sum();
    let total_excluded: usize = per_league.values().map(|r| r.excluded.len()).sum();
    let total_corrections: usize = per_league.values().map(LeagueSyncResult::correction_count).sum();

    let average_latency_ms = if per_league.is_empty() {
        0.0
    } else {
        per_league.values().map(|r| r.latency_ms as f64).sum::<f64>() / per_league.len() as f64
    };

    let seen = total_records + total_rejected + total_excluded;
    let data_quality = if seen == 0 { 1.0 } else { total_records as f64 / seen as f64 };

    SyncSummary {
        total_records,
        total_corrections,
        total_rejected,
        total_excluded,
        average_latency_ms,
        data_quality,
    }
}

pub fn build_report(
    cycle_id: Uuid,
    timestamp: DateTime<Utc>,
    total_duration_ms: u64,
    per_league: BTreeMap<String, LeagueSyncResult>,
) -> SyncReport {
    let count = |status: SyncStatus| per_league.values().filter(|r| r.status == status).count();
    let partial_count = count(SyncStatus::PartialSuccess);
    let success_count = count(SyncStatus::Success) + partial_count;
    let failure_count = count(SyncStatus::Failed);
    let summary = summarize(&per_league);

    SyncReport {
        cycle_id,
        timestamp,
        total_duration_ms,
        per_league,
        success_count,
        partial_count,
        failure_count,
        summary,
    }
}
