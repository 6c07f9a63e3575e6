use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use statline_types::{CorrectedRecord, FieldStatistics};

/// Field name -> statistics for one league.
pub type LeagueStatistics = BTreeMap<String, FieldStatistics>;

/// Long-lived per-league field statistics.
///
/// A cycle reads an immutable snapshot taken at its start; the orchestrator
/// refreshes the store once the cycle's report is built.
#[derive(Debug, Default)]
pub struct StatisticsStore {
    leagues: RwLock<BTreeMap<String, Arc<LeagueStatistics>>>,
}

impl StatisticsStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot for one league; empty on cold start.
    pub fn snapshot(&self, league_id: &str) -> Arc<LeagueStatistics> {
        self.leagues.read().get(league_id).cloned().unwrap_or_default()
    }

    pub fn get(&self, league_id: &str, field: &str) -> Option<FieldStatistics> {
        self.leagues.read().get(league_id).and_then(|fields| fields.get(field).copied())
    }

    pub fn set_field(&self, league_id: &str, field: &str, stats: FieldStatistics) {
        let mut leagues = self.leagues.write();
        let current = leagues.entry(league_id.to_string()).or_default();
        Arc::make_mut(current).insert(field.to_string(), stats);
    }

    /// Recompute statistics for every numeric field seen in `records`.
    ///
    /// Fields absent from this batch keep their previous statistics. Returns
    /// the number of fields updated.
    pub fn refresh_from(&self, league_id: &str, records: &[CorrectedRecord], skip: &[&str]) -> usize {
        let mut samples: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for corrected in records {
            for (field, value) in &corrected.record {
                if skip.contains(&field.as_str()) {
                    continue;
                }
                if let Some(v) = value.as_f64().filter(|v| v.is_finite()) {
                    samples.entry(field.as_str()).or_default().push(v);
                }
            }
        }

        let computed: Vec<(String, FieldStatistics)> = samples
            .into_iter()
            .filter_map(|(field, values)| {
                FieldStatistics::from_samples(&values).map(|stats| (field.to_string(), stats))
            })
            .collect();
        if computed.is_empty() {
            return 0;
        }

        let updated = computed.len();
        let mut leagues = self.leagues.write();
        let current = Arc::make_mut(leagues.entry(league_id.to_string()).or_default());
        current.extend(computed);
        tracing::debug!("Refreshed {} field statistics for {}", updated, league_id);
        updated
    }

    pub fn league_ids(&self) -> Vec<String> {
        self.leagues.read().keys().cloned().collect()
    }
}
