use serde_json::{Number, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use statline_types::models::CorrectionConfig;
use statline_types::{
    CorrectedRecord, CorrectionReason, CorrectionRecord, FieldStatistics, RawRecord, ValidationRule,
};

use super::statistics::LeagueStatistics;
use crate::validation::ValidatedRecord;

/// Encode `value` as an integer when it has no fractional part.
pub(crate) fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        Value::from(value as i64)
    } else {
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

/// Epoch milliseconds from an RFC 3339 string or an integer.
pub(crate) fn parse_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::String(raw) => chrono::DateTime::parse_from_rfc3339(raw).ok().map(|t| t.timestamp_millis()),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        _ => None,
    }
}

fn entity_of(record: &RawRecord, rule: &ValidationRule) -> Option<String> {
    match record.get(&rule.entity_key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Replacement for `value` if it is a statistical outlier.
pub fn correct_outlier(value: f64, stats: &FieldStatistics, z_threshold: f64) -> Option<f64> {
    let z = stats.z_score(value)?;
    (z.abs() > z_threshold).then(|| stats.substitute())
}

/// Outcome of correcting one validated record.
#[derive(Debug, Clone, PartialEq)]
pub enum Corrected {
    Accepted(CorrectedRecord),
    /// Out-of-order record, carrying its TemporalInconsistency entry
    Excluded(CorrectedRecord),
}

#[derive(Debug, Clone)]
struct EntityState {
    record: RawRecord,
    timestamp: Option<i64>,
}

/// Totals of one correction session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub corrections: usize,
    pub numeric_values: usize,
    pub confidence_score: f64,
    pub warnings: Vec<String>,
}

pub struct ErrorCorrectionEngine {
    config: CorrectionConfig,
}

impl ErrorCorrectionEngine {
    pub fn new(config: CorrectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CorrectionConfig {
        &self.config
    }

    /// Start a sync epoch for one league against a statistics snapshot.
    pub fn begin(&self, stats: Arc<LeagueStatistics>) -> CorrectionSession {
        CorrectionSession {
            config: self.config.clone(),
            stats,
            entities: HashMap::new(),
            corrections: 0,
            numeric_values: 0,
            unimputed: BTreeMap::new(),
        }
    }
}

impl Default for ErrorCorrectionEngine {
    fn default() -> Self {
        Self::new(CorrectionConfig::default())
    }
}

/// Per-league, per-cycle correction state.
///
/// Remembers the last accepted record of each (feed, entity) so later records
/// in the same epoch can be imputed from it and checked for ordering.
pub struct CorrectionSession {
    config: CorrectionConfig,
    stats: Arc<LeagueStatistics>,
    entities: HashMap<(String, String), EntityState>,
    corrections: usize,
    numeric_values: usize,
    unimputed: BTreeMap<(String, String), usize>,
}

impl CorrectionSession {
    /// Statistics usable for outlier detection, or None while cold.
    fn warm_stats(&self, field: &str) -> Option<&FieldStatistics> {
        self.stats
            .get(field)
            .filter(|s| s.sample_count >= self.config.min_samples && s.std_dev > 0.0)
    }

    pub fn correct(&mut self, feed: &str, rule: &ValidationRule, validated: ValidatedRecord) -> Corrected {
        let ValidatedRecord { mut record, flags } = validated;
        let entity = entity_of(&record, rule);
        let key = entity.map(|e| (feed.to_string(), e));
        let timestamp = record.get(&rule.timestamp_field).and_then(parse_timestamp);
        let high_water = key.as_ref().and_then(|k| self.entities.get(k)).and_then(|s| s.timestamp);

        if let (Some(key), Some(ts)) = (&key, timestamp) {
            if let Some(previous) = high_water {
                if ts < previous {
                    let original = record.get(&rule.timestamp_field).cloned().unwrap_or(Value::Null);
                    let mut excluded = CorrectedRecord::new(feed, record);
                    excluded.corrections.push(CorrectionRecord {
                        field: rule.timestamp_field.clone(),
                        original_value: original,
                        corrected_value: Value::from(previous),
                        reason: CorrectionReason::TemporalInconsistency,
                    });
                    self.corrections += 1;
                    tracing::debug!(
                        "{}: excluding out-of-order record for {} ({} < {})",
                        feed,
                        key.1,
                        ts,
                        previous
                    );
                    return Corrected::Excluded(excluded);
                }
            }
        }

        let mut corrections = Vec::new();
        self.correct_outliers(rule, &mut record, &mut corrections);
        self.enforce_ranges(rule, &flags, &mut record, &mut corrections);
        self.impute(feed, rule, key.as_ref(), &mut record, &mut corrections);

        self.corrections += corrections.len();
        if let Some(key) = key {
            // Untimed records never lower the entity's high-water mark.
            self.entities
                .insert(key, EntityState { record: record.clone(), timestamp: timestamp.max(high_water) });
        }

        let mut accepted = CorrectedRecord::new(feed, record);
        accepted.corrections = corrections;
        Corrected::Accepted(accepted)
    }

    fn correct_outliers(
        &mut self,
        rule: &ValidationRule,
        record: &mut RawRecord,
        corrections: &mut Vec<CorrectionRecord>,
    ) {
        for (field, value) in record.iter_mut() {
            if *field == rule.entity_key || *field == rule.timestamp_field {
                continue;
            }
            let Some(current) = value.as_f64() else {
                continue;
            };
            self.numeric_values += 1;

            let Some(stats) = self.warm_stats(field) else {
                continue;
            };
            if let Some(replacement) = correct_outlier(current, stats, self.config.z_threshold) {
                let corrected = number_value(replacement);
                corrections.push(CorrectionRecord {
                    field: field.clone(),
                    original_value: value.clone(),
                    corrected_value: corrected.clone(),
                    reason: CorrectionReason::Outlier,
                });
                *value = corrected;
            }
        }
    }

    /// Bring flagged or freshly corrected ranged fields inside their bounds.
    fn enforce_ranges(
        &self,
        rule: &ValidationRule,
        flags: &BTreeMap<String, crate::validation::FieldFlag>,
        record: &mut RawRecord,
        corrections: &mut Vec<CorrectionRecord>,
    ) {
        let candidates: BTreeSet<&String> = flags
            .keys()
            .chain(corrections.iter().map(|c| &c.field))
            .filter(|field| rule.numeric_ranges.contains_key(field.as_str()))
            .collect();
        let candidates: Vec<String> = candidates.into_iter().cloned().collect();

        for field in candidates {
            let Some(range) = rule.numeric_ranges.get(&field) else {
                continue;
            };
            let Some(value) = record.get_mut(&field) else {
                continue;
            };
            let current = value.as_f64();
            if current.is_some_and(|v| range.contains(v)) {
                continue;
            }

            let replacement = match (self.warm_stats(&field), current) {
                (Some(stats), _) => range.clamp(stats.median),
                (None, Some(v)) => range.clamp(v),
                (None, None) => range.midpoint(),
            };
            let corrected = number_value(replacement);

            if let Some(existing) = corrections
                .iter_mut()
                .find(|c| c.field == field && c.reason == CorrectionReason::Outlier)
            {
                existing.corrected_value = corrected.clone();
            } else {
                corrections.push(CorrectionRecord {
                    field: field.clone(),
                    original_value: value.clone(),
                    corrected_value: corrected.clone(),
                    reason: CorrectionReason::Outlier,
                });
            }
            *value = corrected;
        }
    }

    fn impute(
        &mut self,
        feed: &str,
        rule: &ValidationRule,
        key: Option<&(String, String)>,
        record: &mut RawRecord,
        corrections: &mut Vec<CorrectionRecord>,
    ) {
        let entities = &self.entities;
        let unimputed = &mut self.unimputed;
        let previous = key.and_then(|k| entities.get(k));

        for field in &rule.expected_fields {
            if rule.is_identity_field(field) || record.get(field).is_some_and(|v| !v.is_null()) {
                continue;
            }

            let imputed = previous
                .and_then(|state| state.record.get(field))
                .filter(|v| !v.is_null())
                .cloned();
            let corrected = match imputed {
                Some(value) => value,
                None => {
                    *unimputed.entry((feed.to_string(), field.clone())).or_default() += 1;
                    Value::Null
                },
            };

            corrections.push(CorrectionRecord {
                field: field.clone(),
                original_value: Value::Null,
                corrected_value: corrected.clone(),
                reason: CorrectionReason::Imputed,
            });
            record.insert(field.clone(), corrected);
        }
    }

    /// `1 - corrections / max(numeric values seen, 1)`, clamped to [0, 1].
    pub fn confidence_score(&self) -> f64 {
        let denominator = self.numeric_values.max(1) as f64;
        (1.0 - self.corrections as f64 / denominator).clamp(0.0, 1.0)
    }

    pub fn finish(self) -> SessionSummary {
        let confidence_score = self.confidence_score();
        let warnings = self
            .unimputed
            .into_iter()
            .map(|((feed, field), count)| {
                format!("{feed}: '{field}' missing with no prior value to impute ({count} record(s))")
            })
            .collect();
        SessionSummary {
            corrections: self.corrections,
            numeric_values: self.numeric_values,
            confidence_score,
            warnings,
        }
    }
}
