//! Schema, range and cardinality checks for fetched payloads.
//!
//! Only missing required fields reject a record. Range problems are flagged
//! for the correction engine; cardinality and categorical mismatches become
//! warnings.

#[cfg(test)]
mod tests;

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use statline_types::{RawRecord, ValidationRule};

use crate::upstream::extract_records;

/// Why a ranged field needs correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldFlag {
    OutOfRange { value: f64 },
    NonNumeric,
}

/// An accepted record and the ranged fields that need correction.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    pub record: RawRecord,
    pub flags: BTreeMap<String, FieldFlag>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOutcome {
    pub accepted: Vec<ValidatedRecord>,
    pub rejected_count: usize,
    pub warnings: Vec<String>,
}

fn is_present(record: &RawRecord, field: &str) -> bool {
    record.get(field).is_some_and(|v| !v.is_null())
}

fn entity_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub struct ValidationEngine;

impl ValidationEngine {
    /// Extract records from a raw payload and validate them.
    ///
    /// Array elements that are not objects count as rejected.
    pub fn validate_payload(feed: &str, payload: &Value, rule: &ValidationRule) -> ValidationOutcome {
        let extracted = extract_records(payload);
        let mut outcome = Self::validate(feed, extracted.records, rule);
        if extracted.non_objects > 0 {
            outcome.rejected_count += extracted.non_objects;
            outcome
                .warnings
                .push(format!("{feed}: {} payload element(s) were not objects", extracted.non_objects));
        }
        outcome
    }

    pub fn validate(feed: &str, records: Vec<RawRecord>, rule: &ValidationRule) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::default();
        let mut missing: BTreeSet<&str> = BTreeSet::new();
        let mut unexpected: BTreeMap<&str, usize> = BTreeMap::new();

        for record in records {
            let absent: Vec<&str> = rule
                .required_fields
                .iter()
                .map(String::as_str)
                .filter(|field| !is_present(&record, field))
                .collect();
            if !absent.is_empty() {
                outcome.rejected_count += 1;
                missing.extend(absent);
                continue;
            }

            let mut flags = BTreeMap::new();
            for (field, range) in &rule.numeric_ranges {
                match record.get(field) {
                    None | Some(Value::Null) => {},
                    Some(value) => match value.as_f64() {
                        Some(v) if range.contains(v) => {},
                        Some(v) => {
                            flags.insert(field.clone(), FieldFlag::OutOfRange { value: v });
                        },
                        None => {
                            flags.insert(field.clone(), FieldFlag::NonNumeric);
                        },
                    },
                }
            }

            for (field, allowed) in &rule.allowed_values {
                if let Some(value) = record.get(field).filter(|v| !v.is_null()) {
                    if !allowed.contains(&entity_label(value)) {
                        *unexpected.entry(field.as_str()).or_default() += 1;
                    }
                }
            }

            outcome.accepted.push(ValidatedRecord { record, flags });
        }

        if outcome.rejected_count > 0 {
            outcome.warnings.push(format!(
                "{feed}: rejected {} record(s) missing required field(s): {}",
                outcome.rejected_count,
                missing.into_iter().collect::<Vec<_>>().join(", ")
            ));
        }

        for (field, count) in unexpected {
            outcome
                .warnings
                .push(format!("{feed}: {count} record(s) with unexpected '{field}' value"));
        }

        if let Some(expected) = rule.expected_team_count {
            let distinct: BTreeSet<String> = outcome
                .accepted
                .iter()
                .filter_map(|r| r.record.get(&rule.entity_key))
                .filter(|v| !v.is_null())
                .map(entity_label)
                .collect();
            if distinct.len() != expected {
                outcome.warnings.push(format!(
                    "{feed}: expected {expected} distinct {} values, found {}",
                    rule.entity_key,
                    distinct.len()
                ));
            }
        }

        outcome
    }
}
