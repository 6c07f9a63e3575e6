use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Inclusive numeric bounds for a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp into the range. NaN maps to the lower bound.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.max(self.min).min(self.max)
    }

    pub fn midpoint(&self) -> f64 {
        self.min + (self.max - self.min) / 2.0
    }
}

fn default_entity_key() -> String {
    "team".to_string()
}

fn default_timestamp_field() -> String {
    "timestamp".to_string()
}

/// Schema and range checks for one feed of one league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    /// Must be present and non-null or the record is rejected
    #[serde(default)]
    pub required_fields: BTreeSet<String>,
    /// Should be present; absence is imputed rather than rejected
    #[serde(default)]
    pub expected_fields: BTreeSet<String>,
    #[serde(default)]
    pub numeric_ranges: BTreeMap<String, NumericRange>,
    #[serde(default)]
    pub allowed_values: BTreeMap<String, BTreeSet<String>>,
    /// Expected number of distinct entities in one payload (soft check)
    #[serde(default)]
    pub expected_team_count: Option<usize>,
    #[serde(default = "default_entity_key")]
    pub entity_key: String,
    #[serde(default = "default_timestamp_field")]
    pub timestamp_field: String,
}

impl Default for ValidationRule {
    fn default() -> Self {
        Self {
            required_fields: BTreeSet::new(),
            expected_fields: BTreeSet::new(),
            numeric_ranges: BTreeMap::new(),
            allowed_values: BTreeMap::new(),
            expected_team_count: None,
            entity_key: default_entity_key(),
            timestamp_field: default_timestamp_field(),
        }
    }
}

impl ValidationRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn expect<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn range(mut self, field: impl Into<String>, min: f64, max: f64) -> Self {
        self.numeric_ranges.insert(field.into(), NumericRange::new(min, max));
        self
    }

    pub fn allow<I, S>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values.insert(field.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn team_count(mut self, count: usize) -> Self {
        self.expected_team_count = Some(count);
        self
    }

    pub fn entity_key(mut self, field: impl Into<String>) -> Self {
        self.entity_key = field.into();
        self
    }

    /// Identity fields are never imputed.
    pub fn is_identity_field(&self, field: &str) -> bool {
        field == self.entity_key || self.required_fields.contains(field)
    }
}
