use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque key/value record returned by an upstream call.
pub type RawRecord = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionReason {
    /// Value replaced because it was a statistical outlier or out of range
    Outlier,
    /// Missing value filled in (or explicitly nulled) during imputation
    Imputed,
    /// Record arrived out of order and was excluded
    TemporalInconsistency,
}

impl CorrectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectionReason::Outlier => "outlier",
            CorrectionReason::Imputed => "imputed",
            CorrectionReason::TemporalInconsistency => "temporal_inconsistency",
        }
    }
}

/// Provenance entry for one field transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionRecord {
    pub field: String,
    pub original_value: Value,
    pub corrected_value: Value,
    pub reason: CorrectionReason,
}

/// A record together with its feed and the corrections applied to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectedRecord {
    /// Relative path of the feed the record came from
    pub feed: String,
    pub record: RawRecord,
    #[serde(default)]
    pub corrections: Vec<CorrectionRecord>,
}

impl CorrectedRecord {
    pub fn new(feed: impl Into<String>, record: RawRecord) -> Self {
        Self { feed: feed.into(), record, corrections: Vec::new() }
    }

    pub fn is_corrected(&self) -> bool {
        !self.corrections.is_empty()
    }

    pub fn corrections_for(&self, reason: CorrectionReason) -> usize {
        self.corrections.iter().filter(|c| c.reason == reason).count()
    }
}
