//! Core domain models for statline.

pub mod config;
mod health;
mod league;
mod record;
mod rules;
mod stats;
mod sync;

pub use config::{
    CacheBackend, CacheConfig, CorrectionConfig, HealthConfig, RateLimitSpec, SyncConfig,
};
pub use health::{HealthState, LeagueHealthOverview, TierHealthSnapshot};
pub use league::{FeedKind, FeedSpec, LeagueConfig, SourceTier, TierRank};
pub use record::{CorrectedRecord, CorrectionReason, CorrectionRecord, RawRecord};
pub use rules::{NumericRange, ValidationRule};
pub use stats::FieldStatistics;
pub use sync::{FeedOutcome, LeagueSyncResult, SyncReport, SyncStatus, SyncSummary};
