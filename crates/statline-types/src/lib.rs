//! # statline Types
//!
//! Core types, models, and error definitions for the statline sync pipeline.
//!
//! - **`error`** - Typed error hierarchy for fetching, caching, configuration and sync
//! - **`models`** - Domain models (leagues, tiers, rules, records, statistics, reports, config)
//!
//! ## Architecture Role
//!
//! `statline-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!        statline-types (this crate)
//!                │
//!                ▼
//!         statline-core
//!                │
//!                ▼
//!        statline-server
//! ```
//!
//! All types are serializable via serde so reports and errors can be returned
//! verbatim from the REST API.

pub mod error;
pub mod models;

pub use error::{CacheError, ConfigError, FetchError, Result, SourceFailure, SyncError, TierFailure};

pub use models::{
    CorrectedRecord, CorrectionReason, CorrectionRecord, FeedKind, FeedOutcome, FeedSpec,
    FieldStatistics, HealthState, LeagueConfig, LeagueHealthOverview, LeagueSyncResult,
    NumericRange, RawRecord, SourceTier, SyncConfig, SyncReport, SyncStatus, SyncSummary,
    TierHealthSnapshot, TierRank, ValidationRule,
};
