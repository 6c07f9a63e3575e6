//! # statline Core
//!
//! Multi-league sports data synchronization pipeline.
//!
//! ## Architecture
//!
//! ```text
//! statline-core/src/
//! ├── rate_limit/   # Sliding-window limiter, one partition per upstream provider
//! ├── registry/     # Built-in league catalog, tier ordering, env auth headers
//! ├── upstream/     # SourceClient transport + FallbackFetcher + payload extraction
//! ├── validation/   # Required-field, range and cardinality checks
//! ├── correction/   # Outlier, range, imputation and temporal corrections
//! ├── cache/        # DataCache trait with memory and JSON-file backends
//! ├── health/       # Rolling-window tier health classification
//! ├── sync/         # LeagueSyncTask state machine and SyncOrchestrator fan-out
//! ├── prometheus.rs # Metrics recorder and helpers
//! └── config.rs     # statline.json persistence
//! ```
//!
//! Everything long-lived (cache, health, statistics, limiter) is owned by the
//! caller and injected into [`sync::SyncOrchestrator`] as `Arc`s.

#![allow(
    clippy::significant_drop_tightening,
    reason = "Mutex guards in async code require careful lifetime management"
)]
#![allow(clippy::map_err_ignore, reason = "Error context is provided in the replacement message")]
#![allow(
    clippy::derive_partial_eq_without_eq,
    reason = "Some types intentionally don't implement Eq"
)]
// Test-only lints: allow panic!, println!, etc. in test code
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::print_stdout,
        clippy::float_cmp,
        clippy::unwrap_used,
        clippy::needless_collect,
        clippy::assertions_on_result_states
    )
)]

pub mod cache;
pub mod config;
pub mod correction;
pub mod health;
pub mod prometheus;
pub mod rate_limit;
pub mod registry;
pub mod sync;
pub mod upstream;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use cache::{CachedSnapshot, DataCache, FileDataCache, InMemoryDataCache};
pub use correction::{ErrorCorrectionEngine, StatisticsStore};
pub use health::HealthMonitor;
pub use rate_limit::RateLimiter;
pub use registry::EndpointRegistry;
pub use sync::{LeagueSyncTask, SyncOrchestrator};
pub use upstream::{FallbackFetcher, HttpSourceClient, SourceClient};
pub use validation::ValidationEngine;
