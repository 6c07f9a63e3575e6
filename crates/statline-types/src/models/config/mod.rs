//! Sync pipeline configuration models.

mod app;
mod rate_limit;
mod sections;

pub use app::SyncConfig;
pub use rate_limit::{parse_window, RateLimitSpec};
pub use sections::{CacheBackend, CacheConfig, CorrectionConfig, HealthConfig};
