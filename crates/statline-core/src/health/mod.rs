//! Source Tier Health Monitoring
//!
//! Classifies each (league, tier) pair from the outcomes the fallback fetcher
//! reports:
//! - Rolling window of the most recent attempts per tier
//! - Degraded on elevated failure rate or mean latency
//! - Down when every tier of a league failed in one fetch
//! - Recovering on the first success after Down, Healthy after a streak
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  HealthMonitor                                               │
//! │  ├── tiers: DashMap<(league, TierRank), Mutex<TierHealth>>   │
//! │  └── config: HealthConfig                                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Health is advisory: it only influences tier ordering, never whether a tier
//! is attempted.

mod monitor;


pub use monitor::HealthMonitor;
