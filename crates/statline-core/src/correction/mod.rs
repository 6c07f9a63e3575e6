//! Statistical error correction.
//!
//! Applied per record, in order:
//! 1. temporal consistency (out-of-order records are excluded)
//! 2. z-score outlier replacement against the cycle's statistics snapshot
//! 3. range enforcement for fields still outside their rule bounds
//! 4. imputation of missing expected fields from the entity's previous record

mod engine;
mod statistics;


pub use engine::{correct_outlier, Corrected, CorrectionSession, ErrorCorrectionEngine, SessionSummary};
pub use statistics::{LeagueStatistics, StatisticsStore};
