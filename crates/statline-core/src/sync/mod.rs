//! Cycle orchestration.
//!
//! ```text
//! SyncOrchestrator::run
//!   ├── JoinSet: one LeagueSyncTask per league
//!   │     Pending → Fetching → Validating → Correcting → Cached → Done
//!   ├── deadline: pending tasks aborted, marked Failed{Timeout}
//!   └── SyncReport → metrics, last_sync, statistics refresh
//! ```

mod orchestrator;
mod report;
mod task;

#[cfg(test)]
mod tests;

pub use orchestrator::{OrchestratorParts, SyncOrchestrator};
pub use report::{build_report, summarize};
pub use task::{LeagueSyncTask, SyncStage, TaskContext};
