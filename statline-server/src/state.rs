//! Application State
//!
//! Holds the orchestrator, the latest sync report and the loaded config.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use statline_core::cache::build_cache;
use statline_core::{HttpSourceClient, SyncOrchestrator};
use statline_types::{SyncConfig, SyncReport};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

pub struct AppStateInner {
    pub orchestrator: Arc<SyncOrchestrator>,
    pub config: SyncConfig,
    pub started_at: DateTime<Utc>,
    latest_report: RwLock<Option<SyncReport>>,
    /// Held for the duration of a cycle so scheduled and manual runs never overlap
    cycle_lock: Mutex<()>,
}

/// Wire the production orchestrator: reqwest transport and the configured cache backend.
pub fn build_orchestrator(config: &SyncConfig, data_dir: &Path) -> Result<SyncOrchestrator> {
    let client = HttpSourceClient::new().context("Failed to build HTTP client")?;
    let cache = build_cache(&config.cache, data_dir.join("snapshots"));
    tracing::info!("📦 Snapshot cache backend: {}", cache.backend_name());
    SyncOrchestrator::from_config(config, Arc::new(client), cache)
        .context("Invalid sync configuration")
}

impl AppState {
    pub fn new(orchestrator: SyncOrchestrator, config: SyncConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                orchestrator: Arc::new(orchestrator),
                config,
                started_at: Utc::now(),
                latest_report: RwLock::new(None),
                cycle_lock: Mutex::new(()),
            }),
        }
    }

    pub fn orchestrator(&self) -> &SyncOrchestrator {
        &self.inner.orchestrator
    }

    pub fn config(&self) -> &SyncConfig {
        &self.inner.config
    }

    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.inner.started_at).num_seconds().max(0)
    }

    pub async fn latest_report(&self) -> Option<SyncReport> {
        self.inner.latest_report.read().await.clone()
    }

    /// Run one cycle and publish its report.
    pub async fn run_cycle(&self) -> SyncReport {
        let _guard = self.inner.cycle_lock.lock().await;
        let report = self.inner.orchestrator.run().await;
        *self.inner.latest_report.write().await = Some(report.clone());
        report
    }

    pub fn is_cycle_running(&self) -> bool {
        self.inner.cycle_lock.try_lock().is_err()
    }
}
