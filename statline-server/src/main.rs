//! statline Server - Headless Daemon
//!
//! A pure Rust process that:
//! - Runs one sync cycle across every enabled league on a fixed interval
//! - Provides a REST API over the latest report, snapshots and source health on /api/*
//! - Exposes Prometheus metrics on /metrics
//!
//! Access via: http://localhost:8046

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod cli;
mod commands;
mod config_commands;
mod router;
mod scheduler;
mod server_utils;
mod state;

#[cfg(test)]
mod test_helpers;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(cli.port).await,
        Commands::Sync { json, leagues } => commands::handle_sync(json, leagues).await,
        Commands::Leagues { json } => commands::handle_leagues(json),
        Commands::Config(cmd) => commands::handle_config_command(cmd),
    }
}

async fn run_server(port: u16) -> Result<()> {
    info!("🚀 statline server starting on port {}...", port);

    if let Err(e) = statline_core::prometheus::init_metrics() {
        tracing::warn!("⚠️ Prometheus recorder not installed: {}", e);
    }

    let data_dir = statline_core::config::get_data_dir()?;
    let config = statline_core::config::load_config()?;
    let orchestrator = state::build_orchestrator(&config, &data_dir)?;

    info!("📊 {} leagues enabled", orchestrator.registry().len());

    let state = AppState::new(orchestrator, config);
    let scheduler = scheduler::start(state.clone());

    let app = router::build_router(state);
    let listener = server_utils::create_listener(port).await?;

    info!("🌐 Server listening on http://{}", listener.local_addr()?);
    info!("🔌 API available at http://localhost:{}/api/", port);

    axum::serve(listener, app).with_graceful_shutdown(server_utils::shutdown_signal()).await?;

    scheduler.abort();
    info!("👋 statline server stopped");
    Ok(())
}
