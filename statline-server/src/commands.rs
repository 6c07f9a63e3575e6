use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};

use statline_core::config as core_config;
use statline_core::EndpointRegistry;
use statline_types::{SyncReport, SyncStatus};

use crate::cli::ConfigCommands;
use crate::config_commands;
use crate::state::build_orchestrator;

pub async fn handle_sync(json: bool, leagues: Vec<String>) -> Result<()> {
    let mut config = core_config::load_config()?;
    if !leagues.is_empty() {
        config.enabled_leagues = leagues;
    }
    let data_dir = core_config::get_data_dir()?;
    let orchestrator = build_orchestrator(&config, &data_dir)?;
    if orchestrator.registry().is_empty() {
        anyhow::bail!("No leagues selected; check enabled_leagues or --leagues");
    }

    let report = orchestrator.run().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.is_total_outage() {
        anyhow::bail!("Every league failed to sync");
    }
    Ok(())
}

fn status_cell(status: SyncStatus) -> Cell {
    match status {
        SyncStatus::Success => Cell::new("Success").fg(Color::Green),
        SyncStatus::PartialSuccess => Cell::new("Partial").fg(Color::Yellow),
        SyncStatus::Failed => Cell::new("Failed").fg(Color::Red),
    }
}

fn print_report(report: &SyncReport) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "League",
        "Status",
        "Source",
        "Records",
        "Corrections",
        "Rejected",
        "Confidence",
        "Latency",
    ]);

    for (league_id, result) in &report.per_league {
        table.add_row(vec![
            Cell::new(league_id),
            status_cell(result.status),
            Cell::new(result.source_used.map_or("-", |t| t.as_str())),
            Cell::new(result.records.len()),
            Cell::new(result.correction_count()),
            Cell::new(result.rejected_count),
            Cell::new(format!("{:.2}", result.confidence_score)),
            Cell::new(format!("{}ms", result.latency_ms)),
        ]);
    }

    println!("{table}");

    for (league_id, result) in &report.per_league {
        if let Some(error) = &result.error {
            println!("{} {}: {}", "✗".red(), league_id.bold(), error);
        }
        for warning in &result.warnings {
            println!("{} {}: {}", "!".yellow(), league_id, warning);
        }
    }

    println!(
        "\n{} usable ({} partial), {} failed in {}ms, data quality {:.3}",
        report.success_count.to_string().green(),
        report.partial_count,
        report.failure_count.to_string().red(),
        report.total_duration_ms,
        report.summary.data_quality
    );
}

pub fn handle_leagues(json: bool) -> Result<()> {
    let config = core_config::load_config()?;
    let registry = EndpointRegistry::from_config(&config);

    if json {
        let leagues: Vec<_> = registry.leagues().iter().map(|l| l.as_ref()).collect();
        println!("{}", serde_json::to_string_pretty(&leagues)?);
        return Ok(());
    }

    if registry.is_empty() {
        println!("{}", "No leagues enabled.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["League", "Name", "Tiers", "Feeds", "Primary source"]);

    for league in registry.leagues() {
        let feeds: Vec<&str> = league.feeds.iter().map(|f| f.path.as_str()).collect();
        let primary = league.tiers.first().map_or("-", |t| t.base_url.as_str());
        table.add_row(vec![
            Cell::new(&league.league_id),
            Cell::new(&league.display_name),
            Cell::new(league.tiers.len()),
            Cell::new(feeds.join(", ")),
            Cell::new(primary),
        ]);
    }

    println!("{table}");
    println!("\n{} leagues configured", registry.len());
    Ok(())
}

pub fn handle_config_command(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Show { json } => config_commands::show_config(json),
        ConfigCommands::Get { key } => config_commands::get_config_value(&key),
        ConfigCommands::Set { key, value } => config_commands::set_config_value(&key, &value),
        ConfigCommands::Path => config_commands::show_config_path(),
    }
}
