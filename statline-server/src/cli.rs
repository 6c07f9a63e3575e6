use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "statline",
    about = "statline - Multi-league sports data sync daemon",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, env = "STATLINE_PORT", default_value = "8046")]
    pub port: u16,

    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the scheduler and REST API (default if no command specified)")]
    Serve,

    #[command(about = "Run a single sync cycle and print the report")]
    Sync {
        #[arg(short, long, help = "Output the full report as JSON")]
        json: bool,

        #[arg(long, value_delimiter = ',', help = "Only sync these leagues (comma-separated)")]
        leagues: Vec<String>,
    },

    #[command(about = "List configured leagues and their source tiers")]
    Leagues {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(subcommand, about = "View and modify configuration")]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show current configuration")]
    Show {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Get a specific configuration value")]
    Get {
        #[arg(help = "Configuration key (e.g., 'cycle_interval_secs', 'correction.z_threshold')")]
        key: String,
    },

    #[command(about = "Set a configuration value")]
    Set {
        #[arg(help = "Configuration key")]
        key: String,

        #[arg(help = "New value")]
        value: String,
    },

    #[command(about = "Print the configuration file location")]
    Path,
}
