//! Finbot CLI - Personal finance advisor
//!
//! Usage:
//!   finbot analyze                      Full report for transactions.csv
//!   finbot --csv my.csv summary         Monthly summary, breakdown, risk
//!   finbot anomalies --contamination 0.05
//!   finbot forecast --json
//!   finbot categorize "Trader Joe's"

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Analyze => {
            let config = commands::load_config(cli.config.as_deref(), cli.contamination)?;
            commands::cmd_analyze(&cli.csv, &config, cli.json)
        }
        Commands::Summary => commands::cmd_summary(&cli.csv, cli.json),
        Commands::Anomalies => {
            let config = commands::load_config(cli.config.as_deref(), cli.contamination)?;
            commands::cmd_anomalies(&cli.csv, &config, cli.json)
        }
        Commands::Forecast => {
            let config = commands::load_config(cli.config.as_deref(), cli.contamination)?;
            commands::cmd_forecast(&cli.csv, &config, cli.json)
        }
        Commands::Categorize { description } => commands::cmd_categorize(&description, cli.json),
    }
}
