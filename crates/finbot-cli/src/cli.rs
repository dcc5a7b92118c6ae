//! CLI argument definitions using clap
//!
//! The command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Finbot - Analyze spending, flag anomalies, forecast next month
#[derive(Parser)]
#[command(name = "finbot")]
#[command(about = "Personal finance analyzer and advisory bot", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Transactions CSV (columns: date, description, amount, type)
    #[arg(long, default_value = "transactions.csv", global = true)]
    pub csv: PathBuf,

    /// Analysis config TOML (defaults to the data-dir override, then built-ins)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Expected fraction of anomalous debits, between 0 and 0.5 (exclusive)
    #[arg(long, global = true)]
    pub contamination: Option<f64>,

    /// Print structured JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline and print the advisory report
    Analyze,

    /// Monthly income/expense summary, category breakdown and risk score
    Summary,

    /// List anomalous debit transactions
    Anomalies,

    /// Forecast next month's spending and show category trends
    Forecast,

    /// Show which category a description would be assigned
    Categorize {
        /// Transaction description
        description: String,
    },
}
