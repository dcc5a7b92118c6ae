//! Shared command setup and the categorize command

use std::path::Path;

use anyhow::{Context, Result};
use finbot_core::{categorize, AnalysisConfig, EnrichedTransaction};
use serde::Serialize;

use super::print_json;

/// Resolve the analysis config and apply the `--contamination` override
pub fn load_config(config_path: Option<&Path>, contamination: Option<f64>) -> Result<AnalysisConfig> {
    match config_path {
        Some(path) => tracing::info!("Using analysis config {}", path.display()),
        None => tracing::info!("Using data directory or built-in analysis config"),
    }
    let config = AnalysisConfig::load(config_path).context("Failed to load analysis config")?;

    match contamination {
        Some(rate) => {
            tracing::info!("Overriding contamination rate with {}", rate);
            config
                .with_contamination(rate)
                .context("Invalid --contamination value")
        }
        None => Ok(config),
    }
}

/// Load transactions from the CSV path with a readable error
pub fn load_csv(csv: &Path) -> Result<Vec<EnrichedTransaction>> {
    tracing::info!("Reading transactions from {}", csv.display());
    finbot_core::load_transactions(csv)
        .with_context(|| format!("Failed to load transactions from {}", csv.display()))
}

#[derive(Serialize)]
struct CategorizeOutput<'a> {
    description: &'a str,
    category: finbot_core::Category,
}

pub fn cmd_categorize(description: &str, json: bool) -> Result<()> {
    let category = categorize(description);

    if json {
        return print_json(&CategorizeOutput {
            description,
            category,
        });
    }

    println!("🏷️  \"{}\" → {}", description, category);
    Ok(())
}
