//! Analysis configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/finbot/config/analysis.toml)
//! 2. Embedded defaults (compiled into binary)
//!
//! Missing keys in an override fall back to the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analysis.toml");

/// Tunables for one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Expected anomaly fraction, in (0, 0.5)
    pub contamination: f64,
    pub random_seed: u64,
    pub n_estimators: usize,
    pub max_samples: usize,
    pub min_debit_transactions: usize,
    /// Tree-building threads (0 = all cores)
    pub n_jobs: usize,
    /// Forecast band as a fraction of the prediction
    pub confidence_pct: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            contamination: 0.10,
            random_seed: 42,
            n_estimators: 200,
            max_samples: 256,
            min_debit_transactions: 10,
            n_jobs: 1,
            confidence_pct: 0.15,
        }
    }
}

impl AnalysisConfig {
    /// Load from `path` if it exists, else the data-dir override, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) if path.exists() => read_config(path)?,
            Some(path) => {
                debug!("Config {} not found, using defaults", path.display());
                DEFAULT_CONFIG.to_string()
            }
            None => match default_config_path() {
                Some(default_path) if default_path.exists() => read_config(&default_path)?,
                _ => DEFAULT_CONFIG.to_string(),
            },
        };

        Self::from_toml(&content)
    }

    /// Parse a TOML document on top of the defaults and validate it
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::default();

        if let Some(anomaly) = raw.anomaly {
            if let Some(contamination) = anomaly.contamination {
                config.contamination = contamination;
            }
            if let Some(seed) = anomaly.random_seed {
                config.random_seed = seed;
            }
            if let Some(n) = anomaly.n_estimators {
                config.n_estimators = n;
            }
            if let Some(n) = anomaly.max_samples {
                config.max_samples = n;
            }
            if let Some(n) = anomaly.min_debit_transactions {
                config.min_debit_transactions = n;
            }
            if let Some(n) = anomaly.n_jobs {
                config.n_jobs = n;
            }
        }

        if let Some(forecast) = raw.forecast {
            if let Some(pct) = forecast.confidence_pct {
                config.confidence_pct = pct;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Replace the contamination rate, re-validating
    pub fn with_contamination(mut self, contamination: f64) -> Result<Self> {
        self.contamination = contamination;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.contamination > 0.0 && self.contamination < 0.5) {
            return Err(Error::Config(format!(
                "contamination must be between 0 and 0.5 (exclusive), got {}",
                self.contamination
            )));
        }
        if self.n_estimators == 0 {
            return Err(Error::Config("n_estimators must be at least 1".into()));
        }
        if self.max_samples == 0 {
            return Err(Error::Config("max_samples must be at least 1".into()));
        }
        if !(self.confidence_pct >= 0.0) {
            return Err(Error::Config(format!(
                "confidence_pct must be non-negative, got {}",
                self.confidence_pct
            )));
        }
        Ok(())
    }
}

/// Default override location in the platform data dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("finbot").join("config").join("analysis.toml"))
}

fn read_config(path: &Path) -> Result<String> {
    debug!("Loading analysis config from {}", path.display());
    fs::read_to_string(path).map_err(|e| Error::Config(format!("Failed to read config: {}", e)))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    anomaly: Option<RawAnomaly>,
    forecast: Option<RawForecast>,
}

#[derive(Debug, Deserialize)]
struct RawAnomaly {
    contamination: Option<f64>,
    random_seed: Option<u64>,
    n_estimators: Option<usize>,
    max_samples: Option<usize>,
    min_debit_transactions: Option<usize>,
    n_jobs: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    confidence_pct: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_defaults_match_default_impl() {
        let config = AnalysisConfig::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = AnalysisConfig::from_toml(
            r#"
            [anomaly]
            contamination = 0.05
            n_jobs = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.contamination, 0.05);
        assert_eq!(config.n_jobs, 4);
        assert_eq!(config.n_estimators, 200);
        assert_eq!(config.confidence_pct, 0.15);
    }

    #[test]
    fn test_empty_document_is_defaults() {
        assert_eq!(
            AnalysisConfig::from_toml("").unwrap(),
            AnalysisConfig::default()
        );
    }

    #[test]
    fn test_contamination_out_of_range() {
        for bad in ["0.0", "0.5", "0.75", "-0.1"] {
            let doc = format!("[anomaly]\ncontamination = {}\n", bad);
            assert!(
                matches!(AnalysisConfig::from_toml(&doc), Err(Error::Config(_))),
                "contamination {} should be rejected",
                bad
            );
        }
        assert!(AnalysisConfig::default().with_contamination(0.5).is_err());
        assert!(AnalysisConfig::default().with_contamination(0.2).is_ok());
    }

    #[test]
    fn test_invalid_toml() {
        let result = AnalysisConfig::from_toml("[anomaly\ncontamination = ");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[forecast]\nconfidence_pct = 0.25").unwrap();

        let config = AnalysisConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.confidence_pct, 0.25);
        assert_eq!(config.contamination, 0.10);
    }

    #[test]
    fn test_load_missing_path_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig::load(Some(dir.path().join("nope.toml").as_path())).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }
}
