//! CLI command tests

use std::io::Write;
use std::path::PathBuf;

use finbot_core::pipeline;
use finbot_core::test_utils::{anomaly_dataset, three_month_dataset};
use finbot_core::{AnalysisConfig, EnrichedTransaction};
use tempfile::{NamedTempFile, TempDir};

use crate::commands::{self, format_report, truncate};

/// Write transactions out as a CSV file the loader accepts
fn write_csv(transactions: &[EnrichedTransaction]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,description,amount,type").unwrap();
    for tx in transactions {
        writeln!(
            file,
            "{},{},{},{}",
            tx.date, tx.description, tx.amount, tx.tx_type
        )
        .unwrap();
    }
    file.flush().unwrap();
    file
}

// ========== Config Tests ==========

#[test]
fn test_load_config_defaults() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.toml");
    let config = commands::load_config(Some(missing.as_path()), None).unwrap();
    assert_eq!(config, AnalysisConfig::default());
}

#[test]
fn test_load_config_file_and_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("analysis.toml");
    std::fs::write(
        &path,
        "[anomaly]\ncontamination = 0.2\nn_estimators = 25\n\n[forecast]\nconfidence_pct = 0.1\n",
    )
    .unwrap();

    let config = commands::load_config(Some(path.as_path()), None).unwrap();
    assert_eq!(config.contamination, 0.2);
    assert_eq!(config.n_estimators, 25);
    assert_eq!(config.confidence_pct, 0.1);

    let config = commands::load_config(Some(path.as_path()), Some(0.05)).unwrap();
    assert_eq!(config.contamination, 0.05);
    assert_eq!(config.n_estimators, 25);
}

#[test]
fn test_load_config_rejects_bad_contamination() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.toml");
    for rate in [0.0, 0.5, 0.75, -0.1] {
        let result = commands::load_config(Some(missing.as_path()), Some(rate));
        assert!(result.is_err(), "{} should be rejected", rate);
    }
}

#[test]
fn test_load_csv() {
    let file = write_csv(&three_month_dataset());
    let txns = commands::load_csv(file.path()).unwrap();
    assert_eq!(txns.len(), 12);

    let err = commands::load_csv(&PathBuf::from("/nonexistent/transactions.csv")).unwrap_err();
    assert!(
        format!("{:#}", err).contains("Failed to load transactions from"),
        "{:#}",
        err
    );
}

// ========== Command Tests ==========

#[test]
fn test_cmd_analyze() {
    let (txns, _) = anomaly_dataset();
    let file = write_csv(&txns);
    let config = AnalysisConfig::default();

    assert!(commands::cmd_analyze(file.path(), &config, false).is_ok());
    assert!(commands::cmd_analyze(file.path(), &config, true).is_ok());
}

#[test]
fn test_cmd_analyze_missing_file() {
    let path = PathBuf::from("/nonexistent/transactions.csv");
    let result = commands::cmd_analyze(&path, &AnalysisConfig::default(), false);
    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("not found"), "{:#}", err);
}

#[test]
fn test_cmd_analyze_bad_schema() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,description,amount").unwrap();
    writeln!(file, "2024-01-01,Kroger,-10").unwrap();
    file.flush().unwrap();

    let err = commands::cmd_analyze(file.path(), &AnalysisConfig::default(), false).unwrap_err();
    assert!(format!("{:#}", err).contains("type"), "{:#}", err);
}

#[test]
fn test_cmd_summary() {
    let file = write_csv(&three_month_dataset());
    assert!(commands::cmd_summary(file.path(), false).is_ok());
    assert!(commands::cmd_summary(file.path(), true).is_ok());
}

#[test]
fn test_cmd_anomalies() {
    let config = AnalysisConfig::default();

    let (txns, _) = anomaly_dataset();
    let file = write_csv(&txns);
    assert!(commands::cmd_anomalies(file.path(), &config, false).is_ok());

    // Too few debits is a warning, not an error
    let file = write_csv(&three_month_dataset());
    assert!(commands::cmd_anomalies(file.path(), &config, true).is_ok());
}

#[test]
fn test_cmd_forecast() {
    let file = write_csv(&three_month_dataset());
    let config = AnalysisConfig::default();
    assert!(commands::cmd_forecast(file.path(), &config, false).is_ok());
    assert!(commands::cmd_forecast(file.path(), &config, true).is_ok());
}

#[test]
fn test_cmd_forecast_empty_csv() {
    let file = write_csv(&[]);
    let result = commands::cmd_forecast(file.path(), &AnalysisConfig::default(), false);
    assert!(result.is_err());
}

#[test]
fn test_cmd_categorize() {
    assert!(commands::cmd_categorize("Trader Joe's", false).is_ok());
    assert!(commands::cmd_categorize("Zelle to Alex", true).is_ok());
}

// ========== Formatting Tests ==========

#[test]
fn test_format_report() {
    let report = pipeline::run_transactions(three_month_dataset(), &AnalysisConfig::default())
        .unwrap()
        .report;
    let text = format_report(&report);

    assert!(text.contains("Avg Savings Ratio     : 26.7%"), "{}", text);
    assert!(text.contains("Top Expense Category  : Housing (54."), "{}", text);
    assert!(text.contains("Spending Trend        : ↑ Increasing"));
    assert!(text.contains("Next Month Forecast   : $2,600.00"));
    assert!(text.contains("[1] 🟢 GOOD  |  Savings"));
    assert!(text.contains("[6] 💡 TIP  |  Debt & Investments"));
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("Kroger", 10), "Kroger");
    assert_eq!(truncate("Luxury Jewelry Boutique", 10), "Luxury ...");
    assert_eq!(truncate("Café Olé Olé", 8), "Café ...");
}
