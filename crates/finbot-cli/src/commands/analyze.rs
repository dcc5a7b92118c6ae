//! Full pipeline command and report rendering

use std::path::Path;

use anyhow::Result;
use finbot_core::advisor::format_currency;
use finbot_core::pipeline::{self, PipelineReport};
use finbot_core::{AnalysisConfig, FinancialReport};

use super::reports::{
    print_anomalies, print_breakdown, print_category_changes, print_forecast, print_summary,
};
use super::{load_csv, print_json, print_section};

pub fn cmd_analyze(csv: &Path, config: &AnalysisConfig, json: bool) -> Result<()> {
    let transactions = load_csv(csv)?;
    let report = pipeline::run_transactions(transactions, config)?;

    if json {
        return print_json(&report);
    }

    print_loaded(&report);

    print_section("Anomaly Detection (Isolation Forest)");
    print_anomalies(&report.anomalies);

    print_section("Monthly Summary & Risk Score");
    print_summary(&report.summary);
    println!();
    println!("  Financial Risk Score: {}/100", report.risk_score);
    println!();
    print_breakdown(&report.breakdown);

    print_section("Next Month's Spending");
    print_forecast(&report.metrics, &report.forecast);
    println!();
    print_category_changes(&report.category_trend);

    print_section("Financial Advice");
    println!("{}", format_report(&report.report));
    Ok(())
}

fn print_loaded(report: &PipelineReport) {
    print_section("Transactions");
    match report.date_range() {
        Some((first, last)) => println!(
            "  ✔ Loaded {} transactions spanning {} → {}",
            report.transactions.len(),
            first,
            last
        ),
        None => println!("  ✔ Loaded 0 transactions"),
    }

    let counts = report.category_counts();
    println!("  ✔ Categorized into {} categories:", counts.len());
    for (category, count) in counts {
        println!("       {:<20} {:>3} transactions", category.as_str(), count);
    }
}

/// Render the advisory report as console text
pub fn format_report(report: &FinancialReport) -> String {
    let sep = "=".repeat(65);
    let mut lines = vec![
        sep.clone(),
        "         🏦  FINANCIAL ADVISORY REPORT".to_string(),
        sep.clone(),
        String::new(),
        "📊  KEY METRICS".to_string(),
        "-".repeat(40),
        format!(
            "  Avg Savings Ratio     : {:.1}%",
            report.savings_ratio * 100.0
        ),
        format!("  Risk Score            : {}/100", report.risk_score),
        format!("  Anomalies Detected    : {}", report.anomaly_count),
        format!(
            "  Top Expense Category  : {} ({:.1}%)",
            report.top_category_name(),
            report.top_category_pct
        ),
        format!(
            "  Spending Trend        : {} {}",
            report.trend.arrow(),
            report.trend
        ),
        format!(
            "  Next Month Forecast   : {}",
            format_currency(report.predicted_spending)
        ),
        String::new(),
        "🧠  PERSONALIZED ADVICE".to_string(),
        "-".repeat(40),
    ];

    for (i, item) in report.advice_items.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("  [{}] {}  |  {}", i + 1, item.level.label(), item.topic));
        lines.push(format!("      {}", item.message));
        lines.push(format!("      ▶ Action: {}", item.action));
    }

    lines.push(String::new());
    lines.push(sep.clone());
    lines.push("  Consult a certified financial planner for advice tailored to".to_string());
    lines.push("  your complete financial picture.".to_string());
    lines.push(sep);

    lines.join("\n")
}
