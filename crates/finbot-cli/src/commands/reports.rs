//! Focused report commands: summary, anomalies, forecast

use std::path::Path;

use anyhow::{Context, Result};
use finbot_core::advisor::format_currency;
use finbot_core::{
    calculate_risk_score, category_breakdown, category_trend, monthly_summary,
    predict_next_month, summarize_anomalies, train_spending_predictor, AnalysisConfig,
    AnomalyDetector, AnomalySummary, CategorySpending, CategoryTrend, Forecast, ForecastMetrics,
    MonthlySummary,
};
use serde::Serialize;

use super::{load_csv, print_json, print_section, truncate};

#[derive(Serialize)]
struct SummaryOutput {
    summary: Vec<MonthlySummary>,
    breakdown: Vec<CategorySpending>,
    risk_score: f64,
}

pub fn cmd_summary(csv: &Path, json: bool) -> Result<()> {
    let transactions = load_csv(csv)?;
    let summary = monthly_summary(&transactions);
    let breakdown = category_breakdown(&transactions);
    let risk_score = calculate_risk_score(&transactions, &summary);

    if json {
        return print_json(&SummaryOutput {
            summary,
            breakdown,
            risk_score,
        });
    }

    print_section("Monthly Summary");
    print_summary(&summary);
    println!();
    println!("  Financial Risk Score: {}/100", risk_score);
    println!();
    print_breakdown(&breakdown);
    Ok(())
}

pub fn cmd_anomalies(csv: &Path, config: &AnalysisConfig, json: bool) -> Result<()> {
    let transactions = load_csv(csv)?;
    let (tagged, _model) = AnomalyDetector::from_config(config)
        .detect(&transactions)
        .context("Anomaly detection failed")?;
    let anomalies = summarize_anomalies(&tagged);

    if json {
        return print_json(&anomalies);
    }

    print_section("Anomaly Detection (Isolation Forest)");
    print_anomalies(&anomalies);
    Ok(())
}

#[derive(Serialize)]
struct ForecastOutput {
    metrics: ForecastMetrics,
    forecast: Forecast,
    category_trend: CategoryTrend,
}

pub fn cmd_forecast(csv: &Path, config: &AnalysisConfig, json: bool) -> Result<()> {
    let transactions = load_csv(csv)?;
    let summary = monthly_summary(&transactions);
    let (model, metrics) =
        train_spending_predictor(&summary).context("Cannot forecast without monthly data")?;
    let forecast = predict_next_month(&model, &summary, config.confidence_pct);
    let trend = category_trend(&transactions);

    if json {
        return print_json(&ForecastOutput {
            metrics,
            forecast,
            category_trend: trend,
        });
    }

    print_section("Next Month's Spending");
    print_forecast(&metrics, &forecast);
    println!();
    print_category_changes(&trend);
    Ok(())
}

pub fn print_summary(summary: &[MonthlySummary]) {
    println!(
        "  {:8} │ {:>12} │ {:>12} │ {:>12} │ {:>7}",
        "Month", "Income", "Expenses", "Net", "Savings"
    );
    println!("  ─────────┼──────────────┼──────────────┼──────────────┼────────");
    for m in summary {
        println!(
            "  {:8} │ {:>12.2} │ {:>12.2} │ {:>12.2} │ {:>6.1}%",
            m.month.to_string(),
            m.total_income,
            m.total_expenses,
            m.net_savings,
            m.savings_ratio * 100.0
        );
    }
}

pub fn print_breakdown(breakdown: &[CategorySpending]) {
    println!("  Category Spending Breakdown (expenses only):");
    if breakdown.is_empty() {
        println!("    No expenses found.");
        return;
    }
    for cat in breakdown {
        println!(
            "    {:20} {:>12.2} {:>6.2}%",
            cat.category.as_str(),
            cat.total_spent,
            cat.pct_of_spending
        );
    }
}

pub fn print_anomalies(anomalies: &[AnomalySummary]) {
    if anomalies.is_empty() {
        println!("  ✔ No anomalies detected.");
        return;
    }

    println!("  ⚠️  {} anomalous transaction(s) flagged:", anomalies.len());
    println!();
    println!(
        "  {:10} │ {:30} │ {:>10} │ {:16} │ {:>7}",
        "Date", "Description", "Amount", "Category", "Score"
    );
    println!("  ───────────┼────────────────────────────────┼────────────┼──────────────────┼────────");
    for a in anomalies {
        println!(
            "  {:10} │ {:30} │ {:>10.2} │ {:16} │ {:>7.4}",
            a.date.to_string(),
            truncate(&a.description, 30),
            a.amount,
            a.category.as_str(),
            a.anomaly_score
        );
    }
}

pub fn print_forecast(metrics: &ForecastMetrics, forecast: &Forecast) {
    println!(
        "  Model Performance  : MAE={} | R²={}",
        format_currency(metrics.mae),
        metrics.r2
    );
    println!(
        "  Spending Trend     : {} {}",
        forecast.trend.arrow(),
        forecast.trend
    );
    println!(
        "  Next Month Forecast: {} ({} – {})",
        format_currency(forecast.predicted_spending),
        format_currency(forecast.lower_bound),
        format_currency(forecast.upper_bound)
    );
}

/// First-to-last month change per category, smallest change first
pub fn print_category_changes(trend: &CategoryTrend) {
    println!("  Category Trend (First → Last Month % Change):");

    let Some(changes) = &trend.change_pct else {
        println!("    Need at least two months of expenses.");
        return;
    };

    let mut defined: Vec<(&str, f64)> = trend
        .categories
        .iter()
        .zip(changes)
        .filter_map(|(cat, pct)| pct.map(|p| (cat.as_str(), p)))
        .collect();
    defined.sort_by(|a, b| a.1.total_cmp(&b.1));

    for (name, pct) in defined {
        let arrow = if pct > 0.0 { "↑" } else { "↓" };
        println!("    {:<22} {} {:+.1}%", name, arrow, pct);
    }
}
