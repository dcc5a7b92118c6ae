//! End-to-end analysis driver
//!
//! Load → detect anomalies → monthly summary, category breakdown and risk
//! score → forecast and category trend → advice.

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::advisor::{generate_advice, FinancialReport};
use crate::analytics::{category_breakdown, monthly_summary};
use crate::config::AnalysisConfig;
use crate::detect::{summarize_anomalies, AnomalyDetector};
use crate::error::{Error, Result};
use crate::forecast::{category_trend, predict_next_month, train_spending_predictor};
use crate::import::load_transactions;
use crate::models::{
    AnomalySummary, Category, CategorySpending, CategoryTrend, EnrichedTransaction, Forecast,
    ForecastMetrics, MonthlySummary, ScoredTransaction,
};
use crate::risk::calculate_risk_score;

/// Every structured output of one run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Input transactions in load order, tagged by the detector
    pub transactions: Vec<ScoredTransaction>,
    pub summary: Vec<MonthlySummary>,
    pub breakdown: Vec<CategorySpending>,
    /// Flagged debits, most anomalous first
    pub anomalies: Vec<AnomalySummary>,
    pub risk_score: f64,
    pub metrics: ForecastMetrics,
    pub forecast: Forecast,
    pub category_trend: CategoryTrend,
    pub report: FinancialReport,
}

impl PipelineReport {
    /// First and last transaction dates
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.transactions.iter().map(|t| t.transaction.date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// Transactions per category, most frequent first (ties by name)
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        let mut counts: Vec<(Category, usize)> = Vec::new();
        for tx in &self.transactions {
            match counts.iter_mut().find(|(c, _)| *c == tx.transaction.category) {
                Some((_, n)) => *n += 1,
                None => counts.push((tx.transaction.category, 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
        counts
    }
}

/// Load a CSV file and run the full analysis
pub fn run(path: impl AsRef<Path>, config: &AnalysisConfig) -> Result<PipelineReport> {
    let transactions = load_transactions(path)?;
    run_transactions(transactions, config)
}

/// Run the full analysis over already-loaded transactions
pub fn run_transactions(
    transactions: Vec<EnrichedTransaction>,
    config: &AnalysisConfig,
) -> Result<PipelineReport> {
    if transactions.is_empty() {
        return Err(Error::InvalidData("no transactions to analyze".into()));
    }
    config.validate()?;

    let (tagged, _model) = AnomalyDetector::from_config(config).detect(&transactions)?;
    let anomalies = summarize_anomalies(&tagged);

    let summary = monthly_summary(&transactions);
    let breakdown = category_breakdown(&transactions);
    let risk_score = calculate_risk_score(&transactions, &summary);

    let (model, metrics) = train_spending_predictor(&summary)?;
    let forecast = predict_next_month(&model, &summary, config.confidence_pct);
    let trend = category_trend(&transactions);

    let report = generate_advice(&summary, &breakdown, &anomalies, &forecast, risk_score);

    info!(
        "Analyzed {} transactions over {} months: risk {}, {} anomalies, trend {}",
        transactions.len(),
        summary.len(),
        risk_score,
        anomalies.len(),
        forecast.trend
    );

    Ok(PipelineReport {
        transactions: tagged,
        summary,
        breakdown,
        anomalies,
        risk_score,
        metrics,
        forecast,
        category_trend: trend,
        report,
    })
}
