//! Finbot Core Library
//!
//! Analytics pipeline for a single batch of personal transactions:
//! - CSV loading and keyword categorization
//! - Monthly summaries, category breakdowns and a composite risk score
//! - Isolation-forest anomaly detection over debit transactions
//! - Linear spending forecast with a confidence band
//! - Rule-based advisory report

pub mod advisor;
pub mod analytics;
pub mod categorize;
pub mod config;
pub mod detect;
pub mod error;
pub mod forecast;
pub mod import;
pub mod models;
pub mod pipeline;
pub mod risk;
pub mod stats;

/// Synthetic transaction builders for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{generate_advice, AdviceItem, AdviceLevel, FinancialReport};
pub use analytics::{category_breakdown, monthly_summary};
pub use categorize::{categorize, Categorizer};
pub use config::AnalysisConfig;
pub use detect::{detect_anomalies, summarize_anomalies, AnomalyDetector, IsolationForest};
pub use error::{Error, Result};
pub use forecast::{category_trend, predict_next_month, train_spending_predictor, LinearModel};
pub use import::{load_transactions, load_transactions_from_reader};
pub use models::{
    AnomalySummary, Category, CategorySpending, CategoryTrend, EnrichedTransaction, Forecast,
    ForecastMetrics, MonthlySummary, ScoredTransaction, Trend, YearMonth,
};
pub use pipeline::PipelineReport;
pub use risk::calculate_risk_score;
