//! Anomaly detection over debit transactions
//!
//! Each debit becomes a feature vector:
//! - `abs_amount`       : transaction magnitude
//! - `day_of_week`      : 0 = Monday .. 6 = Sunday
//! - `day_of_month`     : 1..31
//! - `is_weekend`       : 1 on Saturday/Sunday
//! - `category_encoded` : index of the category in the alphabetical list of
//!   categories present among the debits
//!
//! Features are standardized over the debit subset and scored by an isolation
//! forest. Credits are never scored. Too few debits skips detection entirely
//! with a warning instead of failing.

pub mod isolation_forest;

use chrono::Datelike;
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::models::{
    sort_by_name, AnomalySummary, Category, EnrichedTransaction, ScoredTransaction,
};
use crate::stats::{mean, population_std, round_to};

pub use isolation_forest::{ForestParams, IsolationForest};

pub const FEATURE_NAMES: [&str; 5] = [
    "abs_amount",
    "day_of_week",
    "day_of_month",
    "is_weekend",
    "category_encoded",
];

/// Per-feature standardization (zero mean, unit variance)
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    pub means: Vec<f64>,
    /// Population std per feature; 1.0 where a feature is constant
    pub scales: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(data: &[Vec<f64>]) -> Self {
        let n_features = data.first().map_or(0, |row| row.len());
        let mut means = Vec::with_capacity(n_features);
        let mut scales = Vec::with_capacity(n_features);

        for f in 0..n_features {
            let column: Vec<f64> = data.iter().map(|row| row[f]).collect();
            means.push(mean(&column));
            let std = population_std(&column);
            scales.push(if std > 0.0 { std } else { 1.0 });
        }

        Self { means, scales }
    }

    pub fn transform(&self, data: &[Vec<f64>]) -> Vec<Vec<f64>> {
        data.iter()
            .map(|row| {
                row.iter()
                    .zip(self.means.iter().zip(&self.scales))
                    .map(|(v, (m, s))| (v - m) / s)
                    .collect()
            })
            .collect()
    }
}

/// Ordinal encoding of the categories present in a set of transactions
pub fn category_codes(transactions: &[&EnrichedTransaction]) -> Vec<Category> {
    let mut categories: Vec<Category> = Vec::new();
    for tx in transactions {
        if !categories.contains(&tx.category) {
            categories.push(tx.category);
        }
    }
    sort_by_name(&mut categories);
    categories
}

/// Raw (unscaled) feature matrix, one row per transaction
pub fn build_features(transactions: &[&EnrichedTransaction]) -> Vec<Vec<f64>> {
    let codes = category_codes(transactions);

    transactions
        .iter()
        .map(|tx| {
            let day_of_week = tx.date.weekday().num_days_from_monday();
            let category_encoded = codes.iter().position(|c| *c == tx.category).unwrap_or(0);
            vec![
                tx.abs_amount,
                day_of_week as f64,
                tx.date.day() as f64,
                if day_of_week >= 5 { 1.0 } else { 0.0 },
                category_encoded as f64,
            ]
        })
        .collect()
}

/// Everything fitted during one detection run
#[derive(Debug, Clone)]
pub struct FittedDetector {
    pub scaler: StandardScaler,
    pub forest: IsolationForest,
    pub categories: Vec<Category>,
}

/// Isolation-forest detector configured for one run
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    params: ForestParams,
    min_debit_transactions: usize,
}

impl AnomalyDetector {
    pub fn new(contamination: f64, random_seed: u64) -> Self {
        Self {
            params: ForestParams {
                contamination,
                random_seed,
                ..ForestParams::default()
            },
            min_debit_transactions: 10,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            params: ForestParams {
                n_estimators: config.n_estimators,
                max_samples: config.max_samples,
                contamination: config.contamination,
                random_seed: config.random_seed,
                n_jobs: config.n_jobs,
            },
            min_debit_transactions: config.min_debit_transactions,
        }
    }

    /// Tag every transaction with `is_anomaly` / `anomaly_score`.
    ///
    /// Returns the tagged copy in input order plus the fitted model, or no
    /// model when there were too few debits to fit one.
    pub fn detect(
        &self,
        transactions: &[EnrichedTransaction],
    ) -> Result<(Vec<ScoredTransaction>, Option<FittedDetector>)> {
        let mut tagged: Vec<ScoredTransaction> = transactions
            .iter()
            .cloned()
            .map(ScoredTransaction::unscored)
            .collect();

        let debit_idx: Vec<usize> = transactions
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_debit)
            .map(|(i, _)| i)
            .collect();

        if debit_idx.len() < self.min_debit_transactions.max(1) {
            warn!(
                "Too few debit transactions ({}) for reliable anomaly detection (need {})",
                debit_idx.len(),
                self.min_debit_transactions
            );
            return Ok((tagged, None));
        }

        let debits: Vec<&EnrichedTransaction> =
            debit_idx.iter().map(|&i| &transactions[i]).collect();
        let features = build_features(&debits);
        debug!(
            "Scoring {} debits on features [{}]",
            features.len(),
            FEATURE_NAMES.join(", ")
        );
        let scaler = StandardScaler::fit(&features);
        let scaled = scaler.transform(&features);

        let forest = IsolationForest::fit(&scaled, &self.params)?;
        let decisions = forest.decision_function(&scaled);

        let mut flagged = 0;
        for (&i, decision) in debit_idx.iter().zip(decisions) {
            let is_anomaly = decision < 0.0;
            flagged += usize::from(is_anomaly);
            tagged[i].is_anomaly = is_anomaly;
            tagged[i].anomaly_score = round_to(decision, 4);
        }

        info!(
            "Flagged {} of {} debit transactions as anomalous",
            flagged,
            debit_idx.len()
        );

        Ok((
            tagged,
            Some(FittedDetector {
                scaler,
                forest,
                categories: category_codes(&debits),
            }),
        ))
    }
}

/// Run detection with default forest settings
pub fn detect_anomalies(
    transactions: &[EnrichedTransaction],
    contamination: f64,
    random_seed: u64,
) -> Result<(Vec<ScoredTransaction>, Option<FittedDetector>)> {
    AnomalyDetector::new(contamination, random_seed).detect(transactions)
}

/// Flagged transactions only, most anomalous (lowest score) first
pub fn summarize_anomalies(tagged: &[ScoredTransaction]) -> Vec<AnomalySummary> {
    let mut anomalies: Vec<AnomalySummary> = tagged
        .iter()
        .filter(|t| t.is_anomaly)
        .map(|t| AnomalySummary {
            date: t.transaction.date,
            description: t.transaction.description.clone(),
            amount: t.transaction.amount,
            category: t.transaction.category,
            anomaly_score: t.anomaly_score,
        })
        .collect();

    anomalies.sort_by(|a, b| a.anomaly_score.total_cmp(&b.anomaly_score));
    anomalies
}
