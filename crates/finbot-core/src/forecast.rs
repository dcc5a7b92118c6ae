//! Spending forecast
//!
//! Fits an ordinary least-squares line through monthly expense totals
//! (x = month index, y = total_expenses) and projects the next month with a
//! fixed-percentage confidence band.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{
    sort_by_name, Category, CategoryTrend, CategoryTrendRow, EnrichedTransaction, Forecast,
    ForecastMetrics, MonthlySummary, Trend, YearMonth,
};
use crate::stats::{mean, round_to};

/// Slope (dollars per month) beyond which spending counts as trending
const TREND_SLOPE_THRESHOLD: f64 = 20.0;

/// Default forecast band, as a fraction of the prediction
pub const DEFAULT_CONFIDENCE_PCT: f64 = 0.15;

/// Single-feature linear model `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearModel {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearModel {
    /// Least-squares fit. With fewer than two distinct x values the slope
    /// is 0 and the intercept is the mean of y.
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.is_empty() || x.len() != y.len() {
            return Err(Error::InvalidData(format!(
                "cannot fit linear model on {} x / {} y values",
                x.len(),
                y.len()
            )));
        }

        let x_mean = mean(x);
        let y_mean = mean(y);
        let sxx: f64 = x.iter().map(|xi| (xi - x_mean).powi(2)).sum();
        let sxy: f64 = x
            .iter()
            .zip(y)
            .map(|(xi, yi)| (xi - x_mean) * (yi - y_mean))
            .sum();

        let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
        Ok(Self {
            slope,
            intercept: y_mean - slope * x_mean,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

fn prepare_time_series(summary: &[MonthlySummary]) -> (Vec<f64>, Vec<f64>) {
    let x = (0..summary.len()).map(|i| i as f64).collect();
    let y = summary.iter().map(|m| m.total_expenses).collect();
    (x, y)
}

/// Fit the spending model on monthly expenses and report in-sample metrics
pub fn train_spending_predictor(
    summary: &[MonthlySummary],
) -> Result<(LinearModel, ForecastMetrics)> {
    if summary.is_empty() {
        return Err(Error::InvalidData(
            "no monthly data to train the spending predictor".into(),
        ));
    }

    let (x, y) = prepare_time_series(summary);
    let model = LinearModel::fit(&x, &y)?;
    let y_pred: Vec<f64> = x.iter().map(|&xi| model.predict(xi)).collect();

    let mae = mean(
        &y.iter()
            .zip(&y_pred)
            .map(|(a, p)| (a - p).abs())
            .collect::<Vec<_>>(),
    );
    let r2 = if y.len() > 1 { r2_score(&y, &y_pred) } else { 0.0 };

    let metrics = ForecastMetrics {
        mae: round_to(mae, 2),
        r2: round_to(r2, 4),
        slope: round_to(model.slope, 2),
        intercept: round_to(model.intercept, 2),
    };
    debug!("Trained spending predictor: {:?}", metrics);

    Ok((model, metrics))
}

fn r2_score(y: &[f64], y_pred: &[f64]) -> f64 {
    let y_mean = mean(y);
    let ss_res: f64 = y.iter().zip(y_pred).map(|(a, p)| (a - p).powi(2)).sum();
    let ss_tot: f64 = y.iter().map(|a| (a - y_mean).powi(2)).sum();

    if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Project spending for the month after the last summary row
pub fn predict_next_month(
    model: &LinearModel,
    summary: &[MonthlySummary],
    confidence_pct: f64,
) -> Forecast {
    let next_idx = summary.len();
    let prediction = model.predict(next_idx as f64);
    let margin = prediction * confidence_pct;

    let trend = if model.slope > TREND_SLOPE_THRESHOLD {
        Trend::Increasing
    } else if model.slope < -TREND_SLOPE_THRESHOLD {
        Trend::Decreasing
    } else {
        Trend::Stable
    };

    Forecast {
        next_month_index: next_idx,
        predicted_spending: round_to(prediction, 2),
        lower_bound: round_to((prediction - margin).max(0.0), 2),
        upper_bound: round_to(prediction + margin, 2),
        trend,
    }
}

/// Monthly debit totals per category, with a first-to-last month change row
pub fn category_trend(transactions: &[EnrichedTransaction]) -> CategoryTrend {
    let mut pivot: BTreeMap<YearMonth, Vec<(Category, f64)>> = BTreeMap::new();
    let mut categories: Vec<Category> = Vec::new();

    for tx in transactions.iter().filter(|t| t.is_debit) {
        if !categories.contains(&tx.category) {
            categories.push(tx.category);
        }
        let month = pivot.entry(tx.month).or_default();
        match month.iter_mut().find(|(c, _)| *c == tx.category) {
            Some((_, total)) => *total += tx.abs_amount,
            None => month.push((tx.category, tx.abs_amount)),
        }
    }
    sort_by_name(&mut categories);

    let rows: Vec<CategoryTrendRow> = pivot
        .into_iter()
        .map(|(month, totals)| CategoryTrendRow {
            month,
            totals: categories
                .iter()
                .map(|cat| {
                    totals
                        .iter()
                        .find(|(c, _)| c == cat)
                        .map_or(0.0, |(_, t)| *t)
                })
                .collect(),
        })
        .collect();

    let change_pct = match (rows.first(), rows.last()) {
        (Some(first), Some(last)) if rows.len() >= 2 => Some(
            first
                .totals
                .iter()
                .zip(&last.totals)
                .map(|(&f, &l)| (f != 0.0).then(|| round_to((l - f) / f * 100.0, 2)))
                .collect(),
        ),
        _ => None,
    };

    CategoryTrend {
        categories,
        rows,
        change_pct,
    }
}
