//! Composite financial risk score
//!
//! Higher score = higher risk. Three weighted components:
//! 1. Low savings ratio        (weight 40)
//! 2. Expense volatility       (weight 30)
//! 3. Large-transaction share  (weight 30)

use tracing::debug;

use crate::models::{EnrichedTransaction, MonthlySummary};
use crate::stats::{mean, median, population_std, round_to};

const SAVINGS_WEIGHT: f64 = 40.0;
const VOLATILITY_WEIGHT: f64 = 30.0;
const LARGE_TXN_WEIGHT: f64 = 30.0;

/// A debit is "large" when it exceeds this multiple of the median debit
const LARGE_TXN_MULTIPLIER: f64 = 3.0;

/// Risk score in [0, 100], rounded to 2 decimals
pub fn calculate_risk_score(
    transactions: &[EnrichedTransaction],
    summary: &[MonthlySummary],
) -> f64 {
    let savings = savings_risk(summary);
    let volatility = volatility_risk(summary);
    let large = large_transaction_risk(transactions);

    debug!(
        "Risk components: savings={:.2} volatility={:.2} large_txn={:.2}",
        savings, volatility, large
    );

    round_to(savings + volatility + large, 2).clamp(0.0, 100.0)
}

fn savings_risk(summary: &[MonthlySummary]) -> f64 {
    if summary.is_empty() {
        return 0.0;
    }
    let ratios: Vec<f64> = summary.iter().map(|m| m.savings_ratio).collect();
    (1.0 - mean(&ratios)).max(0.0) * SAVINGS_WEIGHT
}

/// Coefficient of variation of monthly expenses, capped at 1
fn volatility_risk(summary: &[MonthlySummary]) -> f64 {
    let expenses: Vec<f64> = summary.iter().map(|m| m.total_expenses).collect();
    let expense_mean = mean(&expenses);
    let cv = if expense_mean > 0.0 {
        population_std(&expenses) / expense_mean
    } else {
        0.0
    };
    cv.min(1.0) * VOLATILITY_WEIGHT
}

fn large_transaction_risk(transactions: &[EnrichedTransaction]) -> f64 {
    let debits: Vec<f64> = transactions
        .iter()
        .filter(|t| t.is_debit)
        .map(|t| t.abs_amount)
        .collect();
    if debits.is_empty() {
        return 0.0;
    }

    let threshold = median(&debits) * LARGE_TXN_MULTIPLIER;
    let large = debits.iter().filter(|&&a| a > threshold).count();
    (large as f64 / debits.len() as f64) * LARGE_TXN_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::monthly_summary;
    use crate::test_utils::{deficit_dataset, stable_saver_dataset, three_month_dataset, tx};

    fn score(txns: &[EnrichedTransaction]) -> f64 {
        calculate_risk_score(txns, &monthly_summary(txns))
    }

    #[test]
    fn test_stable_saver_is_low_risk() {
        let risk = score(&stable_saver_dataset(6));
        // Savings ratio 0.8 -> 8 points; no volatility, no large debits
        assert_eq!(risk, 8.0);
        assert!(risk < 20.0);
    }

    #[test]
    fn test_consistent_deficit_is_high_risk() {
        let risk = score(&deficit_dataset(6));
        // Ratio clamps to -1 -> 80 points
        assert_eq!(risk, 80.0);
        assert!(risk > 60.0);
    }

    #[test]
    fn test_three_month_components() {
        let txns = three_month_dataset();
        let summary = monthly_summary(&txns);

        // mean ratio = (1/3 + 0.8/3 + 0.2) / 3 = 0.2667 -> 29.33
        let savings = savings_risk(&summary);
        assert!((savings - 29.333).abs() < 0.01, "{}", savings);

        // expenses 2000/2200/2400: pop std 163.3, mean 2200
        let volatility = volatility_risk(&summary);
        assert!((volatility - 163.299_316 / 2200.0 * 30.0).abs() < 1e-4);

        // median debit 600, threshold 1800: no rent payment exceeds it
        assert_eq!(large_transaction_risk(&txns), 0.0);
    }

    #[test]
    fn test_large_transactions_counted() {
        let txns = vec![
            tx("2024-01-01", "Salary", 10000.0),
            tx("2024-01-02", "Kroger", -10.0),
            tx("2024-01-03", "Kroger", -10.0),
            tx("2024-01-04", "Kroger", -10.0),
            tx("2024-01-05", "Rent", -31.0),
        ];
        // median 10, threshold 30: one of four debits is large
        assert_eq!(large_transaction_risk(&txns), 7.5);
    }

    #[test]
    fn test_degenerate_inputs() {
        // No transactions at all
        assert_eq!(calculate_risk_score(&[], &[]), 0.0);

        // Only income: ratio 1, no expenses, no debits
        let txns = vec![tx("2024-01-01", "Salary", 1000.0)];
        assert_eq!(score(&txns), 0.0);

        // Only expenses in a single month: ratio 0 (no income), cv 0
        let txns = vec![tx("2024-01-02", "Kroger", -40.0)];
        assert_eq!(score(&txns), 40.0);
    }

    #[test]
    fn test_score_bounds() {
        let mut txns = deficit_dataset(3);
        txns.push(tx("2024-02-15", "Rent", -90000.0));
        let risk = score(&txns);
        assert!((0.0..=100.0).contains(&risk), "{}", risk);
    }
}
