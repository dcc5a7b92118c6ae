//! Monthly summaries and category breakdowns

use std::collections::BTreeMap;

use crate::models::{Category, CategorySpending, EnrichedTransaction, MonthlySummary, YearMonth};
use crate::stats::round_to;

#[derive(Default)]
struct MonthTotals {
    income: f64,
    expenses: f64,
    count: usize,
}

/// Aggregate transactions into one row per month, chronologically.
///
/// Income sums non-debit amounts, expenses sum debit absolute amounts. A month
/// with no income has a savings ratio of 0.
pub fn monthly_summary(transactions: &[EnrichedTransaction]) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<YearMonth, MonthTotals> = BTreeMap::new();

    for tx in transactions {
        let totals = months.entry(tx.month).or_default();
        if tx.is_debit {
            totals.expenses += tx.abs_amount;
        } else {
            totals.income += tx.amount;
        }
        totals.count += 1;
    }

    months
        .into_iter()
        .map(|(month, totals)| {
            let net_savings = totals.income - totals.expenses;
            let savings_ratio = if totals.income != 0.0 {
                (net_savings / totals.income).clamp(-1.0, 1.0)
            } else {
                0.0
            };

            MonthlySummary {
                month,
                total_income: totals.income,
                total_expenses: totals.expenses,
                net_savings,
                savings_ratio,
                num_transactions: totals.count,
            }
        })
        .collect()
}

/// Total and percentage of debit spending per category, largest first.
///
/// Ties keep the order in which categories first appear among the debits.
pub fn category_breakdown(transactions: &[EnrichedTransaction]) -> Vec<CategorySpending> {
    let mut totals: Vec<(Category, f64)> = Vec::new();

    for tx in transactions.iter().filter(|t| t.is_debit) {
        match totals.iter_mut().find(|(c, _)| *c == tx.category) {
            Some((_, total)) => *total += tx.abs_amount,
            None => totals.push((tx.category, tx.abs_amount)),
        }
    }

    // Stable sort keeps first-seen order for equal totals
    totals.sort_by(|a, b| b.1.total_cmp(&a.1));

    let grand_total: f64 = totals.iter().map(|(_, t)| t).sum();

    totals
        .into_iter()
        .map(|(category, total_spent)| CategorySpending {
            category,
            total_spent,
            pct_of_spending: if grand_total > 0.0 {
                round_to(total_spent / grand_total * 100.0, 2)
            } else {
                0.0
            },
        })
        .collect()
}
