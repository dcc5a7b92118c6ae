//! Rule-based financial advice
//!
//! Turns the structured analytics outputs into an ordered list of advice
//! items. Rules are evaluated in a fixed order: savings, risk, top category,
//! anomalies, forecast, then two general tips that are always included.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{
    AnomalySummary, Category, CategorySpending, Forecast, MonthlySummary, Trend,
};
use crate::stats::{mean, round_to};

/// Severity of an advice item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceLevel {
    Critical,
    Warning,
    Good,
    Tip,
}

impl AdviceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdviceLevel::Critical => "critical",
            AdviceLevel::Warning => "warning",
            AdviceLevel::Good => "good",
            AdviceLevel::Tip => "tip",
        }
    }

    /// Console label
    pub fn label(&self) -> &'static str {
        match self {
            AdviceLevel::Critical => "🔴 CRITICAL",
            AdviceLevel::Warning => "🟡 WARNING",
            AdviceLevel::Good => "🟢 GOOD",
            AdviceLevel::Tip => "💡 TIP",
        }
    }
}

impl fmt::Display for AdviceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One piece of advice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceItem {
    pub level: AdviceLevel,
    /// What the advice is about ("Savings", "Risk", a category name, ...)
    pub topic: String,
    pub message: String,
    pub action: String,
}

impl AdviceItem {
    fn new(
        level: AdviceLevel,
        topic: impl Into<String>,
        message: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            level,
            topic: topic.into(),
            message: message.into(),
            action: action.into(),
        }
    }
}

/// Headline metrics plus the generated advice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialReport {
    /// Mean monthly savings ratio, 4 decimals
    pub savings_ratio: f64,
    pub risk_score: f64,
    pub predicted_spending: f64,
    pub trend: Trend,
    pub advice_items: Vec<AdviceItem>,
    pub anomaly_count: usize,
    /// Largest debit category; `None` when there are no debits
    pub top_category: Option<Category>,
    pub top_category_pct: f64,
}

impl FinancialReport {
    pub fn top_category_name(&self) -> &'static str {
        self.top_category.map_or("N/A", |c| c.as_str())
    }
}

/// `$1,234.56` style formatting; negatives keep a leading minus
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Build the advisory report from the pipeline outputs.
///
/// `anomalies` must be ordered most anomalous first, as returned by
/// `summarize_anomalies`.
pub fn generate_advice(
    summary: &[MonthlySummary],
    breakdown: &[CategorySpending],
    anomalies: &[AnomalySummary],
    forecast: &Forecast,
    risk_score: f64,
) -> FinancialReport {
    let ratios: Vec<f64> = summary.iter().map(|m| m.savings_ratio).collect();
    let net: Vec<f64> = summary.iter().map(|m| m.net_savings).collect();
    let expenses: Vec<f64> = summary.iter().map(|m| m.total_expenses).collect();

    let avg_ratio = mean(&ratios);
    let avg_net = mean(&net);
    let avg_expenses = mean(&expenses);

    let top = breakdown.first();
    let top_category = top.map(|t| t.category);
    let top_pct = top.map_or(0.0, |t| t.pct_of_spending);

    let mut advice = vec![
        savings_advice(avg_ratio, avg_net),
        risk_advice(risk_score),
        category_advice(top_category, top_pct),
    ];
    if let Some(item) = anomaly_advice(anomalies) {
        advice.push(item);
    }
    advice.push(forecast_advice(forecast));

    advice.push(AdviceItem::new(
        AdviceLevel::Tip,
        "Emergency Fund",
        "Keep 3 to 6 months of expenses in a liquid emergency fund.",
        format!(
            "Target emergency fund size: {}–{} based on your average monthly expenses.",
            format_currency(avg_expenses * 3.0),
            format_currency(avg_expenses * 6.0)
        ),
    ));
    advice.push(AdviceItem::new(
        AdviceLevel::Tip,
        "Debt & Investments",
        "Pay down high-interest debt (credit cards above 15% APR) before investing.",
        "Use the avalanche method: pay minimums on every debt and put extra money \
         toward the highest APR first.",
    ));

    FinancialReport {
        savings_ratio: round_to(avg_ratio, 4),
        risk_score,
        predicted_spending: forecast.predicted_spending,
        trend: forecast.trend,
        advice_items: advice,
        anomaly_count: anomalies.len(),
        top_category,
        top_category_pct: top_pct,
    }
}

fn savings_advice(avg_ratio: f64, avg_net: f64) -> AdviceItem {
    let pct = avg_ratio * 100.0;
    if avg_ratio < 0.0 {
        AdviceItem::new(
            AdviceLevel::Critical,
            "Savings",
            format!(
                "You are spending more than you earn. Average deficit: {}/month.",
                format_currency(avg_net.abs())
            ),
            "Cut non-essential expenses now. Review subscriptions, dining and \
             entertainment spending.",
        )
    } else if avg_ratio < 0.10 {
        AdviceItem::new(
            AdviceLevel::Warning,
            "Savings",
            format!(
                "Low savings rate of {:.1}%. Aim to save at least 20% of income.",
                pct
            ),
            "Automate a savings transfer on payday and try a 50/30/20 budget \
             (needs/wants/savings).",
        )
    } else if avg_ratio < 0.20 {
        AdviceItem::new(
            AdviceLevel::Warning,
            "Savings",
            format!(
                "Savings rate of {:.1}% is below the recommended 20%.",
                pct
            ),
            "Look for quick wins: cancel unused subscriptions, cook at home more \
             often, compare insurance premiums.",
        )
    } else {
        AdviceItem::new(
            AdviceLevel::Good,
            "Savings",
            format!(
                "Strong savings rate of {:.1}%. You save about {}/month on average.",
                pct,
                format_currency(avg_net)
            ),
            "Consider investing the surplus in an index fund or raising retirement \
             contributions.",
        )
    }
}

fn risk_advice(risk_score: f64) -> AdviceItem {
    if risk_score >= 70.0 {
        AdviceItem::new(
            AdviceLevel::Critical,
            "Risk",
            format!(
                "High financial risk score: {}/100. Your finances show signs of instability.",
                risk_score
            ),
            "Build a 3 to 6 month emergency fund and postpone large discretionary purchases.",
        )
    } else if risk_score >= 40.0 {
        AdviceItem::new(
            AdviceLevel::Warning,
            "Risk",
            format!(
                "Moderate risk score: {}/100. Some months show irregular spending.",
                risk_score
            ),
            "Set a monthly budget and track spending weekly to smooth out volatility.",
        )
    } else {
        AdviceItem::new(
            AdviceLevel::Good,
            "Risk",
            format!(
                "Low risk score: {}/100. Your spending is consistent and manageable.",
                risk_score
            ),
            "Keep it up, and review your investments periodically.",
        )
    }
}

fn category_advice(top_category: Option<Category>, top_pct: f64) -> AdviceItem {
    match top_category {
        Some(Category::Housing) if top_pct > 35.0 => AdviceItem::new(
            AdviceLevel::Warning,
            "Housing",
            format!(
                "Housing takes {:.1}% of your spending, above the usual 30% guideline.",
                top_pct
            ),
            "Consider refinancing, a roommate, or a cheaper place if rent is high \
             relative to income.",
        ),
        Some(Category::Dining) if top_pct > 15.0 => AdviceItem::new(
            AdviceLevel::Warning,
            "Dining",
            format!("Dining out accounts for {:.1}% of your expenses.", top_pct),
            "Meal prep a few days a week and keep restaurant visits for weekends.",
        ),
        Some(Category::Shopping) if top_pct > 20.0 => AdviceItem::new(
            AdviceLevel::Warning,
            "Shopping",
            format!("Discretionary shopping is {:.1}% of spending.", top_pct),
            "Wait 48 hours before any non-essential purchase and unsubscribe from \
             marketing emails.",
        ),
        _ => {
            let name = top_category.map_or("N/A", |c| c.as_str());
            AdviceItem::new(
                AdviceLevel::Tip,
                name,
                format!(
                    "Your largest expense category is '{}' at {:.1}% of total spending.",
                    name, top_pct
                ),
                format!(
                    "Review {} spending regularly to keep it in line with your goals.",
                    name
                ),
            )
        }
    }
}

fn anomaly_advice(anomalies: &[AnomalySummary]) -> Option<AdviceItem> {
    let most_anomalous = anomalies.first()?;
    let total: f64 = anomalies.iter().map(|a| a.amount.abs()).sum();

    Some(AdviceItem::new(
        AdviceLevel::Warning,
        "Anomalies",
        format!(
            "Detected {} unusual transaction(s) totaling {}. Most unusual: '{}' ({}).",
            anomalies.len(),
            format_currency(total),
            most_anomalous.description,
            format_currency(most_anomalous.amount.abs())
        ),
        "Check these for errors, fraud or one-time costs, and set bank alerts for \
         transactions above your usual range.",
    ))
}

fn forecast_advice(forecast: &Forecast) -> AdviceItem {
    let range = format!(
        "Predicted next month: {} (range: {}–{}).",
        format_currency(forecast.predicted_spending),
        format_currency(forecast.lower_bound),
        format_currency(forecast.upper_bound)
    );

    match forecast.trend {
        Trend::Increasing => AdviceItem::new(
            AdviceLevel::Warning,
            "Forecast",
            format!("Spending trend is increasing. {}", range),
            "Set a monthly spending cap and find the categories driving the increase.",
        ),
        Trend::Decreasing => AdviceItem::new(
            AdviceLevel::Good,
            "Forecast",
            format!("Spending trend is decreasing. {}", range),
            "Redirect the difference to investments or faster debt repayment.",
        ),
        Trend::Stable => AdviceItem::new(
            AdviceLevel::Tip,
            "Forecast",
            format!("Spending is stable. {}", range),
            "Look for ways to reduce fixed expenses and grow savings.",
        ),
    }
}
