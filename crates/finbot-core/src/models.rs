//! Domain models for finbot

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};

/// Spending categories assigned by keyword matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Groceries,
    Dining,
    Transport,
    Utilities,
    Entertainment,
    #[serde(rename = "Health & Fitness")]
    HealthFitness,
    Shopping,
    Housing,
    Education,
    Income,
    /// Catch-all for descriptions no keyword matches
    Miscellaneous,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groceries => "Groceries",
            Self::Dining => "Dining",
            Self::Transport => "Transport",
            Self::Utilities => "Utilities",
            Self::Entertainment => "Entertainment",
            Self::HealthFitness => "Health & Fitness",
            Self::Shopping => "Shopping",
            Self::Housing => "Housing",
            Self::Education => "Education",
            Self::Income => "Income",
            Self::Miscellaneous => "Miscellaneous",
        }
    }

    /// All categories in declaration order (catch-all last)
    pub fn all() -> &'static [Category] {
        &[
            Self::Groceries,
            Self::Dining,
            Self::Transport,
            Self::Utilities,
            Self::Entertainment,
            Self::HealthFitness,
            Self::Shopping,
            Self::Housing,
            Self::Education,
            Self::Income,
            Self::Miscellaneous,
        ]
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Category::all()
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sort categories alphabetically by display name
pub fn sort_by_name(categories: &mut [Category]) {
    categories.sort_by_key(|c| c.as_str());
}

/// Calendar month key (e.g. 2024-03), ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A loaded transaction with its derived columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedTransaction {
    pub date: NaiveDate,
    pub description: String,
    /// Positive = credit/income, negative = debit/expense
    pub amount: f64,
    /// Free-text type column from the source (informational only)
    #[serde(rename = "type")]
    pub tx_type: String,
    pub category: Category,
    pub month: YearMonth,
    pub abs_amount: f64,
    pub is_debit: bool,
}

impl EnrichedTransaction {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        tx_type: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            tx_type: tx_type.into(),
            category,
            month: YearMonth::from_date(date),
            abs_amount: amount.abs(),
            is_debit: amount < 0.0,
        }
    }
}

/// A transaction tagged by the anomaly detector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTransaction {
    #[serde(flatten)]
    pub transaction: EnrichedTransaction,
    pub is_anomaly: bool,
    /// Lower = more anomalous. Always 0 for credits and unscored batches.
    pub anomaly_score: f64,
}

impl ScoredTransaction {
    pub fn unscored(transaction: EnrichedTransaction) -> Self {
        Self {
            transaction,
            is_anomaly: false,
            anomaly_score: 0.0,
        }
    }
}

/// Reporting view of a flagged transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalySummary {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub anomaly_score: f64,
}

/// Per-month income/expense totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: YearMonth,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_savings: f64,
    /// net_savings / total_income clamped to [-1, 1]; 0 when there is no income
    pub savings_ratio: f64,
    pub num_transactions: usize,
}

/// Debit spending for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpending {
    pub category: Category,
    pub total_spent: f64,
    pub pct_of_spending: f64,
}

/// Direction of the fitted spending trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "Increasing",
            Self::Decreasing => "Decreasing",
            Self::Stable => "Stable",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Increasing => "↑",
            Self::Decreasing => "↓",
            Self::Stable => "→",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Next-month spending projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub next_month_index: usize,
    pub predicted_spending: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub trend: Trend,
}

/// In-sample fit quality of the spending model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastMetrics {
    pub mae: f64,
    pub r2: f64,
    pub slope: f64,
    pub intercept: f64,
}

/// One month of the category pivot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTrendRow {
    pub month: YearMonth,
    /// Debit totals aligned with `CategoryTrend::categories`
    pub totals: Vec<f64>,
}

/// Monthly debit totals pivoted by category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTrend {
    /// Column order: alphabetical by category name
    pub categories: Vec<Category>,
    pub rows: Vec<CategoryTrendRow>,
    /// First-to-last month change per category, in percent. `None` when the
    /// pivot has fewer than two months; an entry is `None` when the first
    /// month's value is zero.
    pub change_pct: Option<Vec<Option<f64>>>,
}

impl CategoryTrend {
    /// Percentage change for a single category, if defined
    pub fn change_for(&self, category: Category) -> Option<f64> {
        let idx = self.categories.iter().position(|c| *c == category)?;
        self.change_pct.as_ref()?.get(idx).copied().flatten()
    }
}
