//! Synthetic transaction builders shared by unit tests and the CLI tests

use chrono::{Datelike, Duration, NaiveDate};

use crate::categorize::categorize;
use crate::models::EnrichedTransaction;

/// Build one transaction from an ISO date, categorized with the default rules
pub fn tx(date: &str, description: &str, amount: f64) -> EnrichedTransaction {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid test date");
    let tx_type = if amount < 0.0 { "debit" } else { "credit" };
    EnrichedTransaction::new(date, description, amount, tx_type, categorize(description))
}

/// Three months of $3000 income against $2000, $2200 and $2400 of expenses
pub fn three_month_dataset() -> Vec<EnrichedTransaction> {
    let mut txns = Vec::new();
    for (month, variable) in [(1, 400.0), (2, 500.0), (3, 600.0)] {
        txns.push(tx(&format!("2024-{:02}-01", month), "ACME Payroll", 3000.0));
        txns.push(tx(&format!("2024-{:02}-02", month), "Apartment Rent", -1200.0));
        txns.push(tx(&format!("2024-{:02}-10", month), "Kroger", -variable));
        txns.push(tx(&format!("2024-{:02}-20", month), "Chipotle", -variable));
    }
    txns
}

/// `months` months of $5000 income and ten identical $100 debits each
pub fn stable_saver_dataset(months: u32) -> Vec<EnrichedTransaction> {
    let mut txns = Vec::new();
    for month in 1..=months {
        txns.push(tx(&format!("2024-{:02}-01", month), "ACME Payroll", 5000.0));
        for day in 0..10 {
            txns.push(tx(
                &format!("2024-{:02}-{:02}", month, day + 3),
                "Kroger",
                -100.0,
            ));
        }
    }
    txns
}

/// `months` months where $2500 of expenses always exceed $1000 of income
pub fn deficit_dataset(months: u32) -> Vec<EnrichedTransaction> {
    let mut txns = Vec::new();
    for month in 1..=months {
        txns.push(tx(&format!("2024-{:02}-01", month), "Freelance Income", 1000.0));
        for day in 0..5 {
            txns.push(tx(
                &format!("2024-{:02}-{:02}", month, day * 4 + 2),
                "Kroger",
                -500.0,
            ));
        }
    }
    txns
}

/// Sixty routine weekday grocery/dining debits plus two large weekend outliers.
///
/// Returns the dataset and the descriptions of the outliers.
pub fn anomaly_dataset() -> (Vec<EnrichedTransaction>, [&'static str; 2]) {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"); // a Monday
    let mut txns = vec![tx("2024-01-01", "ACME Payroll", 4000.0)];

    let mut day = start;
    let mut n = 0;
    while n < 60 {
        if day.weekday().number_from_monday() <= 5 {
            let (desc, base) = if n % 2 == 0 {
                ("Kroger", 45.0)
            } else {
                ("Chipotle", 15.0)
            };
            let amount = base + (n % 5) as f64;
            txns.push(EnrichedTransaction::new(
                day,
                desc,
                -amount,
                "debit",
                categorize(desc),
            ));
            n += 1;
        }
        day += Duration::days(1);
    }

    let outliers = ["Luxury Jewelry Boutique", "Casino Night"];
    txns.push(tx("2024-02-17", outliers[0], -4800.0));
    txns.push(tx("2024-02-25", outliers[1], -3900.0));
    (txns, outliers)
}
