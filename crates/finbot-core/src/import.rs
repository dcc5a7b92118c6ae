//! CSV transaction loading
//!
//! Expected columns (any order, extra columns ignored): date, description,
//! amount, type. A row with an unparseable date or amount fails the whole
//! load; rows are never dropped or deduplicated.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::categorize::Categorizer;
use crate::error::{Error, Result};
use crate::models::EnrichedTransaction;

const REQUIRED_COLUMNS: [&str; 4] = ["date", "description", "amount", "type"];

/// Column positions resolved from the header row
struct ColumnMap {
    date: usize,
    description: usize,
    amount: usize,
    tx_type: usize,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let mut missing: Vec<&str> = Vec::new();
        let mut positions = [0usize; REQUIRED_COLUMNS.len()];

        for (slot, name) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            match headers.iter().position(|h| h.trim() == name) {
                Some(pos) => *slot = pos,
                None => missing.push(name),
            }
        }
        if !missing.is_empty() {
            return Err(Error::Schema(missing.join(", ")));
        }

        let [date, description, amount, tx_type] = positions;
        Ok(Self {
            date,
            description,
            amount,
            tx_type,
        })
    }
}

/// Load and enrich transactions from a CSV file
pub fn load_transactions(path: impl AsRef<Path>) -> Result<Vec<EnrichedTransaction>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound(path.display().to_string()));
    }

    let file = File::open(path)?;
    let transactions = load_transactions_from_reader(file)?;
    info!(
        "Loaded {} transactions from {}",
        transactions.len(),
        path.display()
    );
    Ok(transactions)
}

/// Load and enrich transactions from any CSV reader using the default rules
pub fn load_transactions_from_reader<R: Read>(reader: R) -> Result<Vec<EnrichedTransaction>> {
    load_transactions_with(reader, &Categorizer::default())
}

/// Load and enrich transactions with a caller-supplied categorizer
pub fn load_transactions_with<R: Read>(
    reader: R,
    categorizer: &Categorizer,
) -> Result<Vec<EnrichedTransaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut transactions = Vec::new();

    for (idx, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let line = idx + 2;

        let field = |col: usize, name: &str| {
            record
                .get(col)
                .ok_or_else(|| Error::InvalidData(format!("Line {}: missing {}", line, name)))
        };

        let date = parse_date(field(columns.date, "date")?)
            .map_err(|e| Error::InvalidData(format!("Line {}: {}", line, e)))?;
        let amount = parse_amount(field(columns.amount, "amount")?)
            .map_err(|e| Error::InvalidData(format!("Line {}: {}", line, e)))?;
        let description = field(columns.description, "description")?.trim().to_string();
        let tx_type = field(columns.tx_type, "type")?.trim().to_string();

        let category = categorizer.categorize(&description);
        transactions.push(EnrichedTransaction::new(
            date,
            description,
            amount,
            tx_type,
            category,
        ));
    }

    debug!("Parsed {} transactions", transactions.len());
    Ok(transactions)
}

/// Parse a date in one of the common export formats
fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%Y", // 01/15/2024
        "%m/%d/%y", // 01/15/24
        "%m-%d-%Y", // 01-15-2024
        "%Y/%m/%d", // 2024/01/15
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    // Timestamps keep only the calendar date
    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",    // 2024-01-15 08:30:00
        "%Y-%m-%dT%H:%M:%S",    // 2024-01-15T08:30:00
        "%Y-%m-%dT%H:%M:%S%.f", // 2024-01-15T08:30:00.250
    ];

    for fmt in datetime_formats {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(datetime.date());
        }
    }

    Err(format!("Unable to parse date: {}", s))
}

/// Parse an amount string, handling currency symbols and commas
fn parse_amount(s: &str) -> std::result::Result<f64, String> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("Unable to parse amount: {}", s))
}
