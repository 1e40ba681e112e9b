//! CSV codec for the stored dataset object.
//!
//! Four columns, rows descending by date on write. Numeric text is written
//! back verbatim so a rewrite never reformats a value that was already stored.
//! Malformed rows are skipped on read, each with an explicit reason.

use chrono::{DateTime, NaiveDate};
use thiserror::Error;

use crate::domain::{Dataset, Numeric, Record};

/// Canonical column layout of the stored object.
pub const HEADER: [&str; 4] = ["date", "price", "volume", "market_cap"];

/// Why a row failed to parse. One bad row never poisons the rest of the
/// object; it is skipped and reported.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("expected 4 columns, found {found}")]
    ColumnCount { found: usize },

    #[error("bad date {text:?}")]
    BadDate { text: String },

    #[error("bad {column} value {text:?}")]
    BadNumber {
        column: &'static str,
        text: String,
    },

    #[error("unreadable row: {0}")]
    Unreadable(String),
}

/// A decoded dataset plus every row that was skipped, by line number.
#[derive(Debug)]
pub struct Decoded {
    pub dataset: Dataset,
    pub skipped: Vec<(u64, RowError)>,
}

/// Decode a stored object. The header line is skipped; rows that fail to
/// parse land in `skipped` rather than failing the load.
pub fn decode(bytes: &[u8]) -> Decoded {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let mut dataset = Dataset::new();
    let mut skipped = Vec::new();

    for result in reader.records() {
        match result {
            Ok(row) => {
                let line = row.position().map_or(0, |p| p.line());
                match parse_row(&row) {
                    Ok(record) => {
                        dataset.insert(record);
                    }
                    Err(e) => skipped.push((line, e)),
                }
            }
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line());
                skipped.push((line, RowError::Unreadable(e.to_string())));
            }
        }
    }

    Decoded { dataset, skipped }
}

/// Encode the dataset: canonical header, then one row per record, newest
/// date first.
pub fn encode(dataset: &Dataset) -> Vec<u8> {
    let mut out = String::with_capacity(32 + dataset.len() * 64);
    out.push_str(&HEADER.join(","));
    out.push('\n');
    for record in dataset.rows_desc() {
        out.push_str(&format!(
            "{},{},{},{}\n",
            record.date, record.price, record.volume, record.market_cap
        ));
    }
    out.into_bytes()
}

fn parse_row(row: &csv::StringRecord) -> Result<Record, RowError> {
    if row.len() != HEADER.len() {
        return Err(RowError::ColumnCount { found: row.len() });
    }

    let date = parse_date(&row[0]).ok_or_else(|| RowError::BadDate {
        text: row[0].to_string(),
    })?;

    Ok(Record {
        date,
        price: parse_field(&row[1], "price")?,
        volume: parse_field(&row[2], "volume")?,
        market_cap: parse_field(&row[3], "market_cap")?,
    })
}

/// Date column: canonical `YYYY-MM-DD`, with milliseconds-since-epoch also
/// accepted for rows written by the legacy exporter. Rewrites always emit
/// the canonical form.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    let ms: i64 = text.parse().ok()?;
    DateTime::from_timestamp_millis(ms).map(|dt| dt.date_naive())
}

fn parse_field(text: &str, column: &'static str) -> Result<Numeric, RowError> {
    text.parse().map_err(|_| RowError::BadNumber {
        column,
        text: text.to_string(),
    })
}
