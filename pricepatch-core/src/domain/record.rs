//! Record and Dataset — the daily market history table.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::numeric::Numeric;

/// One fully-observed calendar day: price, trading volume, and market cap,
/// all in USD.
///
/// A day either has all three values or it has no Record at all; partial
/// observations never enter the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    pub price: Numeric,
    pub volume: Numeric,
    pub market_cap: Numeric,
}

/// The in-memory dataset: at most one Record per calendar date.
///
/// Loaded whole at the start of an invocation, mutated in memory, and written
/// back whole at the end. Keyed by date, so uniqueness holds by construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: BTreeMap<NaiveDate, Record>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.records.contains_key(&date)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&Record> {
        self.records.get(&date)
    }

    /// Insert a record, replacing any existing record for the same date.
    /// Callers that must not replace (the merge engine) check `contains` first.
    pub fn insert(&mut self, record: Record) -> Option<Record> {
        self.records.insert(record.date, record)
    }

    /// Most recent date present, if any.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.records.keys().next_back().copied()
    }

    /// Records in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// Records in descending date order — the persistence order.
    pub fn rows_desc(&self) -> impl Iterator<Item = &Record> {
        self.records.values().rev()
    }
}
