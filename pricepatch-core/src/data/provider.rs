//! Market data provider trait and structured error types.
//!
//! The trait abstracts over the market-data API so the pipeline can be
//! exercised against a scripted source in tests.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors from the market data API. Every variant aborts the invocation
/// before any merge or write; the next scheduled run is the retry.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("provider returned HTTP {status}")]
    Status { status: u16 },

    #[error("undecodable response: {0}")]
    Decode(String),
}

/// Per-date value maps built from one API response.
///
/// Keys are UTC calendar dates. A well-behaved provider only populates dates
/// at or before the reference date that the gap scan marked missing; the
/// merge engine enforces the same bound independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketSeries {
    pub prices: BTreeMap<NaiveDate, f64>,
    pub volumes: BTreeMap<NaiveDate, f64>,
    pub market_caps: BTreeMap<NaiveDate, f64>,
}

impl MarketSeries {
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty() && self.volumes.is_empty() && self.market_caps.is_empty()
    }
}

/// A daily market-data source. One `fetch_daily` call issues one bounded
/// request.
pub trait MarketDataProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch at least `window_days` of daily data ending now, normalized to
    /// per-date maps restricted to the `missing` dates at or before
    /// `reference`.
    fn fetch_daily(
        &self,
        window_days: u32,
        reference: NaiveDate,
        missing: &[NaiveDate],
    ) -> Result<MarketSeries, FetchError>;
}
