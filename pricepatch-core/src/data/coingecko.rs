//! CoinGecko market data provider.
//!
//! Fetches the bitcoin `market_chart` daily series: three parallel arrays of
//! `[ms-epoch, value]` pairs for price, total volume, and market cap. The
//! response is normalized to per-date maps before it leaves this module.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use super::provider::{FetchError, MarketDataProvider, MarketSeries};

const DEFAULT_BASE_URL: &str = "https://api.coingecko.com";

/// CoinGecko `market_chart` response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    #[serde(default)]
    prices: Vec<ChartPoint>,
    #[serde(default)]
    total_volumes: Vec<ChartPoint>,
    #[serde(default)]
    market_caps: Vec<ChartPoint>,
}

/// One `[ms-epoch, value]` pair.
#[derive(Debug, Deserialize)]
struct ChartPoint(i64, f64);

/// CoinGecko data provider.
pub struct CoinGeckoProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the provider at a different host (tests, proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn chart_url(&self, days: u32) -> String {
        format!(
            "{}/api/v3/coins/bitcoin/market_chart?vs_currency=usd&days={days}&interval=daily",
            self.base_url
        )
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketDataProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        "coingecko"
    }

    fn fetch_daily(
        &self,
        window_days: u32,
        reference: NaiveDate,
        missing: &[NaiveDate],
    ) -> Result<MarketSeries, FetchError> {
        // One extra day: the provider may exclude the current partial day
        // from a `days=N` query.
        let url = self.chart_url(window_days + 1);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let chart: ChartResponse = resp.json().map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(normalize(chart, reference, missing))
    }
}

/// Truncate a milliseconds-since-epoch timestamp to its UTC calendar date.
fn date_of_ms(ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.date_naive())
}

/// Build per-date maps from the chart response.
///
/// Points after `reference` are dropped: the provider's current-day entry is
/// a moving partial aggregate. Points for dates the gap scan did not mark
/// missing are dropped too, so a provider-side revision can never churn a
/// value that was already persisted.
fn normalize(resp: ChartResponse, reference: NaiveDate, missing: &[NaiveDate]) -> MarketSeries {
    let mut series = MarketSeries::default();
    collect(resp.prices, reference, missing, &mut series.prices);
    collect(resp.total_volumes, reference, missing, &mut series.volumes);
    collect(resp.market_caps, reference, missing, &mut series.market_caps);
    series
}

fn collect(
    points: Vec<ChartPoint>,
    reference: NaiveDate,
    missing: &[NaiveDate],
    out: &mut BTreeMap<NaiveDate, f64>,
) {
    for ChartPoint(ms, value) in points {
        let date = match date_of_ms(ms) {
            Some(d) => d,
            None => continue,
        };
        if date > reference || !missing.contains(&date) {
            continue;
        }
        out.insert(date, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ms(date: NaiveDate) -> i64 {
        date.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp_millis()
    }

    #[test]
    fn chart_response_deserializes() {
        let json = r#"{
            "prices": [[1704844800000, 43204.5], [1704931200000, 44150.2]],
            "market_caps": [[1704844800000, 846000000000.0]],
            "total_volumes": [[1704844800000, 18200000000.0]]
        }"#;
        let chart: ChartResponse = serde_json::from_str(json).unwrap();
        assert_eq!(chart.prices.len(), 2);
        assert_eq!(chart.prices[0].0, 1_704_844_800_000);
        assert_eq!(chart.market_caps.len(), 1);
        assert_eq!(chart.total_volumes.len(), 1);
    }

    #[test]
    fn chart_response_tolerates_absent_series() {
        let chart: ChartResponse = serde_json::from_str("{}").unwrap();
        assert!(chart.prices.is_empty());
        assert!(chart.total_volumes.is_empty());
        assert!(chart.market_caps.is_empty());
    }

    #[test]
    fn normalize_maps_timestamps_to_dates() {
        let d = date(2024, 1, 10);
        let chart = ChartResponse {
            prices: vec![ChartPoint(ms(d), 43204.5)],
            total_volumes: vec![ChartPoint(ms(d), 18.2e9)],
            market_caps: vec![ChartPoint(ms(d), 846.0e9)],
        };

        let series = normalize(chart, d, &[d]);
        assert_eq!(series.prices.get(&d), Some(&43204.5));
        assert_eq!(series.volumes.get(&d), Some(&18.2e9));
        assert_eq!(series.market_caps.get(&d), Some(&846.0e9));
    }

    #[test]
    fn normalize_drops_dates_after_reference() {
        let reference = date(2024, 1, 10);
        let today = date(2024, 1, 11);
        let chart = ChartResponse {
            prices: vec![ChartPoint(ms(today), 45000.0)],
            total_volumes: vec![],
            market_caps: vec![],
        };

        let series = normalize(chart, reference, &[reference, today]);
        assert!(series.is_empty());
    }

    #[test]
    fn normalize_drops_dates_not_marked_missing() {
        let reference = date(2024, 1, 10);
        let present = date(2024, 1, 9);
        let hole = date(2024, 1, 8);
        let chart = ChartResponse {
            prices: vec![ChartPoint(ms(present), 42850.25), ChartPoint(ms(hole), 42000.0)],
            total_volumes: vec![],
            market_caps: vec![],
        };

        let series = normalize(chart, reference, &[hole]);
        assert_eq!(series.prices.len(), 1);
        assert_eq!(series.prices.get(&hole), Some(&42000.0));
    }

    #[test]
    fn normalize_keeps_last_point_for_a_date() {
        // An intraday point later in the array supersedes the midnight one.
        let d = date(2024, 1, 10);
        let noon = ms(d) + 12 * 3600 * 1000;
        let chart = ChartResponse {
            prices: vec![ChartPoint(ms(d), 43000.0), ChartPoint(noon, 43500.0)],
            total_volumes: vec![],
            market_caps: vec![],
        };

        let series = normalize(chart, d, &[d]);
        assert_eq!(series.prices.get(&d), Some(&43500.0));
    }

    #[test]
    fn chart_url_carries_window() {
        let provider = CoinGeckoProvider::with_base_url("http://localhost:9");
        let url = provider.chart_url(8);
        assert_eq!(
            url,
            "http://localhost:9/api/v3/coins/bitcoin/market_chart?vs_currency=usd&days=8&interval=daily"
        );
    }
}
