//! Monotonic merge of fetched values into the dataset.

use chrono::NaiveDate;

use crate::data::provider::MarketSeries;
use crate::domain::{Dataset, Numeric, Record};

/// Insert a Record for every missing date the series fully covers, returning
/// the dates actually added, ascending.
///
/// A date is added only when all three maps carry a value for it; a partially
/// covered date stays absent and is retried on a later run. Dates already in
/// the dataset are never touched, even if the series carries a value for
/// them — existing records are not revised.
pub fn merge_series(
    dataset: &mut Dataset,
    missing: &[NaiveDate],
    series: &MarketSeries,
) -> Vec<NaiveDate> {
    let mut added = Vec::new();

    for &date in missing {
        if dataset.contains(date) {
            continue;
        }
        match (
            series.prices.get(&date),
            series.volumes.get(&date),
            series.market_caps.get(&date),
        ) {
            (Some(&price), Some(&volume), Some(&market_cap)) => {
                dataset.insert(Record {
                    date,
                    price: Numeric::from(price),
                    volume: Numeric::from(volume),
                    market_cap: Numeric::from(market_cap),
                });
                added.push(date);
            }
            _ => {
                log::warn!("no complete data for {date}; leaving the gap for a later run");
            }
        }
    }

    added
}
