//! One invocation of the update pipeline.
//!
//! Linear sequence: read the stored object, scan for gaps, fetch a bounded
//! daily series when a gap exists, merge complete records, write the object
//! back whole. The write happens last and only when the merge added at least
//! one date, so an abort at any earlier point leaves the stored object
//! exactly as it was read. Runs are idempotent and merges monotonic, so
//! overlapping or retried invocations can only delay convergence, never
//! corrupt the dataset.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::codec;
use crate::config::UpdaterConfig;
use crate::data::provider::{FetchError, MarketDataProvider};
use crate::data::store::{ObjectStore, StoreError};
use crate::gap::{self, SHORT_WINDOW_DAYS};
use crate::merge;

#[derive(Debug, Error)]
pub enum UpdateError {
    /// The object could not be read; nothing was mutated.
    #[error("storage read: {0}")]
    StorageRead(#[source] StoreError),

    /// The rewrite failed; the previously stored object is still in place.
    #[error("storage write: {0}")]
    StorageWrite(#[source] StoreError),

    /// The market-data request failed; nothing was merged or written.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Terminal result of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// The short window is fully covered; nothing was fetched or written.
    NoUpdateNeeded {
        latest: Option<NaiveDate>,
        rows: usize,
    },
    /// A gap exists but the provider had nothing usable for it; nothing
    /// was written.
    NoNewData {
        still_missing: Vec<NaiveDate>,
        rows: usize,
    },
    /// At least one date was filled and the object was rewritten.
    Updated {
        added: Vec<NaiveDate>,
        window_days: u32,
        rows: usize,
    },
}

/// Read-only coverage summary for the status command.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStatus {
    pub rows: usize,
    pub latest: Option<NaiveDate>,
    /// Dates absent from the short lookback window ending at yesterday.
    pub missing_recent: Vec<NaiveDate>,
    pub skipped_rows: usize,
}

/// The most recent UTC day considered complete: the day before `now`.
/// The current day is still accumulating and is never stored.
pub fn reference_date(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive() - Duration::days(1)
}

/// Run one read → scan → fetch → merge → write pass.
pub fn run_update(
    store: &dyn ObjectStore,
    provider: &dyn MarketDataProvider,
    config: &UpdaterConfig,
    now: DateTime<Utc>,
) -> Result<UpdateOutcome, UpdateError> {
    let bytes = store
        .get(&config.bucket, &config.key)
        .map_err(UpdateError::StorageRead)?;
    let decoded = codec::decode(&bytes);
    for (line, reason) in &decoded.skipped {
        log::warn!("skipping malformed row at line {line}: {reason}");
    }
    let mut dataset = decoded.dataset;

    let reference = reference_date(now);
    let scan = match gap::scan(&dataset, reference) {
        Some(scan) => scan,
        None => {
            log::info!("no gaps in the last {SHORT_WINDOW_DAYS} days; nothing to do");
            return Ok(UpdateOutcome::NoUpdateNeeded {
                latest: dataset.latest_date(),
                rows: dataset.len(),
            });
        }
    };

    log::info!(
        "{} date(s) missing within the last {} days; fetching from {}",
        scan.missing.len(),
        scan.window_days,
        provider.name()
    );
    let series = provider.fetch_daily(scan.window_days, reference, &scan.missing)?;

    let added = merge::merge_series(&mut dataset, &scan.missing, &series);
    if added.is_empty() {
        log::info!("provider had no usable data for the missing dates; object left unchanged");
        return Ok(UpdateOutcome::NoNewData {
            still_missing: scan.missing,
            rows: dataset.len(),
        });
    }

    let encoded = codec::encode(&dataset);
    store
        .put(&config.bucket, &config.key, &encoded)
        .map_err(UpdateError::StorageWrite)?;

    log::info!(
        "added {} date(s); dataset now has {} rows",
        added.len(),
        dataset.len()
    );
    Ok(UpdateOutcome::Updated {
        added,
        window_days: scan.window_days,
        rows: dataset.len(),
    })
}

/// Read the dataset and report coverage without fetching or writing.
pub fn inspect(
    store: &dyn ObjectStore,
    config: &UpdaterConfig,
    now: DateTime<Utc>,
) -> Result<DatasetStatus, UpdateError> {
    let bytes = store
        .get(&config.bucket, &config.key)
        .map_err(UpdateError::StorageRead)?;
    let decoded = codec::decode(&bytes);

    let reference = reference_date(now);
    let missing_recent = gap::missing_in_window(&decoded.dataset, reference, SHORT_WINDOW_DAYS);

    Ok(DatasetStatus {
        rows: decoded.dataset.len(),
        latest: decoded.dataset.latest_date(),
        missing_recent,
        skipped_rows: decoded.skipped.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_date_is_yesterday_utc() {
        let now = DateTime::parse_from_rfc3339("2024-01-11T00:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            reference_date(now),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
    }

    #[test]
    fn reference_date_crosses_month_boundary() {
        let now = DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            reference_date(now),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }
}
