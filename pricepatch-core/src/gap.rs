//! Gap detection over the lookback window.
//!
//! Scans the window of calendar dates ending at the reference date for dates
//! the dataset lacks. An isolated single-day gap is patched narrowly; more
//! than one gap in the short window suggests a longer outage, so the scan
//! widens and reports every date missing further back. Deterministic given
//! the dataset dates and the reference date.

use chrono::{Duration, NaiveDate};

use crate::domain::Dataset;

/// Days in the default lookback window ending at the reference date.
pub const SHORT_WINDOW_DAYS: u32 = 7;

/// Days in the widened window used when the short window shows more than
/// one gap.
pub const LONG_WINDOW_DAYS: u32 = 27;

/// Result of a gap scan: the window to fetch and the dates missing inside it,
/// ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapScan {
    pub window_days: u32,
    pub missing: Vec<NaiveDate>,
}

/// Scan the lookback window ending at `reference` for missing dates.
/// Returns `None` when the short window is fully covered — no fetch needed.
pub fn scan(dataset: &Dataset, reference: NaiveDate) -> Option<GapScan> {
    let missing_short = missing_in_window(dataset, reference, SHORT_WINDOW_DAYS);
    match missing_short.len() {
        0 => None,
        1 => Some(GapScan {
            window_days: SHORT_WINDOW_DAYS,
            missing: missing_short,
        }),
        _ => Some(GapScan {
            window_days: LONG_WINDOW_DAYS,
            missing: missing_in_window(dataset, reference, LONG_WINDOW_DAYS),
        }),
    }
}

/// Dates absent from the dataset within the `days`-long window ending at
/// `reference`, ascending.
pub fn missing_in_window(dataset: &Dataset, reference: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..i64::from(days))
        .rev()
        .map(|back| reference - Duration::days(back))
        .filter(|d| !dataset.contains(*d))
        .collect()
}
