//! Property tests for pipeline invariants.
//!
//! Uses proptest to verify:
//! 1. Codec round-trip — decode(encode(ds)) reproduces the record set exactly
//! 2. Encoding stability — repeated decode/encode cycles are byte-stable
//! 3. Merge monotonicity — merge only adds, never alters or removes
//! 4. Window escalation — 0 holes → no scan, 1 → short window, 2+ → long

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use pricepatch_core::codec;
use pricepatch_core::data::provider::MarketSeries;
use pricepatch_core::domain::{Dataset, Numeric, Record};
use pricepatch_core::{gap, merge};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

// ─── Strategies (proptest) ───────────────────────────────────────────

fn arb_value() -> impl Strategy<Value = f64> {
    (0.01..1.0e12_f64).prop_map(|v| (v * 100.0).round() / 100.0)
}

fn arb_record() -> impl Strategy<Value = Record> {
    (0i64..2000, arb_value(), arb_value(), arb_value()).prop_map(|(offset, p, v, m)| Record {
        date: base_date() + Duration::days(offset),
        price: Numeric::from(p),
        volume: Numeric::from(v),
        market_cap: Numeric::from(m),
    })
}

fn arb_dataset() -> impl Strategy<Value = Dataset> {
    proptest::collection::vec(arb_record(), 0..50).prop_map(|records| {
        let mut ds = Dataset::new();
        for record in records {
            ds.insert(record);
        }
        ds
    })
}

// ─── 1 & 2. Codec round-trip ─────────────────────────────────────────

proptest! {
    /// Decoding an encoded dataset reproduces every record, numeric text
    /// included, with nothing skipped.
    #[test]
    fn codec_roundtrip(ds in arb_dataset()) {
        let decoded = codec::decode(&codec::encode(&ds));
        prop_assert!(decoded.skipped.is_empty());
        prop_assert_eq!(decoded.dataset, ds);
    }

    /// A second encode of the decoded object is byte-identical to the first.
    #[test]
    fn reencoding_is_stable(ds in arb_dataset()) {
        let once = codec::encode(&ds);
        let twice = codec::encode(&codec::decode(&once).dataset);
        prop_assert_eq!(once, twice);
    }
}

// ─── 3. Merge monotonicity ───────────────────────────────────────────

proptest! {
    /// After any merge, every pre-existing record is still present and
    /// unchanged, and everything added was genuinely absent before.
    #[test]
    fn merge_is_monotonic(
        ds in arb_dataset(),
        offsets in proptest::collection::btree_set(0i64..2000, 0..40),
        value in arb_value(),
    ) {
        let dates: Vec<NaiveDate> = offsets
            .iter()
            .map(|o| base_date() + Duration::days(*o))
            .collect();

        let mut series = MarketSeries::default();
        for d in &dates {
            series.prices.insert(*d, value);
            series.volumes.insert(*d, value);
            series.market_caps.insert(*d, value);
        }
        let missing: Vec<NaiveDate> =
            dates.iter().copied().filter(|d| !ds.contains(*d)).collect();

        let mut merged = ds.clone();
        let added = merge::merge_series(&mut merged, &missing, &series);

        for record in ds.iter() {
            prop_assert_eq!(merged.get(record.date), Some(record));
        }
        prop_assert_eq!(merged.len(), ds.len() + added.len());
        for d in &added {
            prop_assert!(!ds.contains(*d));
        }
    }
}

// ─── 4. Window escalation ────────────────────────────────────────────

proptest! {
    /// The fetch window is a pure function of the hole count in the short
    /// window: none → no scan, one → short, two or more → long.
    #[test]
    fn gap_window_escalation(holes in proptest::collection::btree_set(0i64..7, 0..=7)) {
        let reference = base_date() + Duration::days(60);
        let mut ds = Dataset::new();
        for back in 0..i64::from(gap::LONG_WINDOW_DAYS) {
            if back < 7 && holes.contains(&back) {
                continue;
            }
            ds.insert(Record {
                date: reference - Duration::days(back),
                price: Numeric::from(1.0),
                volume: Numeric::from(1.0),
                market_cap: Numeric::from(1.0),
            });
        }

        match (holes.len(), gap::scan(&ds, reference)) {
            (0, result) => prop_assert!(result.is_none()),
            (1, Some(scan)) => prop_assert_eq!(scan.window_days, gap::SHORT_WINDOW_DAYS),
            (_, Some(scan)) => prop_assert_eq!(scan.window_days, gap::LONG_WINDOW_DAYS),
            (n, None) => prop_assert!(false, "expected a scan for {} holes", n),
        }
    }
}
