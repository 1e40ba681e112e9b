//! Pricepatch core — keeps a daily BTC market history CSV object complete.
//!
//! One invocation reads the stored dataset, scans a lookback window ending at
//! yesterday (UTC) for missing dates, fetches a bounded daily series when a
//! gap exists, merges complete records monotonically, and rewrites the object
//! whole. All state lives in the stored object; repeated runs are idempotent.
//!
//! - Domain types (records, dataset, verbatim numeric text)
//! - CSV codec with explicit per-row parse results
//! - Gap detector with short/long window escalation
//! - Market data provider trait + CoinGecko implementation
//! - Monotonic merge engine
//! - Object store trait + filesystem/in-memory implementations

pub mod codec;
pub mod config;
pub mod data;
pub mod domain;
pub mod gap;
pub mod merge;
pub mod update;

pub use config::UpdaterConfig;
pub use update::{run_update, UpdateError, UpdateOutcome};
