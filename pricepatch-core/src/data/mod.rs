//! Market data fetching and object storage.

pub mod coingecko;
pub mod provider;
pub mod store;

pub use coingecko::CoinGeckoProvider;
pub use provider::{FetchError, MarketDataProvider, MarketSeries};
pub use store::{FsStore, MemStore, ObjectStore, StoreError};
