//! Domain types for the stored dataset.

pub mod numeric;
pub mod record;

pub use numeric::Numeric;
pub use record::{Dataset, Record};
