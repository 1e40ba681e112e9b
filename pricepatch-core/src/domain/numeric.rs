//! Numeric — a decimal field that remembers its stored text.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A decimal value carried alongside the exact text it was parsed from.
///
/// The dataset is rewritten whole on every update, so a value that survives a
/// read-modify-write cycle must come back out character for character. Going
/// through `f64` alone would reformat history (`68000.00` → `68000`) on the
/// first rewrite. Values arriving fresh from the API are rendered once via
/// `f64` display formatting and that text becomes canonical.
#[derive(Debug, Clone, PartialEq)]
pub struct Numeric {
    text: String,
    value: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("not a finite decimal: {0:?}")]
pub struct NumericParseError(pub String);

impl Numeric {
    /// The parsed value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The canonical text, written back verbatim on serialization.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Self {
            text: value.to_string(),
            value,
        }
    }
}

impl FromStr for Numeric {
    type Err = NumericParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let value: f64 = text
            .parse()
            .map_err(|_| NumericParseError(s.to_string()))?;
        // "NaN" and "inf" parse as f64 but have no place in the dataset.
        if !value.is_finite() {
            return Err(NumericParseError(s.to_string()));
        }
        Ok(Self {
            text: text.to_string(),
            value,
        })
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
