//! Updater configuration.
//!
//! The bucket and key identifying the stored object are explicit construction
//! parameters of the pipeline — loadable from a TOML file, overridable per
//! field by the CLI.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BUCKET: &str = "btc-price-history";
pub const DEFAULT_KEY: &str = "btc-price-history-data.csv";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdaterConfig {
    /// Bucket holding the dataset object.
    pub bucket: String,
    /// Object key of the dataset CSV.
    pub key: String,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            key: DEFAULT_KEY.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

impl UpdaterConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
