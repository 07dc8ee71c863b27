//! Runtime configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use stockroom_observability::LogFormat;

pub const DATA_FILE_VAR: &str = "STOCKROOM_DATA_FILE";
pub const EXPIRY_CHECK_SECS_VAR: &str = "STOCKROOM_EXPIRY_CHECK_SECS";
pub const LOG_FORMAT_VAR: &str = "STOCKROOM_LOG_FORMAT";

const DEFAULT_DATA_FILE: &str = "products.csv";
const DEFAULT_EXPIRY_CHECK_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryConfig {
    /// Product data file; relative values are resolved against the working directory.
    pub data_file: PathBuf,

    /// Pause between two expiration scans.
    pub expiry_check_interval: Duration,

    pub log_format: LogFormat,
}

impl InventoryConfig {
    /// Defaults anchored at `base_dir`.
    pub fn defaults_in(base_dir: &Path) -> Self {
        Self {
            data_file: base_dir.join(DEFAULT_DATA_FILE),
            expiry_check_interval: Duration::from_secs(DEFAULT_EXPIRY_CHECK_SECS),
            log_format: LogFormat::default(),
        }
    }

    /// Load configuration from environment variables, relative to the current
    /// working directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok(), &working_dir())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F, base_dir: &Path) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::defaults_in(base_dir);

        let data_file = match lookup(DATA_FILE_VAR) {
            Some(raw) if raw.trim().is_empty() => {
                return Err(ConfigError::InvalidValue(DATA_FILE_VAR.to_string()));
            }
            Some(raw) => base_dir.join(raw.trim()),
            None => defaults.data_file,
        };

        let expiry_check_interval = match lookup(EXPIRY_CHECK_SECS_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidValue(EXPIRY_CHECK_SECS_VAR.to_string())),
            },
            None => defaults.expiry_check_interval,
        };

        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue(LOG_FORMAT_VAR.to_string()))?,
            None => defaults.log_format,
        };

        Ok(Self {
            data_file,
            expiry_check_interval,
            log_format,
        })
    }
}

/// Current working directory, or `.` when it cannot be determined.
pub fn working_dir() -> PathBuf {
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Configuration error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let base = Path::new("/srv/shop");
        let config = InventoryConfig::from_lookup(lookup_from(&[]), base).unwrap();

        assert_eq!(config.data_file, PathBuf::from("/srv/shop/products.csv"));
        assert_eq!(config.expiry_check_interval, Duration::from_secs(30));
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config, InventoryConfig::defaults_in(base));
    }

    #[test]
    fn overrides_are_applied() {
        let config = InventoryConfig::from_lookup(
            lookup_from(&[
                (DATA_FILE_VAR, "data/stock.csv"),
                (EXPIRY_CHECK_SECS_VAR, "5"),
                (LOG_FORMAT_VAR, "json"),
            ]),
            Path::new("/srv/shop"),
        )
        .unwrap();

        assert_eq!(config.data_file, PathBuf::from("/srv/shop/data/stock.csv"));
        assert_eq!(config.expiry_check_interval, Duration::from_secs(5));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn absolute_data_file_is_kept() {
        let config = InventoryConfig::from_lookup(
            lookup_from(&[(DATA_FILE_VAR, "/var/lib/stock.csv")]),
            Path::new("/srv/shop"),
        )
        .unwrap();
        assert_eq!(config.data_file, PathBuf::from("/var/lib/stock.csv"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let base = Path::new("/srv/shop");
        for (key, value) in [
            (EXPIRY_CHECK_SECS_VAR, "soon"),
            (EXPIRY_CHECK_SECS_VAR, "0"),
            (LOG_FORMAT_VAR, "xml"),
            (DATA_FILE_VAR, "  "),
        ] {
            let err = InventoryConfig::from_lookup(lookup_from(&[(key, value)]), base).unwrap_err();
            assert_eq!(err, ConfigError::InvalidValue(key.to_string()));
        }
    }
}
