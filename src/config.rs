//! Application configuration loaded from environment variables.

use crate::ledger::StatusPolicy;
use crate::store::DEFAULT_LEDGER_KEY;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Key the ledger snapshot is stored under
    pub storage_key: String,
    /// Directory for file-backed snapshots; in-memory store when `None`
    pub ledger_dir: Option<PathBuf>,
    /// How status overrides are checked
    pub status_policy: StatusPolicy,
    /// Capacity of the session request channel
    pub channel_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_LEDGER_KEY.to_string(),
            ledger_dir: None,
            status_policy: StatusPolicy::Permissive,
            channel_buffer: 32,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source. Unset or blank
    /// variables fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        let status_policy = match var("ORDERS_STATUS_POLICY") {
            Some(v) => v.parse::<StatusPolicy>().map_err(|reason| ConfigError::Invalid {
                key: "ORDERS_STATUS_POLICY",
                reason,
            })?,
            None => defaults.status_policy,
        };

        let channel_buffer = match var("ORDERS_CHANNEL_BUFFER") {
            Some(v) => match v.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "ORDERS_CHANNEL_BUFFER",
                        reason: format!("expected a positive integer, got {v:?}"),
                    })
                }
            },
            None => defaults.channel_buffer,
        };

        Ok(Config {
            storage_key: var("ORDERS_STORAGE_KEY").unwrap_or(defaults.storage_key),
            ledger_dir: var("ORDERS_LEDGER_DIR").map(PathBuf::from),
            status_policy,
            channel_buffer,
        })
    }
}
