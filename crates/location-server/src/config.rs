//! Configuration for the location server.
//!
//! - `LOCATION_API_BASE`: directory API base URL
//! - `BEARER_TOKEN`: token sent as `Authorization: Bearer`; requests go out
//!   unauthenticated when unset
//! - `LOCATION_API_TIMEOUT_SECS`: per-request timeout (default 30)

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str =
    "https://int.dev.api.coxautoinc.com/wholesale-marketplace/enablement/locations";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub api_base: String,
    pub bearer_token: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LOCATION_API_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from a variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout = match get("LOCATION_API_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_base: get("LOCATION_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            bearer_token: get("BEARER_TOKEN"),
            timeout,
        })
    }
}
