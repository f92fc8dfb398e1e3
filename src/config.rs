//! Typed configuration from environment variables.
//!
//! Loads once at startup, fails fast on malformed values. The catalog API
//! token is wrapped in secrecy::SecretString to prevent log leaks.

use std::time::Duration;

use secrecy::SecretString;

use crate::catalog::DEFAULT_SYNC_TIMEOUT;
use crate::error::{Error, Result};
use crate::runner::DEFAULT_HEALTHCHECK_INTERVAL;

#[derive(Debug)]
pub struct Config {
    /// Base URL of the external catalog API, if a real integration is wired.
    pub catalog_api_url: Option<String>,
    /// API token for the catalog, if the integration needs one.
    pub catalog_api_token: Option<SecretString>,
    /// TTL applied to the progress counters on every task.
    pub sync_timeout: Duration,
    /// Interval for the periodic health check.
    pub healthcheck_interval: Duration,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this. Every
    /// variable has a default; only malformed values are an error.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            catalog_api_url: std::env::var("CATSYNC_API_URL").ok(),
            catalog_api_token: std::env::var("CATSYNC_API_TOKEN")
                .ok()
                .map(SecretString::from),
            sync_timeout: duration_var("CATSYNC_SYNC_TIMEOUT_SECS", DEFAULT_SYNC_TIMEOUT)?,
            healthcheck_interval: duration_var(
                "CATSYNC_HEALTHCHECK_SECS",
                DEFAULT_HEALTHCHECK_INTERVAL,
            )?,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Read a duration in whole seconds, falling back to `default` when unset.
fn duration_var(name: &str, default: Duration) -> Result<Duration> {
    match std::env::var(name) {
        Ok(raw) => {
            let secs: u64 = raw
                .parse()
                .map_err(|_| Error::Config(format!("{name} must be a number of seconds: {raw}")))?;
            Ok(Duration::from_secs(secs))
        }
        Err(_) => Ok(default),
    }
}
