//! Configuration for the sandbox-tasks client.
//!
//! Configuration can be set via environment variables:
//! - `SANDBOX_TASKS_ENDPOINT` - Optional. Tool-call endpoint URL. Defaults to
//!   `http://127.0.0.1:8765/mcp` (the local proxy for network-isolated
//!   sandboxes).
//! - `SANDBOX_TASKS_API_KEY` - Optional. Bearer key for directly
//!   authenticated control-plane endpoints. Unset for proxy setups.
//! - `SANDBOX_TASKS_POLL_INTERVAL_SECS` - Optional. Seconds between status
//!   polls. Defaults to `3`.
//! - `SANDBOX_TASKS_RETRY_INTERVAL_SECS` - Optional. Seconds between mobile
//!   submission retries. Defaults to `1`.
//! - `SANDBOX_TASKS_HTTP_TIMEOUT_SECS` - Optional. Per-request HTTP timeout.
//!   Defaults to `30`.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Tool-call endpoint (control plane or local proxy)
    pub endpoint: String,

    /// Bearer key for directly authenticated endpoints
    pub api_key: Option<String>,

    /// Interval between status polls in the wait loop
    pub poll_interval: Duration,

    /// Interval between mobile submission retries
    pub retry_interval: Duration,

    /// Per-request HTTP timeout
    pub http_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8765/mcp".to_string(),
            api_key: None,
            poll_interval: Duration::from_secs(3),
            retry_interval: Duration::from_secs(1),
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Create a config for the given endpoint, everything else defaulted.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if one of the interval variables
    /// is set but not parseable as seconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let endpoint =
            std::env::var("SANDBOX_TASKS_ENDPOINT").unwrap_or_else(|_| defaults.endpoint.clone());

        let api_key = std::env::var("SANDBOX_TASKS_API_KEY").ok();

        let poll_interval = duration_from_env(
            "SANDBOX_TASKS_POLL_INTERVAL_SECS",
            defaults.poll_interval,
        )?;
        let retry_interval = duration_from_env(
            "SANDBOX_TASKS_RETRY_INTERVAL_SECS",
            defaults.retry_interval,
        )?;
        let http_timeout =
            duration_from_env("SANDBOX_TASKS_HTTP_TIMEOUT_SECS", defaults.http_timeout)?;

        Ok(Self {
            endpoint,
            api_key,
            poll_interval,
            retry_interval,
            http_timeout,
        })
    }
}

fn duration_from_env(var: &str, default: Duration) -> Result<Duration, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidValue(var.to_string(), format!("{}", e))),
        Err(_) => Ok(default),
    }
}
