//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use alert_desk::DEFAULT_SUBJECT;

/// Admin console configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// Disaster-alert backend base URL.
    pub api_url: String,
    /// Backend request timeout.
    pub api_timeout: Duration,
    /// Subject pre-filled in new drafts.
    pub subject: String,
    /// Start with an authenticated session (local development).
    pub assume_logged_in: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ADMIN_ADDR` | Server bind address | `127.0.0.1:8788` |
    /// | `ALERT_API_URL` | Backend base URL | `http://localhost:3000` |
    /// | `ALERT_API_TIMEOUT_MS` | Backend request timeout | `1000` |
    /// | `ALERT_SUBJECT` | Default alert subject | `Disaster Alert` |
    /// | `ADMIN_ASSUME_LOGGED_IN` | Skip the login page | `false` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = var("ADMIN_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8788".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let api_url = var("ALERT_API_URL").unwrap_or_else(|| "http://localhost:3000".to_string());
        if api_url.trim().is_empty() {
            return Err(ConfigError::EmptyApiUrl);
        }

        let api_timeout = match var("ALERT_API_TIMEOUT_MS") {
            Some(ms) => Duration::from_millis(ms.parse().map_err(|_| ConfigError::InvalidTimeout)?),
            None => Duration::from_millis(1000),
        };

        let subject = var("ALERT_SUBJECT").unwrap_or_else(|| DEFAULT_SUBJECT.to_string());

        let assume_logged_in = match var("ADMIN_ASSUME_LOGGED_IN").as_deref() {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(_) => return Err(ConfigError::InvalidFlag("ADMIN_ASSUME_LOGGED_IN")),
        };

        Ok(Self {
            addr,
            api_url,
            api_timeout,
            subject,
            assume_logged_in,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid ADMIN_ADDR format")]
    InvalidAddr,

    #[error("ALERT_API_URL must not be empty")]
    EmptyApiUrl,

    #[error("ALERT_API_TIMEOUT_MS must be a whole number of milliseconds")]
    InvalidTimeout,

    #[error("{0} must be true/false or 1/0")]
    InvalidFlag(&'static str),
}
