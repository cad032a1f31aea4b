//! Configuration types for disaster-api.

use std::time::Duration;

/// Default request timeout, matching the dashboard's HTTP client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Configuration for connecting to the disaster-alert backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend (e.g., "http://localhost:3000").
    pub base_url: String,
    /// Per-request transport timeout.
    pub timeout: Duration,
}

impl ApiConfig {
    /// Create a new configuration with the given base URL.
    ///
    /// A trailing slash is trimmed so endpoint helpers can append paths.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the user listing endpoint URL.
    pub fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    /// Get the alert send endpoint URL.
    pub fn send_alert_url(&self) -> String {
        format!("{}/admin/send-alert", self.base_url)
    }

    /// Get the login endpoint URL.
    pub fn login_url(&self) -> String {
        format!("{}/login", self.base_url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}
