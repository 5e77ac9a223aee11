//! Client configuration.

use std::time::Duration;

use strove_core::{ApiUrl, Result};

/// Environment variable that overrides the API base URL.
pub const API_URL_ENV: &str = "STROVE_API_BASE_URL";

/// Per-request timeout. Long enough for the AI-backed endpoints.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API server.
    pub base_url: ApiUrl,
    /// Applied to every request, connect through body.
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    /// Configuration for `base_url` with default timeout and user agent.
    pub fn new(base_url: ApiUrl) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("strove/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Read the base URL from [`API_URL_ENV`], falling back to the local
    /// development server.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is set but is not a valid URL.
    pub fn from_env() -> Result<Self> {
        match std::env::var(API_URL_ENV) {
            Ok(value) if !value.trim().is_empty() => Ok(Self::new(ApiUrl::new(value.trim())?)),
            _ => Ok(Self::default()),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(ApiUrl::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), "http://localhost:8123/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("strove/"));
    }

    #[test]
    fn timeout_override() {
        let config = ClientConfig::default().with_timeout(Duration::from_millis(250));
        assert_eq!(config.timeout, Duration::from_millis(250));
    }
}
