//! Client configuration

use std::time::Duration;

use crate::http::NetworkHttpClient;
use crate::{ClientResult, PosApi};

/// Default backend address
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Client configuration for connecting to the POS backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Bearer token attached to every request
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// How often the year-to-date earnings figure is re-fetched
    pub earnings_refresh_interval: Duration,

    /// User-Agent header value
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            earnings_refresh_interval: Duration::from_secs(60),
            user_agent: concat!("pos-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Load configuration from the environment (and `.env` when present)
    ///
    /// - `POS_API_URL`
    /// - `POS_API_TOKEN`
    /// - `POS_API_TIMEOUT_SECS`
    /// - `POS_EARNINGS_REFRESH_SECS`
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let mut config =
            Self::new(std::env::var("POS_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()));
        config.token = std::env::var("POS_API_TOKEN").ok().filter(|t| !t.is_empty());
        config.timeout = std::env::var("POS_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        config.earnings_refresh_interval = std::env::var("POS_EARNINGS_REFRESH_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(60));
        config
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the year-to-date earnings refresh interval
    pub fn with_earnings_refresh_interval(mut self, interval: Duration) -> Self {
        self.earnings_refresh_interval = interval;
        self
    }

    /// Create the HTTP transport from this configuration
    pub fn build_http_client(&self) -> ClientResult<NetworkHttpClient> {
        NetworkHttpClient::new(self)
    }

    /// Create the typed API from this configuration
    pub fn build_api(&self) -> ClientResult<PosApi> {
        Ok(PosApi::new(self.build_http_client()?))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_setters() {
        let config = ClientConfig::new("http://pos.local:9000")
            .with_token("abc")
            .with_timeout(5)
            .with_earnings_refresh_interval(Duration::from_secs(10));

        assert_eq!(config.base_url, "http://pos.local:9000");
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.timeout, 5);
        assert_eq!(config.earnings_refresh_interval, Duration::from_secs(10));
    }

    #[test]
    fn test_default_points_at_localhost() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.token.is_none());
        assert_eq!(config.timeout, 30);
    }
}
