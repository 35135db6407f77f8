use std::time::Duration;

/// API client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the API, including the version prefix.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api/v1".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("discipulado-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Create an ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `DISCIPULADO_API_URL`: Base URL of the API
    /// - `DISCIPULADO_HTTP_TIMEOUT_SECS`: Per-request timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("DISCIPULADO_API_URL") {
            config.base_url = url;
        }
        if let Some(secs) = std::env::var("DISCIPULADO_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }
}
