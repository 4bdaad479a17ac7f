//! Client settings

use std::time::Duration;

/// Backend used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://web-backend-8rdu.onrender.com";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Connection settings for [`crate::ApiClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Scheme, host and optional prefix; request paths are appended verbatim
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// `User-Agent` header
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("dispatch-console/{}", crate::VERSION),
        }
    }
}

impl ApiConfig {
    /// Config pointing at `base_url` with default settings otherwise
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// With timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Absolute URL for `path`
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_without_double_slashes() {
        let config = ApiConfig::new("http://localhost:5000/api/");
        assert_eq!(config.url("/orders"), "http://localhost:5000/api/orders");
        assert_eq!(config.url("vendors"), "http://localhost:5000/api/vendors");
    }

    #[test]
    fn defaults_to_hosted_backend() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }
}
