//! Console settings
//!
//! Layered lowest to highest: built-in defaults, an optional TOML file,
//! `DISPATCH_*` environment variables, then command-line flags (applied by
//! the binary).

use dispatch_client::{ApiConfig, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the backend URL
pub const ENV_API_URL: &str = "DISPATCH_API_URL";
/// Environment variable overriding the session file location
pub const ENV_SESSION_FILE: &str = "DISPATCH_SESSION_FILE";
/// Environment variable overriding the request timeout, in seconds
pub const ENV_REQUEST_TIMEOUT: &str = "DISPATCH_REQUEST_TIMEOUT_SECS";
/// Environment variable naming the TOML settings file
pub const ENV_CONFIG: &str = "DISPATCH_CONFIG";

/// Settings failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Settings file unreadable
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Settings file is not valid TOML for [`ConsoleConfig`]
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: toml::de::Error,
    },

    /// A value is out of range
    #[error("invalid {key}: {reason}")]
    Invalid {
        /// Setting name
        key: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Views that poll, each with its own interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// Order lists and the kitchen board
    Orders,
    /// Admin vendor list
    Vendors,
    /// Vendor earnings
    Earnings,
    /// Admin and vendor dashboards
    Dashboard,
    /// Delivery fleet
    Partners,
}

/// Poll interval per view, in seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PollIntervals {
    /// Order lists and the kitchen board
    pub orders_secs: u64,
    /// Admin vendor list
    pub vendors_secs: u64,
    /// Vendor earnings
    pub earnings_secs: u64,
    /// Dashboards
    pub dashboard_secs: u64,
    /// Delivery fleet
    pub partners_secs: u64,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            orders_secs: 10,
            vendors_secs: 10,
            earnings_secs: 10,
            dashboard_secs: 5,
            partners_secs: 5,
        }
    }
}

impl PollIntervals {
    /// Interval for `view`
    #[must_use]
    pub fn for_view(&self, view: ViewKind) -> Duration {
        Duration::from_secs(match view {
            ViewKind::Orders => self.orders_secs,
            ViewKind::Vendors => self.vendors_secs,
            ViewKind::Earnings => self.earnings_secs,
            ViewKind::Dashboard => self.dashboard_secs,
            ViewKind::Partners => self.partners_secs,
        })
    }
}

/// Resolved console settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Backend base URL
    pub api_url: String,
    /// Where the signed-in user is stored
    pub session_file: PathBuf,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Poll intervals
    pub poll: PollIntervals,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            session_file: default_session_file(),
            request_timeout_secs: 15,
            poll: PollIntervals::default(),
        }
    }
}

/// `$HOME/.dispatch-console/session.json`, or a file in the working
/// directory when there is no home
#[must_use]
pub fn default_session_file() -> PathBuf {
    std::env::var_os("HOME").map_or_else(
        || PathBuf::from(".dispatch-session.json"),
        |home| PathBuf::from(home).join(".dispatch-console").join("session.json"),
    )
}

impl ConsoleConfig {
    /// Defaults, then `file`, then the process environment
    ///
    /// # Errors
    /// See [`ConfigError`].
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(file, |key| std::env::var(key).ok())
    }

    /// Like [`load`](Self::load) with an explicit environment lookup
    ///
    /// # Errors
    /// See [`ConfigError`].
    pub fn load_with(
        file: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML settings file; missing keys keep their defaults
    ///
    /// # Errors
    /// `Read` or `Parse`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay `DISPATCH_*` variables
    ///
    /// # Errors
    /// `Invalid` when the timeout is not a number.
    pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(url) = env(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        if let Some(path) = env(ENV_SESSION_FILE).filter(|v| !v.trim().is_empty()) {
            self.session_file = PathBuf::from(path);
        }
        if let Some(raw) = env(ENV_REQUEST_TIMEOUT) {
            self.request_timeout_secs =
                raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    key: "request_timeout_secs",
                    reason: format!("{raw:?} is not a whole number of seconds"),
                })?;
        }
        Ok(())
    }

    /// Check ranges
    ///
    /// # Errors
    /// `Invalid` naming the first bad setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "api_url",
                reason: format!("{:?} is not an http(s) URL", self.api_url),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "request_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        let poll = &self.poll;
        for (key, secs) in [
            ("poll.orders_secs", poll.orders_secs),
            ("poll.vendors_secs", poll.vendors_secs),
            ("poll.earnings_secs", poll.earnings_secs),
            ("poll.dashboard_secs", poll.dashboard_secs),
            ("poll.partners_secs", poll.partners_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Client settings derived from this config
    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.api_url.clone())
            .with_timeout(Duration::from_secs(self.request_timeout_secs))
    }
}
