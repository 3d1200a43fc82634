//! Feed configuration
//!
//! Where the span server lives and how patiently to talk to it. Loaded from
//! TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! base_url = "http://127.0.0.1:8765"
//! stream_path = "/api/spans/stream"
//! history_path = "/api/spans/history"
//! connect_timeout_ms = 5000
//! read_timeout_ms = 45000
//! retry_delay_ms = 1000
//! max_retry_delay_ms = 30000
//! ```

use serde::{Deserialize, Serialize};
use spanscope_core::{Error, Result};
use std::path::Path;
use std::time::Duration;

/// Default span server address
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8765";
/// Default live stream endpoint
pub const DEFAULT_STREAM_PATH: &str = "/api/spans/stream";
/// Default history endpoint
pub const DEFAULT_HISTORY_PATH: &str = "/api/spans/history";

/// Connection settings for the span server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Scheme, host and port of the span server
    pub base_url: String,
    /// Path of the `text/event-stream` endpoint
    pub stream_path: String,
    /// Path of the JSON history endpoint
    pub history_path: String,
    /// TCP connect timeout
    pub connect_timeout_ms: u64,
    /// Maximum silence on the stream before the connection is considered dead.
    /// The server sends a keepalive every 15 s.
    pub read_timeout_ms: u64,
    /// First reconnect delay
    pub retry_delay_ms: u64,
    /// Cap for the doubling reconnect delay
    pub max_retry_delay_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            stream_path: DEFAULT_STREAM_PATH.to_string(),
            history_path: DEFAULT_HISTORY_PATH.to_string(),
            connect_timeout_ms: 5_000,
            read_timeout_ms: 45_000,
            retry_delay_ms: 1_000,
            max_retry_delay_ms: 30_000,
        }
    }
}

impl FeedConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: FeedConfig =
            toml::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Replace the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Check field consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "base_url must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        for (field, path) in [
            ("stream_path", &self.stream_path),
            ("history_path", &self.history_path),
        ] {
            if !path.starts_with('/') {
                return Err(Error::Config(format!("{} must start with '/', got {:?}", field, path)));
            }
        }
        if self.retry_delay_ms == 0 || self.retry_delay_ms > self.max_retry_delay_ms {
            return Err(Error::Config(format!(
                "retry_delay_ms ({}) must be non-zero and <= max_retry_delay_ms ({})",
                self.retry_delay_ms, self.max_retry_delay_ms
            )));
        }
        Ok(())
    }

    /// Full URL of the live stream
    pub fn stream_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.stream_path)
    }

    /// Full URL of the history endpoint
    pub fn history_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.history_path)
    }

    /// Connect timeout as a `Duration`
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Read timeout as a `Duration`
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}
