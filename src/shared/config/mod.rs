//! Application configuration module
//!
//! Provides the validated configuration shared by the REST client and the
//! push-channel transport.

use std::time::Duration;
use thiserror::Error;

/// Default API prefix appended to the server URL for REST calls
pub const DEFAULT_API_PREFIX: &str = "/api";
/// Default Socket.IO namespace for board events
pub const DEFAULT_SOCKET_NAMESPACE: &str = "/board";
/// Default Engine.IO endpoint path
pub const DEFAULT_SOCKET_PATH: &str = "/socket.io/";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_RECONNECT_DELAY: Duration = Duration::from_secs(30);

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server URL, without a trailing slash
    pub server_url: String,
    /// Prefix for every REST route
    pub api_prefix: String,
    /// Socket.IO namespace joined by the push channel
    pub socket_namespace: String,
    /// Engine.IO endpoint path
    pub socket_path: String,
    /// Per-request timeout for REST calls
    pub request_timeout: Duration,
    /// Upper bound of the push-channel reconnect backoff
    pub max_reconnect_delay: Duration,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.server_url.clone()));
        }
        if !self.socket_namespace.starts_with('/') {
            return Err(ConfigError::InvalidNamespace(self.socket_namespace.clone()));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::MissingValue("request_timeout"));
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    api_prefix: Option<String>,
    socket_namespace: Option<String>,
    socket_path: Option<String>,
    request_timeout: Option<Duration>,
    max_reconnect_delay: Option<Duration>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the REST route prefix
    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = Some(prefix.into());
        self
    }

    /// Set the Socket.IO namespace
    pub fn socket_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.socket_namespace = Some(namespace.into());
        self
    }

    /// Set the Engine.IO endpoint path
    pub fn socket_path(mut self, path: impl Into<String>) -> Self {
        self.socket_path = Some(path.into());
        self
    }

    /// Set the REST request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the reconnect backoff ceiling
    pub fn max_reconnect_delay(mut self, delay: Duration) -> Self {
        self.max_reconnect_delay = Some(delay);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let server_url = self
            .server_url
            .ok_or(ConfigError::MissingValue("server_url"))?
            .trim_end_matches('/')
            .to_string();

        let config = AppConfig {
            server_url,
            api_prefix: self.api_prefix.unwrap_or_else(|| DEFAULT_API_PREFIX.to_string()),
            socket_namespace: self
                .socket_namespace
                .unwrap_or_else(|| DEFAULT_SOCKET_NAMESPACE.to_string()),
            socket_path: self.socket_path.unwrap_or_else(|| DEFAULT_SOCKET_PATH.to_string()),
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            max_reconnect_delay: self.max_reconnect_delay.unwrap_or(DEFAULT_MAX_RECONNECT_DELAY),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid socket namespace: {0}")]
    InvalidNamespace(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}
