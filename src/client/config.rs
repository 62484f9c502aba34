use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};

/// Default server URL
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Environment variable overriding the server URL
pub const SERVER_URL_ENV: &str = "BOARDSYNC_API_URL";

/// Client configuration wrapper.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
}

impl Default for Config {
    fn default() -> Self {
        let app = AppConfig::builder()
            .server_url(DEFAULT_SERVER_URL)
            .build()
            .expect("default app config is valid");
        Self { app }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the server URL from `BOARDSYNC_API_URL`, falling back to the default
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_url =
            std::env::var(SERVER_URL_ENV).unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        Self::with_builder(AppConfig::builder().server_url(server_url))
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        let app = builder.build()?;
        Ok(Self { app })
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.app.server_url, self.app.api_prefix, path)
    }

    /// Engine.IO endpoint URL
    pub fn socket_url(&self) -> String {
        format!("{}{}", self.app.server_url, self.app.socket_path)
    }

    pub fn server_url(&self) -> &str {
        &self.app.server_url
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }
}
