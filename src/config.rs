//! Configuration management for the Google Analytics MCP Server.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Google Analytics Data API base URL.
const DATA_API_BASE_URL: &str = "https://analyticsdata.googleapis.com/v1beta";

/// Google OAuth2 token endpoint.
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Pre-issued OAuth2 access token. When set, no token refresh is attempted.
    pub access_token: Option<String>,

    /// OAuth2 client ID (required unless access_token is set)
    pub client_id: Option<String>,

    /// OAuth2 client secret (required unless access_token is set)
    pub client_secret: Option<String>,

    /// OAuth2 refresh token with the analytics.readonly scope
    /// (required unless access_token is set)
    pub refresh_token: Option<String>,

    /// Override for the Data API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Override for the OAuth2 token endpoint
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Enable debug mode for MCP message logging
    #[serde(default)]
    pub debug: bool,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Buffer before token expiration to refresh (seconds)
    #[serde(default = "default_token_buffer")]
    pub token_refresh_buffer_seconds: u64,
}

fn default_api_base_url() -> String {
    DATA_API_BASE_URL.to_string()
}

fn default_token_url() -> String {
    GOOGLE_TOKEN_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_token_buffer() -> u64 {
    60
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.uses_static_token() {
            require("client_id", &self.client_id)?;
            require("client_secret", &self.client_secret)?;
            require("refresh_token", &self.refresh_token)?;
        }

        for (field, url) in [
            ("api_base_url", &self.api_base_url),
            ("token_url", &self.token_url),
        ] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(ConfigError::Invalid(format!(
                    "{} must be an http(s) URL, got '{}'",
                    field, url
                )));
            }
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "timeout_seconds must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Whether a pre-issued access token is configured.
    pub fn uses_static_token(&self) -> bool {
        matches!(&self.access_token, Some(t) if !t.is_empty())
    }

    /// Get the Data API base URL without a trailing slash.
    pub fn api_base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    /// Get timeout as Duration.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }

    /// Get token refresh buffer as chrono Duration.
    pub fn token_buffer(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.token_refresh_buffer_seconds as i64)
    }
}

fn require(field: &str, value: &Option<String>) -> Result<(), ConfigError> {
    match value {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(ConfigError::MissingField(format!(
            "{} (required unless access_token is set)",
            field
        ))),
    }
}
