//! Unified error types for the Google Analytics MCP Server.

use reqwest::StatusCode;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Token request failed with status {status}: {body}")]
    TokenRequestFailed { status: StatusCode, body: String },

    #[error("Token parse error: {0}")]
    TokenParse(String),

    #[error("No token available")]
    NoToken,

    #[error("Failed to create HTTP client: {0}")]
    HttpClientInit(String),
}

/// Data API request/response errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("Google API error {code} [{status}]: {message}")]
    GoogleError {
        code: u16,
        status: String,
        message: String,
    },

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to create HTTP client: {0}")]
    HttpClientInit(String),
}

/// Why a property reference could not be turned into a resource name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidReference {
    #[error("Must supply a property ID")]
    Missing,

    #[error("Invalid property ID '{0}': expected a number or 'properties/<number>'")]
    NonNumericId(String),

    #[error("Invalid resource name '{0}': expected exactly 2 components separated by '/'")]
    ComponentCount(String),

    #[error("Invalid resource name '{0}': first component must be 'properties'")]
    WrongPrefix(String),

    #[error("Invalid resource name '{0}': property ID must be numeric")]
    NonNumericQualifiedId(String),
}
