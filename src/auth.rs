//! OAuth2 access tokens for the Google Analytics Data API.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::error::AuthError;

/// OAuth2 token response from Google.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[allow(dead_code)]
    token_type: String,
    expires_in: i64,
    #[allow(dead_code)]
    #[serde(default)]
    scope: String,
}

/// Cached token with expiration tracking.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Check if token is expired (with buffer).
    fn is_expired(&self, buffer: Duration) -> bool {
        Utc::now() + buffer >= self.expires_at
    }
}

/// OAuth2 client exchanging a refresh token for access tokens.
/// Also supports a static, pre-issued access token.
#[derive(Clone)]
pub struct OAuth2Client {
    config: Config,
    http_client: Client,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

impl OAuth2Client {
    /// Create a new OAuth2 client.
    pub fn new(config: Config) -> Result<Self, AuthError> {
        let http_client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AuthError::HttpClientInit(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
            token_cache: Arc::new(RwLock::new(None)),
        })
    }

    /// Get a valid access token, refreshing if necessary.
    pub async fn get_token(&self) -> Result<String, AuthError> {
        if self.config.uses_static_token() {
            return self.config.access_token.clone().ok_or(AuthError::NoToken);
        }

        {
            let cache = self.token_cache.read().await;
            if let Some(ref cached) = *cache {
                if !cached.is_expired(self.config.token_buffer()) {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        self.fetch_token().await
    }

    /// Exchange the refresh token at the token endpoint.
    async fn fetch_token(&self) -> Result<String, AuthError> {
        let client_id = self
            .config
            .client_id
            .as_ref()
            .ok_or_else(|| AuthError::TokenParse("Missing client_id".to_string()))?;
        let client_secret = self
            .config
            .client_secret
            .as_ref()
            .ok_or_else(|| AuthError::TokenParse("Missing client_secret".to_string()))?;
        let refresh_token = self
            .config
            .refresh_token
            .as_ref()
            .ok_or_else(|| AuthError::TokenParse("Missing refresh_token".to_string()))?;

        let auth_header = basic_auth_header(client_id, client_secret);
        let body = refresh_grant_body(refresh_token);

        tracing::debug!(url = %self.config.token_url, "Refreshing access token");

        let response = self
            .http_client
            .post(&self.config.token_url)
            .header("Authorization", &auth_header)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "Token request failed");
            return Err(AuthError::TokenRequestFailed { status, body });
        }

        let token_response: TokenResponse = response.json().await.map_err(|e| {
            AuthError::TokenParse(format!("Failed to parse token response: {}", e))
        })?;

        let expires_at = Utc::now() + Duration::seconds(token_response.expires_in);
        tracing::debug!(
            expires_at = %expires_at.format("%Y-%m-%d %H:%M:%S UTC"),
            "Access token acquired"
        );

        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(CachedToken {
                access_token: token_response.access_token.clone(),
                expires_at,
            });
        }

        Ok(token_response.access_token)
    }
}

/// `client_secret_basic` authorization header value.
fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    let credentials = format!("{}:{}", client_id, client_secret);
    format!("Basic {}", BASE64.encode(credentials.as_bytes()))
}

/// Form body for the refresh_token grant.
fn refresh_grant_body(refresh_token: &str) -> String {
    format!(
        "grant_type=refresh_token&refresh_token={}",
        urlencoding::encode(refresh_token)
    )
}

impl std::fmt::Debug for OAuth2Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.config.uses_static_token() {
            f.debug_struct("OAuth2Client")
                .field("mode", &"static")
                .finish()
        } else {
            f.debug_struct("OAuth2Client")
                .field("client_id", &self.config.client_id)
                .field("token_url", &self.config.token_url)
                .finish()
        }
    }
}
