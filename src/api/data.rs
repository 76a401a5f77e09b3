//! Google Analytics Data API client (REST, v1beta).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::types::{Metadata, RunRealtimeReportRequest, RunReportRequest};
use crate::auth::OAuth2Client;
use crate::error::ApiError;
use crate::property::PropertyName;

/// Operations the tool layer needs from the Data API.
#[async_trait]
pub trait ReportingApi: Send + Sync {
    /// Fetch dimension and metric metadata for a property.
    async fn get_metadata(&self, property: &PropertyName) -> Result<Metadata, ApiError>;

    /// Run a core report.
    async fn run_report(
        &self,
        property: &PropertyName,
        request: &RunReportRequest,
    ) -> Result<Value, ApiError>;

    /// Run a realtime report.
    async fn run_realtime_report(
        &self,
        property: &PropertyName,
        request: &RunRealtimeReportRequest,
    ) -> Result<Value, ApiError>;
}

/// Google API error envelope.
#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    code: u16,
    message: String,
    #[serde(default)]
    status: String,
}

/// Data API client.
#[derive(Clone)]
pub struct DataClient {
    base_url: String,
    http_client: Client,
    auth_client: OAuth2Client,
}

impl DataClient {
    pub fn new(
        base_url: &str,
        auth_client: OAuth2Client,
        timeout: std::time::Duration,
    ) -> Result<Self, ApiError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::HttpClientInit(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            auth_client,
        })
    }

    fn metadata_url(&self, property: &PropertyName) -> String {
        format!("{}/{}", self.base_url, property.metadata_name())
    }

    fn method_url(&self, property: &PropertyName, method: &str) -> String {
        format!("{}/{}:{}", self.base_url, property, method)
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        tracing::debug!(url = %url, "Data API GET request");

        let token = self.auth_client.get_token().await?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(token)
            .header("Accept", "application/json")
            .send()
            .await?;

        handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        tracing::debug!(url = %url, "Data API POST request");

        let token = self.auth_client.get_token().await?;

        let response = self
            .http_client
            .post(url)
            .bearer_auth(token)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;

        handle_response(response).await
    }
}

#[async_trait]
impl ReportingApi for DataClient {
    async fn get_metadata(&self, property: &PropertyName) -> Result<Metadata, ApiError> {
        self.get(&self.metadata_url(property)).await
    }

    async fn run_report(
        &self,
        property: &PropertyName,
        request: &RunReportRequest,
    ) -> Result<Value, ApiError> {
        self.post(&self.method_url(property, "runReport"), request).await
    }

    async fn run_realtime_report(
        &self,
        property: &PropertyName,
        request: &RunRealtimeReportRequest,
    ) -> Result<Value, ApiError> {
        self.post(&self.method_url(property, "runRealtimeReport"), request)
            .await
    }
}

/// Parse a success body, or turn a failure into the matching error.
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        tracing::debug!(%status, bytes = body.len(), "Data API response");
        Ok(serde_json::from_str(&body)?)
    } else {
        tracing::warn!(%status, "Data API error response");
        Err(parse_error_response(status, &body))
    }
}

fn parse_error_response(status: StatusCode, body: &str) -> ApiError {
    match serde_json::from_str::<GoogleErrorResponse>(body) {
        Ok(envelope) => ApiError::GoogleError {
            code: envelope.error.code,
            status: envelope.error.status,
            message: envelope.error.message,
        },
        Err(_) => ApiError::HttpError {
            status,
            body: body.to_string(),
        },
    }
}

impl std::fmt::Debug for DataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn client(base_url: &str) -> DataClient {
        let config = Config::from_json(r#"{"access_token": "t"}"#).unwrap();
        let auth = OAuth2Client::new(config.clone()).unwrap();
        DataClient::new(base_url, auth, config.timeout()).unwrap()
    }

    #[test]
    fn test_urls() {
        let client = client("https://analyticsdata.googleapis.com/v1beta/");
        let property: PropertyName = "123".parse().unwrap();

        assert_eq!(
            client.metadata_url(&property),
            "https://analyticsdata.googleapis.com/v1beta/properties/123/metadata"
        );
        assert_eq!(
            client.method_url(&property, "runReport"),
            "https://analyticsdata.googleapis.com/v1beta/properties/123:runReport"
        );
        assert_eq!(
            client.method_url(&property, "runRealtimeReport"),
            "https://analyticsdata.googleapis.com/v1beta/properties/123:runRealtimeReport"
        );
    }

    #[test]
    fn test_parse_google_error() {
        let body = r#"{"error": {"code": 400, "message": "Field foo is not a valid dimension.", "status": "INVALID_ARGUMENT"}}"#;
        match parse_error_response(StatusCode::BAD_REQUEST, body) {
            ApiError::GoogleError {
                code,
                status,
                message,
            } => {
                assert_eq!(code, 400);
                assert_eq!(status, "INVALID_ARGUMENT");
                assert!(message.contains("foo"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_non_json_error() {
        let error = parse_error_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert!(matches!(
            error,
            ApiError::HttpError { status, ref body } if status == StatusCode::BAD_GATEWAY && body.contains("bad gateway")
        ));
    }

    #[test]
    fn test_debug_shows_base_url() {
        let debug = format!("{:?}", client("http://localhost:1/v1beta"));
        assert!(debug.contains("http://localhost:1/v1beta"));
    }
}
