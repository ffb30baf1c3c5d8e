//! HTTP client for runstub endpoints.
//!
//! [`RunstubClient`] wraps `reqwest::Client` and provides typed methods for
//! each endpoint. Used by the `runstub-load` binary and the integration tests.
//!
//! ## Error handling
//!
//! Non-2xx responses become [`ClientError::Status`] carrying the raw body, so
//! callers can still inspect a `401 {"error":"unauthorized"}`.

use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;

use crate::auth::API_KEY_HEADER;
use crate::build_info::BuildInfo;
use crate::routes::run::RunResponse;

/// `/version` body as seen by a client (owned strings, unlike [`BuildInfo`]).
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct RemoteVersion {
    pub version: String,
    pub commit: String,
    pub date: String,
}

impl PartialEq<BuildInfo> for RemoteVersion {
    fn eq(&self, other: &BuildInfo) -> bool {
        self.version == other.version && self.commit == other.commit && self.date == other.date
    }
}

/// HTTP client for a single runstub instance.
#[derive(Clone)]
pub struct RunstubClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RunstubClient {
    /// Create a new client for the service at `base_url`.
    ///
    /// `api_key` is sent as `X-API-Key` on `/run` when non-empty.
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ClientError::Request)?;
        Ok(Self {
            http,
            // Strip trailing slash for consistent URL construction
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    /// The service's base URL (without trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /healthz`: returns the plain-text body.
    pub async fn healthz(&self) -> Result<String, ClientError> {
        let resp = self
            .http
            .get(format!("{}/healthz", self.base_url))
            .send()
            .await
            .map_err(ClientError::Request)?;
        let resp = Self::check_status(resp).await?;
        resp.text().await.map_err(ClientError::Request)
    }

    /// `GET /version`: build metadata.
    pub async fn version(&self) -> Result<RemoteVersion, ClientError> {
        let resp = self
            .http
            .get(format!("{}/version", self.base_url))
            .send()
            .await
            .map_err(ClientError::Request)?;
        let resp = Self::check_status(resp).await?;
        resp.json()
            .await
            .map_err(|e| ClientError::Protocol(format!("invalid /version body: {e}")))
    }

    /// `GET /run`: the gated placeholder action.
    pub async fn run(&self) -> Result<RunResponse, ClientError> {
        let resp = self.run_raw().await?;
        let resp = Self::check_status(resp).await?;
        resp.json()
            .await
            .map_err(|e| ClientError::Protocol(format!("invalid /run body: {e}")))
    }

    /// `GET /run` returning only the status code, without interpreting it.
    pub async fn run_status(&self) -> Result<StatusCode, ClientError> {
        Ok(self.run_raw().await?.status())
    }

    async fn run_raw(&self) -> Result<reqwest::Response, ClientError> {
        let mut req = self.http.get(format!("{}/run", self.base_url));
        if let Some(ref key) = self.api_key {
            req = req.header(API_KEY_HEADER, key);
        }
        req.send().await.map_err(ClientError::Request)
    }

    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ClientError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

/// Errors from [`RunstubClient`] operations.
#[derive(Debug)]
pub enum ClientError {
    /// HTTP transport error (connection refused, timeout, DNS failure, etc.).
    Request(reqwest::Error),
    /// The service returned a non-2xx HTTP status.
    Status { status: u16, body: String },
    /// The response body did not have the expected shape.
    Protocol(String),
}

impl ClientError {
    /// Returns `true` if the service answered `401 Unauthorized`.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Status { status: 401, .. })
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Request(e) => write!(f, "HTTP request failed: {e}"),
            ClientError::Status { status, body } => write!(f, "HTTP {status}: {body}"),
            ClientError::Protocol(msg) => write!(f, "Protocol error: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Request(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_stripped() {
        let client = RunstubClient::new("http://localhost:8080/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_empty_key_not_sent() {
        let client = RunstubClient::new("http://localhost:8080", Some(String::new())).unwrap();
        assert!(client.api_key.is_none());
    }

    #[test]
    fn test_unauthorized_detection() {
        let err = ClientError::Status {
            status: 401,
            body: r#"{"error":"unauthorized"}"#.to_string(),
        };
        assert!(err.is_unauthorized());
        assert!(!ClientError::Protocol("x".into()).is_unauthorized());
    }
}
