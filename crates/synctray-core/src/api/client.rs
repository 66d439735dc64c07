//! REST client for the Syncthing management API.
//!
//! Every request carries the `X-API-Key` header and is bounded by a single
//! total timeout. Responses are accepted only on an exact status match.

use std::time::Duration;

use bytes::Bytes;
use reqwest::{Method, StatusCode};
use synctray_config::DaemonEndpoint;
use tracing::{debug, warn};

use super::types::VersionInfo;

/// Upper bound on any single request, connect through body read.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

pub const VERSION_PATH: &str = "/rest/system/version";
pub const RESTART_PATH: &str = "/rest/system/restart";
pub const SHUTDOWN_PATH: &str = "/rest/system/shutdown";

/// Failures of a single HTTP exchange with the daemon.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// DNS, connect, timeout, or body-read failure.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP: {method} {path}, want {}, but returned {}", .want.as_u16(), .got.as_u16())]
    UnexpectedStatus {
        method: Method,
        path: String,
        want: StatusCode,
        got: StatusCode,
    },
}

impl HttpError {
    /// Whether the request was aborted by [`REQUEST_TIMEOUT`].
    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::Transport(e) if e.is_timeout())
    }
}

/// A response body that did not match the expected JSON shape.
#[derive(Debug, thiserror::Error)]
#[error("failed to decode {path} response: {source}")]
pub struct DecodeError {
    pub path: String,
    pub source: serde_json::Error,
}

/// Errors from the typed API operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Client bound to one daemon endpoint for its whole lifetime.
#[derive(Debug, Clone)]
pub struct ApiClient {
    endpoint: DaemonEndpoint,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client with the standard [`REQUEST_TIMEOUT`].
    pub fn new(endpoint: DaemonEndpoint) -> Result<Self, HttpError> {
        Self::with_timeout(endpoint, REQUEST_TIMEOUT)
    }

    /// Create a client whose requests are all bounded by `timeout`.
    ///
    /// Proxy settings from the environment are ignored: the daemon is a
    /// local endpoint and the API key must not leave the host.
    pub fn with_timeout(endpoint: DaemonEndpoint, timeout: Duration) -> Result<Self, HttpError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()?;
        Ok(Self { endpoint, http })
    }

    /// Base URL of the daemon, e.g. `http://127.0.0.1:8384`.
    pub fn base_url(&self) -> &str {
        self.endpoint.base_url()
    }

    /// Issue an authenticated request and return the body if, and only if,
    /// the response status equals `expected`.
    ///
    /// The body is read in full before the status is checked.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        expected: StatusCode,
    ) -> Result<Bytes, HttpError> {
        let url = format!("{}{path}", self.endpoint.base_url());
        debug!(%method, path, "daemon request");

        let response = self
            .http
            .request(method.clone(), &url)
            .header(API_KEY_HEADER, self.endpoint.api_key().expose())
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if status != expected {
            warn!(%method, path, status = status.as_u16(), "unexpected daemon response status");
            return Err(HttpError::UnexpectedStatus {
                method,
                path: path.to_string(),
                want: expected,
                got: status,
            });
        }

        debug!(%method, path, status = status.as_u16(), len = body.len(), "daemon response");
        Ok(body)
    }

    async fn get(&self, path: &str) -> Result<Bytes, HttpError> {
        self.send(Method::GET, path, StatusCode::OK).await
    }

    async fn post(&self, path: &str) -> Result<Bytes, HttpError> {
        self.send(Method::POST, path, StatusCode::OK).await
    }

    // ── Typed API methods ──────────────────────────────────────────────

    /// Fetch the daemon's version details.
    pub async fn version_info(&self) -> Result<VersionInfo, ClientError> {
        let body = self.get(VERSION_PATH).await?;
        serde_json::from_slice(&body).map_err(|source| {
            DecodeError {
                path: VERSION_PATH.to_string(),
                source,
            }
            .into()
        })
    }

    /// Human-readable version label, e.g. `Syncthing 1.18.0 (windows/amd64)`.
    pub async fn version(&self) -> Result<String, ClientError> {
        Ok(self.version_info().await?.label())
    }

    /// Restart the daemon.
    pub async fn restart(&self) -> Result<(), ClientError> {
        self.post(RESTART_PATH).await?;
        Ok(())
    }

    /// Stop the daemon without restarting it.
    pub async fn shutdown(&self) -> Result<(), ClientError> {
        self.post(SHUTDOWN_PATH).await?;
        Ok(())
    }
}
