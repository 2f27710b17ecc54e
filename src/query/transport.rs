//! HTTP transport for the GIDEON API
//!
//! The `Transport` trait is the seam between the query layer and the network.
//! `HttpTransport` is the production implementation on top of reqwest.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use super::Params;

/// Errors that prevent a request from producing any response
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (timeout, DNS, refused connection, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failure reported by a transport that is not backed by reqwest
    #[error("service unreachable: {0}")]
    Unreachable(String),
}

/// Status and body of a completed request, before any interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decodes the body as JSON
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Performs an authorized GET against the remote service
#[async_trait]
pub trait Transport: Send + Sync {
    /// Requests `path` with the given parameters and `Authorization` header value
    async fn get(
        &self,
        path: &str,
        params: &Params,
        authorization: &str,
    ) -> Result<RawResponse, TransportError>;
}

/// reqwest-backed transport rooted at a base URL
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport whose requests time out after `timeout`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Creates a transport with a custom HTTP client
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        path: &str,
        params: &Params,
        authorization: &str,
    ) -> Result<RawResponse, TransportError> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .get(&url)
            .header(AUTHORIZATION, authorization);
        if !params.is_empty() {
            request = request.query(params.pairs());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}
