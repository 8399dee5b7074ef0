//! HTTP Transport
//!
//! Seam between the batch driver and the network

use async_trait::async_trait;
use reqwest::header::HeaderMap;

use crate::error::Result;

/// Response of a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,

    /// Canonical reason phrase for `status`
    pub reason: String,

    /// Response body
    pub body: String,
}

impl TransportResponse {
    /// Build a response, deriving the reason phrase from the status code
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason_phrase(status),
            body: body.into(),
        }
    }
}

/// Canonical reason phrase for a status code
pub fn reason_phrase(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unknown")
        .to_string()
}

/// Perform a request and return status and body
///
/// Errors are transport-level only (connection, timeout); HTTP error
/// statuses are returned as responses.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &str, headers: &HeaderMap, body: Vec<u8>)
        -> Result<TransportResponse>;
}

/// reqwest-backed transport
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        url: &str,
        headers: &HeaderMap,
        body: Vec<u8>,
    ) -> Result<TransportResponse> {
        let response = self
            .client
            .post(url)
            .headers(headers.clone())
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(status, error = %e, "failed to read response body");
                String::new()
            }
        };
        tracing::debug!(status, "received response");

        Ok(TransportResponse::new(status, body))
    }
}
