//! Outbound HTTP transport to the counterparty

use async_trait::async_trait;
use reqwest::{Client, header};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::TransportError;

/// One fully-encoded outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WirePayload {
    /// Request body, SOAP envelope or JSON document
    pub body: String,
    /// Value for the `Content-Type` header
    pub content_type: &'static str,
    /// Value for the `SOAPAction` header, SOAP calls only
    pub soap_action: Option<String>,
}

impl WirePayload {
    #[must_use]
    pub fn soap(body: String, action: impl Into<String>) -> Self {
        Self {
            body,
            content_type: super::soap::SOAP_CONTENT_TYPE,
            soap_action: Some(action.into()),
        }
    }

    #[must_use]
    pub fn json(body: String) -> Self {
        Self {
            body,
            content_type: super::soap::JSON_CONTENT_TYPE,
            soap_action: None,
        }
    }
}

/// A channel to one counterparty endpoint
///
/// Implementations are immutable after construction and shared between
/// concurrent requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `payload` and return the raw response body
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] for dial/timeout failures, unreadable
    /// bodies and non-2xx statuses. Business rejections are not errors.
    async fn send(&self, payload: WirePayload) -> Result<String, TransportError>;

    /// URL this transport posts to
    fn endpoint(&self) -> &str;
}

/// reqwest-backed transport with a fixed per-call timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    /// Create a transport for `endpoint`
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, payload: WirePayload) -> Result<String, TransportError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, payload.content_type)
            .body(payload.body);
        if let Some(action) = &payload.soap_action {
            request = request.header("SOAPAction", action.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|source| TransportError::Connection {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| TransportError::Read {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        if !status.is_success() {
            warn!(
                endpoint = %self.endpoint,
                status = status.as_u16(),
                "Counterparty returned non-success status"
            );
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        debug!(endpoint = %self.endpoint, bytes = body.len(), "Counterparty response received");
        Ok(body)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
