//! Delivery of a single chunk to the sink
//!
//! A [`Sink`] performs exactly one transmission per call and never retries;
//! retrying is the job of [`crate::retry::RetryPolicy`].

use async_trait::async_trait;
use reqwest::Client;
use rowpush_common::{Result, SyncError};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::chunk::Chunk;

/// Characters of the response body kept for reporting
pub const RESPONSE_EXCERPT_CHARS: usize = 1000;

/// A 2xx answer from the sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkResponse {
    pub status: u16,
    pub body_excerpt: String,
}

/// Why one transmission of a chunk failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransmissionError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(String),

    #[error("sink responded with HTTP {status}: {body_excerpt}")]
    Status { status: u16, body_excerpt: String },

    #[error("failed to encode chunk: {0}")]
    Encode(String),
}

impl From<TransmissionError> for SyncError {
    fn from(err: TransmissionError) -> Self {
        SyncError::Transmission(err.to_string())
    }
}

/// Destination for chunks
#[async_trait]
pub trait Sink: Send + Sync {
    /// Transmit one chunk once
    async fn send(&self, chunk: &Chunk) -> std::result::Result<SinkResponse, TransmissionError>;

    /// Where chunks go, for logs and reports
    fn describe(&self) -> String;
}

/// POSTs each chunk as a JSON array to an HTTP(S) endpoint
#[derive(Debug, Clone)]
pub struct HttpSink {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpSink {
    /// Validate the endpoint and build the client; no request is made.
    ///
    /// An empty endpoint is [`SyncError::ConfigurationMissing`], a malformed
    /// or non-HTTP one is [`SyncError::InvalidConfiguration`].
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(SyncError::configuration_missing("sink URL is not set"));
        }

        let url = Url::parse(endpoint).map_err(|e| {
            SyncError::invalid_configuration(format!("sink URL '{}' is not valid: {}", endpoint, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SyncError::invalid_configuration(format!(
                "sink URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::invalid_configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: url,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn classify(&self, err: reqwest::Error) -> TransmissionError {
        if err.is_timeout() {
            TransmissionError::Timeout(self.timeout)
        } else if err.is_builder() {
            TransmissionError::Encode(err.to_string())
        } else {
            TransmissionError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl Sink for HttpSink {
    async fn send(&self, chunk: &Chunk) -> std::result::Result<SinkResponse, TransmissionError> {
        let body = serde_json::to_vec(chunk).map_err(|e| TransmissionError::Encode(e.to_string()))?;
        debug!(chunk = chunk.index(), rows = chunk.len(), bytes = body.len(), "POST chunk");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        // A 2xx is a success whatever the body holds, even if it cannot be read.
        let body = response.text().await.unwrap_or_default();
        let body_excerpt = excerpt(&body, RESPONSE_EXCERPT_CHARS);

        if status.is_success() {
            Ok(SinkResponse {
                status: status.as_u16(),
                body_excerpt,
            })
        } else {
            Err(TransmissionError::Status {
                status: status.as_u16(),
                body_excerpt,
            })
        }
    }

    fn describe(&self) -> String {
        self.endpoint.to_string()
    }
}

/// First `max_chars` characters of `body`
pub fn excerpt(body: &str, max_chars: usize) -> String {
    body.chars().take(max_chars).collect()
}
