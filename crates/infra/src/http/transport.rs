use async_trait::async_trait;
use thiserror::Error;

use super::request::RequestConfig;
use super::response::TransportResponse;

/// Transport-level failure, split by how far the request got
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The server answered with a non-success status
    #[error("server responded with status {}", .0.status)]
    Status(TransportResponse),

    /// The request was sent but no response arrived
    #[error("no response received: {0}")]
    NoResponse(String),

    /// The request could not be constructed
    #[error("request setup failed: {0}")]
    Setup(String),
}

impl TransportError {
    /// Status code of the response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(response) => Some(response.status),
            Self::NoResponse(_) | Self::Setup(_) => None,
        }
    }
}

/// Executes a single request, without retries or token handling
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &RequestConfig) -> Result<TransportResponse, TransportError>;
}
