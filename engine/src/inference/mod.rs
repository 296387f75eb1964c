//! Remote Inference Client
//!
//! The decision analysis itself happens in an external service. This module
//! defines the single seam the engine talks to it through: hand over an
//! ordered transcript, get one answer back.
//!
//! [`InferenceClient`] is a trait so the conversation controller can be driven
//! by the HTTP implementation in production and by scripted clients in tests.

use async_trait::async_trait;
use sdk::errors::EngineError;
use sdk::types::ChatMessage;

pub mod http;

pub use http::HttpInferenceClient;

/// Result type for inference calls
pub type Result<T> = std::result::Result<T, RemoteCallError>;

/// Errors that can occur while calling the inference backend
#[derive(Debug, thiserror::Error)]
pub enum RemoteCallError {
    /// Backend answered with a non-success status
    #[error("Backend {status}: {body}")]
    Status { status: u16, body: String },

    /// Backend answered 2xx but the body was not `{"answer": string}`
    #[error("Backend {status} returned an unreadable body ({reason}): {body}")]
    MalformedBody {
        status: u16,
        body: String,
        reason: String,
    },

    /// Request did not complete within the configured timeout
    #[error("Backend request timed out")]
    Timeout,

    /// Connection or transport failure before any status was received
    #[error("Network error: {0}")]
    Network(String),
}

impl RemoteCallError {
    /// HTTP status code, when the backend got far enough to send one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } | Self::MalformedBody { status, .. } => Some(*status),
            Self::Timeout | Self::Network(_) => None,
        }
    }

    /// Best-effort response body text
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } | Self::MalformedBody { body, .. } => Some(body),
            Self::Timeout | Self::Network(_) => None,
        }
    }
}

impl From<RemoteCallError> for EngineError {
    fn from(err: RemoteCallError) -> Self {
        EngineError::RemoteCall(err.to_string())
    }
}

/// Single-call bridge to an inference backend
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Send `transcript` and return the backend's answer
    ///
    /// # Arguments
    /// * `transcript` - Role-tagged conversation, oldest first, ending with
    ///   the question being asked
    ///
    /// # Returns
    /// * `Ok(String)` - The answer text, possibly empty
    /// * `Err(RemoteCallError)` - Transport failure, non-2xx status or a body
    ///   without an `answer` string
    async fn ask(&self, transcript: &[ChatMessage]) -> Result<String>;
}
