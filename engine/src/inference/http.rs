//! HTTP inference client
//!
//! Talks to the decision backend over its one endpoint:
//!
//! ```text
//! POST {base_url}/ask
//! {"messages": [{"role": "user", "content": "..."}, ...]}
//!
//! 200 OK
//! {"answer": "..."}
//! ```
//!
//! A single attempt is made per call. There is no retry or backoff.

use async_trait::async_trait;
use reqwest::Client;
use sdk::errors::EngineError;
use sdk::types::ChatMessage;
use serde::{Deserialize, Serialize};

use super::{InferenceClient, RemoteCallError, Result};
use crate::config::{normalize_base_url, BackendConfig};

/// Path appended to the configured base URL
pub const ASK_PATH: &str = "/ask";

/// Inference client backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpInferenceClient {
    /// Base URL without trailing slash (e.g. "https://decide.example.com")
    base_url: String,

    /// HTTP client for API requests
    client: Client,
}

impl HttpInferenceClient {
    /// Create a client from a resolved backend configuration
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::BackendUrlMissing`] if the configuration has no
    /// base URL, [`EngineError::InvalidBackendUrl`] if it is not an absolute
    /// http(s) URL, or [`EngineError::Config`] if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> std::result::Result<Self, EngineError> {
        let base_url = normalize_base_url(config.base_url()?)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| EngineError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { base_url, client })
    }

    /// Full URL of the ask endpoint
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, ASK_PATH)
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn ask(&self, transcript: &[ChatMessage]) -> Result<String> {
        tracing::debug!(
            "Backend request: messages={}, total_chars={}",
            transcript.len(),
            transcript.iter().map(|m| m.content.len()).sum::<usize>()
        );

        let request = AskRequest {
            messages: transcript,
        };

        let url = self.endpoint();
        let start = std::time::Instant::now();
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RemoteCallError::Timeout
                } else if e.is_connect() {
                    RemoteCallError::Network(format!(
                        "Cannot connect to backend at {}",
                        self.base_url
                    ))
                } else {
                    RemoteCallError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        tracing::info!(
            "Backend responded {} in {:.1}s",
            status.as_u16(),
            start.elapsed().as_secs_f64()
        );

        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(RemoteCallError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: AskResponse =
            serde_json::from_str(&body).map_err(|e| RemoteCallError::MalformedBody {
                status: status.as_u16(),
                body: body.clone(),
                reason: e.to_string(),
            })?;

        Ok(parsed.answer)
    }
}

/// Request body for `POST /ask`
#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    messages: &'a [ChatMessage],
}

/// Response body for `POST /ask`
#[derive(Debug, Deserialize)]
struct AskResponse {
    answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_appends_ask_path() {
        let client =
            HttpInferenceClient::new(&BackendConfig::with_base_url("http://localhost:8000/"))
                .unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8000/ask");
        assert_eq!(client.name(), "http");
    }

    #[test]
    fn test_missing_base_url_is_an_error() {
        let err = HttpInferenceClient::new(&BackendConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::BackendUrlMissing));
    }

    #[test]
    fn test_blank_or_relative_base_url_is_rejected() {
        for url in ["", "   ", "/api", "decide.example.com"] {
            let err = HttpInferenceClient::new(&BackendConfig::with_base_url(url)).unwrap_err();
            assert!(
                matches!(err, EngineError::InvalidBackendUrl { .. }),
                "url {:?} gave {:?}",
                url,
                err
            );
        }
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![ChatMessage::user("Should I?"), ChatMessage::assistant("No.")];
        let body = serde_json::to_value(AskRequest {
            messages: &messages,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "messages": [
                    {"role": "user", "content": "Should I?"},
                    {"role": "assistant", "content": "No."}
                ]
            })
        );
    }

    #[test]
    fn test_response_requires_answer_field() {
        assert!(serde_json::from_str::<AskResponse>(r#"{"answer":"yes"}"#).is_ok());
        assert!(serde_json::from_str::<AskResponse>(r#"{"reply":"yes"}"#).is_err());
    }
}
