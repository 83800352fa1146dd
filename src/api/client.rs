use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use super::types::{
    ChatRequest, ChatResponse, ClearRequest, ClearResponse, ErrorBody, HealthResponse,
};

/// Default backend location when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
/// Per-request timeout applied when the config does not override it.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Errors that can occur while talking to the backend.
#[derive(Debug)]
pub enum ApiError {
    /// Client misconfigured (bad URL, TLS setup failure).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Backend answered with a non-success status.
    Api { status: u16, message: String },
    /// Backend answered 2xx but the body was not the expected JSON.
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(msg) => write!(f, "config error: {msg}"),
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The two chat operations plus a health check. One request, one JSON reply.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Human-readable location of the backend, shown in the title bar.
    fn location(&self) -> &str;

    async fn send_message(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<ChatResponse, ApiError>;

    /// Clears one conversation, or every conversation when `conversation_id` is `None`.
    async fn clear_conversation(
        &self,
        conversation_id: Option<&str>,
    ) -> Result<ClearResponse, ApiError>;

    async fn check_health(&self) -> Result<HealthResponse, ApiError>;
}

/// reqwest-backed client for the Candidate RAG REST API.
pub struct HttpChatClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpChatClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a response into `T`, or into an `ApiError` carrying the backend's
    /// `error` field (falling back to `default_message`).
    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
        default_message: &str,
    ) -> Result<T, ApiError> {
        let status = response.status();
        debug!("Backend response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| default_message.to_string());
            warn!("Backend error: {} - {}", status.as_u16(), body);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        debug!("Backend response body: {} bytes", body.len());
        serde_json::from_str(&body).map_err(|e| {
            warn!("Failed to parse backend response: {}", e);
            ApiError::Parse(e.to_string())
        })
    }
}

#[async_trait]
impl ChatBackend for HttpChatClient {
    fn location(&self) -> &str {
        &self.base_url
    }

    async fn send_message(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<ChatResponse, ApiError> {
        let request = ChatRequest {
            message: message.to_string(),
            conversation_id: conversation_id.map(str::to_string),
        };

        info!(
            "POST /api/chat: message_len={}, conversation_id={:?}",
            request.message.len(),
            request.conversation_id
        );

        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Error sending message: {}", e);
                ApiError::Network(e.to_string())
            })?;

        Self::read_json(response, "Failed to send message").await
    }

    async fn clear_conversation(
        &self,
        conversation_id: Option<&str>,
    ) -> Result<ClearResponse, ApiError> {
        let request = ClearRequest {
            conversation_id: conversation_id.map(str::to_string),
        };

        info!(
            "POST /api/conversation/clear: conversation_id={:?}",
            request.conversation_id
        );

        let response = self
            .client
            .post(self.url("/api/conversation/clear"))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Error clearing conversation: {}", e);
                ApiError::Network(e.to_string())
            })?;

        Self::read_json(response, "Failed to clear conversation").await
    }

    async fn check_health(&self) -> Result<HealthResponse, ApiError> {
        info!("GET /api/health");

        let response = self
            .client
            .get(self.url("/api/health"))
            .send()
            .await
            .map_err(|e| {
                warn!("Error checking health: {}", e);
                ApiError::Network(e.to_string())
            })?;

        Self::read_json(response, "Health check failed").await
    }
}
