//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;
use async_trait::async_trait;

use crate::api::{ApiError, ChatBackend, ChatResponse, ClearResponse, HealthResponse};

/// A backend that never gets called. The reducer does no I/O, so most
/// tests only need something to put in `App::backend`.
pub struct NoopBackend;

#[async_trait]
impl ChatBackend for NoopBackend {
    fn location(&self) -> &str {
        "noop"
    }

    async fn send_message(
        &self,
        _message: &str,
        _conversation_id: Option<&str>,
    ) -> Result<ChatResponse, ApiError> {
        Err(ApiError::Network("noop backend".to_string()))
    }

    async fn clear_conversation(
        &self,
        _conversation_id: Option<&str>,
    ) -> Result<ClearResponse, ApiError> {
        Err(ApiError::Network("noop backend".to_string()))
    }

    async fn check_health(&self) -> Result<HealthResponse, ApiError> {
        Err(ApiError::Network("noop backend".to_string()))
    }
}

/// Creates a test App with a NoopBackend.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(Arc::new(NoopBackend))
}

/// A backend that answers immediately: echoes the message back under a
/// fixed conversation id and accepts every clear.
pub struct EchoBackend;

pub const ECHO_CONVERSATION_ID: &str = "conv-echo";

#[async_trait]
impl ChatBackend for EchoBackend {
    fn location(&self) -> &str {
        "echo"
    }

    async fn send_message(
        &self,
        message: &str,
        _conversation_id: Option<&str>,
    ) -> Result<ChatResponse, ApiError> {
        Ok(ChatResponse {
            response: format!("Echo: {message}"),
            success: true,
            meta: None,
            conversation_id: Some(ECHO_CONVERSATION_ID.to_string()),
        })
    }

    async fn clear_conversation(
        &self,
        _conversation_id: Option<&str>,
    ) -> Result<ClearResponse, ApiError> {
        Ok(ClearResponse {
            success: true,
            message: "Conversation cleared".to_string(),
        })
    }

    async fn check_health(&self) -> Result<HealthResponse, ApiError> {
        Ok(HealthResponse {
            status: "healthy".to_string(),
        })
    }
}
