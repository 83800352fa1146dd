//! Wire types for the Candidate RAG backend.
//!
//! Field names follow the backend's snake_case JSON exactly. Optional
//! request fields are omitted rather than sent as `null`, since the backend
//! treats a present-but-null `conversation_id` differently from a missing one.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

/// Retrieval metadata attached to a chat reply.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ResponseMeta {
    #[serde(default)]
    pub is_partial: bool,
    #[serde(default)]
    pub missing_information: Vec<String>,
    #[serde(default)]
    pub has_results: bool,
    #[serde(default)]
    pub result_count: u32,
    #[serde(default)]
    pub is_followup: Option<bool>,
}

/// Successful reply from `POST /api/chat`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub meta: Option<ResponseMeta>,
    /// Issued by the backend on the first message of a conversation.
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Body of `POST /api/conversation/clear`. An empty body clears everything.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ClearRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ClearResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

/// Shape of the backend's error bodies (`{"error": "..."}`).
#[derive(Deserialize, Debug, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
