pub mod client;
pub mod types;

pub use client::{ApiError, ChatBackend, HttpChatClient, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
pub use types::{ChatResponse, ClearResponse, HealthResponse, ResponseMeta};
