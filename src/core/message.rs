//! # Messages
//!
//! One entry in the conversation view. Messages are UI records, not the
//! backend's history: the backend keeps its own context keyed by the
//! conversation id, so nothing here is ever sent back except the raw text.

use chrono::{DateTime, Local};

use crate::api::ResponseMeta;

/// Fixed id of the greeting shown on startup and after every clear.
pub const WELCOME_ID: &str = "welcome";

pub const WELCOME_TEXT: &str = "👋 Welcome to the Candidate RAG Chatbot! \
    Ask me about candidates using natural language queries.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// Retrieval details shown beneath a bot reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageMetadata {
    pub result_count: Option<u32>,
    pub is_partial: Option<bool>,
    pub is_followup: Option<bool>,
    /// Query details the backend said it could not resolve.
    pub missing_information: Vec<String>,
}

impl MessageMetadata {
    /// Build from the backend's `meta` block. `is_followup` reflects whether the
    /// request carried a conversation id, not what the backend claims.
    pub fn from_response(meta: Option<&ResponseMeta>, is_followup: bool) -> Self {
        Self {
            result_count: meta.map(|m| m.result_count),
            is_partial: meta.map(|m| m.is_partial),
            is_followup: Some(is_followup),
            missing_information: meta
                .map(|m| m.missing_information.clone())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Local>,
    /// Placeholder bubble shown while a request is in flight.
    pub is_loading: bool,
    pub error: Option<String>,
    pub metadata: Option<MessageMetadata>,
}

impl Message {
    fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            sender,
            timestamp: Local::now(),
            is_loading: false,
            error: None,
            metadata: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content)
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Sender::Bot, content)
    }

    pub fn welcome() -> Self {
        Self {
            id: WELCOME_ID.to_string(),
            ..Self::bot(WELCOME_TEXT)
        }
    }

    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::bot(String::new())
        }
    }

    pub fn failed(content: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::bot(content)
        }
    }

    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// "Found N candidates" / "No candidates found", plus a partial-results note.
    /// `None` when the reply carried no result count.
    pub fn metadata_summary(&self) -> Option<String> {
        let meta = self.metadata.as_ref()?;
        let count = meta.result_count?;

        let mut summary = if count > 0 {
            format!("Found {count} candidates")
        } else {
            "No candidates found".to_string()
        };
        if meta.is_partial == Some(true) {
            summary.push_str(" (partial results)");
        }
        Some(summary)
    }

    /// "Missing information: a, b", or `None` when nothing was reported missing.
    pub fn missing_information_note(&self) -> Option<String> {
        let missing = &self.metadata.as_ref()?.missing_information;
        if missing.is_empty() {
            return None;
        }
        Some(format!("Missing information: {}", missing.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(count: u32, partial: bool) -> MessageMetadata {
        MessageMetadata {
            result_count: Some(count),
            is_partial: Some(partial),
            is_followup: Some(false),
            missing_information: Vec::new(),
        }
    }

    #[test]
    fn welcome_has_fixed_id() {
        let msg = Message::welcome();
        assert_eq!(msg.id, WELCOME_ID);
        assert_eq!(msg.sender, Sender::Bot);
        assert!(msg.content.starts_with("👋 Welcome"));
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(Message::user("a").id, Message::user("a").id);
    }

    #[test]
    fn loading_placeholder_is_empty_bot_message() {
        let msg = Message::loading();
        assert!(msg.is_loading);
        assert!(msg.content.is_empty());
        assert_eq!(msg.sender, Sender::Bot);
    }

    #[test]
    fn summary_counts_candidates() {
        let msg = Message::bot("x").with_metadata(meta(4, false));
        assert_eq!(msg.metadata_summary().as_deref(), Some("Found 4 candidates"));
    }

    #[test]
    fn summary_zero_results() {
        let msg = Message::bot("x").with_metadata(meta(0, false));
        assert_eq!(msg.metadata_summary().as_deref(), Some("No candidates found"));
    }

    #[test]
    fn summary_marks_partial_results() {
        let msg = Message::bot("x").with_metadata(meta(2, true));
        assert_eq!(
            msg.metadata_summary().as_deref(),
            Some("Found 2 candidates (partial results)")
        );
    }

    #[test]
    fn summary_absent_without_count() {
        let msg = Message::bot("x").with_metadata(MessageMetadata::from_response(None, true));
        assert_eq!(msg.metadata_summary(), None);
        assert_eq!(Message::bot("y").metadata_summary(), None);
    }

    #[test]
    fn metadata_from_response_copies_counts() {
        let rm = ResponseMeta {
            is_partial: true,
            result_count: 7,
            ..Default::default()
        };
        let m = MessageMetadata::from_response(Some(&rm), true);
        assert_eq!(m.result_count, Some(7));
        assert_eq!(m.is_partial, Some(true));
        assert_eq!(m.is_followup, Some(true));
    }

    #[test]
    fn missing_information_note_lists_fields() {
        let rm = ResponseMeta {
            missing_information: vec!["salary".into(), "location".into()],
            ..Default::default()
        };
        let msg =
            Message::bot("x").with_metadata(MessageMetadata::from_response(Some(&rm), false));
        assert_eq!(
            msg.missing_information_note().as_deref(),
            Some("Missing information: salary, location")
        );
    }

    #[test]
    fn missing_information_note_absent_when_empty() {
        let msg = Message::bot("x").with_metadata(meta(2, false));
        assert_eq!(msg.missing_information_note(), None);
        assert_eq!(Message::bot("y").missing_information_note(), None);
    }
}
