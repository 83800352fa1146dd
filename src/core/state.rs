//! # Application State
//!
//! Core conversation state. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn ChatBackend>   // REST client for the RAG service
//! ├── messages: Vec<Message>          // everything shown in the list
//! ├── conversation_id: Option<String> // backend-issued session token
//! ├── is_loading: bool                // waiting for /api/chat
//! ├── clearing: bool                  // waiting for /api/conversation/clear
//! ├── error: Option<String>           // banner text
//! ├── status_message: String          // title bar text
//! └── welcome_message: String         // greeting restored on clear
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::api::ChatBackend;
use crate::core::config::ResolvedConfig;
use crate::core::message::Message;

pub struct App {
    pub backend: Arc<dyn ChatBackend>,
    pub messages: Vec<Message>,
    pub conversation_id: Option<String>,
    pub is_loading: bool,
    /// A backend clear is in flight; submits and further clears are refused.
    pub clearing: bool,
    pub error: Option<String>,
    pub status_message: String,
    pub welcome_message: String,
    pub examples: Vec<String>,
}

impl App {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        let mut app = Self {
            backend,
            messages: Vec::new(),
            conversation_id: None,
            is_loading: false,
            clearing: false,
            error: None,
            status_message: String::new(),
            welcome_message: crate::core::message::WELCOME_TEXT.to_string(),
            examples: crate::core::config::DEFAULT_EXAMPLE_QUERIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };
        app.reset_conversation();
        app
    }

    pub fn from_config(backend: Arc<dyn ChatBackend>, config: &ResolvedConfig) -> Self {
        let mut app = Self::new(backend);
        app.welcome_message = config.welcome_message.clone();
        app.examples = config.examples.clone();
        app.reset_conversation();
        app
    }

    /// Back to a single welcome bubble with no backend session.
    pub fn reset_conversation(&mut self) {
        let welcome = Message {
            content: self.welcome_message.clone(),
            ..Message::welcome()
        };
        self.messages = vec![welcome];
        self.conversation_id = None;
        self.error = None;
    }

    /// Remove the in-flight placeholder with the given id, if it is still there.
    pub fn remove_message(&mut self, id: &str) {
        self.messages.retain(|m| m.id != id);
    }

    /// True once the user has sent anything since the last reset.
    pub fn has_user_messages(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.sender == crate::core::message::Sender::User)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::message::WELCOME_ID;
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert!(!app.is_loading);
        assert!(app.conversation_id.is_none());
        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.messages[0].id, WELCOME_ID);
        assert!(!app.has_user_messages());
    }

    #[test]
    fn test_reset_uses_configured_welcome() {
        let mut app = test_app();
        app.welcome_message = "Hello recruiter".to_string();
        app.conversation_id = Some("c-1".to_string());
        app.error = Some("boom".to_string());
        app.reset_conversation();

        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.messages[0].content, "Hello recruiter");
        assert_eq!(app.messages[0].id, WELCOME_ID);
        assert!(app.conversation_id.is_none());
        assert!(app.error.is_none());
    }
}
