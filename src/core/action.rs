//! # Actions
//!
//! Everything that can happen in the chat becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Backend responds? That's `Action::ResponseReceived { .. }`.
//!
//! The `update()` function takes the current state and an action,
//! mutates the state, and returns an `Effect` describing any I/O the
//! adapter should perform. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};

use crate::api::ChatResponse;
use crate::core::message::{Message, MessageMetadata};
use crate::core::state::App;

pub const REQUEST_FAILED_BANNER: &str = "Failed to get response. Please try again.";
pub const REQUEST_FAILED_REPLY: &str =
    "Sorry, I encountered an error processing your request. Please try again.";
pub const REQUEST_FAILED_LABEL: &str = "Failed to get response";
pub const CLEAR_FAILED_BANNER: &str = "Failed to clear conversation. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Submit(String),
    ResponseReceived {
        loading_id: String,
        response: ChatResponse,
        /// Whether the request carried a conversation id.
        is_followup: bool,
    },
    RequestFailed {
        loading_id: String,
        error: String,
    },
    ClearConversation,
    ConversationCleared,
    ClearFailed(String),
    DismissError,
    Quit,
}

/// I/O the adapter must perform after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    SendMessage {
        loading_id: String,
        text: String,
        conversation_id: Option<String>,
    },
    ClearConversation(String),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => {
            if text.trim().is_empty() || app.is_loading || app.clearing {
                debug!(
                    "Submit ignored (blank={}, loading={}, clearing={})",
                    text.trim().is_empty(),
                    app.is_loading,
                    app.clearing
                );
                return Effect::None;
            }

            app.messages.push(Message::user(text.clone()));
            app.is_loading = true;
            app.error = None;

            let placeholder = Message::loading();
            let loading_id = placeholder.id.clone();
            app.messages.push(placeholder);
            app.status_message = "Searching candidates...".to_string();

            info!("Submitting message (len={})", text.len());
            Effect::SendMessage {
                loading_id,
                text,
                conversation_id: app.conversation_id.clone(),
            }
        }
        Action::ResponseReceived {
            loading_id,
            response,
            is_followup,
        } => {
            app.remove_message(&loading_id);

            let metadata = MessageMetadata::from_response(response.meta.as_ref(), is_followup);
            app.messages
                .push(Message::bot(response.response).with_metadata(metadata));

            if let Some(id) = response.conversation_id {
                app.conversation_id = Some(id);
            }
            app.is_loading = false;
            app.status_message.clear();
            Effect::None
        }
        Action::RequestFailed { loading_id, error } => {
            warn!("Chat request failed: {}", error);
            app.remove_message(&loading_id);
            app.error = Some(REQUEST_FAILED_BANNER.to_string());
            app.messages
                .push(Message::failed(REQUEST_FAILED_REPLY, REQUEST_FAILED_LABEL));
            app.is_loading = false;
            app.status_message.clear();
            Effect::None
        }
        Action::ClearConversation => {
            if app.is_loading || app.clearing {
                return Effect::None;
            }
            match app.conversation_id.clone() {
                Some(id) => {
                    app.clearing = true;
                    app.status_message = "Clearing conversation...".to_string();
                    Effect::ClearConversation(id)
                }
                None => {
                    app.reset_conversation();
                    app.status_message.clear();
                    Effect::None
                }
            }
        }
        Action::ConversationCleared => {
            info!("Conversation cleared");
            app.clearing = false;
            app.reset_conversation();
            app.status_message.clear();
            Effect::None
        }
        Action::ClearFailed(reason) => {
            warn!("Clear conversation failed: {}", reason);
            app.clearing = false;
            app.error = Some(CLEAR_FAILED_BANNER.to_string());
            app.status_message.clear();
            Effect::None
        }
        Action::DismissError => {
            app.error = None;
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}
