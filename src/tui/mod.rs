//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard events into `core::Action` values and performs the
//! `Effect`s the reducer asks for.
//!
//! This is the only module that knows about ratatui and crossterm. The
//! one-shot CLI in `main.rs` talks to the same `ChatBackend` without it.
//!
//! ## Event routing
//!
//! 1. `Ctrl+C` and `Ctrl+L` are global.
//! 2. An open example picker swallows everything else.
//! 3. `Esc` dismisses the error banner.
//! 4. Mouse movement and scroll keys go to the message list.
//! 5. The rest goes to the input box.
//!
//! ## Redraw Strategy
//!
//! - **Loading**: draws every ~80ms so the thinking dots animate.
//! - **Idle**: sleeps up to 500ms, only redraws on events, replies or resize.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::api::ChatBackend;
use crate::core::action::{Action, Effect, update};
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    ExampleEvent, ExamplePickerState, InputBox, InputEvent, MessageListState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const ANIMATION_POLL: Duration = Duration::from_millis(80);
const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    /// Example picker overlay (None = hidden)
    pub example_picker: Option<ExamplePickerState>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            example_picker: None,
        }
    }
}

/// Owns the terminal setup. Dropping it undoes everything, including the
/// raw mode and alternate screen entered by `ratatui::init`, so an early
/// return through `?` cannot leave the shell unusable.
struct TerminalModeGuard {
    restore: fn(),
}

impl TerminalModeGuard {
    fn new() -> Self {
        // Kitty keyboard protocol makes Shift+Enter distinguishable; terminals
        // without it ignore the request
        let enabled = execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        );
        match enabled {
            Ok(()) => {
                info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)")
            }
            Err(e) => warn!("Failed to enable terminal modes: {}", e),
        }
        Self {
            restore: restore_terminal,
        }
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    let _ = execute!(
        stdout(),
        PopKeyboardEnhancementFlags,
        DisableMouseCapture,
        DisableBracketedPaste,
        Hide
    );
    ratatui::restore();
}

/// Run the chat screen until the user quits.
///
/// Must be called from inside a tokio runtime: backend calls are spawned
/// as tasks and report back over an mpsc channel.
pub fn run(mut app: App) -> std::io::Result<()> {
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true;

    info!("TUI started (backend={})", app.backend.location());

    'main: loop {
        if app.is_loading {
            needs_redraw = true;
        }

        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, elapsed))?;
            needs_redraw = false;
        }

        let timeout = if app.is_loading {
            ANIMATION_POLL
        } else {
            IDLE_POLL
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Drain everything pending before the next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let effect = dispatch(&mut app, &mut tui, event);
            if run_effect(effect, &app, &tx) {
                break 'main;
            }
        }

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = apply(&mut app, &mut tui, action);
            if run_effect(effect, &app, &tx) {
                break 'main;
            }
        }
    }

    info!("TUI shutting down");
    Ok(())
}

/// Run the reducer, then reset the list view if the conversation went back
/// to just the welcome message.
fn apply(app: &mut App, tui: &mut TuiState, action: Action) -> Effect {
    let resets = matches!(
        action,
        Action::ClearConversation | Action::ConversationCleared
    );
    let effect = update(app, action);
    if resets && !app.has_user_messages() {
        tui.message_list = MessageListState::new();
    }
    effect
}

/// Route one terminal event. Returns the effect the reducer asked for.
fn dispatch(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Effect {
    tui.input_box.disabled = app.is_loading || app.clearing;

    match event {
        TuiEvent::Resize => return Effect::None,
        TuiEvent::ForceQuit => return apply(app, tui, Action::Quit),
        TuiEvent::ClearConversation => {
            tui.example_picker = None;
            return apply(app, tui, Action::ClearConversation);
        }
        _ => {}
    }

    if let Some(picker) = tui.example_picker.as_mut() {
        match picker.handle_event(&event) {
            Some(ExampleEvent::Select(query)) => {
                debug!("Example selected: {}", query);
                tui.input_box.set_text(&query);
                tui.example_picker = None;
            }
            Some(ExampleEvent::Dismiss) => tui.example_picker = None,
            None => {}
        }
        return Effect::None;
    }

    match event {
        TuiEvent::Escape if app.error.is_some() => apply(app, tui, Action::DismissError),
        TuiEvent::MouseMove(_col, row) => {
            tui.message_list.hovered_index = tui.message_list.hit_test(row);
            Effect::None
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(&event);
            Effect::None
        }
        _ => match tui.input_box.handle_event(&event) {
            Some(InputEvent::Submit(text)) => {
                tui.message_list.stick_to_bottom = true;
                apply(app, tui, Action::Submit(text))
            }
            Some(InputEvent::ToggleExamples) => {
                tui.example_picker = Some(ExamplePickerState::new(app.examples.clone()));
                Effect::None
            }
            Some(InputEvent::ContentChanged) => Effect::None,
            // Up/Down past the first or last input row scroll the conversation
            None => {
                let fallback = match event {
                    TuiEvent::CursorUp => Some(TuiEvent::ScrollUp),
                    TuiEvent::CursorDown => Some(TuiEvent::ScrollDown),
                    _ => None,
                };
                if let Some(scroll) = fallback {
                    tui.message_list.handle_event(&scroll);
                }
                Effect::None
            }
        },
    }
}

/// Perform an effect. Returns true when the loop should exit.
fn run_effect(effect: Effect, app: &App, tx: &mpsc::Sender<Action>) -> bool {
    match effect {
        Effect::None => false,
        Effect::Quit => true,
        Effect::SendMessage {
            loading_id,
            text,
            conversation_id,
        } => {
            spawn_send(
                app.backend.clone(),
                loading_id,
                text,
                conversation_id,
                tx.clone(),
            );
            false
        }
        Effect::ClearConversation(conversation_id) => {
            spawn_clear(app.backend.clone(), conversation_id, tx.clone());
            false
        }
    }
}

fn spawn_send(
    backend: Arc<dyn ChatBackend>,
    loading_id: String,
    text: String,
    conversation_id: Option<String>,
    tx: mpsc::Sender<Action>,
) {
    info!(
        "Spawning chat request (loading_id={}, conversation_id={:?})",
        loading_id, conversation_id
    );
    tokio::spawn(async move {
        let is_followup = conversation_id.is_some();
        let action = match backend
            .send_message(&text, conversation_id.as_deref())
            .await
        {
            Ok(response) => Action::ResponseReceived {
                loading_id,
                response,
                is_followup,
            },
            Err(e) => Action::RequestFailed {
                loading_id,
                error: e.to_string(),
            },
        };
        if tx.send(action).is_err() {
            warn!("Failed to deliver chat result: receiver dropped");
        }
    });
}

fn spawn_clear(backend: Arc<dyn ChatBackend>, conversation_id: String, tx: mpsc::Sender<Action>) {
    info!("Spawning clear request (conversation_id={})", conversation_id);
    tokio::spawn(async move {
        let action = match backend.clear_conversation(Some(&conversation_id)).await {
            Ok(_) => Action::ConversationCleared,
            Err(e) => Action::ClearFailed(e.to_string()),
        };
        if tx.send(action).is_err() {
            warn!("Failed to deliver clear result: receiver dropped");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Sender;
    use crate::test_support::{EchoBackend, test_app};

    fn type_text(app: &mut App, tui: &mut TuiState, text: &str) {
        for c in text.chars() {
            dispatch(app, tui, TuiEvent::InputChar(c));
        }
    }

    #[test]
    fn ctrl_c_quits() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        assert_eq!(dispatch(&mut app, &mut tui, TuiEvent::ForceQuit), Effect::Quit);
    }

    #[test]
    fn typed_text_is_submitted_on_enter() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        type_text(&mut app, &mut tui, "Find React devs");

        let effect = dispatch(&mut app, &mut tui, TuiEvent::Submit);
        assert!(matches!(
            effect,
            Effect::SendMessage { ref text, conversation_id: None, .. } if text == "Find React devs"
        ));
        assert!(tui.input_box.buffer.is_empty());
        assert!(app.is_loading);
    }

    #[test]
    fn typing_is_refused_while_loading() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        update(&mut app, Action::Submit("first".into()));

        type_text(&mut app, &mut tui, "second");
        assert!(tui.input_box.buffer.is_empty());
        assert_eq!(dispatch(&mut app, &mut tui, TuiEvent::Submit), Effect::None);
    }

    #[test]
    fn typing_is_refused_while_clear_is_pending() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        app.conversation_id = Some("conv-1".into());
        app.messages.push(crate::core::message::Message::user("hello"));

        let effect = dispatch(&mut app, &mut tui, TuiEvent::ClearConversation);
        assert_eq!(effect, Effect::ClearConversation("conv-1".into()));
        assert_eq!(
            dispatch(&mut app, &mut tui, TuiEvent::ClearConversation),
            Effect::None
        );

        type_text(&mut app, &mut tui, "next");
        assert!(tui.input_box.buffer.is_empty());
        assert_eq!(dispatch(&mut app, &mut tui, TuiEvent::Submit), Effect::None);

        apply(&mut app, &mut tui, Action::ConversationCleared);
        type_text(&mut app, &mut tui, "next");
        assert_eq!(tui.input_box.buffer, "next");
    }

    #[test]
    fn example_picker_fills_input_without_sending() {
        let mut app = test_app();
        let mut tui = TuiState::new();

        dispatch(&mut app, &mut tui, TuiEvent::ToggleExamples);
        assert!(tui.example_picker.is_some());

        dispatch(&mut app, &mut tui, TuiEvent::CursorDown);
        let effect = dispatch(&mut app, &mut tui, TuiEvent::Submit);

        assert_eq!(effect, Effect::None);
        assert!(tui.example_picker.is_none());
        assert_eq!(tui.input_box.buffer, app.examples[1]);
        assert_eq!(app.messages.len(), 1);
    }

    #[test]
    fn escape_closes_picker_before_touching_the_banner() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        app.error = Some("boom".into());

        dispatch(&mut app, &mut tui, TuiEvent::ToggleExamples);
        dispatch(&mut app, &mut tui, TuiEvent::Escape);
        assert!(tui.example_picker.is_none());
        assert_eq!(app.error.as_deref(), Some("boom"));

        dispatch(&mut app, &mut tui, TuiEvent::Escape);
        assert!(app.error.is_none());
    }

    #[test]
    fn local_clear_resets_list_view() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        app.messages.push(crate::core::message::Message::user("hello"));
        tui.message_list.stick_to_bottom = false;
        tui.message_list.hovered_index = Some(1);

        let effect = dispatch(&mut app, &mut tui, TuiEvent::ClearConversation);

        assert_eq!(effect, Effect::None);
        assert_eq!(app.messages.len(), 1);
        assert!(tui.message_list.stick_to_bottom);
        assert_eq!(tui.message_list.hovered_index, None);
    }

    #[test]
    fn scroll_keys_unpin_the_list() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        dispatch(&mut app, &mut tui, TuiEvent::ScrollUp);
        assert!(!tui.message_list.stick_to_bottom);
        dispatch(&mut app, &mut tui, TuiEvent::ScrollToBottom);
        assert!(tui.message_list.stick_to_bottom);
    }

    #[test]
    fn guard_restores_terminal_on_error_return() {
        use std::sync::atomic::{AtomicBool, Ordering};
        static RESTORED: AtomicBool = AtomicBool::new(false);

        fn draw_fails() -> std::io::Result<()> {
            let _guard = TerminalModeGuard {
                restore: || RESTORED.store(true, Ordering::SeqCst),
            };
            Err(std::io::Error::other("draw failed"))?;
            Ok(())
        }

        assert!(draw_fails().is_err());
        assert!(RESTORED.load(Ordering::SeqCst));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn send_task_reports_reply_over_channel() {
        let (tx, rx) = mpsc::channel();
        spawn_send(
            Arc::new(EchoBackend),
            "loading-1".into(),
            "Find React devs".into(),
            Some("conv-9".into()),
            tx,
        );

        let action = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let Action::ResponseReceived {
            loading_id,
            response,
            is_followup,
        } = action
        else {
            panic!("expected ResponseReceived, got {action:?}");
        };
        assert_eq!(loading_id, "loading-1");
        assert!(is_followup);
        assert_eq!(response.response, "Echo: Find React devs");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failed_send_becomes_request_failed() {
        let (tx, rx) = mpsc::channel();
        spawn_send(
            Arc::new(crate::test_support::NoopBackend),
            "loading-2".into(),
            "hi".into(),
            None,
            tx,
        );

        let action = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(
            action,
            Action::RequestFailed { ref loading_id, .. } if loading_id == "loading-2"
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn clear_round_trip_resets_conversation() {
        let mut app = App::new(Arc::new(EchoBackend));
        let mut tui = TuiState::new();
        let (tx, rx) = mpsc::channel();

        // First exchange gives the conversation an id
        type_text(&mut app, &mut tui, "hello");
        let effect = dispatch(&mut app, &mut tui, TuiEvent::Submit);
        assert!(!run_effect(effect, &app, &tx));
        let reply = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        apply(&mut app, &mut tui, reply);
        assert_eq!(app.conversation_id.as_deref(), Some("conv-echo"));
        assert_eq!(app.messages.last().map(|m| m.sender), Some(Sender::Bot));

        // Clearing now goes through the backend
        let effect = dispatch(&mut app, &mut tui, TuiEvent::ClearConversation);
        assert_eq!(effect, Effect::ClearConversation("conv-echo".into()));
        assert!(!run_effect(effect, &app, &tx));
        let cleared = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(cleared, Action::ConversationCleared);
        apply(&mut app, &mut tui, cleared);

        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.conversation_id, None);
    }
}
