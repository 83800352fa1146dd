use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};
use log::{debug, warn};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    // Global shortcuts (handled by the event loop before any component)
    ForceQuit,         // Ctrl+C
    ClearConversation, // Ctrl+L
    ToggleExamples,    // Ctrl+E

    // Editing
    Submit,
    Escape,
    InputChar(char),
    Paste(String), // Bracketed paste, keeps newlines
    Backspace,
    Delete,
    DeleteWordBack,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    CursorHome,
    CursorEnd,
    WordLeft,
    WordRight,

    // Conversation view
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    ScrollToBottom,
    MouseMove(u16, u16),

    Resize,
}

/// Poll without blocking.
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

/// Block for up to `timeout` waiting for something we care about.
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => match event::read() {
            Ok(ev) => translate(ev),
            Err(e) => {
                warn!("Failed to read terminal event: {}", e);
                None
            }
        },
        Ok(false) => None,
        Err(e) => {
            warn!("Failed to poll terminal events: {}", e);
            None
        }
    }
}

/// Map a raw crossterm event onto a `TuiEvent`.
pub fn translate(ev: Event) -> Option<TuiEvent> {
    match ev {
        Event::Key(key) => translate_key(key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Moved => Some(TuiEvent::MouseMove(mouse.column, mouse.row)),
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<TuiEvent> {
    // Keyboard enhancement reports releases and repeats too
    if key.kind == KeyEventKind::Release {
        return None;
    }
    debug!("Key event: {:?} with modifiers {:?}", key.code, key.modifiers);

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    let event = match key.code {
        KeyCode::Char('c') if ctrl => TuiEvent::ForceQuit,
        KeyCode::Char('l') if ctrl => TuiEvent::ClearConversation,
        KeyCode::Char('e') if ctrl => TuiEvent::ToggleExamples,
        // Ctrl+J is a raw LF; most terminals send it for Ctrl+Enter
        KeyCode::Char('j') if ctrl => TuiEvent::InputChar('\n'),
        KeyCode::Char('w') if ctrl => TuiEvent::DeleteWordBack,
        KeyCode::Char('b') if alt => TuiEvent::WordLeft,
        KeyCode::Char('f') if alt => TuiEvent::WordRight,
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Char(c) => TuiEvent::InputChar(c),
        KeyCode::Enter if shift || alt => TuiEvent::InputChar('\n'),
        KeyCode::Enter => TuiEvent::Submit,
        KeyCode::Esc => TuiEvent::Escape,
        KeyCode::Backspace if ctrl || alt => TuiEvent::DeleteWordBack,
        KeyCode::Backspace => TuiEvent::Backspace,
        KeyCode::Delete => TuiEvent::Delete,
        KeyCode::Left if ctrl || alt => TuiEvent::WordLeft,
        KeyCode::Right if ctrl || alt => TuiEvent::WordRight,
        KeyCode::Left => TuiEvent::CursorLeft,
        KeyCode::Right => TuiEvent::CursorRight,
        KeyCode::Up => TuiEvent::CursorUp,
        KeyCode::Down => TuiEvent::CursorDown,
        KeyCode::Home => TuiEvent::CursorHome,
        KeyCode::End if ctrl => TuiEvent::ScrollToBottom,
        KeyCode::End => TuiEvent::CursorEnd,
        KeyCode::PageUp => TuiEvent::ScrollPageUp,
        KeyCode::PageDown => TuiEvent::ScrollPageDown,
        _ => return None,
    };
    Some(event)
}
