//! # Example Picker Component
//!
//! Popup listing canned candidate queries, opened with Ctrl+E. It sits
//! directly above the input box like a dropdown. Enter copies the selected
//! query into the input buffer; it is not sent until the user submits.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ExamplePickerState` lives in `TuiState` while the popup is open
//! - `ExamplePicker` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, List, ListItem, ListState, Padding};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::event::TuiEvent;

const HEADER: &str = "Example queries:";

pub struct ExamplePickerState {
    pub examples: Vec<String>,
    pub list_state: ListState,
}

impl ExamplePickerState {
    pub fn new(examples: Vec<String>) -> Self {
        let mut list_state = ListState::default();
        if !examples.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            examples,
            list_state,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<ExampleEvent> {
        let last = self.examples.len().checked_sub(1);
        match event {
            TuiEvent::Escape | TuiEvent::ToggleExamples => Some(ExampleEvent::Dismiss),
            TuiEvent::CursorUp => {
                if let Some(i) = self.selected() {
                    self.list_state.select(Some(i.saturating_sub(1)));
                }
                None
            }
            TuiEvent::CursorDown => {
                if let (Some(i), Some(last)) = (self.selected(), last) {
                    self.list_state.select(Some((i + 1).min(last)));
                }
                None
            }
            // 1-9 picks directly
            TuiEvent::InputChar(c) => c
                .to_digit(10)
                .and_then(|d| (d as usize).checked_sub(1))
                .and_then(|i| self.examples.get(i))
                .map(|q| ExampleEvent::Select(q.clone())),
            TuiEvent::Submit => self
                .selected()
                .and_then(|i| self.examples.get(i))
                .map(|q| ExampleEvent::Select(q.clone())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExampleEvent {
    Select(String),
    Dismiss,
}

pub struct ExamplePicker<'a> {
    state: &'a mut ExamplePickerState,
}

impl<'a> ExamplePicker<'a> {
    pub fn new(state: &'a mut ExamplePickerState) -> Self {
        Self { state }
    }

    /// Borders + header row + one row per example.
    pub fn height(&self) -> u16 {
        self.state.examples.len() as u16 + 3
    }

    /// Render as a dropdown sitting on top of `anchor` (the input box),
    /// clipped to `bounds`.
    pub fn render(&mut self, frame: &mut Frame, anchor: Rect, bounds: Rect) {
        let height = self.height().min(anchor.y.saturating_sub(bounds.y));
        if height < 3 {
            return;
        }
        let area = Rect::new(anchor.x, anchor.y - height, anchor.width, height);
        frame.render_widget(Clear, area);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title_bottom(Line::from(" ↑↓ move · Enter use · Esc close ").centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let label_width = (inner.width as usize).saturating_sub(4);
        let mut items = vec![ListItem::new(Line::from(Span::styled(
            HEADER,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )))];
        items.extend(self.state.examples.iter().enumerate().map(|(i, q)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(truncate(q, label_width)),
            ]))
        }));

        // Row 0 is the header, so shift the selection by one.
        let mut list_state =
            ListState::default().with_selected(self.state.selected().map(|i| i + 1));
        let list = List::new(items).highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_stateful_widget(list, inner, &mut list_state);
    }
}

/// Cut `s` to at most `max` display columns, ending in "…" when shortened.
fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
