//! # InputBox Component
//!
//! Where the recruiter types a question about candidates.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste, multi-line with Shift+Enter)
//! - Editing and navigation (char, word, line, visual row)
//! - Emit `Submit` on Enter, refusing blank text
//! - Emit `ToggleExamples` on Ctrl+E
//! - Show a placeholder while empty and dim itself while a reply is pending
//!
//! ## State Management
//!
//! The buffer is internal state. `disabled` is a prop synced from
//! `App::is_loading` each frame. Cursor and scroll live in `CursorState`.

mod cursor;
mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::CursorState;
use text_wrap::{
    MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, inner_width, next_char_boundary, next_word_boundary,
    prev_char_boundary, prev_word_boundary, visual_lines,
};

pub const PLACEHOLDER: &str = "Ask about candidates...";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed on non-blank text; the buffer has been cleared
    Submit(String),
    /// Ctrl+E
    ToggleExamples,
    /// Buffer or cursor changed
    ContentChanged,
}

pub struct InputBox {
    pub buffer: String,
    /// Waiting for the backend; editing and submit are refused
    pub disabled: bool,
    cursor: CursorState,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            disabled: false,
            cursor: CursorState::new(),
        }
    }

    /// Replace the buffer (example picked) and park the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor.pos = self.buffer.len();
        self.cursor.scroll_offset = 0;
    }

    /// Height for the current buffer, between one and `MAX_VISIBLE_LINES` rows plus borders.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let rows = visual_lines(&self.buffer, inner_width(area_width)).len() as u16;
        rows.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn visible_lines(&self, area_width: u16) -> Vec<Line<'_>> {
        visual_lines(&self.buffer, inner_width(area_width))
            .into_iter()
            .skip(self.cursor.scroll_offset as usize)
            .take(MAX_VISIBLE_LINES as usize)
            .map(|r| Line::raw(&self.buffer[r]))
            .collect()
    }

    fn render_scrollbar(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};

        let total = visual_lines(&self.buffer, inner_width(area.width)).len() as u16;
        if total <= MAX_VISIBLE_LINES {
            return;
        }

        // content_length is the max scroll position, not the row count
        let mut state = ScrollbarState::default()
            .content_length(total.saturating_sub(MAX_VISIBLE_LINES) as usize)
            .position(self.cursor.scroll_offset as usize);

        let track = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            track,
            &mut state,
        );
    }

    fn edit(&mut self, event: &TuiEvent) -> Option<InputEvent> {
        let pos = self.cursor.pos;
        let changed = match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(pos, *c);
                self.cursor.pos += c.len_utf8();
                true
            }
            TuiEvent::Paste(text) => {
                // Terminals send CR for pasted newlines
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                self.buffer.insert_str(pos, &text);
                self.cursor.pos += text.len();
                true
            }
            TuiEvent::Backspace if pos > 0 => {
                let prev = prev_char_boundary(&self.buffer, pos);
                self.buffer.drain(prev..pos);
                self.cursor.pos = prev;
                true
            }
            TuiEvent::DeleteWordBack if pos > 0 => {
                let prev = prev_word_boundary(&self.buffer, pos);
                self.buffer.drain(prev..pos);
                self.cursor.pos = prev;
                true
            }
            TuiEvent::Delete if pos < self.buffer.len() => {
                let next = next_char_boundary(&self.buffer, pos);
                self.buffer.drain(pos..next);
                true
            }
            TuiEvent::CursorLeft if pos > 0 => {
                self.cursor.pos = prev_char_boundary(&self.buffer, pos);
                true
            }
            TuiEvent::CursorRight if pos < self.buffer.len() => {
                self.cursor.pos = next_char_boundary(&self.buffer, pos);
                true
            }
            TuiEvent::WordLeft if pos > 0 => {
                self.cursor.pos = prev_word_boundary(&self.buffer, pos);
                true
            }
            TuiEvent::WordRight if pos < self.buffer.len() => {
                self.cursor.pos = next_word_boundary(&self.buffer, pos);
                true
            }
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..pos].rfind('\n').map_or(0, |i| i + 1);
                self.cursor.pos = line_start;
                line_start != pos
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[pos..]
                    .find('\n')
                    .map_or(self.buffer.len(), |i| pos + i);
                self.cursor.pos = line_end;
                line_end != pos
            }
            TuiEvent::CursorUp => self.cursor.move_vertically(&self.buffer, -1),
            TuiEvent::CursorDown => self.cursor.move_vertically(&self.buffer, 1),
            _ => false,
        };
        changed.then_some(InputEvent::ContentChanged)
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.cursor.last_area_width = area.width;
        self.cursor.update_scroll_offset(&self.buffer, area.width);

        let (border_style, title) = if self.disabled {
            (
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
                " Waiting for response... ",
            )
        } else {
            (Style::default().fg(Color::Cyan), " Ask ")
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .title_bottom(Line::from(" Enter send · Shift+Enter newline · Ctrl+E examples ").right_aligned())
            .padding(Padding::horizontal(1));

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                PLACEHOLDER,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )))
        } else {
            let text_style = if self.disabled {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            Paragraph::new(self.visible_lines(area.width)).style(text_style)
        };

        frame.render_widget(paragraph.block(block), area);
        self.render_scrollbar(frame, area);

        if !self.disabled {
            frame.set_cursor_position(self.cursor.screen_pos(&self.buffer, area));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ToggleExamples => Some(InputEvent::ToggleExamples),
            _ if self.disabled => None,
            TuiEvent::Submit => {
                if self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor.reset();
                Some(InputEvent::Submit(text))
            }
            other => self.edit(other),
        }
    }
}
