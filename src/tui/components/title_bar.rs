//! # TitleBar Component
//!
//! One-line header: application name, backend URL, transient status, a
//! `↓ New` marker when replies arrived below the viewport, and a key hint.
//!
//! Stateless. All fields are props copied from `App`/`TuiState` each frame,
//! which keeps the component trivial to test.
//!
//! Priority when space runs out: name and status first, then the marker,
//! then the URL. The hint is right-aligned and dropped before anything else.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::Component;

pub const APP_NAME: &str = "Candidate Search";
const KEY_HINT: &str = "Ctrl+E examples · Ctrl+L clear · Ctrl+C quit";

pub struct TitleBar {
    pub api_url: String,
    pub status_message: String,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(api_url: String, status_message: String, has_unseen_content: bool) -> Self {
        Self {
            api_url,
            status_message,
            has_unseen_content,
        }
    }

    fn left_spans(&self) -> Vec<Span<'static>> {
        let sep = Span::styled(" | ", Style::default().fg(Color::DarkGray));
        let mut spans = vec![Span::styled(
            APP_NAME,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )];
        spans.push(Span::styled(
            format!(" ({})", self.api_url),
            Style::default().fg(Color::DarkGray),
        ));
        if !self.status_message.is_empty() {
            spans.push(sep.clone());
            spans.push(Span::styled(
                self.status_message.clone(),
                Style::default().fg(Color::Yellow),
            ));
        }
        if self.has_unseen_content {
            spans.push(sep);
            spans.push(Span::styled(
                "↓ New",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        spans
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut left = self.left_spans();
        let width_of = |spans: &[Span]| spans.iter().map(|s| s.content.width()).sum::<usize>();

        // Drop the URL first when the line doesn't fit
        if width_of(&left) > area.width as usize && left.len() > 1 {
            left.remove(1);
        }
        let used = width_of(&left);
        frame.render_widget(Line::from(left), area);

        let hint_width = KEY_HINT.width();
        if used + hint_width + 2 <= area.width as usize {
            let hint_area = Rect::new(
                area.x + area.width - hint_width as u16,
                area.y,
                hint_width as u16,
                1,
            );
            frame.render_widget(
                Span::styled(KEY_HINT, Style::default().fg(Color::DarkGray)),
                hint_area,
            );
        }
    }
}
