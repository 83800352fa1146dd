use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::core::message::{Message, Sender};
use crate::tui::component::Component;
use crate::tui::components::loading_indicator::LoadingIndicator;
use crate::tui::markdown;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Borders (1 left + 1 right) plus padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Top + bottom borders.
const VERTICAL_OVERHEAD: u16 = 2;
/// Blank row between consecutive bubbles.
pub const MESSAGE_GAP: u16 = 1;
/// Bubbles never take more than this share of the list width.
const MAX_WIDTH_PERCENT: u16 = 80;

pub const USER_COLOR: Color = Color::Cyan;
pub const BOT_COLOR: Color = Color::Green;
pub const ERROR_COLOR: Color = Color::Red;
const BOT_TEXT_COLOR: Color = Color::Gray;
const USER_TEXT_COLOR: Color = Color::White;

/// A single chat bubble.
///
/// Created fresh every frame from a `core::message::Message`. User bubbles
/// hug the right edge, bot bubbles the left, and both shrink to fit short
/// content up to 80% of the list width.
///
/// The body is markdown for bot replies and verbatim for user text. A
/// failed reply gets a red border and its error label as a footer; a
/// reply with result metadata gets a dim summary footer.
#[derive(Clone, Copy)]
pub struct MessageBubble<'a> {
    pub message: &'a Message,
    pub is_hovered: bool,
    /// Animation clock, only read by loading bubbles
    pub elapsed: f32,
}

impl<'a> MessageBubble<'a> {
    pub fn new(message: &'a Message, is_hovered: bool, elapsed: f32) -> Self {
        Self {
            message,
            is_hovered,
            elapsed,
        }
    }

    fn accent(&self) -> Color {
        match (self.message.error.is_some(), self.message.sender) {
            (true, _) => ERROR_COLOR,
            (false, Sender::User) => USER_COLOR,
            (false, Sender::Bot) => BOT_COLOR,
        }
    }

    fn title(&self) -> String {
        let who = match self.message.sender {
            Sender::User => "You",
            Sender::Bot => "Assistant",
        };
        format!(" {} · {} ", who, self.message.timestamp.format("%H:%M"))
    }

    /// Body plus footers, as one wrappable `Text`.
    pub fn body(&self) -> Text<'static> {
        let msg = self.message;
        if msg.is_loading {
            return Text::from(LoadingIndicator::new(self.elapsed, BOT_TEXT_COLOR).line());
        }

        let mut text = match msg.sender {
            Sender::Bot => markdown::render(msg.content.trim(), BOT_TEXT_COLOR),
            Sender::User => Text::styled(
                msg.content.trim_end().to_string(),
                Style::default().fg(USER_TEXT_COLOR),
            ),
        };

        if let Some(error) = &msg.error {
            text.lines.push(Line::default());
            text.lines.push(Line::from(Span::styled(
                format!("⚠ {}", error),
                Style::default().fg(ERROR_COLOR),
            )));
        }
        if let Some(summary) = msg.metadata_summary() {
            text.lines.push(Line::default());
            text.lines.push(Line::from(Span::styled(
                summary,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
        if let Some(note) = msg.missing_information_note() {
            if msg.metadata_summary().is_none() {
                text.lines.push(Line::default());
            }
            text.lines.push(Line::from(Span::styled(
                note,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
        text
    }

    /// Outer bubble width for a list that is `list_width` columns wide.
    pub fn width(&self, list_width: u16) -> u16 {
        let max = usize::from(list_width) * usize::from(MAX_WIDTH_PERCENT) / 100;
        let natural = self
            .body()
            .width()
            .saturating_add(usize::from(HORIZONTAL_OVERHEAD));
        let title = self.title().width().saturating_add(2);
        let width = natural
            .max(title)
            .min(max)
            .max(usize::from(HORIZONTAL_OVERHEAD) + 1);
        u16::try_from(width).unwrap_or(u16::MAX).min(list_width)
    }

    /// Rows this bubble occupies in the list, including the trailing gap.
    pub fn calculate_height(&self, list_width: u16) -> u16 {
        let inner = self.width(list_width).saturating_sub(HORIZONTAL_OVERHEAD);
        if inner == 0 {
            // Too narrow to draw; keep one row so layout stays monotonic.
            return 1;
        }
        let lines = Paragraph::new(self.body())
            .wrap(Wrap { trim: false })
            .line_count(inner)
            .max(1);
        u16::try_from(lines)
            .unwrap_or(u16::MAX)
            .saturating_add(VERTICAL_OVERHEAD + MESSAGE_GAP)
    }

    /// Where the bubble sits inside a full-width row of the list.
    pub fn rect_in(&self, row: Rect) -> Rect {
        let width = self.width(row.width);
        let x = match self.message.sender {
            Sender::User => row.x + row.width.saturating_sub(width),
            Sender::Bot => row.x,
        };
        Rect::new(x, row.y, width, row.height.saturating_sub(MESSAGE_GAP))
    }
}

impl<'a> Widget for MessageBubble<'a> {
    /// `area` is the bubble's own rect, as returned by `rect_in`.
    fn render(self, area: Rect, buf: &mut Buffer) {
        let accent = self.accent();
        let border_style = if self.is_hovered || self.message.error.is_some() {
            Style::default().fg(accent)
        } else {
            Style::default().fg(accent).add_modifier(Modifier::DIM)
        };

        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Span::styled(self.title(), border_style))
            .padding(Padding::horizontal(CONTENT_PAD_H));
        if self.message.sender == Sender::User {
            block = block.title_alignment(ratatui::layout::Alignment::Right);
        }

        let inner = block.inner(area);
        block.render(area, buf);

        let mut paragraph = Paragraph::new(self.body()).wrap(Wrap { trim: false });
        if self.is_hovered {
            paragraph = paragraph.style(Style::default().bg(Color::Black));
        }
        paragraph.render(inner, buf);
    }
}

impl<'a> Component for MessageBubble<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::MessageMetadata;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(message: &Message, width: u16) -> (Vec<String>, Rect) {
        let bubble = MessageBubble::new(message, false, 0.0);
        let height = bubble.calculate_height(width);
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let mut placed = Rect::default();
        terminal
            .draw(|f| {
                let rect = bubble.rect_in(f.area());
                placed = rect;
                f.render_widget(bubble, rect);
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        let rows = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect();
        (rows, placed)
    }

    #[test]
    fn short_user_message_is_right_aligned() {
        let msg = Message::user("hi");
        let (_, rect) = draw(&msg, 80);
        assert_eq!(rect.x + rect.width, 80);
        assert!(rect.width < 64);
    }

    #[test]
    fn bot_message_is_left_aligned() {
        let msg = Message::bot("hello there");
        let (_, rect) = draw(&msg, 80);
        assert_eq!(rect.x, 0);
    }

    #[test]
    fn long_message_caps_at_eighty_percent() {
        let msg = Message::bot("word ".repeat(100));
        let bubble = MessageBubble::new(&msg, false, 0.0);
        assert_eq!(bubble.width(100), 80);
    }

    #[test]
    fn single_line_height_includes_borders_and_gap() {
        let msg = Message::user("Single line");
        let bubble = MessageBubble::new(&msg, false, 0.0);
        assert_eq!(
            bubble.calculate_height(80),
            1 + VERTICAL_OVERHEAD + MESSAGE_GAP
        );
    }

    #[test]
    fn wrapped_text_grows_height() {
        let msg = Message::user("word ".repeat(40));
        let bubble = MessageBubble::new(&msg, false, 0.0);
        // 200 chars into a 40-col bubble (36 inner) needs several rows
        assert!(bubble.calculate_height(50) > 1 + VERTICAL_OVERHEAD + MESSAGE_GAP + 3);
    }

    #[test]
    fn metadata_footer_is_rendered() {
        let msg = Message::bot("Here are the matches").with_metadata(MessageMetadata {
            result_count: Some(3),
            is_partial: Some(true),
            is_followup: Some(false),
            missing_information: Vec::new(),
        });
        let (rows, _) = draw(&msg, 80);
        let all = rows.join("\n");
        assert!(all.contains("Found 3 candidates (partial results)"), "{all}");
        assert!(!all.contains("Missing information"), "{all}");
    }

    #[test]
    fn missing_information_footer_is_rendered() {
        let msg = Message::bot("Two partial matches").with_metadata(MessageMetadata {
            result_count: Some(2),
            is_partial: Some(true),
            is_followup: Some(false),
            missing_information: vec!["salary".into()],
        });
        let (rows, _) = draw(&msg, 80);
        let all = rows.join("\n");
        assert!(all.contains("Found 2 candidates (partial results)"), "{all}");
        assert!(all.contains("Missing information: salary"), "{all}");
    }

    #[test]
    fn failed_reply_shows_error_label_in_red() {
        let msg = Message::failed("Sorry, something broke", "Failed to get response");
        let bubble = MessageBubble::new(&msg, false, 0.0);
        assert_eq!(bubble.accent(), ERROR_COLOR);
        let (rows, _) = draw(&msg, 80);
        assert!(rows.join("\n").contains("Failed to get response"));
    }

    #[test]
    fn loading_bubble_shows_indicator() {
        let msg = Message::loading();
        let (rows, _) = draw(&msg, 80);
        assert!(rows.join("\n").contains("Thinking"));
    }

    #[test]
    fn bot_markdown_is_rendered_without_markers() {
        let msg = Message::bot("**Jane Doe** knows React");
        let (rows, _) = draw(&msg, 80);
        let all = rows.join("\n");
        assert!(all.contains("Jane Doe knows React"));
        assert!(!all.contains("**"));
    }

    #[test]
    fn user_text_is_verbatim() {
        let msg = Message::user("**not bold**");
        let (rows, _) = draw(&msg, 80);
        assert!(rows.join("\n").contains("**not bold**"));
    }

    #[test]
    fn title_shows_sender_and_time() {
        let msg = Message::user("hi");
        let (rows, _) = draw(&msg, 80);
        let expected = msg.timestamp.format("%H:%M").to_string();
        assert!(rows[0].contains("You"));
        assert!(rows[0].contains(&expected));
    }

    #[test]
    fn very_long_line_clamps_to_max_width() {
        for len in [65_533, 65_540] {
            let user = Message::user("x".repeat(len));
            let bot = Message::bot("x".repeat(len));
            assert_eq!(MessageBubble::new(&user, false, 0.0).width(100), 80);
            assert_eq!(MessageBubble::new(&bot, false, 0.0).width(100), 80);
        }
    }

    #[test]
    fn very_long_line_height_wraps_at_max_width() {
        let msg = Message::user("x".repeat(65_540));
        let bubble = MessageBubble::new(&msg, false, 0.0);
        // 76 inner columns at an 80-wide bubble
        let rows = u16::try_from(65_540usize.div_ceil(76)).unwrap();
        let height = bubble.calculate_height(100);
        assert!(height >= rows + VERTICAL_OVERHEAD + MESSAGE_GAP);
        assert!(height < u16::MAX);
    }
}
