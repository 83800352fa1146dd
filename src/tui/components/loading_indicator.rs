//! "Thinking" with three bouncing dots, shown inside the pending bot bubble.
//!
//! Each dot follows the same one-second bounce, the second and third
//! starting 0.2 s and 0.4 s later, so the raised dot walks left to right.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

pub const LABEL: &str = "Thinking";
const BOUNCE_PERIOD_SECS: f32 = 1.0;
const DOT_DELAY_SECS: f32 = 0.2;
const DOT_COUNT: usize = 3;

const RAISED: &str = "●";
const RESTING: &str = "•";

#[derive(Debug, Clone, Copy)]
pub struct LoadingIndicator {
    /// Seconds since the event loop started
    pub elapsed: f32,
    pub color: Color,
}

impl LoadingIndicator {
    pub fn new(elapsed: f32, color: Color) -> Self {
        Self { elapsed, color }
    }

    /// Whether dot `index` is in the upper half of its bounce.
    pub fn is_raised(elapsed: f32, index: usize) -> bool {
        let local = elapsed - DOT_DELAY_SECS * index as f32;
        if local < 0.0 {
            return false;
        }
        (local % BOUNCE_PERIOD_SECS) < BOUNCE_PERIOD_SECS / 2.0
    }

    pub fn line(&self) -> Line<'static> {
        let base = Style::default().fg(self.color);
        let mut spans = vec![Span::styled(LABEL, base), Span::raw(" ")];
        for i in 0..DOT_COUNT {
            let (symbol, style) = if Self::is_raised(self.elapsed, i) {
                (RAISED, base.add_modifier(Modifier::BOLD))
            } else {
                (RESTING, base.add_modifier(Modifier::DIM))
            };
            spans.push(Span::styled(symbol, style));
            if i + 1 < DOT_COUNT {
                spans.push(Span::raw(" "));
            }
        }
        Line::from(spans)
    }
}

impl Widget for LoadingIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.line().render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raised(elapsed: f32) -> Vec<bool> {
        (0..DOT_COUNT)
            .map(|i| LoadingIndicator::is_raised(elapsed, i))
            .collect()
    }

    #[test]
    fn dots_start_in_sequence() {
        assert_eq!(raised(0.1), vec![true, false, false]);
        assert_eq!(raised(0.3), vec![true, true, false]);
        assert_eq!(raised(0.5), vec![false, true, true]);
    }

    #[test]
    fn bounce_repeats_every_period() {
        assert_eq!(raised(1.1), raised(2.1));
    }

    #[test]
    fn line_starts_with_label_and_has_three_dots() {
        let line = LoadingIndicator::new(0.0, Color::Gray).line();
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.starts_with(LABEL));
        let dots = text.matches(RAISED).count() + text.matches(RESTING).count();
        assert_eq!(dots, 3);
    }
}
