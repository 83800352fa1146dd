//! Cursor position and internal scroll for the InputBox.
//!
//! `CursorState` never owns text. Every method takes the buffer, so the
//! caller stays the single source of truth for what is typed.

use ratatui::layout::Rect;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::text_wrap::{
    CONTENT_OFFSET_X, CONTENT_OFFSET_Y, MAX_VISIBLE_LINES, inner_width, row_of, visual_lines,
};

pub(super) struct CursorState {
    /// Byte offset into the buffer, always on a char boundary
    pub pos: usize,
    /// First visible visual row
    pub scroll_offset: u16,
    /// Area width seen by the last render, used for Up/Down between frames
    pub last_area_width: u16,
}

impl CursorState {
    const DEFAULT_WIDTH: u16 = 80;

    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
            last_area_width: Self::DEFAULT_WIDTH,
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Visual (row, column) of the cursor for a box of `area_width`.
    pub fn locate(&self, buffer: &str, area_width: u16) -> (u16, u16) {
        let rows = visual_lines(buffer, inner_width(area_width));
        let row = row_of(&rows, self.pos);
        let col = buffer[rows[row].start..self.pos].width();
        (row as u16, col as u16)
    }

    /// Move one visual row up (`-1`) or down (`1`), keeping the column
    /// where possible. Returns `false` at the first or last row.
    pub fn move_vertically(&mut self, buffer: &str, direction: i16) -> bool {
        let rows = visual_lines(buffer, inner_width(self.last_area_width));
        let current = row_of(&rows, self.pos);
        let target = match direction {
            d if d < 0 && current > 0 => current - 1,
            d if d > 0 && current + 1 < rows.len() => current + 1,
            _ => return false,
        };

        let want_col = buffer[rows[current].start..self.pos].width();
        let range = rows[target].clone();
        // A soft-wrapped row ends where the next begins; stopping on that
        // byte would put the cursor on the following row.
        let soft_wrapped = rows.get(target + 1).is_some_and(|next| next.start == range.end);

        let mut col = 0;
        let mut pos = range.end;
        for (i, c) in buffer[range.clone()].char_indices() {
            let w = c.width().unwrap_or(0);
            if col + w > want_col {
                pos = range.start + i;
                break;
            }
            col += w;
        }
        if soft_wrapped && pos == range.end {
            pos = buffer[range.clone()]
                .char_indices()
                .next_back()
                .map(|(i, _)| range.start + i)
                .unwrap_or(range.start);
        }

        self.pos = pos;
        true
    }

    /// Keep the cursor row inside the visible window.
    pub fn update_scroll_offset(&mut self, buffer: &str, area_width: u16) {
        let total = visual_lines(buffer, inner_width(area_width)).len() as u16;
        if total <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
            return;
        }

        let (row, _) = self.locate(buffer, area_width);
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = row + 1 - MAX_VISIBLE_LINES;
        }
        self.scroll_offset = self.scroll_offset.min(total - MAX_VISIBLE_LINES);
    }

    /// Terminal (column, row) where the cursor should be drawn.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let (row, col) = self.locate(buffer, area.width);
        let max_col = inner_width(area.width);
        (
            area.x + CONTENT_OFFSET_X + col.min(max_col),
            area.y + CONTENT_OFFSET_Y + row.saturating_sub(self.scroll_offset),
        )
    }
}
