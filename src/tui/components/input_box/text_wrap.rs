//! Visual line layout for the InputBox.
//!
//! The buffer is split into byte ranges, one per visual row. Rendering,
//! cursor placement, and vertical movement all read from the same ranges,
//! so what is drawn and where the cursor lands cannot disagree.

use std::ops::Range;

/// Border (2) + horizontal padding (2)
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Rows shown before the box starts scrolling internally
pub(super) const MAX_VISIBLE_LINES: u16 = 5;
/// Distance from the area's left edge to the first text column
pub(super) const CONTENT_OFFSET_X: u16 = 2;
/// Distance from the area's top edge to the first text row
pub(super) const CONTENT_OFFSET_Y: u16 = 1;

/// Width available for text once borders and padding are removed.
pub(super) fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Build textwrap options configured for the input box inner width.
pub(super) fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(usize::from(inner_width.max(1)))
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
        .wrap_algorithm(textwrap::WrapAlgorithm::FirstFit)
}

/// Split `text` into visual rows no wider than `width` columns.
///
/// Rows come from `textwrap::wrap`, which borrows each row from `text`, so
/// a row's byte offset is its distance from the start of the buffer. The
/// spaces textwrap trims at a soft break are given back to the row they
/// follow (they hang past the edge, like a browser textarea), which keeps
/// every byte of a logical line inside some row. The `\n` separating
/// logical lines belongs to no range. Always returns at least one range.
pub(super) fn visual_lines(text: &str, width: u16) -> Vec<Range<usize>> {
    let base = text.as_ptr() as usize;
    let mut rows: Vec<Range<usize>> = Vec::new();

    for row in textwrap::wrap(text, wrap_options(width)) {
        let floor = rows.last().map_or(0, |r| r.end);
        let start = (row.as_ptr() as usize)
            .checked_sub(base)
            .filter(|&off| off >= floor && off + row.len() <= text.len())
            // Only reachable if a row was not borrowed from `text`
            .unwrap_or(floor);
        rows.push(start..start + row.len());
    }

    for i in 0..rows.len() {
        let limit = rows.get(i + 1).map_or(text.len(), |next| next.start);
        let row = &mut rows[i];
        let gap = &text[row.end..limit];
        row.end += gap.len() - gap.trim_start_matches(' ').len();
    }

    if rows.is_empty() {
        rows.push(0..0);
    }
    rows
}

/// Index of the visual row holding byte offset `pos`.
///
/// A position on a soft-wrap boundary belongs to the row it starts.
pub(super) fn row_of(rows: &[Range<usize>], pos: usize) -> usize {
    rows.partition_point(|r| r.start <= pos).saturating_sub(1)
}

pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Start of the word before `pos` (readline `backward-word`).
pub(super) fn prev_word_boundary(text: &str, pos: usize) -> usize {
    let before = &text[..pos];
    let trimmed = before.trim_end_matches(|c: char| !is_word_char(c));
    trimmed
        .char_indices()
        .rev()
        .find(|&(_, c)| !is_word_char(c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0)
}

/// End of the word after `pos` (readline `forward-word`).
pub(super) fn next_word_boundary(text: &str, pos: usize) -> usize {
    let after = &text[pos..];
    let skipped = after.len() - after.trim_start_matches(|c: char| !is_word_char(c)).len();
    after[skipped..]
        .char_indices()
        .find(|&(_, c)| !is_word_char(c))
        .map(|(i, _)| pos + skipped + i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_as_str<'a>(text: &'a str, width: u16) -> Vec<&'a str> {
        visual_lines(text, width)
            .into_iter()
            .map(|r| &text[r])
            .collect()
    }

    #[test]
    fn empty_buffer_has_one_row() {
        assert_eq!(visual_lines("", 20), vec![0..0]);
    }

    #[test]
    fn short_text_fits_on_one_row() {
        assert_eq!(rows_as_str("React devs", 20), vec!["React devs"]);
    }

    #[test]
    fn wraps_after_last_space() {
        assert_eq!(
            rows_as_str("find react devs", 8),
            vec!["find ", "react ", "devs"]
        );
    }

    #[test]
    fn breaks_long_words() {
        assert_eq!(rows_as_str("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn newlines_start_new_rows() {
        assert_eq!(rows_as_str("a\nb\n", 20), vec!["a", "b", ""]);
    }

    #[test]
    fn wide_characters_count_double() {
        // Each CJK char is two columns wide
        assert_eq!(rows_as_str("日本語", 4), vec!["日本", "語"]);
    }

    #[test]
    fn trailing_spaces_hang_on_the_last_row() {
        assert_eq!(rows_as_str("react  ", 20), vec!["react  "]);
    }

    #[test]
    fn rows_cover_every_byte_of_a_logical_line() {
        let text = "senior react engineer\nremote ok";
        let rows = visual_lines(text, 7);
        let joined: String = rows.iter().map(|r| &text[r.clone()]).collect();
        assert_eq!(joined, text.replace('\n', ""));
    }

    #[test]
    fn row_of_prefers_the_row_a_position_starts() {
        let text = "find react devs";
        let rows = visual_lines(text, 8);
        assert_eq!(row_of(&rows, 0), 0);
        assert_eq!(row_of(&rows, 4), 0);
        // Byte 5 is the start of "react"
        assert_eq!(row_of(&rows, 5), 1);
        assert_eq!(row_of(&rows, text.len()), 2);
    }

    #[test]
    fn row_of_after_trailing_newline() {
        let rows = visual_lines("abc\n", 20);
        assert_eq!(row_of(&rows, 4), 1);
    }

    #[test]
    fn char_boundaries_respect_multibyte() {
        let s = "café";
        assert_eq!(prev_char_boundary(s, 5), 3);
        assert_eq!(next_char_boundary(s, 3), 5);
        assert_eq!(next_char_boundary(s, 5), 5);
    }

    #[test]
    fn word_boundaries() {
        let s = "senior react_dev, remote";
        assert_eq!(next_word_boundary(s, 0), 6);
        assert_eq!(next_word_boundary(s, 6), 16);
        assert_eq!(prev_word_boundary(s, s.len()), 18);
        assert_eq!(prev_word_boundary(s, 18), 7);
        assert_eq!(prev_word_boundary(s, 0), 0);
        assert_eq!(next_word_boundary(s, s.len()), s.len());
    }
}
