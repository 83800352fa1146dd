//! # MessageList Component
//!
//! Scrollable view of the conversation.
//!
//! ## Responsibilities
//!
//! - Lay out bubbles top to bottom with cached heights
//! - Follow new replies while pinned to the bottom
//! - Report whether content sits below the viewport (`↓ New`)
//! - Remember where it was drawn so mouse rows can be hit-tested
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and `&'a [Message]` (props).
//! `Component::render` takes `&mut self`, so the layout cache and scroll
//! state are updated during the render pass, like a `StatefulWidget`.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::message::Message;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageBubble;
use crate::tui::event::TuiEvent;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// Auto-scroll to the newest message
    pub stick_to_bottom: bool,
    /// Message under the mouse pointer
    pub hovered_index: Option<usize>,
    /// Content exists below the viewport
    pub has_unseen_content: bool,
    /// Screen area used by the last render
    pub last_area: Rect,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            hovered_index: None,
            has_unseen_content: false,
            last_area: Rect::default(),
        }
    }

    fn max_scroll(&self) -> u16 {
        self.layout
            .total_height()
            .saturating_sub(self.last_area.height)
    }

    /// Never scroll past the last message.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll once the user scrolls back down to the end.
    pub fn repin_if_at_bottom(&mut self) {
        self.clamp_scroll();
        if self.scroll_state.offset().y >= self.max_scroll() {
            self.stick_to_bottom = true;
        }
    }

    /// Index of the message drawn at terminal row `screen_y`, if any.
    pub fn hit_test(&self, screen_y: u16) -> Option<usize> {
        let area = self.last_area;
        if screen_y < area.y || screen_y >= area.y + area.height {
            return None;
        }
        let content_y = (screen_y - area.y) + self.scroll_state.offset().y;
        let idx = self
            .layout
            .prefix_heights
            .partition_point(|&end| end <= content_y);
        (idx < self.layout.prefix_heights.len()).then_some(idx)
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [Message],
    /// Animation clock for the loading bubble
    pub elapsed: f32,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState, messages: &'a [Message], elapsed: f32) -> Self {
        Self {
            state,
            messages,
            elapsed,
        }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // scrollbar column
        self.state.last_area = area;

        // 1. Refresh layout cache from the first changed message onward
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(self.messages, content_width);
        layout.heights.truncate(reusable);
        for msg in &self.messages[reusable..] {
            let bubble = MessageBubble::new(msg, false, self.elapsed);
            layout.heights.push(bubble.calculate_height(content_width));
        }
        layout.rebuild_prefix_heights();
        layout.remember(self.messages, content_width);

        let total_height = layout.total_height();

        // 2. Scroll bookkeeping
        if self.state.stick_to_bottom {
            self.state.scroll_state.set_offset(Position {
                x: 0,
                y: self.state.max_scroll(),
            });
        } else {
            self.state.clamp_scroll();
        }
        let scroll_offset = self.state.scroll_state.offset().y;
        let visible = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Draw only what is near the viewport
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for i in visible {
            let top = self.state.layout.top_of(i);
            let row = Rect::new(0, top, content_width, self.state.layout.heights[i]);
            let hovered = self.state.hovered_index == Some(i);
            let bubble = MessageBubble::new(&self.messages[i], hovered, self.elapsed);
            scroll_view.render_widget(bubble, bubble.rect_in(row));
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        self.state.has_unseen_content = scroll_offset < self.state.max_scroll();
    }
}

/// Scroll events go to the persistent state: `MessageList` is rebuilt every
/// frame and cannot hold the scroll position itself.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
            }
            _ => {}
        }
        None
    }
}

/// Cached bubble heights, keyed by message id so that swapping the loading
/// placeholder for the real reply invalidates exactly one entry.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    /// Running sum: `prefix_heights[i]` is the bottom edge of message `i`.
    pub prefix_heights: Vec<u16>,
    ids: Vec<String>,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            ids: Vec::new(),
            content_width: 0,
        }
    }

    /// Number of leading heights still valid for `messages` at `content_width`.
    pub fn reusable_count(&self, messages: &[Message], content_width: u16) -> usize {
        if self.content_width != content_width {
            return 0;
        }
        self.ids
            .iter()
            .zip(messages)
            .take_while(|(id, msg)| **id == msg.id)
            .count()
            .min(self.heights.len())
    }

    pub fn remember(&mut self, messages: &[Message], content_width: u16) {
        self.ids = messages.iter().map(|m| m.id.clone()).collect();
        self.content_width = content_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    pub fn top_of(&self, index: usize) -> u16 {
        match index {
            0 => 0,
            i => self.prefix_heights[i - 1],
        }
    }

    /// Messages overlapping the viewport, padded by half a screen each way.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let from = scroll_offset.saturating_sub(buffer);
        let to = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self.prefix_heights.partition_point(|&end| end <= from);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < to)
            .saturating_add(1)
            .min(self.prefix_heights.len());
        start..end
    }
}
