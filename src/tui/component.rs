use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// Something that draws itself into a region of the frame.
///
/// Props arrive as struct fields (often borrowed from `App`), persistent
/// state as `&mut` fields pointing into `TuiState`.
///
/// `render` takes `&mut self` so a component can refresh caches (bubble
/// heights, scroll offsets, the last drawn area) while it draws, the same
/// way a ratatui `StatefulWidget` does.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that consumes terminal events.
pub trait EventHandler {
    /// High-level event emitted back to the event loop.
    type Event;

    /// Returns `None` when the event was ignored or needs no follow-up.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
