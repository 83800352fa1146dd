use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{ExamplePicker, MessageList, TitleBar};

/// Lay out and draw one frame.
///
/// ```text
/// ┌ title bar ───────────────┐  1 row
/// │ message list             │  fills
/// │ error banner             │  1 row, only while App.error is set
/// └ input box ───────────────┘  grows with the buffer
/// ```
///
/// The example picker, when open, is drawn last on top of the list.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, elapsed: f32) {
    use Constraint::{Length, Min};

    tui.input_box.disabled = app.is_loading || app.clearing;

    let area = frame.area();
    let input_height = tui.input_box.calculate_height(area.width);
    let banner_height = u16::from(app.error.is_some());
    let [title_area, list_area, banner_area, input_area] = Layout::vertical([
        Length(1),
        Min(0),
        Length(banner_height),
        Length(input_height),
    ])
    .areas(area);

    // List first: it decides whether there is unseen content for the title
    MessageList::new(&mut tui.message_list, &app.messages, elapsed).render(frame, list_area);

    TitleBar::new(
        app.backend.location().to_string(),
        app.status_message.clone(),
        tui.message_list.has_unseen_content,
    )
    .render(frame, title_area);

    if let Some(error) = &app.error {
        draw_error_banner(frame, banner_area, error);
    }

    tui.input_box.render(frame, input_area);

    if let Some(picker) = tui.example_picker.as_mut() {
        ExamplePicker::new(picker).render(frame, input_area, area);
    }
}

fn draw_error_banner(frame: &mut Frame, area: Rect, error: &str) {
    let banner = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" ✗ {error}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" (Esc to dismiss)", Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(banner, area);
}
