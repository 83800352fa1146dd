//! # TUI Components
//!
//! Every piece of the chat screen.
//!
//! ## Stateless (props only)
//!
//! - `TitleBar`: app name, backend URL, status, `↓ New` marker
//! - `MessageBubble`: one conversation message
//! - `LoadingIndicator`: the bouncing "Thinking" dots
//!
//! ## Stateful
//!
//! - `InputBox`: owns the edit buffer and cursor
//! - `MessageList`: transient wrapper around `MessageListState`
//! - `ExamplePicker`: transient wrapper around `ExamplePickerState`
//!
//! Persistent state lives in `TuiState`, transient wrappers are rebuilt
//! every frame with borrowed state and props.
//!
//! ```text
//! components/
//! ├── title_bar.rs
//! ├── message.rs           (MessageBubble)
//! ├── message_list.rs      (scrolling + layout cache)
//! ├── loading_indicator.rs
//! ├── example_picker.rs    (Ctrl+E overlay)
//! └── input_box/           (editor, cursor, soft wrap)
//! ```

pub mod example_picker;
pub mod input_box;
pub mod loading_indicator;
pub mod message;
pub mod message_list;
mod title_bar;

pub use example_picker::{ExampleEvent, ExamplePicker, ExamplePickerState};
pub use input_box::{InputBox, InputEvent};
pub use loading_indicator::LoadingIndicator;
pub use message::MessageBubble;
pub use message_list::{MessageList, MessageListState};
pub use title_bar::TitleBar;
