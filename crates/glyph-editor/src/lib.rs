//! Editor side of the Glyph playground.
//!
//! The core only talks to text widgets through [`EditorWidget`]. An
//! in-memory [`TextBuffer`] implements it for the terminal front-end and for
//! tests.

pub mod buffer;
pub mod keymap;
pub mod log;
pub mod widget;

pub use buffer::TextBuffer;
pub use keymap::{Key, KeyOutcome, Keymap};
pub use log::{LogAppender, LogSink};
pub use widget::{EditorWidget, Position, cursor_status};
