//! The read-only log pane.

use crate::buffer::TextBuffer;
use crate::widget::EditorWidget;

/// Destination for evaluation output.
pub trait LogSink {
    /// Append `text` verbatim after the current end of the log.
    fn append(&mut self, text: &str);

    fn clear(&mut self);
}

/// Appends to the end of a widget's content and keeps the end in view.
#[derive(Debug, Clone)]
pub struct LogAppender<W = TextBuffer> {
    view: W,
}

impl Default for LogAppender<TextBuffer> {
    fn default() -> Self {
        Self::new(TextBuffer::read_only())
    }
}

impl<W: EditorWidget> LogAppender<W> {
    pub fn new(view: W) -> Self {
        Self { view }
    }

    pub fn view(&self) -> &W {
        &self.view
    }

    /// Full log text.
    pub fn contents(&self) -> String {
        self.view.value()
    }
}

impl<W: EditorWidget> LogSink for LogAppender<W> {
    fn append(&mut self, text: &str) {
        // Content end, not the widget cursor.
        let end = self.view.end();
        self.view.replace_range(text, end, None);
        let end = self.view.end();
        self.view.scroll_into_view(end);
    }

    fn clear(&mut self) {
        self.view.set_value("");
    }
}
