//! Log pane that mirrors appended text to stdout.

use std::io::Write;

use rhizome_glyph_editor::{LogAppender, LogSink};
use tracing::warn;

#[derive(Debug, Default)]
pub struct TerminalLog {
    pane: LogAppender,
}

impl TerminalLog {
    pub fn contents(&self) -> String {
        self.pane.contents()
    }
}

impl LogSink for TerminalLog {
    fn append(&mut self, text: &str) {
        self.pane.append(text);

        let mut stdout = std::io::stdout().lock();
        if let Err(err) = stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush()) {
            warn!("failed to write log output: {}", err);
        }
    }

    fn clear(&mut self) {
        self.pane.clear();
    }
}
