//! In-memory line buffer implementing [`EditorWidget`].

use crate::widget::{EditorWidget, Position};

/// Text buffer with line-based storage and a single selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    anchor: Position,
    head: Position,
    read_only: bool,
    scrolled_to: Option<Position>,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            anchor: Position::default(),
            head: Position::default(),
            read_only: false,
            scrolled_to: None,
        }
    }

    /// An empty buffer that ignores keystrokes, used for the log pane.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::new()
        }
    }

    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.set_value(text);
        buffer
    }

    /// Ordered selection bounds.
    pub fn selection(&self) -> (Position, Position) {
        if self.anchor <= self.head {
            (self.anchor, self.head)
        } else {
            (self.head, self.anchor)
        }
    }

    pub fn has_selection(&self) -> bool {
        self.anchor != self.head
    }

    /// Collapse the selection to `pos`.
    pub fn set_cursor(&mut self, pos: Position) {
        self.set_selection(pos, pos);
    }

    /// Last position passed to `scroll_into_view`.
    pub fn scrolled_to(&self) -> Option<Position> {
        self.scrolled_to
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn line_len(&self, n: usize) -> usize {
        self.lines.get(n).map_or(0, |line| line.chars().count())
    }

    fn clip(&self, pos: Position) -> Position {
        let line = pos.line.min(self.lines.len() - 1);
        Position::new(line, pos.ch.min(self.line_len(line)))
    }

    /// Replace `[from, to)` with `text` and return the end of the inserted
    /// text. Both bounds must already be clipped and ordered.
    fn splice(&mut self, text: &str, from: Position, to: Position) -> Position {
        let prefix_end = byte_offset(&self.lines[from.line], from.ch);
        let suffix_start = byte_offset(&self.lines[to.line], to.ch);
        let prefix = self.lines[from.line][..prefix_end].to_string();
        let suffix = self.lines[to.line][suffix_start..].to_string();

        let mut inserted: Vec<String> = text.split('\n').map(String::from).collect();
        let last = inserted.len() - 1;
        let end = if last == 0 {
            Position::new(from.line, from.ch + inserted[0].chars().count())
        } else {
            Position::new(from.line + last, inserted[last].chars().count())
        };

        inserted[0].insert_str(0, &prefix);
        inserted[last].push_str(&suffix);
        self.lines.splice(from.line..=to.line, inserted);
        end
    }
}

impl EditorWidget for TextBuffer {
    fn cursor(&self) -> Position {
        self.head
    }

    fn line(&self, n: usize) -> Option<&str> {
        self.lines.get(n).map(String::as_str)
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn replace_range(&mut self, text: &str, from: Position, to: Option<Position>) {
        let from = self.clip(from);
        let to = self.clip(to.unwrap_or(from));
        let (from, to) = if from <= to { (from, to) } else { (to, from) };

        let end = self.splice(text, from, to);
        self.anchor = shift(self.anchor, from, to, end);
        self.head = shift(self.head, from, to, end);
    }

    fn set_selection(&mut self, anchor: Position, head: Position) {
        self.anchor = self.clip(anchor);
        self.head = self.clip(head);
    }

    fn replace_selection(&mut self, text: &str) {
        let (from, to) = self.selection();
        let end = self.splice(text, from, to);
        self.anchor = end;
        self.head = end;
    }

    fn scroll_into_view(&mut self, pos: Position) {
        self.scrolled_to = Some(self.clip(pos));
    }

    fn value(&self) -> String {
        self.lines.join("\n")
    }

    fn set_value(&mut self, text: &str) {
        self.lines = text.split('\n').map(String::from).collect();
        self.anchor = Position::default();
        self.head = Position::default();
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}

/// Map a position across the replacement of `[from, to)` by text ending at
/// `end`. Positions inside the replaced range collapse to `from`.
fn shift(pos: Position, from: Position, to: Position, end: Position) -> Position {
    if pos < from {
        pos
    } else if pos < to {
        from
    } else if pos.line == to.line {
        Position::new(end.line, end.ch + (pos.ch - to.ch))
    } else {
        Position::new(pos.line - to.line + end.line, pos.ch)
    }
}

/// Byte offset of char column `ch`, clamped to the end of `line`.
fn byte_offset(line: &str, ch: usize) -> usize {
    line.char_indices()
        .nth(ch)
        .map_or(line.len(), |(offset, _)| offset)
}
