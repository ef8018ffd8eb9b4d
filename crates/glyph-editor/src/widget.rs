//! The editor widget contract.

/// Cursor position: zero-based line and zero-based column in `char`s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub const fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

/// Primitives a text widget offers to the playground core.
///
/// Positions passed in are clipped to the document. All mutation goes
/// through `replace_range` and `replace_selection`.
pub trait EditorWidget {
    /// The cursor (selection head).
    fn cursor(&self) -> Position;

    /// Text of line `n`, without its line break.
    fn line(&self, n: usize) -> Option<&str>;

    fn line_count(&self) -> usize;

    /// Replace `[from, to)` with `text`. `to` defaults to `from`.
    fn replace_range(&mut self, text: &str, from: Position, to: Option<Position>);

    /// Select `[anchor, head]`; the cursor moves to `head`.
    fn set_selection(&mut self, anchor: Position, head: Position);

    /// Replace the selection with `text` and put the cursor after it.
    fn replace_selection(&mut self, text: &str);

    fn scroll_into_view(&mut self, pos: Position);

    /// Whole document, lines joined with `\n`.
    fn value(&self) -> String;

    fn set_value(&mut self, text: &str);

    /// Read-only widgets ignore keystrokes but still accept programmatic
    /// edits.
    fn is_read_only(&self) -> bool {
        false
    }

    /// Position just past the last character of the document.
    fn end(&self) -> Position {
        let last = self.line_count().saturating_sub(1);
        let ch = self.line(last).map_or(0, |line| line.chars().count());
        Position::new(last, ch)
    }
}

/// Status-bar text for a cursor: 1-based line, 0-based column.
pub fn cursor_status(pos: Position) -> String {
    format!("{},{}", pos.line + 1, pos.ch)
}
