//! Keystroke handling for the editor pane.
//!
//! The separator key runs abbreviation expansion, the indent key inserts a
//! fixed run of separators, and everything else is ordinary typing.

use rhizome_glyph_abbrev::{SEPARATOR, SymbolTable, expand_with};
use tracing::debug;

use crate::widget::{EditorWidget, Position};

/// Default indent width, in separators.
pub const DEFAULT_INDENT_UNIT: usize = 2;

/// A keystroke as seen by the editor pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Inserts a separator or expands an abbreviation.
    Separator,
    /// Inserts `indent_unit` separators.
    Indent,
    Enter,
    Backspace,
    Char(char),
}

/// What a keystroke did to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Text was inserted or deleted without substitution.
    Edited,
    /// An abbreviation or arrow was replaced by its symbol.
    Expanded,
    /// Nothing changed.
    Ignored,
}

/// Maps keystrokes to buffer edits.
#[derive(Debug, Clone)]
pub struct Keymap {
    symbols: SymbolTable,
    separator: char,
    indent_unit: usize,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new(SymbolTable::builtin())
    }
}

impl Keymap {
    pub fn new(symbols: SymbolTable) -> Self {
        Self {
            symbols,
            separator: SEPARATOR,
            indent_unit: DEFAULT_INDENT_UNIT,
        }
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_indent_unit(mut self, indent_unit: usize) -> Self {
        self.indent_unit = indent_unit;
        self
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn indent_unit(&self) -> usize {
        self.indent_unit
    }

    /// Classify a typed character.
    pub fn key_for(&self, c: char) -> Key {
        match c {
            c if c == self.separator => Key::Separator,
            '\t' => Key::Indent,
            '\n' => Key::Enter,
            c => Key::Char(c),
        }
    }

    /// Apply one keystroke to `editor`.
    pub fn handle<W: EditorWidget + ?Sized>(&self, editor: &mut W, key: Key) -> KeyOutcome {
        if editor.is_read_only() {
            return KeyOutcome::Ignored;
        }

        match key {
            Key::Separator => self.separator_key(editor),
            Key::Indent => {
                let indent: String = std::iter::repeat_n(self.separator, self.indent_unit).collect();
                editor.replace_selection(&indent);
                KeyOutcome::Edited
            }
            Key::Enter => {
                editor.replace_selection("\n");
                KeyOutcome::Edited
            }
            Key::Backspace => backspace(editor),
            Key::Char(c) => {
                editor.replace_selection(c.encode_utf8(&mut [0; 4]));
                KeyOutcome::Edited
            }
        }
    }

    /// Type `text` one character at a time.
    pub fn type_text<W: EditorWidget + ?Sized>(&self, editor: &mut W, text: &str) {
        for c in text.chars() {
            self.handle(editor, self.key_for(c));
        }
    }

    fn separator_key<W: EditorWidget + ?Sized>(&self, editor: &mut W) -> KeyOutcome {
        let cursor = editor.cursor();
        let before: String = editor
            .line(cursor.line)
            .unwrap_or_default()
            .chars()
            .take(cursor.ch)
            .collect();

        let expansion = expand_with(&self.symbols, cursor.line, &before, self.separator);
        if !expansion.is_substitution() {
            editor.replace_selection(&expansion.text);
            return KeyOutcome::Edited;
        }

        debug!(
            line = cursor.line,
            start = expansion.span.start,
            end = expansion.span.end,
            text = %expansion.text,
            "expanding abbreviation"
        );
        editor.set_selection(
            Position::new(cursor.line, expansion.span.start),
            Position::new(cursor.line, expansion.span.end),
        );
        editor.replace_selection(&expansion.text);
        KeyOutcome::Expanded
    }
}

fn backspace<W: EditorWidget + ?Sized>(editor: &mut W) -> KeyOutcome {
    let cursor = editor.cursor();
    let start = if cursor.ch > 0 {
        Position::new(cursor.line, cursor.ch - 1)
    } else if cursor.line > 0 {
        let previous = cursor.line - 1;
        let len = editor.line(previous).map_or(0, |line| line.chars().count());
        Position::new(previous, len)
    } else {
        return KeyOutcome::Ignored;
    };

    editor.replace_range("", start, Some(cursor));
    KeyOutcome::Edited
}
