//! Separator-key handling.
//!
//! On every separator keystroke the text before the cursor is inspected and
//! exactly one of three things happens: a trailing `->` becomes an arrow, a
//! trailing `\token` becomes its symbol, or a literal separator is inserted.

use tracing::trace;

use crate::SymbolTable;

/// Marker that starts an abbreviation token.
pub const ESCAPE: char = '\\';

/// Replacement for a typed `->`.
pub const ARROW: &str = "\u{2192}";

const ARROW_HEAD: char = '>';
const ARROW_TAIL: char = '-';

/// A half-open column range `[start, end)` on a single line.
///
/// Columns count `char`s. `end` is always the cursor column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorSpan {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl CursorSpan {
    /// An empty span at `col`.
    pub fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            start: col,
            end: col,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

/// What a separator keystroke does to the current line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Existing text to replace. Empty when nothing is replaced.
    pub span: CursorSpan,
    /// Text written in place of `span`.
    pub text: String,
}

impl Expansion {
    fn literal(line: usize, cursor: usize, separator: char) -> Self {
        Self {
            span: CursorSpan::at(line, cursor),
            text: separator.to_string(),
        }
    }

    /// True when existing text is substituted rather than a separator
    /// simply inserted.
    pub fn is_substitution(&self) -> bool {
        !self.span.is_empty()
    }

    /// Apply this expansion to the full text of its line.
    pub fn apply(&self, line: &str) -> String {
        let start = byte_offset(line, self.span.start);
        let end = byte_offset(line, self.span.end);
        let mut out = String::with_capacity(line.len() + self.text.len());
        out.push_str(&line[..start]);
        out.push_str(&self.text);
        out.push_str(&line[end..]);
        out
    }
}

/// Expand with the default separator.
pub fn expand(table: &SymbolTable, line: usize, before_cursor: &str) -> Expansion {
    expand_with(table, line, before_cursor, crate::SEPARATOR)
}

/// Decide what a separator keystroke does.
///
/// `before_cursor` is the text of line `line` from column 0 up to the
/// cursor. The returned span never leaves that text.
pub fn expand_with(
    table: &SymbolTable,
    line: usize,
    before_cursor: &str,
    separator: char,
) -> Expansion {
    let chars: Vec<char> = before_cursor.chars().collect();
    let cursor = chars.len();

    let Some(&last) = chars.last() else {
        return Expansion::literal(line, cursor, separator);
    };

    if last == separator {
        return Expansion::literal(line, cursor, separator);
    }

    if last == ARROW_HEAD {
        if cursor >= 2 && chars[cursor - 2] == ARROW_TAIL {
            let mut text = String::from(ARROW);
            text.push(separator);
            return Expansion {
                span: CursorSpan {
                    line,
                    start: cursor - 2,
                    end: cursor,
                },
                text,
            };
        }
        return Expansion::literal(line, cursor, separator);
    }

    let Some(escape) = chars.iter().rposition(|&c| c == ESCAPE) else {
        return Expansion::literal(line, cursor, separator);
    };

    let token: String = chars[escape + 1..].iter().collect();
    match table.lookup(&token) {
        Some(rule) => {
            let mut text = rule.replacement.clone();
            if rule.append_separator {
                text.push(separator);
            }
            Expansion {
                span: CursorSpan {
                    line,
                    start: escape,
                    end: cursor,
                },
                text,
            }
        }
        None => {
            trace!(token = %token, "no abbreviation for token");
            Expansion::literal(line, cursor, separator)
        }
    }
}

/// Byte offset of char column `col`, clamped to the end of `line`.
fn byte_offset(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map_or(line.len(), |(offset, _)| offset)
}
