//! Abbreviation expansion for the Glyph playground.
//!
//! Turns ASCII escape sequences such as `\forall` into mathematical symbols
//! while the user types. Everything here is pure: callers pass the text of
//! the current line up to the cursor and get back the span to replace and
//! the text to put there.

mod expand;
mod table;

pub use expand::{ARROW, CursorSpan, ESCAPE, Expansion, expand, expand_with};
pub use table::{AbbreviationRule, BUILTIN_RULES, SymbolTable, SymbolTableError};

/// The default separator key.
pub const SEPARATOR: char = ' ';

#[cfg(test)]
mod tests;
