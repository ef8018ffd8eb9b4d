//! The abbreviation symbol table.
//!
//! Tokens are matched exactly and case-sensitively. A table never holds two
//! rules for the same token.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ESCAPE;

/// Errors raised while building a symbol table.
#[derive(Debug, Error)]
pub enum SymbolTableError {
    #[error("abbreviation token must not be empty")]
    EmptyToken,

    #[error("abbreviation token '{0}' contains the escape marker")]
    ContainsEscape(String),

    #[error("abbreviation token '{0}' contains whitespace")]
    ContainsWhitespace(String),

    #[error("duplicate abbreviation token '{0}'")]
    Duplicate(String),

    #[error("failed to parse abbreviation table: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A single abbreviation: `\token` expands to `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbbreviationRule {
    /// Mnemonic typed after the escape marker.
    pub token: String,
    /// Text substituted for the escape marker and token.
    pub replacement: String,
    /// Whether one separator follows the replacement.
    #[serde(default)]
    pub append_separator: bool,
}

impl AbbreviationRule {
    pub fn new(
        token: impl Into<String>,
        replacement: impl Into<String>,
        append_separator: bool,
    ) -> Self {
        Self {
            token: token.into(),
            replacement: replacement.into(),
            append_separator,
        }
    }
}

/// Built-in rules as `(token, replacement, append_separator)`.
pub const BUILTIN_RULES: &[(&str, &str, bool)] = &[
    ("to", "\u{2192}", true),
    ("forall", "\u{2200}", false),
    ("exists", "\u{2203}", false),
    ("lambda", "\u{03BB}", false),
    ("mu", "\u{03BC}", false),
    ("nu", "\u{03BD}", false),
    ("sub", "\u{2286}", true),
    ("times", "\u{00D7}", true),
    ("infty", "\u{221E}", false),
    ("alpha", "\u{03B1}", false),
    ("beta", "\u{03B2}", false),
    ("gamma", "\u{03B3}", false),
    ("delta", "\u{03B4}", false),
    ("epsilon", "\u{03B5}", false),
    ("in", "\u{2208}", false),
    ("notin", "\u{2209}", false),
    ("dots", "\u{2026}", false),
];

/// Abbreviation rules indexed by token, in definition order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    rules: Vec<AbbreviationRule>,
    index: HashMap<String, usize>,
}

/// On-disk shape of an abbreviation file.
#[derive(Debug, Deserialize)]
struct TableFile {
    #[serde(default)]
    abbreviation: Vec<AbbreviationRule>,
}

impl SymbolTable {
    /// The built-in table.
    pub fn builtin() -> Self {
        let mut table = Self::default();
        for &(token, replacement, append_separator) in BUILTIN_RULES {
            table.upsert(AbbreviationRule::new(token, replacement, append_separator));
        }
        table
    }

    /// Build a table from rules, rejecting invalid or repeated tokens.
    pub fn from_rules<I>(rules: I) -> Result<Self, SymbolTableError>
    where
        I: IntoIterator<Item = AbbreviationRule>,
    {
        let mut table = Self::default();
        for rule in rules {
            validate_token(&rule.token)?;
            if table.index.contains_key(&rule.token) {
                return Err(SymbolTableError::Duplicate(rule.token));
            }
            table.upsert(rule);
        }
        Ok(table)
    }

    /// Parse a table from a list of `[[abbreviation]]` entries.
    pub fn from_toml(source: &str) -> Result<Self, SymbolTableError> {
        let file: TableFile = toml::from_str(source)?;
        Self::from_rules(file.abbreviation)
    }

    /// Layer `rules` over this table. A rule whose token already exists
    /// replaces the existing one in place; new tokens are appended.
    pub fn with_overrides<I>(mut self, rules: I) -> Result<Self, SymbolTableError>
    where
        I: IntoIterator<Item = AbbreviationRule>,
    {
        let overrides = Self::from_rules(rules)?;
        for rule in overrides.rules {
            self.upsert(rule);
        }
        Ok(self)
    }

    /// Look up a token.
    pub fn lookup(&self, token: &str) -> Option<&AbbreviationRule> {
        self.index.get(token).map(|&i| &self.rules[i])
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over rules in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &AbbreviationRule> {
        self.rules.iter()
    }

    fn upsert(&mut self, rule: AbbreviationRule) {
        match self.index.get(&rule.token) {
            Some(&i) => self.rules[i] = rule,
            None => {
                self.index.insert(rule.token.clone(), self.rules.len());
                self.rules.push(rule);
            }
        }
    }
}

fn validate_token(token: &str) -> Result<(), SymbolTableError> {
    if token.is_empty() {
        return Err(SymbolTableError::EmptyToken);
    }
    if token.contains(ESCAPE) {
        return Err(SymbolTableError::ContainsEscape(token.to_string()));
    }
    if token.chars().any(char::is_whitespace) {
        return Err(SymbolTableError::ContainsWhitespace(token.to_string()));
    }
    Ok(())
}
