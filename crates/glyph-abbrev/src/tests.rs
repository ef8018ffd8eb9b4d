//! Tests for abbreviation expansion.

use crate::*;

/// Expand `before_cursor` on line 0 and apply the result to it.
fn press_separator(before_cursor: &str) -> String {
    let table = SymbolTable::builtin();
    expand(&table, 0, before_cursor).apply(before_cursor)
}

#[test]
fn test_every_builtin_rule_expands() {
    let table = SymbolTable::builtin();
    assert_eq!(table.len(), BUILTIN_RULES.len());

    for rule in table.iter() {
        let line = format!("let x = \\{}", rule.token);
        let expected = if rule.append_separator {
            format!("let x = {} ", rule.replacement)
        } else {
            format!("let x = {}", rule.replacement)
        };
        assert_eq!(press_separator(&line), expected, "token {}", rule.token);
    }
}

#[test]
fn test_builtin_symbols() {
    let table = SymbolTable::builtin();
    let symbol = |token: &str| table.lookup(token).map(|r| r.replacement.as_str());

    assert_eq!(symbol("forall"), Some("∀"));
    assert_eq!(symbol("exists"), Some("∃"));
    assert_eq!(symbol("lambda"), Some("λ"));
    assert_eq!(symbol("to"), Some("→"));
    assert_eq!(symbol("sub"), Some("⊆"));
    assert_eq!(symbol("times"), Some("×"));
    assert_eq!(symbol("infty"), Some("∞"));
    assert_eq!(symbol("notin"), Some("∉"));
    assert_eq!(symbol("dots"), Some("…"));
    assert_eq!(symbol("Forall"), None);
}

#[test]
fn test_forall_scenario() {
    let table = SymbolTable::builtin();
    let expansion = expand(&table, 0, "\\forall");

    assert!(expansion.is_substitution());
    assert_eq!(expansion.span, CursorSpan { line: 0, start: 0, end: 7 });
    assert_eq!(expansion.text, "∀");
    assert_eq!(expansion.apply("\\forall"), "∀");
}

#[test]
fn test_unknown_token_inserts_separator() {
    let table = SymbolTable::builtin();
    let expansion = expand(&table, 3, "f \\xyz");

    assert!(!expansion.is_substitution());
    assert_eq!(expansion.span, CursorSpan::at(3, 6));
    assert_eq!(expansion.apply("f \\xyz"), "f \\xyz ");
}

#[test]
fn test_token_without_escape_is_not_expanded() {
    assert_eq!(press_separator("in"), "in ");
    assert_eq!(press_separator("x in"), "x in ");
}

#[test]
fn test_trailing_escape_inserts_separator() {
    assert_eq!(press_separator("a \\"), "a \\ ");
}

#[test]
fn test_arrow_rule() {
    assert_eq!(press_separator("f : a ->"), "f : a → ");
    assert_eq!(press_separator("->"), "→ ");
}

#[test]
fn test_bare_arrow_head() {
    assert_eq!(press_separator("x >"), "x > ");
    assert_eq!(press_separator(">"), "> ");
    assert_eq!(press_separator("=>"), "=> ");
}

#[test]
fn test_empty_line_and_trailing_separator() {
    assert_eq!(press_separator(""), " ");
    assert_eq!(press_separator("a "), "a  ");
    assert_eq!(press_separator("\\forall "), "\\forall  ");
}

#[test]
fn test_nearest_escape_wins() {
    assert_eq!(press_separator("\\foo\\in"), "\\foo∈");
    assert_eq!(press_separator("\\in\\foo"), "\\in\\foo ");
}

#[test]
fn test_token_may_span_inserted_separators() {
    // The scan only stops at the escape marker.
    assert_eq!(press_separator("\\for all"), "\\for all ");
}

#[test]
fn test_prefix_with_multibyte_text() {
    let line = "∀ α. α \\to";
    let expansion = expand(&SymbolTable::builtin(), 0, line);
    assert_eq!(expansion.span.start, 7);
    assert_eq!(expansion.span.end, 10);
    assert_eq!(expansion.apply(line), "∀ α. α → ");
}

#[test]
fn test_apply_keeps_text_after_cursor() {
    let table = SymbolTable::builtin();
    let expansion = expand(&table, 0, "x \\in");
    assert_eq!(expansion.apply("x \\in S"), "x ∈ S");
}

#[test]
fn test_custom_separator() {
    let table = SymbolTable::builtin();
    assert_eq!(expand_with(&table, 0, "\\to", '_').text, "→_");
    assert_eq!(expand_with(&table, 0, "a_", '_').text, "_");
    assert!(!expand_with(&table, 0, "a_", '_').is_substitution());
}

#[test]
fn test_from_rules_rejects_bad_tokens() {
    let err = SymbolTable::from_rules([AbbreviationRule::new("", "x", false)]).unwrap_err();
    assert!(matches!(err, SymbolTableError::EmptyToken));

    let err = SymbolTable::from_rules([AbbreviationRule::new("a\\b", "x", false)]).unwrap_err();
    assert!(matches!(err, SymbolTableError::ContainsEscape(_)));

    let err = SymbolTable::from_rules([AbbreviationRule::new("a b", "x", false)]).unwrap_err();
    assert!(matches!(err, SymbolTableError::ContainsWhitespace(_)));

    let err = SymbolTable::from_rules([
        AbbreviationRule::new("top", "⊤", false),
        AbbreviationRule::new("top", "T", false),
    ])
    .unwrap_err();
    assert!(matches!(err, SymbolTableError::Duplicate(token) if token == "top"));
}

#[test]
fn test_with_overrides() {
    let table = SymbolTable::builtin()
        .with_overrides([
            AbbreviationRule::new("to", "⟶", false),
            AbbreviationRule::new("top", "⊤", false),
        ])
        .unwrap();

    assert_eq!(table.len(), BUILTIN_RULES.len() + 1);
    assert_eq!(table.lookup("to").unwrap().replacement, "⟶");
    assert!(!table.lookup("to").unwrap().append_separator);
    assert_eq!(table.lookup("top").unwrap().replacement, "⊤");

    // Overridden rules keep their position.
    assert_eq!(table.iter().next().unwrap().token, "to");
    assert_eq!(table.iter().last().unwrap().token, "top");
}

#[test]
fn test_from_toml() {
    let source = r#"
[[abbreviation]]
token = "bot"
replacement = "⊥"

[[abbreviation]]
token = "imp"
replacement = "⇒"
append_separator = true
"#;

    let table = SymbolTable::from_toml(source).unwrap();
    assert_eq!(table.len(), 2);
    assert!(!table.lookup("bot").unwrap().append_separator);
    assert_eq!(expand(&table, 0, "a \\imp").apply("a \\imp"), "a ⇒ ");
}

#[test]
fn test_from_toml_parse_error() {
    let err = SymbolTable::from_toml("[[abbreviation]]\ntoken = 3").unwrap_err();
    assert!(matches!(err, SymbolTableError::Parse(_)));
}
