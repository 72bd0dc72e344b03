//! Edge case tests for jusu-lex

use crate::{tokenize, TokenKind};

// ==================== STREAM SHAPE ====================

#[test]
fn test_edge_trailing_newline_not_duplicated() {
    let tokens = tokenize("say 1\n").unwrap();
    let newlines = tokens.iter().filter(|t| t.kind == TokenKind::Newline).count();
    assert_eq!(newlines, 1);
    assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
}

#[test]
fn test_edge_exactly_one_eof() {
    let tokens = tokenize("a is 1\nb is 2\n").unwrap();
    let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
    assert_eq!(eofs, 1);
}

#[test]
fn test_edge_blank_lines_each_emit_newline() {
    let tokens = tokenize("\n\n\n").unwrap();
    let newlines = tokens.iter().filter(|t| t.kind == TokenKind::Newline).count();
    assert_eq!(newlines, 3);
}

#[test]
fn test_edge_comment_only_source() {
    let tokens = tokenize("# nothing here").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Newline);
    assert_eq!(tokens[1].kind, TokenKind::Eof);
}

// ==================== LEXEMES ====================

#[test]
fn test_edge_long_identifier() {
    let name = "a".repeat(4096);
    let tokens = tokenize(&name).unwrap();
    assert!(tokens[0].is(TokenKind::Identifier, &name));
}

#[test]
fn test_edge_underscore_identifier() {
    let tokens = tokenize("_x is 1").unwrap();
    assert!(tokens[0].is(TokenKind::Identifier, "_x"));
}

#[test]
fn test_edge_dot_after_integer_is_punctuation() {
    // `a.b` must not lex the dot into a number; only `digit.digit` forms a
    // fraction.
    let tokens = tokenize("1.x").unwrap();
    assert!(tokens[0].is(TokenKind::Number, "1"));
    assert!(tokens[1].is(TokenKind::Punctuation, "."));
    assert!(tokens[2].is(TokenKind::Identifier, "x"));
}

#[test]
fn test_edge_dotted_name_lexes_as_parts() {
    let tokens = tokenize("math.pi").unwrap();
    assert!(tokens[0].is(TokenKind::Identifier, "math"));
    assert!(tokens[1].is(TokenKind::Punctuation, "."));
    assert!(tokens[2].is(TokenKind::Identifier, "pi"));
}

#[test]
fn test_edge_empty_string_literal() {
    let tokens = tokenize("x = \"\"").unwrap();
    assert!(tokens[2].is(TokenKind::String, ""));
}

#[test]
fn test_edge_escaped_quote_inside_string() {
    let tokens = tokenize(r#"x = "she said \"hi\"""#).unwrap();
    assert!(tokens[2].is(TokenKind::String, "she said \"hi\""));
}

#[test]
fn test_edge_unknown_escape_is_literal() {
    let tokens = tokenize(r#"x = "a\qb""#).unwrap();
    assert!(tokens[2].is(TokenKind::String, "aqb"));
}

#[test]
fn test_edge_escape_at_end_of_input() {
    let err = tokenize("x = \"abc\\").unwrap_err();
    assert_eq!(err.classification(), "Syntax Error");
}

#[test]
fn test_edge_all_compound_operators() {
    let tokens = tokenize("== != <= >= += -= *= /=").unwrap();
    let ops: Vec<&str> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Operator)
        .map(|t| t.lexeme.as_str())
        .collect();
    assert_eq!(ops, vec!["==", "!=", "<=", ">=", "+=", "-=", "*=", "/="]);
}

#[test]
fn test_edge_bang_alone() {
    let tokens = tokenize("!x").unwrap();
    assert!(tokens[0].is(TokenKind::Operator, "!"));
}

// ==================== PROPERTIES ====================

mod properties {
    use proptest::prelude::*;

    use crate::{tokenize, TokenKind};

    proptest! {
        /// Tokenization is a pure function of its input.
        #[test]
        fn tokenize_is_deterministic(source in "[a-z0-9 +*().\n]{0,64}") {
            let first = tokenize(&source);
            let second = tokenize(&source);
            prop_assert_eq!(first, second);
        }

        /// Every successful tokenization ends with NEWLINE then EOF.
        #[test]
        fn stream_tail_is_newline_eof(source in "[a-zA-Z0-9_ =+\\-*/<>!#'\".,:(){}\\[\\]\n\t]{0,128}") {
            if let Ok(tokens) = tokenize(&source) {
                let n = tokens.len();
                prop_assert!(n >= 2);
                prop_assert_eq!(tokens[n - 2].kind, TokenKind::Newline);
                prop_assert_eq!(tokens[n - 1].kind, TokenKind::Eof);
            }
        }
    }
}
