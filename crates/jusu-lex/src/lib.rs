//! jusu-lex - Lexical Analyzer for Jusu++
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! Transforms Jusu++ source text into a vector of tokens. The stream the
//! parser receives is always terminated by a NEWLINE token followed by exactly
//! one EOF token, so statement parsing never has to special-case a missing
//! final line feed.
//!
//! RECOGNIZED LEXEMES:
//! -------------------
//! - Whitespace (space, tab): skipped, column counters preserved.
//! - Line feed: emits one NEWLINE token and advances the line counter.
//! - `#`: comment until (not including) the next line feed.
//! - Strings: `'...'` or `"..."`; escapes `\n \t \r \\ \" \'`; an unescaped
//!   quote of the other kind is a literal character; an unknown escape lexes
//!   as the escaped character itself.
//! - Numbers: decimal digits with an optional fraction (`12`, `3.25`).
//! - Identifiers: leading letter or `_`, then letters/digits/`_`; reserved
//!   words become KEYWORD tokens.
//! - Operators, two-character first: `== != <= >= += -= *= /=`, then
//!   `+ - * / = < > !`.
//! - Punctuation: `( ) : { } , . [ ]`.
//!
//! Anything else is a syntax error naming the offending line.
//!
//! # Example
//!
//! ```
//! use jusu_lex::{tokenize, TokenKind};
//!
//! let tokens = tokenize("say 1 + 2").unwrap();
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::Keyword,
//!         TokenKind::Number,
//!         TokenKind::Operator,
//!         TokenKind::Number,
//!         TokenKind::Newline,
//!         TokenKind::Eof,
//!     ]
//! );
//! ```

pub mod cursor;
mod token;

#[cfg(test)]
mod edge_cases;

use jusu_util::{JusuError, Result, Span};

use crate::cursor::Cursor;
pub use crate::token::{Token, TokenKind};

/// Reserved words of the language.
pub const KEYWORDS: &[&str] = &[
    "say", "if", "else", "for", "while", "function", "return", "is", "to", "in", "true", "false",
    "null", "end",
];

/// Two-character operators, matched greedily before single-character ones.
const TWO_CHAR_OPERATORS: &[&str] = &["==", "!=", "<=", ">=", "+=", "-=", "*=", "/="];

/// Returns true if `word` is a reserved word.
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Tokenizes a complete source text.
///
/// Convenience wrapper over [`Lexer`].
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).tokenize()
}

/// Converts Jusu++ source text into tokens.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over the given source text.
    pub fn new(source: &'a str) -> Self {
        Self { cursor: Cursor::new(source), tokens: Vec::new() }
    }

    /// Consumes the source and produces the token vector.
    ///
    /// The result always ends with a NEWLINE token followed by one EOF token,
    /// even for empty input.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        while !self.cursor.is_at_end() {
            let c = self.cursor.current_char();
            match c {
                ' ' | '\t' => self.cursor.advance(),
                '\r' => self.cursor.advance(),
                '\n' => {
                    self.push(TokenKind::Newline, "\n");
                    self.cursor.advance();
                }
                '#' => self.skip_comment(),
                '"' | '\'' => self.read_string()?,
                c if c.is_ascii_digit() => self.read_number(),
                c if c.is_alphabetic() || c == '_' => self.read_identifier(),
                '+' | '-' | '*' | '/' | '=' | '<' | '>' | '!' => self.read_operator(),
                '(' | ')' | ':' | '{' | '}' | ',' | '.' | '[' | ']' => {
                    self.push(TokenKind::Punctuation, c.to_string());
                    self.cursor.advance();
                }
                other => {
                    return Err(JusuError::syntax(
                        format!("Unknown character '{}'", other),
                        self.here(),
                    ));
                }
            }
        }

        // The parser consumes one NEWLINE per statement, so guarantee a
        // terminator even when the source does not end with a line feed.
        if !matches!(self.tokens.last(), Some(t) if t.kind == TokenKind::Newline) {
            self.push(TokenKind::Newline, "\n");
        }
        self.push(TokenKind::Eof, "");
        Ok(self.tokens)
    }

    /// The cursor's current position as a span.
    fn here(&self) -> Span {
        Span::new(self.cursor.line(), self.cursor.column())
    }

    /// Appends a token positioned at the cursor's current location.
    fn push(&mut self, kind: TokenKind, lexeme: impl Into<String>) {
        self.tokens.push(Token::new(kind, lexeme, self.cursor.line(), self.cursor.column()));
    }

    /// Appends a token with an explicit starting position.
    fn push_at(&mut self, kind: TokenKind, lexeme: impl Into<String>, span: Span) {
        self.tokens.push(Token::new(kind, lexeme, span.line, span.column));
    }

    /// Skips a `#` comment up to (not including) the next line feed.
    fn skip_comment(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }

    /// Reads a string literal opened by `'` or `"`.
    fn read_string(&mut self) -> Result<()> {
        let start = self.here();
        let quote = self.cursor.current_char();
        self.cursor.advance();

        let mut content = String::new();
        loop {
            if self.cursor.is_at_end() {
                return Err(JusuError::syntax("Unterminated string", start));
            }
            let c = self.cursor.current_char();
            if c == quote {
                self.cursor.advance();
                break;
            }
            if c == '\\' {
                self.cursor.advance();
                if self.cursor.is_at_end() {
                    return Err(JusuError::syntax("Unterminated string", start));
                }
                let escaped = self.cursor.current_char();
                content.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    // Unknown escapes lex as the escaped character itself.
                    other => other,
                });
                self.cursor.advance();
            } else {
                content.push(c);
                self.cursor.advance();
            }
        }

        self.push_at(TokenKind::String, content, start);
        Ok(())
    }

    /// Reads a number literal: digits, optionally `.` and more digits.
    fn read_number(&mut self) {
        let start = self.here();
        let mut lexeme = String::new();

        while self.cursor.current_char().is_ascii_digit() {
            lexeme.push(self.cursor.current_char());
            self.cursor.advance();
        }
        if self.cursor.current_char() == '.' && self.cursor.next_char().is_ascii_digit() {
            lexeme.push('.');
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                lexeme.push(self.cursor.current_char());
                self.cursor.advance();
            }
        }

        self.push_at(TokenKind::Number, lexeme, start);
    }

    /// Reads an identifier or keyword.
    fn read_identifier(&mut self) {
        let start = self.here();
        let mut lexeme = String::new();

        while self.cursor.current_char().is_alphanumeric() || self.cursor.current_char() == '_' {
            lexeme.push(self.cursor.current_char());
            self.cursor.advance();
        }

        let kind = if is_keyword(&lexeme) { TokenKind::Keyword } else { TokenKind::Identifier };
        self.push_at(kind, lexeme, start);
    }

    /// Reads a one- or two-character operator, two-character first.
    fn read_operator(&mut self) {
        let start = self.here();
        let first = self.cursor.current_char();
        let second = self.cursor.next_char();

        let mut pair = String::with_capacity(2);
        pair.push(first);
        pair.push(second);
        if TWO_CHAR_OPERATORS.contains(&pair.as_str()) {
            self.cursor.advance();
            self.cursor.advance();
            self.push_at(TokenKind::Operator, pair, start);
        } else {
            self.cursor.advance();
            self.push_at(TokenKind::Operator, first.to_string(), start);
        }
    }
}
