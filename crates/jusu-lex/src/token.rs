//! Token definitions.

use std::fmt;

use jusu_util::Span;

/// The category of a lexical unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A reserved word: `say`, `if`, `function`, ...
    Keyword,

    /// A name chosen by the programmer.
    Identifier,

    /// A numeric literal; the lexeme holds the source digits.
    Number,

    /// A string literal; the lexeme holds the content with escapes resolved.
    String,

    /// An operator such as `+` or `==`.
    Operator,

    /// Structural punctuation: `( ) : { } , . [ ]`.
    Punctuation,

    /// A statement terminator produced for each line feed.
    Newline,

    /// End of input. Every token stream ends with exactly one of these.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Punctuation => "PUNCTUATION",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Eof => "EOF",
        };
        f.write_str(name)
    }
}

/// A single token: kind, lexeme text and the 1-based source position of the
/// lexeme's first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
    pub column: u32,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32, column: u32) -> Self {
        Self { kind, lexeme: lexeme.into(), line, column }
    }

    /// The token's source position.
    pub fn span(&self) -> Span {
        Span::new(self.line, self.column)
    }

    /// Checks kind and lexeme at once.
    pub fn is(&self, kind: TokenKind, lexeme: &str) -> bool {
        self.kind == kind && self.lexeme == lexeme
    }
}
