//! jusu-par - Parser for Jusu++
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! Recursive descent over the token vector produced by `jusu-lex`, with
//! one-token lookahead plus a helper that inspects the token immediately
//! following the current one (that second token decides whether an
//! IDENTIFIER line is an assignment or an expression statement).
//!
//! A program is a sequence of statements separated by one or more NEWLINEs;
//! leading and trailing NEWLINEs are tolerated. Compound statements use the
//! block form: the header line ends with `:`, the body runs to a matching
//! `end`, and an `if` may carry an `else:` branch. The NEWLINE after the `:`
//! is optional, so one-line forms such as
//!
//! ```text
//! if x > 5: say "big" else: say "small" end
//! ```
//!
//! parse the same as their multi-line spelling.
//!
//! Errors are reported with a `[Line N] message` prefix.

pub mod ast;
mod expr;
mod pretty;
mod stmt;

#[cfg(test)]
mod edge_cases;

use jusu_lex::{Token, TokenKind};
use jusu_util::{JusuError, Loc, Result};

pub use crate::ast::{BinOp, Expr, FunctionDecl, Program, Stmt};
pub use crate::pretty::pretty_print;

/// Parses a complete source text into a program.
///
/// Convenience wrapper running the lexer and the parser back to back.
pub fn parse_source(source: &str) -> Result<Program> {
    let tokens = jusu_lex::tokenize(source)?;
    Parser::new(tokens).parse()
}

/// Parses tokens into an AST.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    /// Creates a parser over a token vector.
    ///
    /// The vector must be NEWLINE+EOF terminated, which `jusu_lex::tokenize`
    /// guarantees.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    /// Parses the whole token stream into a program.
    pub fn parse(&mut self) -> Result<Program> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            self.consume_newlines();
            if self.is_at_end() {
                break;
            }
            statements.push(self.parse_statement()?);
            self.consume_newlines();
        }

        Ok(statements)
    }

    // =========================================================================
    // TOKEN STREAM HELPERS
    // =========================================================================

    /// The current token, without consuming it.
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// The most recently consumed token.
    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    /// Consumes the current token and returns it.
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    /// True once the current token is EOF.
    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Checks the current token's kind without consuming.
    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Checks the current token's kind and lexeme without consuming.
    fn check_lexeme(&self, kind: TokenKind, lexeme: &str) -> bool {
        self.peek().is(kind, lexeme)
    }

    /// Consumes the current token if its kind matches.
    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if kind and lexeme both match.
    fn match_lexeme(&mut self, kind: TokenKind, lexeme: &str) -> bool {
        if self.check_lexeme(kind, lexeme) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes a token of the given kind, or errors.
    fn consume(&mut self, kind: TokenKind) -> Result<Token> {
        if self.check(kind) {
            return Ok(self.advance().clone());
        }
        let found = self.peek();
        Err(self.error(format!("Expected {} but got {} '{}'", kind, found.kind, found.lexeme)))
    }

    /// Consumes a token with the given kind and lexeme, or errors.
    fn consume_lexeme(&mut self, kind: TokenKind, lexeme: &str) -> Result<Token> {
        if self.check_lexeme(kind, lexeme) {
            return Ok(self.advance().clone());
        }
        let found = self.peek();
        Err(self.error(format!(
            "Expected {} '{}' but got {} '{}'",
            kind, lexeme, found.kind, found.lexeme
        )))
    }

    /// Consumes any number of NEWLINE tokens.
    fn consume_newlines(&mut self) {
        while self.match_kind(TokenKind::Newline) {}
    }

    /// Terminates a statement: a NEWLINE is consumed; a following block
    /// keyword (`else`, `end`) or EOF is accepted without consuming.
    fn end_of_statement(&mut self) -> Result<()> {
        if self.match_kind(TokenKind::Newline) {
            return Ok(());
        }
        if self.check_lexeme(TokenKind::Keyword, "else")
            || self.check_lexeme(TokenKind::Keyword, "end")
            || self.is_at_end()
        {
            return Ok(());
        }
        let found = self.peek();
        Err(self.error(format!("Expected NEWLINE but got {} '{}'", found.kind, found.lexeme)))
    }

    /// Inspects the token immediately after the current one.
    fn next_token_is(&self, kind: TokenKind, lexeme: &str) -> bool {
        match self.tokens.get(self.current + 1) {
            Some(token) => token.is(kind, lexeme),
            None => false,
        }
    }

    /// A syntax error at the current token, with the `[Line N]` prefix.
    fn error(&self, message: impl Into<String>) -> JusuError {
        JusuError::syntax(
            format!("[Line {}] {}", self.peek().line, message.into()),
            Loc::NONE,
        )
    }
}
