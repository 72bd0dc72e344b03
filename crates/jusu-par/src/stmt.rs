//! Statement parsing.
//!
//! One method per statement form. Each method assumes its leading keyword has
//! already been consumed by `parse_statement`, so `previous()` is the keyword
//! token and provides the statement's source position.

use jusu_lex::TokenKind;
use jusu_util::Result;

use crate::ast::{FunctionDecl, Stmt};
use crate::Parser;

impl Parser {
    /// Parses a single statement, dispatching on the current token.
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt> {
        if self.match_lexeme(TokenKind::Keyword, "say") {
            return self.parse_say();
        }
        if self.match_lexeme(TokenKind::Keyword, "if") {
            return self.parse_if();
        }
        if self.match_lexeme(TokenKind::Keyword, "function") {
            return self.parse_function();
        }
        if self.match_lexeme(TokenKind::Keyword, "return") {
            return self.parse_return();
        }
        if self.check(TokenKind::Identifier)
            && (self.next_token_is(TokenKind::Keyword, "is")
                || self.next_token_is(TokenKind::Operator, "="))
        {
            return self.parse_assignment();
        }

        let expression = self.parse_expression()?;
        self.end_of_statement()?;
        Ok(Stmt::Expression { expression })
    }

    /// `say expression`
    fn parse_say(&mut self) -> Result<Stmt> {
        let span = self.previous().span();
        let expression = self.parse_expression()?;
        self.end_of_statement()?;
        Ok(Stmt::Say { expression, span: Some(span) })
    }

    /// `name is value` or `name = value`
    fn parse_assignment(&mut self) -> Result<Stmt> {
        let name_token = self.advance().clone();
        // The dispatcher guarantees one of the two spellings follows.
        if !self.match_lexeme(TokenKind::Keyword, "is") {
            self.consume_lexeme(TokenKind::Operator, "=")?;
        }
        let value = self.parse_expression()?;
        self.end_of_statement()?;
        let span = Some(name_token.span());
        Ok(Stmt::Assignment {
            name: name_token.lexeme,
            value,
            span,
        })
    }

    /// `if condition: then-block [else: else-block] end`
    fn parse_if(&mut self) -> Result<Stmt> {
        let span = self.previous().span();
        let condition = self.parse_expression()?;
        self.consume_lexeme(TokenKind::Punctuation, ":")?;
        self.match_kind(TokenKind::Newline);

        let then_branch = self.parse_block()?;
        let else_branch = if self.match_lexeme(TokenKind::Keyword, "else") {
            self.consume_lexeme(TokenKind::Punctuation, ":")?;
            self.match_kind(TokenKind::Newline);
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Stmt::If { condition, then_branch, else_branch, span: Some(span) })
    }

    /// `function name(params): body end`
    fn parse_function(&mut self) -> Result<Stmt> {
        let span = self.previous().span();
        let name = self.consume(TokenKind::Identifier)?.lexeme;

        self.consume_lexeme(TokenKind::Punctuation, "(")?;
        let mut params = Vec::new();
        if !self.check_lexeme(TokenKind::Punctuation, ")") {
            loop {
                params.push(self.consume(TokenKind::Identifier)?.lexeme);
                if self.match_lexeme(TokenKind::Punctuation, ")") {
                    break;
                }
                self.consume_lexeme(TokenKind::Punctuation, ",")?;
            }
        } else {
            self.consume_lexeme(TokenKind::Punctuation, ")")?;
        }

        self.consume_lexeme(TokenKind::Punctuation, ":")?;
        self.match_kind(TokenKind::Newline);
        let body = self.parse_block()?;

        Ok(Stmt::Function(FunctionDecl { name, params, body, span: Some(span) }))
    }

    /// `return` or `return expression`
    fn parse_return(&mut self) -> Result<Stmt> {
        let span = self.previous().span();
        if self.check(TokenKind::Newline)
            || self.check_lexeme(TokenKind::Keyword, "end")
            || self.check_lexeme(TokenKind::Keyword, "else")
        {
            self.end_of_statement()?;
            return Ok(Stmt::Return { value: None, span: Some(span) });
        }
        let value = self.parse_expression()?;
        self.end_of_statement()?;
        Ok(Stmt::Return { value: Some(value), span: Some(span) })
    }

    /// Parses statements until a matching `end` (consumed) or an `else`
    /// (left for the caller).
    fn parse_block(&mut self) -> Result<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            self.consume_newlines();
            if self.is_at_end()
                || self.check_lexeme(TokenKind::Keyword, "end")
                || self.check_lexeme(TokenKind::Keyword, "else")
            {
                break;
            }
            statements.push(self.parse_statement()?);
        }

        if self.match_lexeme(TokenKind::Keyword, "end") {
            self.match_kind(TokenKind::Newline);
        }
        Ok(statements)
    }
}
