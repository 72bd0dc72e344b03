//! Expression parsing using Pratt parsing (top-down operator precedence).
//!
//! # Operator precedence (lowest to highest)
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | 1 | `==`, `!=`, `<`, `>`, `<=`, `>=` | Left |
//! | 2 | `+`, `-` | Left |
//! | 3 | `*`, `/` | Left |
//!
//! `a + b * c` parses as `a + (b * c)`; `a - b - c` parses as `(a - b) - c`.

use jusu_lex::TokenKind;
use jusu_util::Result;

use crate::ast::{BinOp, Expr};
use crate::Parser;

/// Binding power levels for Pratt parsing.
/// Higher numbers = tighter binding.
mod bp {
    /// Minimum binding power (start of expression).
    pub const MIN: u8 = 0;

    /// Comparison: `== != < > <= >=`
    pub const COMPARISON: u8 = 2;

    /// Additive: `+ -`
    pub const ADDITIVE: u8 = 4;

    /// Multiplicative: `* /`
    pub const MULTIPLICATIVE: u8 = 6;
}

/// The (left, right) binding powers of an infix operator.
///
/// All Jusu++ binary operators are left-associative, so the right binding
/// power is one above the left.
fn infix_binding_power(op: BinOp) -> (u8, u8) {
    let left = match op {
        BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => bp::COMPARISON,
        BinOp::Add | BinOp::Sub => bp::ADDITIVE,
        BinOp::Mul | BinOp::Div => bp::MULTIPLICATIVE,
    };
    (left, left + 1)
}

impl Parser {
    /// Main expression entry point.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr> {
        self.parse_expr_bp(bp::MIN)
    }

    /// Pratt parser core: parses an expression whose operators all have left
    /// binding power of at least `min_bp`.
    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr> {
        let mut lhs = self.parse_primary()?;

        loop {
            let op = match self.peek() {
                t if t.kind == TokenKind::Operator => match BinOp::from_symbol(&t.lexeme) {
                    Some(op) => op,
                    None => break,
                },
                _ => break,
            };

            let (left_bp, right_bp) = infix_binding_power(op);
            if left_bp < min_bp {
                break;
            }

            let op_span = self.advance().span();
            let rhs = self.parse_expr_bp(right_bp)?;
            lhs = Expr::Binary {
                op,
                left: Box::new(lhs),
                right: Box::new(rhs),
                span: Some(op_span),
            };
        }

        Ok(lhs)
    }

    /// Primary forms: literals, parenthesized expressions, object and array
    /// literals, identifiers (possibly dotted) and calls.
    fn parse_primary(&mut self) -> Result<Expr> {
        if self.match_kind(TokenKind::Number) {
            let token = self.previous().clone();
            let value: f64 = token
                .lexeme
                .parse()
                .map_err(|_| self.error(format!("Invalid number literal '{}'", token.lexeme)))?;
            return Ok(Expr::Number { value, span: Some(token.span()) });
        }

        if self.match_kind(TokenKind::String) {
            let token = self.previous().clone();
            let span = Some(token.span());
            return Ok(Expr::Str { value: token.lexeme, span });
        }

        if self.match_lexeme(TokenKind::Keyword, "true") {
            return Ok(Expr::Bool { value: true });
        }
        if self.match_lexeme(TokenKind::Keyword, "false") {
            return Ok(Expr::Bool { value: false });
        }

        if self.match_kind(TokenKind::Identifier) {
            return self.parse_name_or_call();
        }

        if self.match_lexeme(TokenKind::Punctuation, "(") {
            let expr = self.parse_expression()?;
            self.consume_lexeme(TokenKind::Punctuation, ")")?;
            return Ok(expr);
        }

        if self.match_lexeme(TokenKind::Punctuation, "{") {
            return self.parse_object_literal();
        }

        if self.match_lexeme(TokenKind::Punctuation, "[") {
            return self.parse_array_literal();
        }

        let found = self.peek();
        Err(self.error(format!("Unexpected token: {} '{}'", found.kind, found.lexeme)))
    }

    /// An identifier with optional dotted continuation, optionally called.
    ///
    /// `a.b.c` stays one identifier string; `a.b.c(x)` becomes a call whose
    /// callee is that string.
    fn parse_name_or_call(&mut self) -> Result<Expr> {
        let first = self.previous().clone();
        let mut name = first.lexeme.clone();

        while self.match_lexeme(TokenKind::Punctuation, ".") {
            if self.match_kind(TokenKind::Identifier) {
                name.push('.');
                name.push_str(&self.previous().lexeme);
            } else {
                return Err(self.error("Expected identifier after '.'"));
            }
        }

        if self.match_lexeme(TokenKind::Punctuation, "(") {
            let mut arguments = Vec::new();
            if !self.check_lexeme(TokenKind::Punctuation, ")") {
                loop {
                    arguments.push(self.parse_expression()?);
                    if self.match_lexeme(TokenKind::Punctuation, ")") {
                        break;
                    }
                    self.consume_lexeme(TokenKind::Punctuation, ",")?;
                }
            } else {
                self.consume_lexeme(TokenKind::Punctuation, ")")?;
            }
            return Ok(Expr::Call { callee: name, arguments, span: Some(first.span()) });
        }

        Ok(Expr::Identifier { name, span: Some(first.span()) })
    }

    /// `{ key: expr, ... }` where keys are strings or identifiers.
    fn parse_object_literal(&mut self) -> Result<Expr> {
        let mut pairs = Vec::new();

        if !self.check_lexeme(TokenKind::Punctuation, "}") {
            loop {
                let key = if self.match_kind(TokenKind::String) {
                    self.previous().lexeme.clone()
                } else if self.match_kind(TokenKind::Identifier) {
                    self.previous().lexeme.clone()
                } else {
                    return Err(self.error("Expected string or identifier for object key"));
                };
                self.consume_lexeme(TokenKind::Punctuation, ":")?;
                let value = self.parse_expression()?;
                pairs.push((key, value));

                if self.match_lexeme(TokenKind::Punctuation, "}") {
                    break;
                }
                self.consume_lexeme(TokenKind::Punctuation, ",")?;
            }
        } else {
            self.consume_lexeme(TokenKind::Punctuation, "}")?;
        }

        Ok(Expr::Object { pairs })
    }

    /// `[ expr, ... ]`
    fn parse_array_literal(&mut self) -> Result<Expr> {
        let mut elements = Vec::new();

        if !self.check_lexeme(TokenKind::Punctuation, "]") {
            loop {
                elements.push(self.parse_expression()?);
                if self.match_lexeme(TokenKind::Punctuation, "]") {
                    break;
                }
                self.consume_lexeme(TokenKind::Punctuation, ",")?;
            }
        } else {
            self.consume_lexeme(TokenKind::Punctuation, "]")?;
        }

        Ok(Expr::Array { elements })
    }
}
