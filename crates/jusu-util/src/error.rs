//! The language-level error type.
//!
//! Every phase of the pipeline reports failures as a [`JusuError`]. The
//! variant determines the user-visible classification; the message names the
//! failing construct and the [`Loc`] suffix names its source position when
//! one is known.

use thiserror::Error;

use crate::span::Loc;

/// Errors raised by the Jusu++ lexer, parser and execution backends.
///
/// Messages are rendered with their location suffix, e.g.
/// `Variable 'x' is not defined (at line 3, col 5)`. The classification
/// prefix (`Name Error:` etc.) is added by the driver, not here, so that
/// embedders can format errors however they like.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JusuError {
    /// Malformed source text, detected by the lexer or parser.
    #[error("{message}{loc}")]
    Syntax { message: String, loc: Loc },

    /// An identifier or dotted path that does not resolve.
    #[error("{message}{loc}")]
    Name { message: String, loc: Loc },

    /// An operation applied to operands of unsupported types.
    #[error("{message}{loc}")]
    Type { message: String, loc: Loc },

    /// Division by zero.
    #[error("{message}{loc}")]
    ZeroDivision { message: String, loc: Loc },

    /// Any other failure during execution.
    #[error("{message}{loc}")]
    Runtime { message: String, loc: Loc },
}

impl JusuError {
    /// Creates a syntax error.
    pub fn syntax(message: impl Into<String>, loc: impl Into<Loc>) -> Self {
        JusuError::Syntax { message: message.into(), loc: loc.into() }
    }

    /// Creates a name-resolution error.
    pub fn name(message: impl Into<String>, loc: impl Into<Loc>) -> Self {
        JusuError::Name { message: message.into(), loc: loc.into() }
    }

    /// Creates a type error.
    pub fn type_error(message: impl Into<String>, loc: impl Into<Loc>) -> Self {
        JusuError::Type { message: message.into(), loc: loc.into() }
    }

    /// Creates a divide-by-zero error.
    pub fn zero_division(message: impl Into<String>, loc: impl Into<Loc>) -> Self {
        JusuError::ZeroDivision { message: message.into(), loc: loc.into() }
    }

    /// Creates a generic runtime error.
    pub fn runtime(message: impl Into<String>, loc: impl Into<Loc>) -> Self {
        JusuError::Runtime { message: message.into(), loc: loc.into() }
    }

    /// The classification shown before the message on stderr.
    pub fn classification(&self) -> &'static str {
        match self {
            JusuError::Syntax { .. } => "Syntax Error",
            JusuError::Name { .. } => "Name Error",
            JusuError::Type { .. } => "Type Error",
            JusuError::ZeroDivision { .. } => "Math Error",
            JusuError::Runtime { .. } => "Runtime Error",
        }
    }

    /// The recorded source position.
    pub fn loc(&self) -> Loc {
        match self {
            JusuError::Syntax { loc, .. }
            | JusuError::Name { loc, .. }
            | JusuError::Type { loc, .. }
            | JusuError::ZeroDivision { loc, .. }
            | JusuError::Runtime { loc, .. } => *loc,
        }
    }

    /// Attaches a position to an error that does not carry one yet.
    ///
    /// Shared operator code raises errors without positions; the backend that
    /// knows the failing construct fills the position in on the way out.
    /// An already-recorded position is kept.
    pub fn or_loc(mut self, fallback: impl Into<Loc>) -> Self {
        let slot = match &mut self {
            JusuError::Syntax { loc, .. }
            | JusuError::Name { loc, .. }
            | JusuError::Type { loc, .. }
            | JusuError::ZeroDivision { loc, .. }
            | JusuError::Runtime { loc, .. } => loc,
        };
        if slot.is_none() {
            *slot = fallback.into();
        }
        self
    }
}

/// Result alias used throughout the pipeline.
pub type Result<T> = std::result::Result<T, JusuError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;

    #[test]
    fn display_includes_location() {
        let err = JusuError::name("Variable 'x' is not defined", Span::new(3, 5));
        assert_eq!(err.to_string(), "Variable 'x' is not defined (at line 3, col 5)");
    }

    #[test]
    fn display_without_location() {
        let err = JusuError::zero_division("Division by zero", Loc::NONE);
        assert_eq!(err.to_string(), "Division by zero");
    }

    #[test]
    fn classifications() {
        assert_eq!(JusuError::syntax("x", Loc::NONE).classification(), "Syntax Error");
        assert_eq!(JusuError::zero_division("x", Loc::NONE).classification(), "Math Error");
    }

    #[test]
    fn or_loc_keeps_existing() {
        let err = JusuError::type_error("bad", Span::new(1, 1)).or_loc(Span::new(9, 9));
        assert_eq!(err.loc().span(), Some(Span::new(1, 1)));

        let err = JusuError::type_error("bad", Loc::NONE).or_loc(Span::new(9, 9));
        assert_eq!(err.loc().span(), Some(Span::new(9, 9)));
    }
}
