//! jusu-util - Foundation Types for the Jusu++ Pipeline
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! This crate provides the two things every other crate in the workspace needs:
//!
//! 1. SOURCE POSITIONS
//!    `Span` records where a construct appeared in the source text (1-based
//!    line and column). `Loc` is the optional form that error messages carry,
//!    rendered as ` (at line L, col C)` when present and as nothing when the
//!    failing construct has no recorded position.
//!
//! 2. THE ERROR MODEL
//!    `JusuError` is the single language-level error type. Every phase of the
//!    pipeline (lexer, parser, all three execution backends) produces it, and
//!    the driver maps each variant to its user-visible classification line:
//!
//!    | Variant        | Classification   |
//!    |----------------|------------------|
//!    | `Syntax`       | `Syntax Error:`  |
//!    | `Name`         | `Name Error:`    |
//!    | `Type`         | `Type Error:`    |
//!    | `ZeroDivision` | `Math Error:`    |
//!    | `Runtime`      | `Runtime Error:` |
//!
//! Identical programs must produce identical classifications across backends,
//! so backends construct errors through the same constructors here rather
//! than inventing local error types.

mod error;
mod span;

pub use error::{JusuError, Result};
pub use span::{Loc, Span};
