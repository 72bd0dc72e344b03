//! Dotted-name descent, shared by every backend.
//!
//! Given the resolved base value of `a.b.c`, walks the remaining segments:
//! host objects resolve by attribute, object values by keyed lookup, and
//! anything else fails with a name error that names the base and segment.

use jusu_util::{JusuError, Result, Span};

use crate::value::Value;

/// Walks attribute segments from an already-resolved base value.
pub fn descend<'a>(
    base_name: &str,
    start: Value,
    attrs: impl Iterator<Item = &'a str>,
    span: Option<Span>,
) -> Result<Value> {
    let mut current = start;
    for attr in attrs {
        let next = match &current {
            Value::Host(host) => host.attr(attr).map_err(|e| e.or_loc(span))?,
            Value::Object(pairs) => pairs.borrow().get(attr).cloned(),
            _ => None,
        };
        current = next.ok_or_else(|| {
            JusuError::name(
                format!("Attribute '{}' not found on '{}'", attr, base_name),
                span,
            )
        })?;
    }
    Ok(current)
}
