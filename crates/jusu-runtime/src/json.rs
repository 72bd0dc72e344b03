//! Conversions between runtime values and JSON.
//!
//! Backs the `json` standard module. Callables and host objects have no JSON
//! representation and fail serialization with a runtime error.

use indexmap::IndexMap;
use jusu_util::{JusuError, Loc, Result};

use crate::value::Value;

/// Parses JSON text into a value.
pub fn loads(text: &str) -> Result<Value> {
    let parsed: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| JusuError::runtime(format!("Invalid JSON: {}", e), Loc::NONE))?;
    Ok(from_json(&parsed))
}

/// Serializes a value to JSON text.
pub fn dumps(value: &Value) -> Result<String> {
    let json = to_json(value)?;
    serde_json::to_string(&json)
        .map_err(|e| JusuError::runtime(format!("JSON encoding failed: {}", e), Loc::NONE))
}

fn from_json(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::Str(s.clone()),
        serde_json::Value::Array(items) => {
            Value::array(items.iter().map(from_json).collect())
        }
        serde_json::Value::Object(pairs) => {
            let mut map = IndexMap::new();
            for (key, value) in pairs {
                map.insert(key.clone(), from_json(value));
            }
            Value::object(map)
        }
    }
}

fn to_json(value: &Value) -> Result<serde_json::Value> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => match serde_json::Number::from_f64(*n) {
            Some(number) => serde_json::Value::Number(number),
            None => {
                return Err(JusuError::runtime(
                    "Cannot serialize a non-finite number to JSON",
                    Loc::NONE,
                ));
            }
        },
        Value::Str(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(
            items.borrow().iter().map(to_json).collect::<Result<Vec<_>>>()?,
        ),
        Value::Object(pairs) => {
            let mut map = serde_json::Map::new();
            for (key, value) in pairs.borrow().iter() {
                map.insert(key.clone(), to_json(value)?);
            }
            serde_json::Value::Object(map)
        }
        other => {
            return Err(JusuError::runtime(
                format!("{} is not JSON serializable", other.type_name()),
                Loc::NONE,
            ));
        }
    })
}
