//! The standard modules: `math`, `json`, `time`, `random`.
//!
//! Modules are host objects resolved by attribute descent, so `math.pi` and
//! `math.sqrt(16)` work through the same dotted-name rules as user objects.
//! Host capabilities this build does not carry (`http`, `ffi`, `js`, `wasm`,
//! `np`, `pd`) are bound to sentinel stubs: they never prevent startup, and
//! raise a runtime error the moment anything is looked up on them.

use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use jusu_util::{JusuError, Loc, Result};

use crate::json;
use crate::value::{Bindings, HostObject, NativeFn, Value};

/// A named module with a fixed attribute table.
struct Module {
    name: &'static str,
    attrs: Bindings,
}

impl HostObject for Module {
    fn type_name(&self) -> String {
        format!("module '{}'", self.name)
    }

    fn attr(&self, name: &str) -> Result<Option<Value>> {
        Ok(self.attrs.get(name).cloned())
    }
}

/// A stand-in for a host capability that is not compiled into this build.
struct StubModule {
    name: &'static str,
}

impl HostObject for StubModule {
    fn type_name(&self) -> String {
        format!("module '{}' (unavailable)", self.name)
    }

    fn attr(&self, _name: &str) -> Result<Option<Value>> {
        Err(JusuError::runtime(
            format!("module '{}' is not available in this build", self.name),
            Loc::NONE,
        ))
    }
}

fn module(name: &'static str, attrs: Bindings) -> Value {
    Value::Host(Rc::new(Module { name, attrs }))
}

/// The module bindings injected before program execution.
///
/// Returned as ordered bindings so they appear in a stable order in `vars`.
pub fn standard_modules() -> Bindings {
    let mut modules = Bindings::new();
    modules.insert("math".to_string(), math_module());
    modules.insert("json".to_string(), json_module());
    modules.insert("time".to_string(), time_module());
    modules.insert("random".to_string(), random_module());
    for name in ["http", "ffi", "js", "wasm", "np", "pd"] {
        modules.insert(name.to_string(), Value::Host(Rc::new(StubModule { name })));
    }
    modules
}

fn math_module() -> Value {
    let mut attrs = Bindings::new();
    attrs.insert("pi".to_string(), Value::Number(std::f64::consts::PI));
    attrs.insert(
        "sqrt".to_string(),
        Value::Native(NativeFn::new("sqrt", |args| {
            let x = one_number("sqrt", args)?;
            if x < 0.0 {
                return Err(JusuError::runtime("math domain error", Loc::NONE));
            }
            Ok(Value::Number(x.sqrt()))
        })),
    );
    attrs.insert(
        "sin".to_string(),
        Value::Native(NativeFn::new("sin", |args| {
            Ok(Value::Number(one_number("sin", args)?.sin()))
        })),
    );
    module("math", attrs)
}

fn json_module() -> Value {
    let mut attrs = Bindings::new();
    attrs.insert(
        "loads".to_string(),
        Value::Native(NativeFn::new("loads", |args| match args {
            [Value::Str(text)] => json::loads(text),
            _ => Err(JusuError::type_error("loads() expects one string argument", Loc::NONE)),
        })),
    );
    attrs.insert(
        "dumps".to_string(),
        Value::Native(NativeFn::new("dumps", |args| match args {
            [value] => Ok(Value::Str(json::dumps(value)?)),
            _ => Err(JusuError::type_error("dumps() expects one argument", Loc::NONE)),
        })),
    );
    module("json", attrs)
}

fn time_module() -> Value {
    let mut attrs = Bindings::new();
    attrs.insert(
        "now".to_string(),
        Value::Native(NativeFn::new("now", |args| {
            if !args.is_empty() {
                return Err(JusuError::type_error("now() takes no arguments", Loc::NONE));
            }
            let elapsed = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_err(|e| JusuError::runtime(format!("clock error: {}", e), Loc::NONE))?;
            Ok(Value::Number(elapsed.as_secs_f64()))
        })),
    );
    module("time", attrs)
}

fn random_module() -> Value {
    let mut attrs = Bindings::new();
    attrs.insert(
        "rand".to_string(),
        Value::Native(NativeFn::new("rand", |args| {
            if !args.is_empty() {
                return Err(JusuError::type_error("rand() takes no arguments", Loc::NONE));
            }
            Ok(Value::Number(rand::random::<f64>()))
        })),
    );
    module("random", attrs)
}

fn one_number(name: &str, args: &[Value]) -> Result<f64> {
    match args {
        [Value::Number(n)] => Ok(*n),
        [other] => Err(JusuError::type_error(
            format!("{}() expects a number, got {}", name, other.type_name()),
            Loc::NONE,
        )),
        _ => Err(JusuError::type_error(
            format!("{}() takes 1 argument(s) but {} were given", name, args.len()),
            Loc::NONE,
        )),
    }
}
