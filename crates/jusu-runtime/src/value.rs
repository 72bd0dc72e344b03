//! The runtime value model.
//!
//! A `Value` is a tagged variant over the types Jusu++ programs manipulate.
//! Arrays and objects are reference values: cloning a `Value` clones the
//! handle, not the contents, which is what lets `append(seq, v)` mutate and
//! return the same sequence.

use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

use indexmap::IndexMap;
use jusu_par::FunctionDecl;
use jusu_util::Result;

use crate::code::{CodeObject, RegCode};

/// An insertion-order preserving identifier-to-value mapping.
///
/// Used for environments, VM globals and object values alike; insertion
/// order is observable through `vars` and through object iteration order in
/// `json.dumps`.
pub type Bindings = IndexMap<String, Value>;

/// Where `say` and `print` write.
///
/// The driver passes stdout; tests pass an in-memory buffer so backend
/// output can be compared byte for byte.
pub type OutputSink = Rc<RefCell<dyn Write>>;

/// A built-in function implemented by the host.
#[derive(Clone)]
pub struct NativeFn {
    name: &'static str,
    f: Rc<dyn Fn(&[Value]) -> Result<Value>>,
}

impl NativeFn {
    pub fn new(name: &'static str, f: impl Fn(&[Value]) -> Result<Value> + 'static) -> Self {
        Self { name, f: Rc::new(f) }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.f)(args)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn({})", self.name)
    }
}

/// An opaque object supplied by the built-in library, resolved by attribute
/// descent (`module.attr`).
pub trait HostObject {
    /// Name shown in messages and `vars` output, e.g. `module 'math'`.
    fn type_name(&self) -> String;

    /// Looks up an attribute.
    ///
    /// `Ok(None)` means the attribute does not exist and the caller should
    /// raise its own name error; `Err` propagates an object-level failure
    /// (the sentinel stubs fail every access this way).
    fn attr(&self, name: &str) -> Result<Option<Value>>;
}

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    /// A double-precision number. All Jusu++ numbers are doubles; there is
    /// no integer type to overflow.
    Number(f64),

    /// A text string.
    Str(String),

    /// A boolean.
    Bool(bool),

    /// The null value, produced by value-less `return`.
    Null,

    /// An ordered, shared, mutable sequence.
    Array(Rc<RefCell<Vec<Value>>>),

    /// A shared, mutable mapping with insertion order preserved.
    Object(Rc<RefCell<Bindings>>),

    /// A built-in function.
    Native(NativeFn),

    /// A user-defined function evaluated from its AST body.
    Function(Rc<FunctionDecl>),

    /// A function compiled for the stack VM.
    Code(Rc<CodeObject>),

    /// A function compiled for the register VM.
    RegCode(Rc<RegCode>),

    /// An opaque host object (standard modules and capability stubs).
    Host(Rc<dyn HostObject>),
}

impl Value {
    /// Builds an array value from owned elements.
    pub fn array(elements: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    /// Builds an object value from owned pairs.
    pub fn object(pairs: Bindings) -> Value {
        Value::Object(Rc::new(RefCell::new(pairs)))
    }

    /// The type name used in error messages.
    pub fn type_name(&self) -> String {
        match self {
            Value::Number(_) => "number".to_string(),
            Value::Str(_) => "string".to_string(),
            Value::Bool(_) => "boolean".to_string(),
            Value::Null => "null".to_string(),
            Value::Array(_) => "array".to_string(),
            Value::Object(_) => "object".to_string(),
            Value::Native(_) => "builtin".to_string(),
            Value::Function(_) => "function".to_string(),
            Value::Code(_) => "function".to_string(),
            Value::RegCode(_) => "function".to_string(),
            Value::Host(host) => host.type_name(),
        }
    }

    /// Truthiness: `false`, `0`, `""`, `[]`, `{}` and `null` are falsy,
    /// everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Null => false,
            Value::Array(items) => !items.borrow().is_empty(),
            Value::Object(pairs) => !pairs.borrow().is_empty(),
            _ => true,
        }
    }

    /// True for values callable with `name(args)`.
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Native(_) | Value::Function(_) | Value::Code(_) | Value::RegCode(_)
        )
    }

    /// Recursively copies arrays and objects; other values clone as usual.
    ///
    /// The bytecode compilers materialize container literals into constant
    /// pools. Pools are immutable, so the VMs push a deep copy on
    /// `LOAD_CONST`; pushing the pooled handle itself would let `append`
    /// mutate the pool.
    pub fn deep_copy(&self) -> Value {
        match self {
            Value::Array(items) => {
                Value::array(items.borrow().iter().map(Value::deep_copy).collect())
            }
            Value::Object(pairs) => Value::object(
                pairs
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.deep_copy()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// The quoted form used inside containers and by `vars`.
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => format!("{:?}", s),
            other => other.to_string(),
        }
    }
}

/// Formats a number the way `say` prints it: integral doubles drop the
/// fractional part (`25`, not `25.0`), everything else uses the shortest
/// round-trip form.
pub fn format_number(n: f64) -> String {
    // f64 Display already prints 25.0 as "25" and 0.5 as "0.5".
    format!("{}", n)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Str(s) => f.write_str(s),
            Value::Bool(true) => f.write_str("true"),
            Value::Bool(false) => f.write_str("false"),
            Value::Null => f.write_str("null"),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&item.repr())?;
                }
                f.write_str("]")
            }
            Value::Object(pairs) => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}: {}", key, value.repr())?;
                }
                f.write_str("}")
            }
            Value::Native(native) => write!(f, "<built-in function {}>", native.name()),
            Value::Function(decl) => write!(f, "<function {}>", decl.name),
            Value::Code(code) => write!(f, "<function {}>", code.name),
            Value::RegCode(code) => write!(f, "<function {}>", code.name),
            Value::Host(host) => write!(f, "<{}>", host.type_name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

impl PartialEq for Value {
    /// Structural equality for data, identity for callables and host
    /// objects. Values of different types are never equal; in particular
    /// `1 == "1"` and `true == 1` are both `false` rather than errors.
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (Value::Object(a), Value::Object(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(&a.f, &b.f),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Code(a), Value::Code(b)) => Rc::ptr_eq(a, b),
            (Value::RegCode(a), Value::RegCode(b)) => Rc::ptr_eq(a, b),
            (Value::Host(a), Value::Host(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
