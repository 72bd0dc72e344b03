//! The interpreter's environment.
//!
//! A mapping from identifier to value plus the fixed built-in table. The
//! standard modules are bound as ordinary variables, so they can be shadowed
//! and show up in `vars`; the built-in functions live in their own table and
//! are consulted only when a name is not bound in the environment.

use rustc_hash::FxHashMap;

use jusu_runtime::value::{Bindings, OutputSink, Value};
use jusu_runtime::{builtins, stdlib};
use jusu_util::{JusuError, Result, Span};

/// The identifier-to-value mapping active during interpretation.
pub struct Environment {
    variables: Bindings,
    builtins: FxHashMap<String, Value>,
}

impl Environment {
    /// Creates an environment with the standard modules bound and the
    /// built-in table installed.
    pub fn new(sink: &OutputSink) -> Self {
        Self {
            variables: stdlib::standard_modules(),
            builtins: builtins::core_builtins(sink),
        }
    }

    /// The variable bindings, in insertion order.
    pub fn variables(&self) -> &Bindings {
        &self.variables
    }

    /// Binds or rebinds a variable.
    pub fn assign(&mut self, name: &str, value: Value) {
        self.variables.insert(name.to_string(), value);
    }

    /// Resolves a possibly dotted name: environment first, then built-ins,
    /// with attribute/keyed descent for the dotted remainder.
    pub fn resolve(&self, name: &str, span: Option<Span>) -> Result<Value> {
        if name.contains('.') {
            return self.resolve_dotted(name, span);
        }
        self.lookup(name).ok_or_else(|| {
            JusuError::name(format!("Variable '{}' is not defined", name), span)
        })
    }

    /// Resolves a call target; the only difference from [`resolve`] is the
    /// wording of the error for an unbound simple name.
    ///
    /// [`resolve`]: Environment::resolve
    pub fn resolve_callee(&self, name: &str, span: Option<Span>) -> Result<Value> {
        if name.contains('.') {
            return self.resolve_dotted(name, span);
        }
        self.lookup(name).ok_or_else(|| {
            JusuError::name(format!("Function '{}' is not defined", name), span)
        })
    }

    fn lookup(&self, name: &str) -> Option<Value> {
        self.variables.get(name).or_else(|| self.builtins.get(name)).cloned()
    }

    /// Walks `base.attr1.attr2...`, preferring host-object attributes and
    /// falling back to keyed lookup on object values.
    fn resolve_dotted(&self, name: &str, span: Option<Span>) -> Result<Value> {
        let mut parts = name.split('.');
        let base = parts.next().expect("split always yields at least one part");

        let start = self.lookup(base).ok_or_else(|| {
            JusuError::name(format!("Name '{}' is not defined", base), span)
        })?;
        jusu_runtime::resolve::descend(base, start, parts, span)
    }

    /// Switches to a callee environment: a snapshot of the current variable
    /// map extended with the parameter bindings. Returns the caller's map,
    /// which [`leave_call`] restores.
    ///
    /// Extra arguments are ignored and missing parameters stay unbound,
    /// matching the call semantics of the other backends.
    ///
    /// [`leave_call`]: Environment::leave_call
    pub fn enter_call(&mut self, params: &[String], args: &[Value]) -> Bindings {
        let snapshot = self.variables.clone();
        let caller = std::mem::replace(&mut self.variables, snapshot);
        for (param, arg) in params.iter().zip(args) {
            self.variables.insert(param.clone(), arg.clone());
        }
        caller
    }

    /// Restores the caller's variable map after a call.
    pub fn leave_call(&mut self, caller: Bindings) {
        self.variables = caller;
    }
}
