//! jusu-runtime - Value Model and Built-in Library
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! Everything the three execution backends share lives here:
//!
//! - `value`: the runtime [`Value`] type. Numbers are doubles throughout;
//!   arrays and objects are shared, mutable, and insertion-order preserving;
//!   callables come in native, AST-bodied and code-object flavors.
//! - `ops`: the strict binary operator semantics. Implemented once and called
//!   by the interpreter and both VMs, so programs cannot observe different
//!   coercion rules across backends.
//! - `code`: the immutable code objects produced by the stack and register
//!   compilers, including their instruction sets.
//! - `builtins` / `stdlib`: the built-in function table (`str`, `len`,
//!   `print`, ...) and the standard modules (`math`, `json`, `time`,
//!   `random`) plus sentinel stubs for host capabilities that are not
//!   compiled in.
//!
//! OUTPUT SINKS:
//! -------------
//! `say` and `print` write to an [`OutputSink`] rather than straight to
//! stdout. The driver passes stdout; tests pass an in-memory buffer and
//! compare the exact bytes produced by different backends.

pub mod builtins;
pub mod code;
pub mod ops;
pub mod resolve;
pub mod stdlib;
pub mod value;

mod json;

pub use crate::code::{CodeObject, Instr, Op, RegCode, RegInstr};
pub use crate::value::{Bindings, HostObject, NativeFn, OutputSink, Value};

/// Creates an output sink writing to process stdout.
pub fn stdout_sink() -> OutputSink {
    std::rc::Rc::new(std::cell::RefCell::new(std::io::stdout()))
}

/// Creates an in-memory output sink for tests, with a reader handle.
pub fn buffer_sink() -> (OutputSink, std::rc::Rc<std::cell::RefCell<Vec<u8>>>) {
    let buffer = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink: OutputSink = buffer.clone();
    (sink, buffer)
}
