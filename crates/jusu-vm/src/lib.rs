//! jusu-vm - Stack Compiler and Stack Virtual Machine
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! The second execution backend: the AST is lowered to a linear stream of
//! stack opcodes (`compiler`) and executed by a frame-based virtual machine
//! (`vm`).
//!
//! ```text
//! AST ──▶ [Compiler] ──▶ CodeObject ──▶ [Vm] ──▶ output
//! ```
//!
//! Code objects bundle instructions with a constant pool and a name pool.
//! Function bodies compile to standalone code objects stored as constants of
//! the enclosing code, so function values are first class: declaring a
//! function is just `LOAD_CONST` followed by `STORE_NAME`.
//!
//! The VM shares its operator semantics and built-in table with the
//! interpreter through `jusu-runtime`; for any program in the supported
//! subset the two backends produce identical output bytes and identical
//! error classifications.

mod compiler;
mod vm;

#[cfg(test)]
mod edge_cases;

pub use crate::compiler::compile;
pub use crate::vm::Vm;
