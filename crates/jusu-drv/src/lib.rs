//! jusu-drv - Pipeline Driver
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! Orchestrates the compilation pipeline and selects an execution backend:
//!
//! ```text
//! Source (.jusu)
//!      │
//!      ▼
//!  [jusu-lex] ──▶ tokens
//!      │
//!      ▼
//!  [jusu-par] ──▶ AST
//!      │
//!      ├──▶ [jusu-interp]  tree-walking interpreter (default)
//!      ├──▶ [jusu-vm]      stack compiler + stack VM       (--vm)
//!      └──▶ [jusu-regvm]   register compiler + register VM (--regvm)
//! ```
//!
//! Program output goes to the provided sink and nothing else is written
//! there; status logging is emitted through `tracing` so stdout carries
//! exactly the program's bytes.

pub mod repl;

use jusu_par::Program;
use jusu_runtime::value::OutputSink;
use jusu_util::Result;
use tracing::debug;

/// The three execution strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Tree-walking interpreter.
    Interp,
    /// Stack bytecode compiler and VM.
    StackVm,
    /// Register bytecode compiler and VM (subset-limited).
    RegisterVm,
}

impl Backend {
    pub fn name(self) -> &'static str {
        match self {
            Backend::Interp => "interp",
            Backend::StackVm => "vm",
            Backend::RegisterVm => "regvm",
        }
    }
}

/// Compiles source text to an AST.
pub fn compile_to_ast(source: &str) -> Result<Program> {
    debug!("lexing and parsing {} bytes", source.len());
    jusu_par::parse_source(source)
}

/// Compiles and executes a complete source text on the chosen backend.
///
/// All `say`/`print` output goes to `sink`.
pub fn run_source(source: &str, backend: Backend, sink: OutputSink) -> Result<()> {
    let program = compile_to_ast(source)?;
    debug!(backend = backend.name(), statements = program.len(), "executing");

    match backend {
        Backend::Interp => {
            let mut interp = jusu_interp::Interpreter::new(sink);
            interp.interpret(&program)
        }
        Backend::StackVm => {
            let code = jusu_vm::compile(&program)?;
            let mut vm = jusu_vm::Vm::new(sink);
            // The top-level's implicit return value is ignored.
            vm.run(code).map(|_| ())
        }
        Backend::RegisterVm => {
            let code = jusu_regvm::compile(&program)?;
            let mut vm = jusu_regvm::RegVm::new(sink);
            vm.run(code).map(|_| ())
        }
    }
}
