//! The register virtual machine.
//!
//! Frames hold a register file instead of a value stack. `CALL` on a
//! register code object parks the caller's file on the call stack along with
//! the register its result should land in; `RETURN` restores the caller and
//! writes the value into that register, or discards it when the call was in
//! statement position.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use jusu_runtime::code::{RegCode, RegInstr};
use jusu_runtime::value::{Bindings, OutputSink, Value};
use jusu_runtime::{builtins, ops, resolve, stdlib};
use jusu_util::{JusuError, Result, Span};

/// A suspended caller awaiting a `RETURN`.
struct Frame {
    code: Rc<RegCode>,
    pc: usize,
    regs: Vec<Value>,
    /// Where the caller wants the return value, if anywhere.
    return_reg: Option<usize>,
}

/// Executes register code objects.
pub struct RegVm {
    globals: Bindings,
    builtins: FxHashMap<String, Value>,
    call_stack: Vec<Frame>,
}

impl RegVm {
    /// Creates a register VM with the standard modules bound as globals and
    /// the built-in function table installed.
    pub fn new(sink: OutputSink) -> Self {
        Self {
            globals: stdlib::standard_modules(),
            builtins: builtins::core_builtins(&sink),
            call_stack: Vec::new(),
        }
    }

    /// The global bindings, in insertion order.
    pub fn globals(&self) -> &Bindings {
        &self.globals
    }

    /// Runs a top-level register code object to completion.
    pub fn run(&mut self, code: Rc<RegCode>) -> Result<Value> {
        let mut code = code;
        let mut pc = 0usize;
        let mut regs = vec![Value::Null; code.reg_count.max(1)];

        while pc < code.instructions.len() {
            // Instructions are cloned out so the frame can be swapped on CALL.
            let instr = code.instructions[pc].clone();
            pc += 1;

            match instr {
                RegInstr::LoadConst { dst, index } => {
                    regs[dst] = code.consts[index].deep_copy();
                }
                RegInstr::LoadName { dst, index, span } => {
                    regs[dst] = self.load_name(&code.names[index], span)?;
                }
                RegInstr::StoreName { index, src } => {
                    self.globals.insert(code.names[index].clone(), regs[src].clone());
                }
                RegInstr::Binary { op, dst, lhs, rhs, span } => {
                    regs[dst] = ops::binary(op, &regs[lhs], &regs[rhs])
                        .map_err(|e| e.or_loc(span))?;
                }
                RegInstr::Call { dst, callee, args, span } => {
                    let callee_value = regs[callee].clone();
                    let arg_values: Vec<Value> =
                        args.iter().map(|&r| regs[r].clone()).collect();

                    match callee_value {
                        Value::RegCode(callee_code) => {
                            let mut callee_regs =
                                vec![Value::Null; callee_code.reg_count.max(1)];
                            for (slot, arg) in callee_regs
                                .iter_mut()
                                .zip(arg_values)
                                .take(callee_code.param_count)
                            {
                                *slot = arg;
                            }
                            let caller_regs = std::mem::replace(&mut regs, callee_regs);
                            self.call_stack.push(Frame {
                                code,
                                pc,
                                regs: caller_regs,
                                return_reg: dst,
                            });
                            code = callee_code;
                            pc = 0;
                        }
                        Value::Native(native) => {
                            let value = native
                                .call(&arg_values)
                                .map_err(|e| e.or_loc(span))?;
                            if let Some(dst) = dst {
                                regs[dst] = value;
                            }
                        }
                        other => {
                            return Err(JusuError::type_error(
                                format!(
                                    "Object of type {} is not callable",
                                    other.type_name()
                                ),
                                span,
                            ));
                        }
                    }
                }
                RegInstr::Return { src } => {
                    let value = match src {
                        Some(src) => regs[src].clone(),
                        None => Value::Null,
                    };
                    match self.call_stack.pop() {
                        Some(frame) => {
                            code = frame.code;
                            pc = frame.pc;
                            regs = frame.regs;
                            if let Some(return_reg) = frame.return_reg {
                                regs[return_reg] = value;
                            }
                        }
                        None => return Ok(value),
                    }
                }
            }
        }

        Ok(Value::Null)
    }

    fn load_name(&self, name: &str, span: Option<Span>) -> Result<Value> {
        if let Some(dot) = name.find('.') {
            let base = &name[..dot];
            let start = self.lookup(base).ok_or_else(|| {
                JusuError::name(format!("Name '{}' is not defined", base), span)
            })?;
            return resolve::descend(base, start, name[dot + 1..].split('.'), span);
        }
        self.lookup(name).ok_or_else(|| {
            JusuError::name(format!("Variable '{}' is not defined", name), span)
        })
    }

    fn lookup(&self, name: &str) -> Option<Value> {
        self.globals.get(name).or_else(|| self.builtins.get(name)).cloned()
    }
}
