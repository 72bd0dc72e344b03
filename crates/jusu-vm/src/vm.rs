//! The stack virtual machine.
//!
//! Execution state is a value stack, the current frame (code, program
//! counter, locals) and a call stack of suspended frames. `CALL_FUNCTION`
//! on a code object pushes the current frame and enters the callee;
//! `RETURN_VALUE` pops one frame, or terminates top-level execution when the
//! call stack is empty.
//!
//! NAME RESOLUTION:
//! ----------------
//! `LOAD_NAME` resolves locals first, then globals, then built-ins, walking
//! dotted names segment by segment from the resolved base. A per-VM inline
//! cache short-circuits repeated global lookups for simple names; it is
//! updated synchronously by `STORE_NAME`, and dotted names are never cached
//! (their base may be rebound between loads).

use std::rc::Rc;

use rustc_hash::FxHashMap;

use jusu_par::BinOp;
use jusu_runtime::code::{CodeObject, Op};
use jusu_runtime::value::{Bindings, OutputSink, Value};
use jusu_runtime::{builtins, ops, resolve, stdlib};
use jusu_util::{JusuError, Result, Span};

/// A suspended caller awaiting a return.
struct Frame {
    code: Rc<CodeObject>,
    pc: usize,
    locals: Option<FxHashMap<String, Value>>,
}

/// Executes stack code objects.
pub struct Vm {
    globals: Bindings,
    builtins: FxHashMap<String, Value>,
    name_cache: FxHashMap<String, Value>,
    stack: Vec<Value>,
    call_stack: Vec<Frame>,
}

impl Vm {
    /// Creates a VM with the standard modules bound as globals and the
    /// built-in function table installed. `print` output goes to `sink`.
    pub fn new(sink: OutputSink) -> Self {
        Self {
            globals: stdlib::standard_modules(),
            builtins: builtins::core_builtins(&sink),
            name_cache: FxHashMap::default(),
            stack: Vec::new(),
            call_stack: Vec::new(),
        }
    }

    /// The global bindings, in insertion order.
    pub fn globals(&self) -> &Bindings {
        &self.globals
    }

    /// Runs a top-level code object to completion.
    ///
    /// Returns the value of the final `RETURN_VALUE`; the driver ignores it
    /// for top-level programs.
    pub fn run(&mut self, code: Rc<CodeObject>) -> Result<Value> {
        let mut code = code;
        let mut pc = 0usize;
        let mut locals: Option<FxHashMap<String, Value>> = None;

        while pc < code.instructions.len() {
            let instr = code.instructions[pc].clone();
            pc += 1;

            match instr.op {
                Op::LoadConst => {
                    let value = &code.consts[expect_arg(&instr)?];
                    self.stack.push(value.deep_copy());
                }
                Op::LoadName => {
                    let name = &code.names[expect_arg(&instr)?];
                    let value = self.load_name(name, locals.as_ref(), instr.span)?;
                    self.stack.push(value);
                }
                Op::StoreName => {
                    let name = &code.names[expect_arg(&instr)?];
                    let value = self.pop(&instr)?;
                    match locals.as_mut() {
                        Some(locals) => {
                            locals.insert(name.clone(), value);
                        }
                        None => {
                            // Keep the inline cache coherent with the store.
                            self.name_cache.insert(name.clone(), value.clone());
                            self.globals.insert(name.clone(), value);
                        }
                    }
                }
                Op::BinaryAddFast => {
                    let b = self.pop(&instr)?;
                    let a = self.pop(&instr)?;
                    // Fast path for the common numeric case.
                    if let (Value::Number(x), Value::Number(y)) = (&a, &b) {
                        self.stack.push(Value::Number(x + y));
                    } else {
                        let value = ops::binary(BinOp::Add, &a, &b)
                            .map_err(|e| e.or_loc(instr.span))?;
                        self.stack.push(value);
                    }
                }
                Op::BinaryAdd
                | Op::BinarySub
                | Op::BinaryMul
                | Op::BinaryDiv
                | Op::BinaryLt
                | Op::BinaryGt
                | Op::BinaryLe
                | Op::BinaryGe
                | Op::BinaryEq
                | Op::BinaryNe => {
                    let op = instr.op.binary_op().expect("binary opcode");
                    let b = self.pop(&instr)?;
                    let a = self.pop(&instr)?;
                    let value =
                        ops::binary(op, &a, &b).map_err(|e| e.or_loc(instr.span))?;
                    self.stack.push(value);
                }
                Op::JumpIfFalse => {
                    let target = expect_arg(&instr)?;
                    let condition = self.pop(&instr)?;
                    if !condition.is_truthy() {
                        pc = target;
                    }
                }
                Op::Jump => {
                    pc = expect_arg(&instr)?;
                }
                Op::CallFunction => {
                    let argc = expect_arg(&instr)?;
                    let callee = self.pop(&instr)?;
                    let mut args = Vec::with_capacity(argc);
                    for _ in 0..argc {
                        args.push(self.pop(&instr)?);
                    }
                    args.reverse();

                    match callee {
                        Value::Code(callee_code) => {
                            let mut callee_locals = FxHashMap::default();
                            for (param, arg) in callee_code.params.iter().zip(args) {
                                callee_locals.insert(param.clone(), arg);
                            }
                            self.call_stack.push(Frame { code, pc, locals });
                            code = callee_code;
                            pc = 0;
                            locals = Some(callee_locals);
                        }
                        Value::Native(native) => {
                            let value =
                                native.call(&args).map_err(|e| e.or_loc(instr.span))?;
                            self.stack.push(value);
                        }
                        other => {
                            return Err(JusuError::type_error(
                                format!(
                                    "Object of type {} is not callable",
                                    other.type_name()
                                ),
                                instr.span,
                            ));
                        }
                    }
                }
                Op::ReturnValue => {
                    let value = self.stack.pop().unwrap_or(Value::Null);
                    match self.call_stack.pop() {
                        Some(frame) => {
                            code = frame.code;
                            pc = frame.pc;
                            locals = frame.locals;
                            self.stack.push(value);
                        }
                        None => return Ok(value),
                    }
                }
            }
        }

        Ok(Value::Null)
    }

    /// Resolves `names[n]`: locals, then the inline cache, then globals and
    /// built-ins, descending dotted names from their base.
    fn load_name(
        &mut self,
        name: &str,
        locals: Option<&FxHashMap<String, Value>>,
        span: Option<Span>,
    ) -> Result<Value> {
        if let Some(locals) = locals {
            if let Some(value) = locals.get(name) {
                return Ok(value.clone());
            }
        }

        if let Some(dot) = name.find('.') {
            let base = &name[..dot];
            let start = self
                .lookup_global(base, locals)
                .ok_or_else(|| {
                    JusuError::name(format!("Name '{}' is not defined", base), span)
                })?;
            // Dotted results are never cached: the base may be rebound.
            return resolve::descend(base, start, name[dot + 1..].split('.'), span);
        }

        if let Some(value) = self.name_cache.get(name) {
            return Ok(value.clone());
        }

        let value = self.lookup_global(name, None).ok_or_else(|| {
            JusuError::name(format!("Variable '{}' is not defined", name), span)
        })?;
        self.name_cache.insert(name.to_string(), value.clone());
        Ok(value)
    }

    fn lookup_global(
        &self,
        name: &str,
        locals: Option<&FxHashMap<String, Value>>,
    ) -> Option<Value> {
        if let Some(locals) = locals {
            if let Some(value) = locals.get(name) {
                return Some(value.clone());
            }
        }
        self.globals.get(name).or_else(|| self.builtins.get(name)).cloned()
    }

    fn pop(&mut self, instr: &jusu_runtime::code::Instr) -> Result<Value> {
        self.stack.pop().ok_or_else(|| {
            JusuError::runtime("Value stack underflow", instr.span)
        })
    }
}

fn expect_arg(instr: &jusu_runtime::code::Instr) -> Result<usize> {
    instr.arg.ok_or_else(|| {
        JusuError::runtime("Malformed instruction: missing argument", instr.span)
    })
}
