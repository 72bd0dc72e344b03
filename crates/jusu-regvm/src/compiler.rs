//! AST to three-address register code.
//!
//! Every expression result gets a fresh register from a monotonically
//! growing allocator; the register file is sized to the high-water mark.
//! Function parameters are allocated first, so they occupy registers
//! `0..param_count` and identifier references to them compile to a direct
//! register read with no instruction at all.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use jusu_par::{Expr, FunctionDecl, Stmt};
use jusu_util::{JusuError, Result};

use jusu_runtime::code::{add_const, add_name, RegCode, RegInstr};
use jusu_runtime::value::{Bindings, Value};

/// Compiles a program into a top-level register code object.
pub fn compile(program: &[Stmt]) -> Result<Rc<RegCode>> {
    let mut compiler = RegCompiler::new();
    for stmt in program {
        compiler.compile_stmt(stmt)?;
    }
    Ok(Rc::new(compiler.finish("<main>", 0)))
}

struct RegCompiler {
    instructions: Vec<RegInstr>,
    consts: Vec<Value>,
    names: Vec<String>,
    next_reg: usize,
    reg_count: usize,
    /// Parameter name to register, for function bodies.
    param_map: FxHashMap<String, usize>,
}

impl RegCompiler {
    fn new() -> Self {
        Self {
            instructions: Vec::new(),
            consts: Vec::new(),
            names: Vec::new(),
            next_reg: 0,
            reg_count: 0,
            param_map: FxHashMap::default(),
        }
    }

    fn finish(self, name: &str, param_count: usize) -> RegCode {
        RegCode {
            name: name.to_string(),
            instructions: self.instructions,
            consts: self.consts,
            names: self.names,
            param_count,
            reg_count: self.reg_count,
        }
    }

    fn new_reg(&mut self) -> usize {
        let reg = self.next_reg;
        self.next_reg += 1;
        self.reg_count = self.reg_count.max(self.next_reg);
        reg
    }

    fn compile_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Assignment { name, value, .. } => {
                let src = self.compile_expr(value)?;
                let index = add_name(&mut self.names, name);
                self.instructions.push(RegInstr::StoreName { index, src });
            }
            Stmt::Function(decl) => {
                let code = compile_function(decl)?;
                let index = add_const(&mut self.consts, Value::RegCode(Rc::new(code)));
                let dst = self.new_reg();
                self.instructions.push(RegInstr::LoadConst { dst, index });
                let name = add_name(&mut self.names, &decl.name);
                self.instructions.push(RegInstr::StoreName { index: name, src: dst });
            }
            Stmt::Return { value, .. } => {
                let src = match value {
                    Some(expr) => Some(self.compile_expr(expr)?),
                    None => None,
                };
                self.instructions.push(RegInstr::Return { src });
            }
            Stmt::Expression { expression } => {
                self.compile_expr(expression)?;
            }
            Stmt::Say { expression, span } => {
                let arg = self.compile_expr(expression)?;
                let callee = self.new_reg();
                let index = add_name(&mut self.names, "print");
                self.instructions.push(RegInstr::LoadName { dst: callee, index, span: *span });
                self.instructions.push(RegInstr::Call {
                    dst: None,
                    callee,
                    args: vec![arg],
                    span: *span,
                });
            }
            Stmt::If { span, .. } => {
                return Err(JusuError::runtime(
                    "The register backend does not support 'if' statements; \
                     use the interpreter or the stack VM",
                    *span,
                ));
            }
        }
        Ok(())
    }

    fn compile_expr(&mut self, expr: &Expr) -> Result<usize> {
        match expr {
            Expr::Number { .. } | Expr::Str { .. } | Expr::Bool { .. } | Expr::Array { .. }
            | Expr::Object { .. } => {
                let value = materialize_literal(expr)?;
                let index = add_const(&mut self.consts, value);
                let dst = self.new_reg();
                self.instructions.push(RegInstr::LoadConst { dst, index });
                Ok(dst)
            }
            Expr::Identifier { name, span } => {
                if let Some(&reg) = self.param_map.get(name.as_str()) {
                    return Ok(reg);
                }
                let index = add_name(&mut self.names, name);
                let dst = self.new_reg();
                self.instructions.push(RegInstr::LoadName { dst, index, span: *span });
                Ok(dst)
            }
            Expr::Binary { op, left, right, span } => {
                let lhs = self.compile_expr(left)?;
                let rhs = self.compile_expr(right)?;
                let dst = self.new_reg();
                self.instructions.push(RegInstr::Binary {
                    op: *op,
                    dst,
                    lhs,
                    rhs,
                    span: *span,
                });
                Ok(dst)
            }
            Expr::Call { callee, arguments, span } => {
                let mut args = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    args.push(self.compile_expr(argument)?);
                }
                let callee_reg = if let Some(&reg) = self.param_map.get(callee.as_str()) {
                    reg
                } else {
                    let index = add_name(&mut self.names, callee);
                    let dst = self.new_reg();
                    self.instructions.push(RegInstr::LoadName { dst, index, span: *span });
                    dst
                };
                let dst = self.new_reg();
                self.instructions.push(RegInstr::Call {
                    dst: Some(dst),
                    callee: callee_reg,
                    args,
                    span: *span,
                });
                Ok(dst)
            }
        }
    }
}

/// Compiles a function body into a register code object of its own.
fn compile_function(decl: &FunctionDecl) -> Result<RegCode> {
    let mut compiler = RegCompiler::new();
    for param in &decl.params {
        let reg = compiler.new_reg();
        compiler.param_map.insert(param.clone(), reg);
    }
    for stmt in &decl.body {
        compiler.compile_stmt(stmt)?;
    }
    // A body that falls off the end returns null.
    compiler.instructions.push(RegInstr::Return { src: None });
    Ok(compiler.finish(&decl.name, decl.params.len()))
}

fn materialize_literal(expr: &Expr) -> Result<Value> {
    match expr {
        Expr::Number { value, .. } => Ok(Value::Number(*value)),
        Expr::Str { value, .. } => Ok(Value::Str(value.clone())),
        Expr::Bool { value } => Ok(Value::Bool(*value)),
        Expr::Array { elements } => {
            let items =
                elements.iter().map(materialize_literal).collect::<Result<Vec<_>>>()?;
            Ok(Value::array(items))
        }
        Expr::Object { pairs } => {
            let mut map = Bindings::new();
            for (key, value) in pairs {
                map.insert(key.clone(), materialize_literal(value)?);
            }
            Ok(Value::object(map))
        }
        other => Err(JusuError::runtime(
            "Container literals with non-constant elements are not supported by the \
             register backend",
            other.span(),
        )),
    }
}
