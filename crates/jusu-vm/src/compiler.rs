//! AST to stack bytecode.
//!
//! Lowering is a single pass. Statements and expressions emit instructions
//! in evaluation order; `if` is compiled with a `JUMP_IF_FALSE` whose target
//! is patched once the branch length is known.
//!
//! A binary expression over two numeric literals is folded to a single
//! `LOAD_CONST` at compile time. Division is only folded when the divisor is
//! non-zero, so `1 / 0` still fails at run time with the same math error the
//! interpreter raises.

use std::rc::Rc;

use jusu_par::{BinOp, Expr, FunctionDecl, Stmt};
use jusu_util::{JusuError, Result, Span};

use jusu_runtime::code::{add_const, add_name, CodeObject, Instr, Op};
use jusu_runtime::value::{Bindings, Value};

/// Compiles a program into a top-level code object named `<main>`.
///
/// The emitted code always ends with `RETURN_VALUE`; running it with an
/// empty call stack terminates top-level execution.
pub fn compile(program: &[Stmt]) -> Result<Rc<CodeObject>> {
    let mut compiler = Compiler::new();
    for stmt in program {
        compiler.compile_stmt(stmt)?;
    }
    compiler.emit(Op::ReturnValue, None, None);
    Ok(Rc::new(compiler.finish("<main>", Vec::new())))
}

struct Compiler {
    instructions: Vec<Instr>,
    consts: Vec<Value>,
    names: Vec<String>,
}

impl Compiler {
    fn new() -> Self {
        Self { instructions: Vec::new(), consts: Vec::new(), names: Vec::new() }
    }

    fn finish(self, name: &str, params: Vec<String>) -> CodeObject {
        CodeObject {
            name: name.to_string(),
            instructions: self.instructions,
            consts: self.consts,
            names: self.names,
            params,
        }
    }

    fn emit(&mut self, op: Op, arg: Option<usize>, span: Option<Span>) -> usize {
        self.instructions.push(Instr::with_span(op, arg, span));
        self.instructions.len() - 1
    }

    fn const_index(&mut self, value: Value) -> usize {
        add_const(&mut self.consts, value)
    }

    fn name_index(&mut self, name: &str) -> usize {
        add_name(&mut self.names, name)
    }

    fn compile_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Assignment { name, value, span } => {
                self.compile_expr(value)?;
                let index = self.name_index(name);
                self.emit(Op::StoreName, Some(index), *span);
            }
            Stmt::Function(decl) => {
                let code = compile_function(decl)?;
                let index = self.const_index(Value::Code(Rc::new(code)));
                self.emit(Op::LoadConst, Some(index), decl.span);
                let name = self.name_index(&decl.name);
                self.emit(Op::StoreName, Some(name), decl.span);
            }
            Stmt::Return { value, span } => {
                match value {
                    Some(expr) => self.compile_expr(expr)?,
                    None => {
                        let index = self.const_index(Value::Null);
                        self.emit(Op::LoadConst, Some(index), *span);
                    }
                }
                self.emit(Op::ReturnValue, None, *span);
            }
            Stmt::Expression { expression } => {
                self.compile_expr(expression)?;
            }
            Stmt::Say { expression, span } => {
                // say X lowers to a call of the built-in print.
                self.compile_expr(expression)?;
                let print = self.name_index("print");
                self.emit(Op::LoadName, Some(print), *span);
                self.emit(Op::CallFunction, Some(1), *span);
            }
            Stmt::If { condition, then_branch, else_branch, span } => {
                self.compile_expr(condition)?;
                let jump_if_false = self.emit(Op::JumpIfFalse, None, *span);

                for inner in then_branch {
                    self.compile_stmt(inner)?;
                }

                if let Some(else_branch) = else_branch {
                    let jump_over_else = self.emit(Op::Jump, None, *span);
                    self.patch(jump_if_false);
                    for inner in else_branch {
                        self.compile_stmt(inner)?;
                    }
                    self.patch(jump_over_else);
                } else {
                    self.patch(jump_if_false);
                }
            }
        }
        Ok(())
    }

    /// Points a previously emitted jump at the next instruction index.
    fn patch(&mut self, at: usize) {
        let target = self.instructions.len();
        self.instructions[at].arg = Some(target);
    }

    fn compile_expr(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Number { .. } | Expr::Str { .. } | Expr::Bool { .. } => {
                let value = materialize_literal(expr)?;
                let index = self.const_index(value);
                self.emit(Op::LoadConst, Some(index), expr.span());
            }
            Expr::Array { .. } | Expr::Object { .. } => {
                // Container literals are materialized into the constant pool;
                // the VM deep-copies them on LOAD_CONST.
                let value = materialize_literal(expr)?;
                let index = self.const_index(value);
                self.emit(Op::LoadConst, Some(index), expr.span());
            }
            Expr::Identifier { name, span } => {
                let index = self.name_index(name);
                self.emit(Op::LoadName, Some(index), *span);
            }
            Expr::Binary { op, left, right, span } => {
                if let Some(folded) = fold_constant(*op, left, right) {
                    let index = self.const_index(folded);
                    self.emit(Op::LoadConst, Some(index), *span);
                    return Ok(());
                }
                self.compile_expr(left)?;
                self.compile_expr(right)?;
                self.emit(Op::for_binary_op(*op), None, *span);
            }
            Expr::Call { callee, arguments, span } => {
                for argument in arguments {
                    self.compile_expr(argument)?;
                }
                let index = self.name_index(callee);
                self.emit(Op::LoadName, Some(index), *span);
                self.emit(Op::CallFunction, Some(arguments.len()), *span);
            }
        }
        Ok(())
    }
}

/// Compiles a function body into its own code object.
///
/// Parameter names are interned into the name pool ahead of the body so
/// they occupy the leading indices.
fn compile_function(decl: &FunctionDecl) -> Result<CodeObject> {
    let mut compiler = Compiler::new();
    for param in &decl.params {
        compiler.name_index(param);
    }
    for stmt in &decl.body {
        compiler.compile_stmt(stmt)?;
    }
    compiler.emit(Op::ReturnValue, None, decl.span);
    Ok(compiler.finish(&decl.name, decl.params.clone()))
}

/// Folds `literal op literal` arithmetic into a constant.
///
/// Comparisons are left to the VM, and division by a zero literal is left
/// unfolded so it fails at run time like every other division by zero.
fn fold_constant(op: BinOp, left: &Expr, right: &Expr) -> Option<Value> {
    let (a, b) = match (left, right) {
        (Expr::Number { value: a, .. }, Expr::Number { value: b, .. }) => (*a, *b),
        _ => return None,
    };
    let folded = match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div if b != 0.0 => a / b,
        _ => return None,
    };
    Some(Value::Number(folded))
}

/// Materializes a literal expression into a constant value.
///
/// Containers must be built from literals all the way down; an embedded
/// identifier or call has no compile-time value.
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
            "Container literals with non-constant elements are not supported by the VM backend",
            other.span(),
        )),
    }
}
