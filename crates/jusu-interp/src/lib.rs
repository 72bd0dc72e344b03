//! jusu-interp - Tree-Walking Interpreter
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! Direct evaluation over the AST. The interpreter owns an environment (an
//! insertion-ordered identifier-to-value map) plus the fixed built-in table,
//! and executes statements in program order.
//!
//! SNAPSHOT CALL SCOPE:
//! --------------------
//! Calling a user function builds a child environment whose variable map is a
//! by-value copy of the caller's map at call time, extended with the
//! parameter bindings. The callee sees everything the caller could see, but
//! assignments inside the callee never propagate back. This is a deliberate
//! language choice: there are no closures over mutable enclosing scopes.
//!
//! RETURN:
//! -------
//! `return` unwinds the executing body through the [`Control`] enum rather
//! than through an error; the nearest call frame catches it. A `return` at
//! the top level is a runtime error.

mod env;

#[cfg(test)]
mod edge_cases;

use std::io::Write;
use std::rc::Rc;

use jusu_par::{Expr, FunctionDecl, Stmt};
use jusu_util::{JusuError, Result, Span};

use jusu_runtime::ops;
use jusu_runtime::value::{Bindings, OutputSink, Value};

pub use crate::env::Environment;

/// How a statement finished: fell through, or hit a `return`.
enum Control {
    Normal,
    Return(Value),
}

/// Executes Jusu++ ASTs.
pub struct Interpreter {
    env: Environment,
    sink: OutputSink,
}

impl Interpreter {
    /// Creates an interpreter whose `say`/`print` output goes to `sink`.
    ///
    /// The environment starts with the standard modules bound and the
    /// built-in function table installed.
    pub fn new(sink: OutputSink) -> Self {
        Self { env: Environment::new(&sink), sink }
    }

    /// The current variable bindings, in insertion order.
    ///
    /// This is what the shell's `vars` command shows.
    pub fn variables(&self) -> &Bindings {
        self.env.variables()
    }

    /// Executes a program's statements in order.
    pub fn interpret(&mut self, program: &[Stmt]) -> Result<()> {
        for stmt in program {
            match self.execute(stmt)? {
                Control::Normal => {}
                Control::Return(_) => {
                    return Err(JusuError::runtime("'return' outside function", stmt_span(stmt)));
                }
            }
        }
        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<Control> {
        match stmt {
            Stmt::Say { expression, span } => {
                let value = self.eval(expression)?;
                let mut out = self.sink.borrow_mut();
                writeln!(out, "{}", value).map_err(|e| {
                    JusuError::runtime(format!("I/O error: {}", e), *span)
                })?;
                Ok(Control::Normal)
            }
            Stmt::Assignment { name, value, .. } => {
                let value = self.eval(value)?;
                self.env.assign(name, value);
                Ok(Control::Normal)
            }
            Stmt::Expression { expression } => {
                self.eval(expression)?;
                Ok(Control::Normal)
            }
            Stmt::Function(decl) => {
                self.env.assign(&decl.name, Value::Function(Rc::new(decl.clone())));
                Ok(Control::Normal)
            }
            Stmt::If { condition, then_branch, else_branch, .. } => {
                if self.eval(condition)?.is_truthy() {
                    self.execute_block(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute_block(else_branch)
                } else {
                    Ok(Control::Normal)
                }
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Null,
                };
                Ok(Control::Return(value))
            }
        }
    }

    fn execute_block(&mut self, stmts: &[Stmt]) -> Result<Control> {
        for stmt in stmts {
            match self.execute(stmt)? {
                Control::Normal => {}
                ret => return Ok(ret),
            }
        }
        Ok(Control::Normal)
    }

    /// Evaluates an expression to a value.
    pub fn eval(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Number { value, .. } => Ok(Value::Number(*value)),
            Expr::Str { value, .. } => Ok(Value::Str(value.clone())),
            Expr::Bool { value } => Ok(Value::Bool(*value)),
            Expr::Array { elements } => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.eval(element)?);
                }
                Ok(Value::array(items))
            }
            Expr::Object { pairs } => {
                let mut map = Bindings::new();
                for (key, value) in pairs {
                    map.insert(key.clone(), self.eval(value)?);
                }
                Ok(Value::object(map))
            }
            Expr::Identifier { name, span } => self.env.resolve(name, *span),
            Expr::Binary { op, left, right, span } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                ops::binary(*op, &left, &right).map_err(|e| e.or_loc(*span))
            }
            Expr::Call { callee, arguments, span } => {
                let mut args = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    args.push(self.eval(argument)?);
                }
                let callee_value = self.env.resolve_callee(callee, *span)?;
                self.call_value(&callee_value, &args, *span)
            }
        }
    }

    /// Invokes a callable value with already-evaluated arguments.
    fn call_value(&mut self, callee: &Value, args: &[Value], span: Option<Span>) -> Result<Value> {
        match callee {
            Value::Native(native) => native.call(args).map_err(|e| e.or_loc(span)),
            Value::Function(decl) => self.call_function(decl.clone(), args),
            other => Err(JusuError::type_error(
                format!("Object of type {} is not callable", other.type_name()),
                span,
            )),
        }
    }

    /// Calls a user-defined function with snapshot scope.
    fn call_function(&mut self, decl: Rc<FunctionDecl>, args: &[Value]) -> Result<Value> {
        // The callee runs in a copy of the caller's bindings; the caller's
        // map is set aside untouched and restored afterwards.
        let caller_vars = self.env.enter_call(&decl.params, args);
        let result = self.execute_block(&decl.body);
        self.env.leave_call(caller_vars);

        match result? {
            Control::Return(value) => Ok(value),
            Control::Normal => Ok(Value::Null),
        }
    }
}

fn stmt_span(stmt: &Stmt) -> Option<Span> {
    match stmt {
        Stmt::Assignment { span, .. }
        | Stmt::Say { span, .. }
        | Stmt::If { span, .. }
        | Stmt::Return { span, .. } => *span,
        Stmt::Function(decl) => decl.span,
        Stmt::Expression { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jusu_par::parse_source;
    use jusu_runtime::buffer_sink;

    fn run(source: &str) -> (Result<()>, String) {
        let (sink, buffer) = buffer_sink();
        let mut interp = Interpreter::new(sink);
        let result = parse_source(source).and_then(|ast| interp.interpret(&ast));
        let output = String::from_utf8(buffer.borrow().clone()).unwrap();
        (result, output)
    }

    fn output_of(source: &str) -> String {
        let (result, output) = run(source);
        result.expect("program should succeed");
        output
    }

    #[test]
    fn hello_and_concatenation() {
        let out = output_of(concat!(
            "name is \"Alice\"\n",
            "age = 20 + 5\n",
            "say \"Hello \" + name\n",
            "say \"Age: \" + str(age)\n",
        ));
        assert_eq!(out, "Hello Alice\nAge: 25\n");
    }

    #[test]
    fn function_call() {
        let out = output_of("function add(a,b): return a + b end\nsay add(2,3)\n");
        assert_eq!(out, "5\n");
    }

    #[test]
    fn if_else_branches() {
        let big = output_of("x = 10\nif x > 5: say \"big\" else: say \"small\" end\n");
        assert_eq!(big, "big\n");
        let small = output_of("x = 1\nif x > 5: say \"big\" else: say \"small\" end\n");
        assert_eq!(small, "small\n");
    }

    #[test]
    fn sum_of_list() {
        let out = output_of("nums = list(1,2,3,4)\nsay sum(nums)\n");
        assert_eq!(out, "10\n");
    }

    #[test]
    fn math_sqrt() {
        let out = output_of("val = math.sqrt(16)\nsay val\n");
        assert_eq!(out, "4\n");
    }

    #[test]
    fn type_error_names_line_one() {
        let (result, _) = run("a = 1 + 'x'\n");
        let err = result.unwrap_err();
        assert_eq!(err.classification(), "Type Error");
        assert!(err.to_string().contains("line 1"), "got: {}", err);
    }

    #[test]
    fn callee_sees_bindings_at_call_time() {
        let out = output_of(concat!(
            "x = 1\n",
            "function show(): return x end\n",
            "x = 2\n",
            "say show()\n",
        ));
        assert_eq!(out, "2\n");
    }

    #[test]
    fn callee_assignments_do_not_leak() {
        let out = output_of(concat!(
            "x = 1\n",
            "function mutate():\n",
            "    x = 99\n",
            "    return x\n",
            "end\n",
            "say mutate()\n",
            "say x\n",
        ));
        assert_eq!(out, "99\n1\n");
    }

    #[test]
    fn calling_through_reassigned_binding_uses_latest() {
        let out = output_of(concat!(
            "function f(): return 1 end\n",
            "function g(): return f() end\n",
            "function f(): return 2 end\n",
            "say g()\n",
        ));
        assert_eq!(out, "2\n");
    }

    #[test]
    fn recursion() {
        let out = output_of(concat!(
            "function fib(n):\n",
            "    if n < 2:\n",
            "        return n\n",
            "    end\n",
            "    return fib(n - 1) + fib(n - 2)\n",
            "end\n",
            "say fib(10)\n",
        ));
        assert_eq!(out, "55\n");
    }

    #[test]
    fn function_without_return_yields_null() {
        let out = output_of("function f(): say 1 end\nsay f()\n");
        assert_eq!(out, "1\nnull\n");
    }

    #[test]
    fn undefined_variable_is_name_error() {
        let (result, _) = run("say missing\n");
        let err = result.unwrap_err();
        assert_eq!(err.classification(), "Name Error");
        assert!(err.to_string().contains("'missing'"));
    }

    #[test]
    fn undefined_attribute_is_name_error() {
        let (result, _) = run("say math.tau\n");
        let err = result.unwrap_err();
        assert_eq!(err.classification(), "Name Error");
        assert!(err.to_string().contains("'tau'"));
    }

    #[test]
    fn division_by_zero() {
        let (result, _) = run("say 1 / 0\n");
        assert_eq!(result.unwrap_err().classification(), "Math Error");
    }

    #[test]
    fn top_level_return_is_runtime_error() {
        let (result, _) = run("return 1\n");
        assert_eq!(result.unwrap_err().classification(), "Runtime Error");
    }

    #[test]
    fn object_keyed_descent() {
        let out = output_of("point = {x: 1, y: 2}\nsay point.x + point.y\n");
        assert_eq!(out, "3\n");
    }

    #[test]
    fn append_mutates_shared_sequence() {
        let out = output_of(concat!(
            "xs = list(1, 2)\n",
            "ys = append(xs, 3)\n",
            "say len(xs)\n",
            "say len(ys)\n",
        ));
        assert_eq!(out, "3\n3\n");
    }

    #[test]
    fn stub_module_raises_on_use() {
        let (result, _) = run("say np.pi\n");
        let err = result.unwrap_err();
        assert_eq!(err.classification(), "Runtime Error");
        assert!(err.to_string().contains("not available"));
    }

    #[test]
    fn json_round_trip() {
        let out = output_of(concat!(
            "data = json.loads('{\"a\": 1}')\n",
            "say data.a\n",
            "say json.dumps(data)\n",
        ));
        assert_eq!(out, "1\n{\"a\":1.0}\n");
    }
}
