//! AST node definitions.
//!
//! Dotted names like `a.b.c` are kept as a single identifier string, exactly
//! as the name pools of the bytecode backends store them; resolution by
//! attribute or keyed descent happens at evaluation time.

use jusu_util::Span;

/// AST root: an ordered sequence of statements.
pub type Program = Vec<Stmt>;

/// A function declaration.
///
/// Shared between [`Stmt::Function`] and the runtime, which stores the body
/// for later calls.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    pub span: Option<Span>,
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `name is value` or `name = value`
    Assignment { name: String, value: Expr, span: Option<Span> },

    /// `say expression`
    Say { expression: Expr, span: Option<Span> },

    /// `if condition: ... else: ... end`
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
        span: Option<Span>,
    },

    /// `function name(params): body end`
    Function(FunctionDecl),

    /// `return` or `return value`
    Return { value: Option<Expr>, span: Option<Span> },

    /// A bare expression evaluated for its effects.
    Expression { expression: Expr },
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl BinOp {
    /// The operator's source spelling.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
        }
    }

    /// Parses a source spelling back into an operator.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "<" => BinOp::Lt,
            ">" => BinOp::Gt,
            "<=" => BinOp::Le,
            ">=" => BinOp::Ge,
            "==" => BinOp::Eq,
            "!=" => BinOp::Ne,
            _ => return None,
        })
    }

    /// True for `== != < > <= >=`.
    pub fn is_comparison(self) -> bool {
        matches!(self, BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge | BinOp::Eq | BinOp::Ne)
    }
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal. All numbers are doubles.
    Number { value: f64, span: Option<Span> },

    /// A string literal, escapes already resolved.
    Str { value: String, span: Option<Span> },

    /// `true` or `false`.
    Bool { value: bool },

    /// A possibly dotted name: `x`, `math.pi`.
    Identifier { name: String, span: Option<Span> },

    /// `left op right`. The span is the operator token's position, so type
    /// errors can name the line of the offending operator.
    Binary { op: BinOp, left: Box<Expr>, right: Box<Expr>, span: Option<Span> },

    /// A call on a possibly dotted name: `add(1, 2)`, `math.sqrt(x)`.
    Call { callee: String, arguments: Vec<Expr>, span: Option<Span> },

    /// `{ key: expr, ... }` with insertion order preserved.
    Object { pairs: Vec<(String, Expr)> },

    /// `[ expr, ... ]`
    Array { elements: Vec<Expr> },
}

impl Expr {
    /// The recorded source position, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            Expr::Number { span, .. }
            | Expr::Str { span, .. }
            | Expr::Identifier { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Call { span, .. } => *span,
            Expr::Bool { .. } | Expr::Object { .. } | Expr::Array { .. } => None,
        }
    }
}

/// Returns a copy of `program` with every span cleared.
///
/// Useful for comparing trees for structural equivalence when the source
/// positions legitimately differ, e.g. after a pretty-print round trip.
pub fn strip_spans(program: &[Stmt]) -> Vec<Stmt> {
    program.iter().map(strip_stmt).collect()
}

fn strip_stmt(stmt: &Stmt) -> Stmt {
    match stmt {
        Stmt::Assignment { name, value, .. } => {
            Stmt::Assignment { name: name.clone(), value: strip_expr(value), span: None }
        }
        Stmt::Say { expression, .. } => {
            Stmt::Say { expression: strip_expr(expression), span: None }
        }
        Stmt::If { condition, then_branch, else_branch, .. } => Stmt::If {
            condition: strip_expr(condition),
            then_branch: strip_spans(then_branch),
            else_branch: else_branch.as_deref().map(strip_spans),
            span: None,
        },
        Stmt::Function(decl) => Stmt::Function(FunctionDecl {
            name: decl.name.clone(),
            params: decl.params.clone(),
            body: strip_spans(&decl.body),
            span: None,
        }),
        Stmt::Return { value, .. } => {
            Stmt::Return { value: value.as_ref().map(strip_expr), span: None }
        }
        Stmt::Expression { expression } => {
            Stmt::Expression { expression: strip_expr(expression) }
        }
    }
}

fn strip_expr(expr: &Expr) -> Expr {
    match expr {
        Expr::Number { value, .. } => Expr::Number { value: *value, span: None },
        Expr::Str { value, .. } => Expr::Str { value: value.clone(), span: None },
        Expr::Bool { value } => Expr::Bool { value: *value },
        Expr::Identifier { name, .. } => Expr::Identifier { name: name.clone(), span: None },
        Expr::Binary { op, left, right, .. } => Expr::Binary {
            op: *op,
            left: Box::new(strip_expr(left)),
            right: Box::new(strip_expr(right)),
            span: None,
        },
        Expr::Call { callee, arguments, .. } => Expr::Call {
            callee: callee.clone(),
            arguments: arguments.iter().map(strip_expr).collect(),
            span: None,
        },
        Expr::Object { pairs } => Expr::Object {
            pairs: pairs.iter().map(|(k, v)| (k.clone(), strip_expr(v))).collect(),
        },
        Expr::Array { elements } => {
            Expr::Array { elements: elements.iter().map(strip_expr).collect() }
        }
    }
}
