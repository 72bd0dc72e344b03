//! Pretty-printer: AST back to Jusu++ source.
//!
//! The output is not meant to reproduce the original text. It is meant to
//! re-parse into a structurally equivalent tree, which the tests check via
//! [`crate::ast::strip_spans`]. Binary expressions are always parenthesized
//! so that re-parsing cannot re-associate them.

use std::fmt::Write;

use crate::ast::{Expr, Stmt};

/// Renders a program as parseable Jusu++ source.
pub fn pretty_print(program: &[Stmt]) -> String {
    let mut out = String::new();
    for stmt in program {
        write_stmt(&mut out, stmt);
    }
    out
}

fn write_stmt(out: &mut String, stmt: &Stmt) {
    match stmt {
        Stmt::Assignment { name, value, .. } => {
            let _ = write!(out, "{} = ", name);
            write_expr(out, value);
            out.push('\n');
        }
        Stmt::Say { expression, .. } => {
            out.push_str("say ");
            write_expr(out, expression);
            out.push('\n');
        }
        Stmt::If { condition, then_branch, else_branch, .. } => {
            out.push_str("if ");
            write_expr(out, condition);
            out.push_str(":\n");
            for inner in then_branch {
                write_stmt(out, inner);
            }
            if let Some(else_branch) = else_branch {
                out.push_str("else:\n");
                for inner in else_branch {
                    write_stmt(out, inner);
                }
            }
            out.push_str("end\n");
        }
        Stmt::Function(decl) => {
            let _ = write!(out, "function {}({}):\n", decl.name, decl.params.join(", "));
            for inner in &decl.body {
                write_stmt(out, inner);
            }
            out.push_str("end\n");
        }
        Stmt::Return { value, .. } => {
            out.push_str("return");
            if let Some(value) = value {
                out.push(' ');
                write_expr(out, value);
            }
            out.push('\n');
        }
        Stmt::Expression { expression } => {
            write_expr(out, expression);
            out.push('\n');
        }
    }
}

fn write_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Number { value, .. } => {
            // f64 Display is shortest-round-trip and never uses exponent
            // notation, so the lexer reads the digits back to the same value.
            let _ = write!(out, "{}", value);
        }
        Expr::Str { value, .. } => write_string_literal(out, value),
        Expr::Bool { value } => {
            out.push_str(if *value { "true" } else { "false" });
        }
        Expr::Identifier { name, .. } => out.push_str(name),
        Expr::Binary { op, left, right, .. } => {
            out.push('(');
            write_expr(out, left);
            let _ = write!(out, " {} ", op.symbol());
            write_expr(out, right);
            out.push(')');
        }
        Expr::Call { callee, arguments, .. } => {
            let _ = write!(out, "{}(", callee);
            for (i, arg) in arguments.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, arg);
            }
            out.push(')');
        }
        Expr::Object { pairs } => {
            out.push('{');
            for (i, (key, value)) in pairs.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_string_literal(out, key);
                out.push_str(": ");
                write_expr(out, value);
            }
            out.push('}');
        }
        Expr::Array { elements } => {
            out.push('[');
            for (i, element) in elements.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, element);
            }
            out.push(']');
        }
    }
}

fn write_string_literal(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
}
