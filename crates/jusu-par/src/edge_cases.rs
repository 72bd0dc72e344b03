//! Edge case tests for jusu-par

use crate::{parse_source, BinOp, Expr, Stmt};

// ==================== PROGRAM SHAPE ====================

#[test]
fn test_edge_empty_program() {
    assert!(parse_source("").unwrap().is_empty());
}

#[test]
fn test_edge_only_newlines() {
    assert!(parse_source("\n\n\n").unwrap().is_empty());
}

#[test]
fn test_edge_leading_and_trailing_blank_lines() {
    let program = parse_source("\n\nsay 1\n\n\n").unwrap();
    assert_eq!(program.len(), 1);
}

#[test]
fn test_edge_comment_lines_between_statements() {
    let program = parse_source("a is 1\n# comment\nb is 2\n").unwrap();
    assert_eq!(program.len(), 2);
}

// ==================== STATEMENT SELECTION ====================

#[test]
fn test_edge_identifier_line_is_expression_statement() {
    let program = parse_source("x\n").unwrap();
    assert!(matches!(&program[0], Stmt::Expression { .. }));
}

#[test]
fn test_edge_call_line_is_expression_statement() {
    let program = parse_source("print(1)\n").unwrap();
    assert!(matches!(
        &program[0],
        Stmt::Expression { expression: Expr::Call { .. } }
    ));
}

#[test]
fn test_edge_is_only_binds_to_plain_identifier() {
    // `a.b = 1` is not an assignment statement, and the dangling `=` makes it
    // a syntax error.
    let err = parse_source("a.b = 1\n").unwrap_err();
    assert_eq!(err.classification(), "Syntax Error");
}

// ==================== EXPRESSIONS ====================

#[test]
fn test_edge_parenthesized_grouping() {
    let program = parse_source("x = (1 + 2) * 3\n").unwrap();
    match &program[0] {
        Stmt::Assignment { value: Expr::Binary { op, left, .. }, .. } => {
            assert_eq!(*op, BinOp::Mul);
            assert!(matches!(**left, Expr::Binary { op: BinOp::Add, .. }));
        }
        other => panic!("unexpected shape: {:?}", other),
    }
}

#[test]
fn test_edge_deeply_dotted_name() {
    let program = parse_source("say a.b.c.d\n").unwrap();
    match &program[0] {
        Stmt::Say { expression: Expr::Identifier { name, .. }, .. } => {
            assert_eq!(name, "a.b.c.d");
        }
        other => panic!("unexpected shape: {:?}", other),
    }
}

#[test]
fn test_edge_dot_without_identifier() {
    let err = parse_source("say a.\n").unwrap_err();
    assert!(err.to_string().contains("Expected identifier after '.'"));
}

#[test]
fn test_edge_empty_call() {
    let program = parse_source("f()\n").unwrap();
    assert!(matches!(
        &program[0],
        Stmt::Expression { expression: Expr::Call { arguments, .. } } if arguments.is_empty()
    ));
}

#[test]
fn test_edge_nested_calls() {
    let program = parse_source("say str(len(xs))\n").unwrap();
    match &program[0] {
        Stmt::Say { expression: Expr::Call { callee, arguments, .. }, .. } => {
            assert_eq!(callee, "str");
            assert!(matches!(&arguments[0], Expr::Call { callee, .. } if callee == "len"));
        }
        other => panic!("unexpected shape: {:?}", other),
    }
}

#[test]
fn test_edge_empty_object_and_array() {
    let program = parse_source("a = {}\nb = []\n").unwrap();
    assert!(matches!(
        &program[0],
        Stmt::Assignment { value: Expr::Object { pairs }, .. } if pairs.is_empty()
    ));
    assert!(matches!(
        &program[1],
        Stmt::Assignment { value: Expr::Array { elements }, .. } if elements.is_empty()
    ));
}

#[test]
fn test_edge_object_key_kinds() {
    let program = parse_source("o = {name: 1, \"spaced key\": 2}\n").unwrap();
    match &program[0] {
        Stmt::Assignment { value: Expr::Object { pairs }, .. } => {
            assert_eq!(pairs[0].0, "name");
            assert_eq!(pairs[1].0, "spaced key");
        }
        other => panic!("unexpected shape: {:?}", other),
    }
}

#[test]
fn test_edge_null_is_not_an_expression() {
    // `null` is reserved but the grammar has no null literal.
    assert!(parse_source("x = null\n").is_err());
}

// ==================== BLOCKS ====================

#[test]
fn test_edge_nested_if() {
    let source = concat!(
        "if a:\n",
        "    if b:\n",
        "        say 1\n",
        "    end\n",
        "end\n",
    );
    let program = parse_source(source).unwrap();
    match &program[0] {
        Stmt::If { then_branch, .. } => {
            assert!(matches!(&then_branch[0], Stmt::If { .. }));
        }
        other => panic!("unexpected shape: {:?}", other),
    }
}

#[test]
fn test_edge_function_with_no_params() {
    let program = parse_source("function f():\n    return 1\nend\n").unwrap();
    assert!(matches!(&program[0], Stmt::Function(decl) if decl.params.is_empty()));
}

#[test]
fn test_edge_function_declaration_inside_function() {
    let source = concat!(
        "function outer():\n",
        "    function inner():\n",
        "        return 1\n",
        "    end\n",
        "    return inner()\n",
        "end\n",
    );
    let program = parse_source(source).unwrap();
    match &program[0] {
        Stmt::Function(decl) => {
            assert!(matches!(&decl.body[0], Stmt::Function(_)));
            assert!(matches!(&decl.body[1], Stmt::Return { .. }));
        }
        other => panic!("unexpected shape: {:?}", other),
    }
}

#[test]
fn test_edge_missing_colon_in_if() {
    let err = parse_source("if x\nsay 1\nend\n").unwrap_err();
    assert!(err.to_string().contains("[Line 1]"));
}

#[test]
fn test_edge_statement_needs_terminator() {
    let err = parse_source("say 1 say 2\n").unwrap_err();
    assert!(err.to_string().contains("Expected NEWLINE"));
}
