//! Edge case tests for jusu-interp

use jusu_par::parse_source;
use jusu_runtime::buffer_sink;
use jusu_util::Result;

use crate::Interpreter;

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

// ==================== VALUES AND COERCION ====================

#[test]
fn test_edge_string_repetition_both_orders() {
    assert_eq!(output_of("say \"ab\" * 2\nsay 2 * \"ab\"\n"), "abab\nabab\n");
}

#[test]
fn test_edge_nested_arithmetic_precedence() {
    assert_eq!(output_of("say 2 + 3 * 4 - 6 / 2\n"), "11\n");
}

#[test]
fn test_edge_comparison_chain_via_parens() {
    assert_eq!(output_of("say (1 < 2) == true\n"), "true\n");
}

#[test]
fn test_edge_float_display() {
    assert_eq!(output_of("say 0.5 + 0.25\n"), "0.75\n");
}

#[test]
fn test_edge_empty_string_is_falsy() {
    assert_eq!(output_of("if \"\": say 1 else: say 0 end\n"), "0\n");
}

#[test]
fn test_edge_mixed_equality_is_false() {
    assert_eq!(output_of("say 1 == \"1\"\nsay 1 != \"1\"\n"), "false\ntrue\n");
}

// ==================== CONTROL FLOW ====================

#[test]
fn test_edge_if_without_else_falls_through() {
    assert_eq!(output_of("if 1 > 2: say \"no\" end\nsay \"after\"\n"), "after\n");
}

#[test]
fn test_edge_return_unwinds_nested_if() {
    let source = concat!(
        "function pick(n):\n",
        "    if n > 0:\n",
        "        if n > 10:\n",
        "            return \"big\"\n",
        "        end\n",
        "        return \"small\"\n",
        "    end\n",
        "    return \"negative\"\n",
        "end\n",
        "say pick(20)\n",
        "say pick(5)\n",
        "say pick(0)\n",
    );
    assert_eq!(output_of(source), "big\nsmall\nnegative\n");
}

#[test]
fn test_edge_statements_after_return_do_not_run() {
    let source = concat!(
        "function f():\n",
        "    return 1\n",
        "    say \"unreachable\"\n",
        "end\n",
        "say f()\n",
    );
    assert_eq!(output_of(source), "1\n");
}

// ==================== FUNCTIONS ====================

#[test]
fn test_edge_function_value_is_first_class() {
    let source = concat!(
        "function double(n): return n * 2 end\n",
        "alias = double\n",
        "say alias(21)\n",
    );
    assert_eq!(output_of(source), "42\n");
}

#[test]
fn test_edge_extra_arguments_are_ignored() {
    assert_eq!(output_of("function f(a): return a end\nsay f(1, 2, 3)\n"), "1\n");
}

#[test]
fn test_edge_nested_function_declared_inside_call() {
    let source = concat!(
        "function outer():\n",
        "    function inner(): return 7 end\n",
        "    return inner()\n",
        "end\n",
        "say outer()\n",
    );
    assert_eq!(output_of(source), "7\n");
}

#[test]
fn test_edge_inner_function_does_not_escape() {
    let source = concat!(
        "function outer():\n",
        "    function inner(): return 7 end\n",
        "    return inner()\n",
        "end\n",
        "x = outer()\n",
        "say inner()\n",
    );
    let (result, _) = run(source);
    assert_eq!(result.unwrap_err().classification(), "Name Error");
}

#[test]
fn test_edge_deep_recursion_within_host_stack() {
    let source = concat!(
        "function count(n):\n",
        "    if n == 0:\n",
        "        return 0\n",
        "    end\n",
        "    return count(n - 1)\n",
        "end\n",
        "say count(200)\n",
    );
    assert_eq!(output_of(source), "0\n");
}

// ==================== NAME RESOLUTION ====================

#[test]
fn test_edge_module_can_be_shadowed() {
    assert_eq!(
        output_of("math = {pi: 3}\nsay math.pi\n"),
        "3\n"
    );
}

#[test]
fn test_edge_dotted_error_positions() {
    let (result, _) = run("say 1\nsay math.phi\n");
    let err = result.unwrap_err();
    assert!(err.to_string().contains("line 2"), "got: {}", err);
}

#[test]
fn test_edge_calling_a_number_is_type_error() {
    let (result, _) = run("x = 5\nsay x()\n");
    assert_eq!(result.unwrap_err().classification(), "Type Error");
}

#[test]
fn test_edge_object_literal_keeps_insertion_order() {
    assert_eq!(
        output_of("o = {z: 1, a: 2}\nsay o\n"),
        "{\"z\": 1, \"a\": 2}\n"
    );
}

#[test]
fn test_edge_builtin_usable_as_value_through_variable() {
    assert_eq!(output_of("f = str\nsay f(12)\n"), "12\n");
}
