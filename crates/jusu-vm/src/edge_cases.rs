//! Backend agreement checks: the stack VM against the interpreter.
//!
//! For every program here, both backends must produce the same stdout bytes,
//! or fail with the same error classification.

use jusu_par::parse_source;
use jusu_runtime::buffer_sink;

use crate::compiler::compile;
use crate::Vm;

/// Runs `source` on both backends and returns (outcome, stdout) for each.
fn run_both(source: &str) -> ((Option<&'static str>, String), (Option<&'static str>, String)) {
    let program = parse_source(source).expect("program should parse");

    let (sink, buffer) = buffer_sink();
    let mut interp = jusu_interp::Interpreter::new(sink);
    let interp_err = interp.interpret(&program).err().map(|e| e.classification());
    let interp_out = String::from_utf8(buffer.borrow().clone()).unwrap();

    let (sink, buffer) = buffer_sink();
    let mut vm = Vm::new(sink);
    let vm_err = compile(&program)
        .and_then(|code| vm.run(code))
        .err()
        .map(|e| e.classification());
    let vm_out = String::from_utf8(buffer.borrow().clone()).unwrap();

    ((interp_err, interp_out), (vm_err, vm_out))
}

fn assert_agreement(source: &str) {
    let (interp, vm) = run_both(source);
    assert_eq!(interp, vm, "backends disagree on:\n{}", source);
}

#[test]
fn test_edge_agreement_arithmetic() {
    assert_agreement("say 2 + 3 * 4 - 6 / 2\n");
    assert_agreement("say 0.1 + 0.2\n");
    assert_agreement("say (1 + 2) * (3 + 4)\n");
}

#[test]
fn test_edge_agreement_strings() {
    assert_agreement("say \"a\" + \"b\"\nsay \"ab\" * 3\nsay 2 * \"x\"\n");
}

#[test]
fn test_edge_agreement_comparisons() {
    assert_agreement("say 1 < 2\nsay 2 <= 1\nsay \"a\" < \"b\"\nsay 1 == 1.0\nsay 1 != 2\n");
    assert_agreement("say 1 == \"1\"\n");
}

#[test]
fn test_edge_agreement_branches() {
    for x in ["0", "1", "5", "6"] {
        let source = format!("x = {}\nif x > 5: say \"big\" else: say \"small\" end\n", x);
        assert_agreement(&source);
    }
}

#[test]
fn test_edge_agreement_functions() {
    assert_agreement(concat!(
        "function add(a, b): return a + b end\n",
        "function twice(n): return add(n, n) end\n",
        "say twice(21)\n",
        "say add(\"x\", \"y\")\n",
    ));
}

#[test]
fn test_edge_agreement_builtins() {
    assert_agreement("nums = list(1, 2, 3, 4)\nsay sum(nums)\nsay max(nums)\nsay min(nums)\n");
    assert_agreement("say len(\"hello\")\nsay str(4.5)\nsay int(\"7\")\n");
    assert_agreement("xs = list(1)\nsay len(append(xs, 2))\nsay len(xs)\n");
}

#[test]
fn test_edge_agreement_modules() {
    assert_agreement("say math.sqrt(16)\nsay math.pi > 3.14\n");
    assert_agreement("say json.dumps(json.loads('[1, 2]'))\n");
}

#[test]
fn test_edge_agreement_type_errors() {
    assert_agreement("a = 1 + 'x'\n");
    assert_agreement("a = 'x' - 'y'\n");
    assert_agreement("a = 1 < \"2\"\n");
}

#[test]
fn test_edge_agreement_math_errors() {
    assert_agreement("x = 1\ny = 0\nsay x / y\n");
}

#[test]
fn test_edge_agreement_name_errors() {
    assert_agreement("say missing\n");
    assert_agreement("say math.tau\n");
    assert_agreement("say nothing.at.all\n");
}

#[test]
fn test_edge_agreement_output_interleaving() {
    assert_agreement(concat!(
        "function noisy(n):\n",
        "    say n\n",
        "    return n + 1\n",
        "end\n",
        "say noisy(1)\n",
        "say noisy(noisy(10))\n",
    ));
}

#[test]
fn test_edge_agreement_final_bindings() {
    // Data bindings visible to the driver's introspection must match.
    // Function bindings are compared by name only: the backends represent
    // them differently (AST body vs code object).
    let source = concat!(
        "a = 1\n",
        "b = \"two\"\n",
        "c = a + 2\n",
        "function f(): return 0 end\n",
        "if a == 1:\n",
        "    d = true\n",
        "end\n",
    );
    let program = parse_source(source).unwrap();

    let (sink, _) = buffer_sink();
    let mut interp = jusu_interp::Interpreter::new(sink);
    interp.interpret(&program).unwrap();

    let (sink, _) = buffer_sink();
    let mut vm = Vm::new(sink);
    vm.run(compile(&program).unwrap()).unwrap();

    for name in ["a", "b", "c", "d"] {
        assert_eq!(
            interp.variables().get(name),
            vm.globals().get(name),
            "binding '{}' differs between backends",
            name
        );
    }
    assert!(interp.variables().contains_key("f"));
    assert!(vm.globals().contains_key("f"));
}

#[test]
fn test_edge_agreement_reassigned_function_binding() {
    assert_agreement(concat!(
        "function f(): return 1 end\n",
        "function g(): return f() end\n",
        "function f(): return 2 end\n",
        "say g()\n",
    ));
}
