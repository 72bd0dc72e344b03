//! Backend agreement checks: the register VM against the interpreter, over
//! the register backend's documented subset (no `if`, no function-local
//! assignments that the caller observes).

use jusu_par::parse_source;
use jusu_runtime::buffer_sink;

use crate::compiler::compile;
use crate::RegVm;

fn run_both(source: &str) -> ((Option<&'static str>, String), (Option<&'static str>, String)) {
    let program = parse_source(source).expect("program should parse");

    let (sink, buffer) = buffer_sink();
    let mut interp = jusu_interp::Interpreter::new(sink);
    let interp_err = interp.interpret(&program).err().map(|e| e.classification());
    let interp_out = String::from_utf8(buffer.borrow().clone()).unwrap();

    let (sink, buffer) = buffer_sink();
    let mut vm = RegVm::new(sink);
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
    assert_agreement("say \"ab\" * 3\nsay \"a\" + \"b\"\n");
    assert_agreement("say 1 < 2\nsay \"a\" >= \"b\"\nsay 3 == 3\n");
}

#[test]
fn test_edge_agreement_functions() {
    assert_agreement(concat!(
        "function add(a, b): return a + b end\n",
        "say add(2, 3)\n",
        "say add(10, 20)\n",
    ));
}

#[test]
fn test_edge_agreement_builtins_and_modules() {
    assert_agreement("nums = list(1, 2, 3, 4)\nsay sum(nums)\n");
    assert_agreement("say math.sqrt(16)\n");
    assert_agreement("say len(\"hello\") + len(\"!\")\n");
}

#[test]
fn test_edge_agreement_errors() {
    assert_agreement("a = 1 + 'x'\n");
    assert_agreement("say missing\n");
    assert_agreement("x = 1\ny = 0\nsay x / y\n");
    assert_agreement("say math.tau\n");
}

#[test]
fn test_edge_if_is_outside_the_subset() {
    let program = parse_source("if x > 5: say 1 end\n").unwrap();
    assert!(compile(&program).is_err());
}

#[test]
fn test_edge_first_class_function_values() {
    assert_agreement(concat!(
        "function double(n): return n * 2 end\n",
        "alias = double\n",
        "say alias(21)\n",
    ));
}
