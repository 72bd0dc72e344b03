//! The built-in function table.
//!
//! These are the names bound before any program statement runs:
//! `str int float len print range sum max min list dict append`.
//! All three backends install the same table, so built-in behavior can never
//! differ between them.

use std::io::Write;

use rustc_hash::FxHashMap;

use jusu_util::{JusuError, Loc, Result};

use crate::value::{Bindings, NativeFn, OutputSink, Value};

/// Builds the built-in function table. `print` writes to `sink`.
pub fn core_builtins(sink: &OutputSink) -> FxHashMap<String, Value> {
    let mut table = FxHashMap::default();
    let mut add = |name: &'static str, f: NativeFn| {
        table.insert(name.to_string(), Value::Native(f));
    };

    add("str", NativeFn::new("str", builtin_str));
    add("int", NativeFn::new("int", builtin_int));
    add("float", NativeFn::new("float", builtin_float));
    add("len", NativeFn::new("len", builtin_len));
    add("range", NativeFn::new("range", builtin_range));
    add("sum", NativeFn::new("sum", builtin_sum));
    add("max", NativeFn::new("max", |args| builtin_extreme("max", args)));
    add("min", NativeFn::new("min", |args| builtin_extreme("min", args)));
    add("list", NativeFn::new("list", builtin_list));
    add("dict", NativeFn::new("dict", builtin_dict));
    add("append", NativeFn::new("append", builtin_append));

    let print_sink = sink.clone();
    add(
        "print",
        NativeFn::new("print", move |args| {
            let joined =
                args.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ");
            let mut out = print_sink.borrow_mut();
            out.write_all(joined.as_bytes())
                .and_then(|_| out.write_all(b"\n"))
                .map_err(|e| JusuError::runtime(format!("I/O error: {}", e), Loc::NONE))?;
            Ok(Value::Null)
        }),
    );

    table
}

fn expect_arity(name: &str, args: &[Value], arity: usize) -> Result<()> {
    if args.len() != arity {
        return Err(JusuError::type_error(
            format!("{}() takes {} argument(s) but {} were given", name, arity, args.len()),
            Loc::NONE,
        ));
    }
    Ok(())
}

fn expect_number(name: &str, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(JusuError::type_error(
            format!("{}() expects a number, got {}", name, other.type_name()),
            Loc::NONE,
        )),
    }
}

fn builtin_str(args: &[Value]) -> Result<Value> {
    expect_arity("str", args, 1)?;
    Ok(Value::Str(args[0].to_string()))
}

fn builtin_int(args: &[Value]) -> Result<Value> {
    expect_arity("int", args, 1)?;
    let n = to_number("int", &args[0])?;
    Ok(Value::Number(n.trunc()))
}

fn builtin_float(args: &[Value]) -> Result<Value> {
    expect_arity("float", args, 1)?;
    Ok(Value::Number(to_number("float", &args[0])?))
}

fn to_number(name: &str, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => Ok(*n),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Str(s) => s.trim().parse::<f64>().map_err(|_| {
            JusuError::type_error(
                format!("{}() cannot convert '{}' to a number", name, s),
                Loc::NONE,
            )
        }),
        other => Err(JusuError::type_error(
            format!("{}() cannot convert {} to a number", name, other.type_name()),
            Loc::NONE,
        )),
    }
}

fn builtin_len(args: &[Value]) -> Result<Value> {
    expect_arity("len", args, 1)?;
    let len = match &args[0] {
        Value::Str(s) => s.chars().count(),
        Value::Array(items) => items.borrow().len(),
        Value::Object(pairs) => pairs.borrow().len(),
        other => {
            return Err(JusuError::type_error(
                format!("len() is not defined for {}", other.type_name()),
                Loc::NONE,
            ));
        }
    };
    Ok(Value::Number(len as f64))
}

fn builtin_range(args: &[Value]) -> Result<Value> {
    if args.is_empty() || args.len() > 3 {
        return Err(JusuError::type_error(
            format!("range() takes 1 to 3 arguments but {} were given", args.len()),
            Loc::NONE,
        ));
    }

    let mut bounds = [0i64; 3];
    for (i, arg) in args.iter().enumerate() {
        bounds[i] = expect_number("range", arg)?.trunc() as i64;
    }
    let (start, stop, step) = match args.len() {
        1 => (0, bounds[0], 1),
        2 => (bounds[0], bounds[1], 1),
        _ => (bounds[0], bounds[1], bounds[2]),
    };
    if step == 0 {
        return Err(JusuError::runtime("range() step must not be zero", Loc::NONE));
    }

    let mut items = Vec::new();
    let mut current = start;
    while (step > 0 && current < stop) || (step < 0 && current > stop) {
        items.push(Value::Number(current as f64));
        current += step;
    }
    Ok(Value::array(items))
}

fn expect_array(name: &str, value: &Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items.borrow().clone()),
        other => Err(JusuError::type_error(
            format!("{}() expects an array, got {}", name, other.type_name()),
            Loc::NONE,
        )),
    }
}

fn builtin_sum(args: &[Value]) -> Result<Value> {
    expect_arity("sum", args, 1)?;
    let items = expect_array("sum", &args[0])?;
    let mut total = 0.0;
    for item in &items {
        total += expect_number("sum", item)?;
    }
    Ok(Value::Number(total))
}

fn builtin_extreme(name: &'static str, args: &[Value]) -> Result<Value> {
    expect_arity(name, args, 1)?;
    let items = expect_array(name, &args[0])?;
    if items.is_empty() {
        return Err(JusuError::runtime(
            format!("{}() arg is an empty sequence", name),
            Loc::NONE,
        ));
    }

    let mut best = items[0].clone();
    for item in &items[1..] {
        let wins = match (item, &best) {
            (Value::Number(a), Value::Number(b)) => {
                if name == "max" { a > b } else { a < b }
            }
            (Value::Str(a), Value::Str(b)) => {
                if name == "max" { a > b } else { a < b }
            }
            _ => {
                return Err(JusuError::type_error(
                    format!("{}() expects all numbers or all strings", name),
                    Loc::NONE,
                ));
            }
        };
        if wins {
            best = item.clone();
        }
    }
    Ok(best)
}

fn builtin_list(args: &[Value]) -> Result<Value> {
    Ok(Value::array(args.to_vec()))
}

fn builtin_dict(args: &[Value]) -> Result<Value> {
    expect_arity("dict", args, 0)?;
    Ok(Value::object(Bindings::new()))
}

/// `append(seq, v)` mutates `seq` and returns the same sequence.
fn builtin_append(args: &[Value]) -> Result<Value> {
    expect_arity("append", args, 2)?;
    match &args[0] {
        Value::Array(items) => {
            items.borrow_mut().push(args[1].clone());
            Ok(args[0].clone())
        }
        other => Err(JusuError::type_error(
            format!("append() expects an array, got {}", other.type_name()),
            Loc::NONE,
        )),
    }
}
