use std::cell::Cell;
use std::rc::Rc;

use jl::{eval, read_expr, Interpreter, JlError, Value};

#[test]
fn test_define_value() {
    let interp = Interpreter::new();
    interp.define_value("greeting", Value::string("hi"));
    assert_eq!(interp.eval_str("greeting").unwrap(), Value::string("hi"));
}

#[test]
fn test_define_number() {
    let interp = Interpreter::new();
    let v = interp.define_number("answer", 42.0);
    assert_eq!(v, Value::Number(42.0));
    assert_eq!(interp.eval_str("(+ answer 1)").unwrap(), Value::Number(43.0));
}

#[test]
fn test_host_operation_receives_unevaluated_form() {
    let interp = Interpreter::new();
    interp.define_special("quote-arg", |_ctx, form| {
        // The argument arrives as a value tree, not as its evaluation.
        Ok(form.get(1).cloned().unwrap_or(Value::Nil))
    });
    let result = interp.eval_str("(quote-arg (+ 1 2))").unwrap();
    assert_eq!(format!("{result}"), "(+ 1 2)");
}

#[test]
fn test_host_operation_head_names_the_binding() {
    let interp = Interpreter::new();
    interp.define_special("whoami", |_ctx, form| {
        match form[0].as_symbol() {
            Some(name) => Ok(Value::string(name)),
            None => Ok(Value::Nil),
        }
    });
    assert_eq!(interp.eval_str("(whoami)").unwrap(), Value::string("whoami"));
}

#[test]
fn test_host_operation_evaluates_selectively() {
    let interp = Interpreter::new();
    let calls = Rc::new(Cell::new(0));
    {
        let calls = calls.clone();
        interp.define_special("count", move |_ctx, _form| {
            calls.set(calls.get() + 1);
            Ok(Value::Nil)
        });
    }
    interp.define_special("first-only", |ctx, form| {
        // Evaluates its first argument and ignores the second.
        eval(ctx, &form[1])
    });
    interp.eval_str("(first-only (count) (count))").unwrap();
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_host_operation_payload() {
    let interp = Interpreter::new();
    let cookie: Rc<Cell<i64>> = Rc::new(Cell::new(7));
    {
        let cookie = cookie.clone();
        interp.define_special_with_payload("cookie", cookie.clone(), move |_ctx, _form| {
            Ok(Value::Number(cookie.get() as f64))
        });
    }
    assert_eq!(interp.eval_str("(cookie)").unwrap(), Value::Number(7.0));
    cookie.set(9);
    assert_eq!(interp.eval_str("(cookie)").unwrap(), Value::Number(9.0));
}

#[test]
fn test_host_operation_error_surfaces_to_caller() {
    let interp = Interpreter::new();
    interp.define_special("fail", |_ctx, _form| {
        Err(JlError::eval("host says no"))
    });
    let err = interp.eval_str("(if 1 (fail) 2)").unwrap_err();
    assert_eq!(err, JlError::eval("host says no"));
}

#[test]
fn test_read_expr_drives_a_repl_loop() {
    // The REPL pattern: parse repeatedly until the cursor is exhausted,
    // evaluating each expression, then print the last result.
    let interp = Interpreter::new();
    let mut cursor = "(define x 2) (define y 3) (* x y)";
    let mut last = Value::Nil;
    while let Some((expr, rest)) = read_expr(cursor).unwrap() {
        last = interp.eval(&expr).unwrap();
        cursor = rest;
    }
    assert_eq!(last, Value::Number(6.0));
}

#[test]
fn test_error_kinds_are_inspectable() {
    let interp = Interpreter::new();
    assert!(matches!(
        interp.eval_str("nope").unwrap_err(),
        JlError::Unbound(_)
    ));
    assert!(matches!(
        interp.eval_str("(+ 1 \"s\")").unwrap_err(),
        JlError::Type { .. }
    ));
    assert!(matches!(
        interp.eval_str("(").unwrap_err(),
        JlError::Parse { .. }
    ));
}

#[test]
fn test_definitions_persist_across_eval_calls() {
    let interp = Interpreter::new();
    interp.eval_str("(define counter 0)").unwrap();
    interp.eval_str("(define counter (+ counter 1))").unwrap();
    assert_eq!(interp.eval_str("counter").unwrap(), Value::Number(1.0));
}

#[test]
fn test_interpreters_are_independent() {
    let a = Interpreter::new();
    let b = Interpreter::new();
    a.eval_str("(define x 1)").unwrap();
    assert!(matches!(b.eval_str("x").unwrap_err(), JlError::Unbound(_)));
}

#[test]
fn test_depth_limit_is_configurable() {
    let interp = Interpreter::new();
    interp.context().set_depth_limit(8);
    assert!(interp.eval_str("(+ 1 (+ 2 (+ 3 4)))").is_ok());
    assert!(interp
        .eval_str("(+ 1 (+ 2 (+ 3 (+ 4 (+ 5 (+ 6 (+ 7 (+ 8 9))))))))")
        .is_err());
}

#[test]
fn test_values_survive_context() {
    // A value handle outlives the interpreter that produced it.
    let value = {
        let interp = Interpreter::new();
        interp.eval_str("(list 1 2 3)").unwrap()
    };
    assert_eq!(format!("{value}"), "(1 2 3)");
}
