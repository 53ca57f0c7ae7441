use std::cmp::Ordering;

use jl_core::{check_arity, eval, Context, JlError, Value};

use crate::{register_special, truth};

/// Equality across the whole value universe. Two nils are equal; mismatched
/// types are never equal; same-type numbers and strings compare by content.
/// Anything else has no defined equality.
fn values_equal(op: &str, a: &Value, b: &Value) -> Result<bool, JlError> {
    match (a, b) {
        (Value::Nil, Value::Nil) => Ok(true),
        (Value::Number(x), Value::Number(y)) => Ok(x == y),
        (Value::String(x), Value::String(y)) => Ok(x == y),
        (a, b) if a.type_name() != b.type_name() => Ok(false),
        _ => Err(JlError::type_error(op, "number or string", a.type_name())),
    }
}

/// Ordered comparison: both operands must be numbers or both strings.
/// String ordering is lexicographic over bytes, decided with an integer
/// comparison.
fn cmp_op(
    ctx: &Context,
    op: &str,
    form: &[Value],
    num: impl Fn(f64, f64) -> bool,
    str_: impl Fn(Ordering) -> bool,
) -> Result<Value, JlError> {
    check_arity!(form, op, 2);
    let a = eval(ctx, &form[1])?;
    let b = eval(ctx, &form[2])?;
    let cond = match (&a, &b) {
        (Value::Number(x), Value::Number(y)) => num(*x, *y),
        (Value::String(x), Value::String(y)) => str_(x.as_bytes().cmp(y.as_bytes())),
        _ => {
            return Err(JlError::type_error(
                op,
                "two numbers or two strings",
                format!("{} and {}", a.type_name(), b.type_name()),
            ))
        }
    };
    Ok(truth(cond))
}

pub fn register(ctx: &Context) {
    register_special(ctx, "=", |ctx, form| {
        check_arity!(form, "=", 2);
        let a = eval(ctx, &form[1])?;
        let b = eval(ctx, &form[2])?;
        Ok(truth(values_equal("=", &a, &b)?))
    });

    register_special(ctx, "!=", |ctx, form| {
        check_arity!(form, "!=", 2);
        let a = eval(ctx, &form[1])?;
        let b = eval(ctx, &form[2])?;
        Ok(truth(!values_equal("!=", &a, &b)?))
    });

    register_special(ctx, "<", |ctx, form| {
        cmp_op(ctx, "<", form, |a, b| a < b, Ordering::is_lt)
    });

    register_special(ctx, "<=", |ctx, form| {
        cmp_op(ctx, "<=", form, |a, b| a <= b, Ordering::is_le)
    });

    register_special(ctx, ">", |ctx, form| {
        cmp_op(ctx, ">", form, |a, b| a > b, Ordering::is_gt)
    });

    register_special(ctx, ">=", |ctx, form| {
        cmp_op(ctx, ">=", form, |a, b| a >= b, Ordering::is_ge)
    });

    register_special(ctx, "not", |ctx, form| {
        check_arity!(form, "not", 1);
        let v = eval(ctx, &form[1])?;
        Ok(truth(!v.is_truthy()))
    });
}
