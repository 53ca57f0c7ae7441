use jl_core::{check_arity, Context, JlError, Value};

use crate::{eval_int, eval_number, register_special};

fn fold_number(
    ctx: &Context,
    op: &str,
    form: &[Value],
    init: f64,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Value, JlError> {
    let mut acc = init;
    for expr in &form[1..] {
        acc = f(acc, eval_number(ctx, op, expr)?);
    }
    Ok(Value::Number(acc))
}

fn fold_int(
    ctx: &Context,
    op: &str,
    form: &[Value],
    init: i64,
    f: impl Fn(i64, i64) -> i64,
) -> Result<Value, JlError> {
    let mut acc = init;
    for expr in &form[1..] {
        acc = f(acc, eval_int(ctx, op, expr)?);
    }
    Ok(Value::Number(acc as f64))
}

pub fn register(ctx: &Context) {
    register_special(ctx, "+", |ctx, form| {
        fold_number(ctx, "+", form, 0.0, |a, b| a + b)
    });

    register_special(ctx, "*", |ctx, form| {
        fold_number(ctx, "*", form, 1.0, |a, b| a * b)
    });

    register_special(ctx, "-", |ctx, form| {
        check_arity!(form, "-", 1..);
        let first = eval_number(ctx, "-", &form[1])?;
        if form.len() == 2 {
            return Ok(Value::Number(-first));
        }
        let mut total = first;
        for expr in &form[2..] {
            total -= eval_number(ctx, "-", expr)?;
        }
        Ok(Value::Number(total))
    });

    register_special(ctx, "/", |ctx, form| {
        check_arity!(form, "/", 2);
        let a = eval_number(ctx, "/", &form[1])?;
        let b = eval_number(ctx, "/", &form[2])?;
        if b == 0.0 {
            return Err(JlError::eval("division by zero"));
        }
        Ok(Value::Number(a / b))
    });

    register_special(ctx, "%", |ctx, form| {
        check_arity!(form, "%", 2);
        let a = eval_int(ctx, "%", &form[1])?;
        let b = eval_int(ctx, "%", &form[2])?;
        if b == 0 {
            return Err(JlError::eval("modulo by zero"));
        }
        Ok(Value::Number((a.wrapping_rem(b)) as f64))
    });

    register_special(ctx, "&", |ctx, form| {
        fold_int(ctx, "&", form, -1, |a, b| a & b)
    });

    register_special(ctx, "|", |ctx, form| {
        fold_int(ctx, "|", form, 0, |a, b| a | b)
    });

    register_special(ctx, "^", |ctx, form| {
        fold_int(ctx, "^", form, 0, |a, b| a ^ b)
    });

    register_special(ctx, "~", |ctx, form| {
        check_arity!(form, "~", 1);
        let a = eval_int(ctx, "~", &form[1])?;
        Ok(Value::Number((!a) as f64))
    });

    register_special(ctx, "<<", |ctx, form| {
        check_arity!(form, "<<", 2);
        let a = eval_int(ctx, "<<", &form[1])?;
        let n = eval_int(ctx, "<<", &form[2])?;
        Ok(Value::Number(a.wrapping_shl(n as u32) as f64))
    });

    register_special(ctx, ">>", |ctx, form| {
        check_arity!(form, ">>", 2);
        let a = eval_int(ctx, ">>", &form[1])?;
        let n = eval_int(ctx, ">>", &form[2])?;
        Ok(Value::Number(a.wrapping_shr(n as u32) as f64))
    });
}
