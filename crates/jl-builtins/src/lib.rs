mod arithmetic;
mod comparison;
mod control;
mod list;
mod predicates;
mod string;

use jl_core::{eval, Context, JlError, Special, Value};

/// Install every built-in operation into the context's current scope,
/// normally the root scope of a fresh context. Built-ins are ordinary
/// bindings: a program that defines `+` shadows the operation.
pub fn register_builtins(ctx: &Context) {
    arithmetic::register(ctx);
    comparison::register(ctx);
    control::register(ctx);
    list::register(ctx);
    string::register(ctx);
    predicates::register(ctx);
}

pub(crate) fn register_special(
    ctx: &Context,
    name: &str,
    f: impl Fn(&Context, &[Value]) -> Result<Value, JlError> + 'static,
) {
    ctx.define(name, Value::special(Special::new(name, f)));
}

/// Comparisons and predicates answer with 1 or nil; the language has no
/// boolean type.
pub(crate) fn truth(cond: bool) -> Value {
    if cond {
        Value::Number(1.0)
    } else {
        Value::Nil
    }
}

/// Evaluate an argument expression that must produce a number.
pub(crate) fn eval_number(ctx: &Context, op: &str, expr: &Value) -> Result<f64, JlError> {
    let v = eval(ctx, expr)?;
    v.as_number()
        .ok_or_else(|| JlError::type_error(op, "number", v.type_name()))
}

/// Evaluate an argument expression and take its integer projection.
pub(crate) fn eval_int(ctx: &Context, op: &str, expr: &Value) -> Result<i64, JlError> {
    let v = eval(ctx, expr)?;
    v.as_int()
        .ok_or_else(|| JlError::type_error(op, "number", v.type_name()))
}
