use jl_core::{check_arity, eval, Context, JlError, Value};

use crate::{register_special, truth};

fn type_predicate(
    ctx: &Context,
    op: &str,
    form: &[Value],
    pred: impl Fn(&Value) -> bool,
) -> Result<Value, JlError> {
    check_arity!(form, op, 1);
    let v = eval(ctx, &form[1])?;
    Ok(truth(pred(&v)))
}

pub fn register(ctx: &Context) {
    register_special(ctx, "number?", |ctx, form| {
        type_predicate(ctx, "number?", form, Value::is_number)
    });

    register_special(ctx, "string?", |ctx, form| {
        type_predicate(ctx, "string?", form, Value::is_string)
    });

    register_special(ctx, "list?", |ctx, form| {
        type_predicate(ctx, "list?", form, Value::is_list)
    });

    register_special(ctx, "null?", |ctx, form| {
        type_predicate(ctx, "null?", form, Value::is_nil)
    });
}
