use jl_core::{check_arity, eval, Context, JlError, Lambda, Value};

use crate::register_special;

pub fn register(ctx: &Context) {
    register_special(ctx, "and", |ctx, form| {
        for expr in &form[1..] {
            if !eval(ctx, expr)?.is_truthy() {
                return Ok(Value::Nil);
            }
        }
        Ok(Value::Number(1.0))
    });

    register_special(ctx, "or", |ctx, form| {
        for expr in &form[1..] {
            if eval(ctx, expr)?.is_truthy() {
                return Ok(Value::Number(1.0));
            }
        }
        Ok(Value::Nil)
    });

    register_special(ctx, "if", |ctx, form| {
        check_arity!(form, "if", 2..=3);
        // Only the chosen branch is evaluated.
        if eval(ctx, &form[1])?.is_truthy() {
            eval(ctx, &form[2])
        } else if let Some(alternative) = form.get(3) {
            eval(ctx, alternative)
        } else {
            Ok(Value::Nil)
        }
    });

    register_special(ctx, "begin", |ctx, form| {
        ctx.enter_scope();
        let mut result = Ok(Value::Nil);
        for expr in &form[1..] {
            result = eval(ctx, expr);
            if result.is_err() {
                break;
            }
        }
        ctx.leave_scope();
        result
    });

    register_special(ctx, "define", |ctx, form| {
        check_arity!(form, "define", 2);
        let Value::Symbol(name) = &form[1] else {
            return Err(JlError::type_error(
                "define",
                "variable",
                form[1].type_name(),
            ));
        };
        let value = eval(ctx, &form[2])?;
        ctx.define(name.clone(), value.clone());
        Ok(value)
    });

    register_special(ctx, "lambda", |ctx, form| {
        check_arity!(form, "lambda", 2..);
        let Value::List(params) = &form[1] else {
            return Err(JlError::type_error(
                "lambda",
                "parameter list",
                form[1].type_name(),
            ));
        };
        let params = params
            .iter()
            .map(|p| match p {
                Value::Symbol(name) => Ok(name.clone()),
                other => Err(JlError::type_error("lambda", "variable", other.type_name())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::lambda(Lambda {
            params,
            body: form[2..].to_vec(),
            env: ctx.scope(),
        }))
    });
}
