use jl_core::{check_arity, eval, Context, JlError, Value};

use crate::register_special;

pub fn register(ctx: &Context) {
    register_special(ctx, "list", |ctx, form| {
        // (list) is nil, not an empty list.
        if form.len() == 1 {
            return Ok(Value::Nil);
        }
        let mut items = Vec::with_capacity(form.len() - 1);
        for expr in &form[1..] {
            items.push(eval(ctx, expr)?);
        }
        Ok(Value::list(items))
    });

    register_special(ctx, "cons", |ctx, form| {
        check_arity!(form, "cons", 2);
        let head = eval(ctx, &form[1])?;
        let tail = eval(ctx, &form[2])?;
        match tail {
            Value::List(items) => {
                let mut extended = Vec::with_capacity(items.len() + 1);
                extended.push(head);
                extended.extend(items.iter().cloned());
                Ok(Value::list(extended))
            }
            Value::Nil => Ok(Value::list(vec![head])),
            other => Err(JlError::type_error("cons", "list or nil", other.type_name())),
        }
    });

    register_special(ctx, "head", |ctx, form| {
        check_arity!(form, "head", 1);
        let v = eval(ctx, &form[1])?;
        let Value::List(items) = &v else {
            return Err(JlError::type_error("head", "list", v.type_name()));
        };
        Ok(items.first().cloned().unwrap_or(Value::Nil))
    });

    register_special(ctx, "rest", |ctx, form| {
        check_arity!(form, "rest", 1);
        let v = eval(ctx, &form[1])?;
        let Value::List(items) = &v else {
            return Err(JlError::type_error("rest", "list", v.type_name()));
        };
        // The rest of a singleton or empty list is nil, not an empty list.
        if items.len() < 2 {
            return Ok(Value::Nil);
        }
        Ok(Value::list(items[1..].to_vec()))
    });
}
