use std::rc::Rc;

use crate::{Context, Env, JlError, Lambda, Value};

pub type EvalResult = Result<Value, JlError>;

/// Restores the caller's scope when a lambda application unwinds.
struct ScopeGuard<'a> {
    ctx: &'a Context,
    saved: Option<Rc<Env>>,
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.ctx.swap_scope(saved);
        }
    }
}

/// Balances the context's recursion counter.
struct DepthGuard<'a> {
    ctx: &'a Context,
}

impl<'a> DepthGuard<'a> {
    fn enter(ctx: &'a Context) -> Result<Self, JlError> {
        ctx.enter_eval()?;
        Ok(DepthGuard { ctx })
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.ctx.leave_eval();
    }
}

/// Evaluate a value in the context's current scope.
///
/// Numbers, strings, lambdas, specials, and nil are self-evaluating.
/// A variable is a scope lookup. A list is an application: the head is
/// evaluated, a special receives the whole form unevaluated, and a lambda
/// receives its actuals evaluated left-to-right.
pub fn eval(ctx: &Context, expr: &Value) -> EvalResult {
    let _depth = DepthGuard::enter(ctx)?;
    match expr {
        Value::Nil
        | Value::Number(_)
        | Value::String(_)
        | Value::Lambda(_)
        | Value::Special(_) => Ok(expr.clone()),

        Value::Symbol(name) => ctx
            .lookup(name)
            .ok_or_else(|| JlError::Unbound(name.to_string())),

        Value::List(items) => {
            let Some(head) = items.first() else {
                return Ok(Value::Nil);
            };
            match eval(ctx, head)? {
                Value::Special(op) => (op.func)(ctx, items),
                Value::Lambda(lambda) => apply_lambda(ctx, &lambda, &items[1..]),
                other => Err(JlError::eval(format!(
                    "invalid call: {} is not callable",
                    other.type_name()
                ))),
            }
        }
    }
}

fn apply_lambda(ctx: &Context, lambda: &Lambda, args: &[Value]) -> EvalResult {
    // Actuals evaluate left-to-right in the caller's scope.
    let mut actuals = Vec::with_capacity(args.len());
    for arg in args {
        actuals.push(eval(ctx, arg)?);
    }

    // The application scope chains to the scope captured at lambda creation,
    // not to the caller's; this is what makes closures lexical.
    let scope = Rc::new(Env::with_parent(lambda.env.clone()));
    let mut actuals = actuals.into_iter();
    for param in &lambda.params {
        // Missing actuals bind to nil; extra actuals are dropped.
        scope.define(param.clone(), actuals.next().unwrap_or(Value::Nil));
    }

    let saved = ctx.swap_scope(scope);
    let _guard = ScopeGuard {
        ctx,
        saved: Some(saved),
    };

    let mut result = Value::Nil;
    for form in &lambda.body {
        result = eval(ctx, form)?;
    }
    Ok(result)
}
