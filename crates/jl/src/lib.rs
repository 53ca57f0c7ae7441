//! JL: a small embeddable s-expression language.
//!
//! The interpreter is linked into a host program, extended with
//! host-provided operations, and driven either programmatically or from
//! the `jli` REPL.
//!
//! # Quick start
//!
//! ```
//! use jl::{Interpreter, Value};
//!
//! let interp = Interpreter::new();
//! let result = interp.eval_str("(+ 1 2)").unwrap();
//! assert_eq!(result, Value::Number(3.0));
//! ```
//!
//! # Host operations
//!
//! A host operation receives the full unevaluated form (its own head
//! first) and evaluates the arguments it needs:
//!
//! ```
//! use jl::{eval, Interpreter, Value};
//!
//! let interp = Interpreter::new();
//! interp.define_special("double", |ctx, form| {
//!     let v = eval(ctx, &form[1])?;
//!     Ok(Value::Number(v.as_number().unwrap_or(0.0) * 2.0))
//! });
//! assert_eq!(interp.eval_str("(double 21)").unwrap(), Value::Number(42.0));
//! ```

use std::any::Any;
use std::rc::Rc;

pub use jl_core::{
    eval, Context, Env, EvalResult, JlError, Lambda, Span, Special, Value,
};
pub use jl_reader::{read, read_expr, read_many};

pub type Result<T> = std::result::Result<T, JlError>;

/// An interpreter instance: a context whose root scope holds every
/// built-in operation.
pub struct Interpreter {
    ctx: Context,
}

impl Interpreter {
    pub fn new() -> Self {
        let ctx = Context::new();
        jl_builtins::register_builtins(&ctx);
        Interpreter { ctx }
    }

    /// The underlying context, for hosts that drive evaluation directly.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Evaluate a parsed value.
    pub fn eval(&self, expr: &Value) -> Result<Value> {
        eval(&self.ctx, expr)
    }

    /// Parse and evaluate every expression in `src`, returning the value
    /// of the last one (`Nil` for empty input).
    pub fn eval_str(&self, src: &str) -> Result<Value> {
        let mut result = Value::Nil;
        for expr in read_many(src)? {
            result = eval(&self.ctx, &expr)?;
        }
        Ok(result)
    }

    /// Bind a value in the current scope.
    pub fn define_value(&self, name: &str, value: Value) {
        self.ctx.define(name, value);
    }

    /// Build a number, bind it under `name`, and return it.
    pub fn define_number(&self, name: &str, value: f64) -> Value {
        let v = Value::Number(value);
        self.ctx.define(name, v.clone());
        v
    }

    /// Register a host operation. The operation receives the full
    /// unevaluated form (head first) and calls [`eval`] on the arguments
    /// it needs; the returned value's ownership transfers to the caller.
    pub fn define_special(
        &self,
        name: &str,
        f: impl Fn(&Context, &[Value]) -> Result<Value> + 'static,
    ) {
        self.ctx.define(name, Value::special(Special::new(name, f)));
    }

    /// Register a host operation carrying an opaque cookie. The cookie is
    /// stored on the operation and shared with the closure.
    pub fn define_special_with_payload(
        &self,
        name: &str,
        payload: Rc<dyn Any>,
        f: impl Fn(&Context, &[Value]) -> Result<Value> + 'static,
    ) {
        self.ctx
            .define(name, Value::special(Special::with_payload(name, payload, f)));
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
