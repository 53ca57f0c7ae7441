pub mod context;
pub mod error;
pub mod eval;
pub mod value;

pub use context::{Context, DEFAULT_DEPTH_LIMIT};
pub use error::{JlError, Span};
pub use eval::{eval, EvalResult};
pub use value::{Env, Lambda, Special, SpecialFnInner, Value};
