use std::fmt;

/// Check the arity of a special operation's form, returning `JlError::Arity`
/// on mismatch. `$form` is the full unevaluated form, head included, so the
/// argument count is `len() - 1`.
///
/// # Forms
///
/// ```ignore
/// check_arity!(form, "head", 1);        // exactly 1
/// check_arity!(form, "substr", 1..=3);  // 1 to 3 inclusive
/// check_arity!(form, "-", 1..);         // 1 or more
/// ```
#[macro_export]
macro_rules! check_arity {
    ($form:expr, $name:expr, $exact:literal) => {
        if $form.len() - 1 != $exact {
            return Err($crate::JlError::arity(
                $name,
                stringify!($exact),
                $form.len() - 1,
            ));
        }
    };
    ($form:expr, $name:expr, $lo:literal ..= $hi:literal) => {
        if $form.len() - 1 < $lo || $form.len() - 1 > $hi {
            return Err($crate::JlError::arity(
                $name,
                concat!(stringify!($lo), "-", stringify!($hi)),
                $form.len() - 1,
            ));
        }
    };
    ($form:expr, $name:expr, $lo:literal ..) => {
        if $form.len() - 1 < $lo {
            return Err($crate::JlError::arity(
                $name,
                concat!(stringify!($lo), "+"),
                $form.len() - 1,
            ));
        }
    };
}

/// A source position, tracked by the reader for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub fn point(line: usize, col: usize) -> Self {
        Span { line, col }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JlError {
    #[error("parse error at {span}: {message}")]
    Parse { message: String, span: Span },

    #[error("undefined: {0}")]
    Unbound(String),

    #[error("invalid argument to {op}: expected {expected}, got {got}")]
    Type {
        op: String,
        expected: String,
        got: String,
    },

    #[error("{op} expects {expected} arguments, got {got}")]
    Arity {
        op: String,
        expected: String,
        got: usize,
    },

    #[error("eval error: {0}")]
    Eval(String),
}

impl JlError {
    pub fn parse(message: impl Into<String>, span: Span) -> Self {
        JlError::Parse {
            message: message.into(),
            span,
        }
    }

    pub fn eval(message: impl Into<String>) -> Self {
        JlError::Eval(message.into())
    }

    pub fn type_error(
        op: impl Into<String>,
        expected: impl Into<String>,
        got: impl Into<String>,
    ) -> Self {
        JlError::Type {
            op: op.into(),
            expected: expected.into(),
            got: got.into(),
        }
    }

    pub fn arity(op: impl Into<String>, expected: impl Into<String>, got: usize) -> Self {
        JlError::Arity {
            op: op.into(),
            expected: expected.into(),
            got,
        }
    }
}
