use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::JlError;
use crate::Context;

/// A host operation callable from JL.
///
/// The function receives the full unevaluated form: the head the operation
/// was invoked under at index 0 and the argument expressions after it. The
/// operation evaluates the arguments it needs, which is how `if`, `and`,
/// `or`, `define`, and `lambda` get their short-circuit and quoting
/// behavior.
pub type SpecialFnInner = dyn Fn(&Context, &[Value]) -> Result<Value, JlError>;

pub struct Special {
    pub name: String,
    pub func: Box<SpecialFnInner>,
    /// Opaque host cookie, available to the operation by capture.
    pub payload: Option<Rc<dyn Any>>,
}

impl Special {
    pub fn new(
        name: impl Into<String>,
        f: impl Fn(&Context, &[Value]) -> Result<Value, JlError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Box::new(f),
            payload: None,
        }
    }

    pub fn with_payload(
        name: impl Into<String>,
        payload: Rc<dyn Any>,
        f: impl Fn(&Context, &[Value]) -> Result<Value, JlError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Box::new(f),
            payload: Some(payload),
        }
    }
}

impl fmt::Debug for Special {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<special {}>", self.name)
    }
}

/// A user-defined lambda: parameter names, body forms, and the scope
/// captured when the `lambda` form was evaluated.
#[derive(Debug, Clone)]
pub struct Lambda {
    pub params: Vec<Rc<str>>,
    pub body: Vec<Value>,
    pub env: Rc<Env>,
}

/// The JL value universe.
///
/// `Nil` is the "none" value: it is the empty result, false, and the
/// surface an error leaves behind. There is no boolean type; truth is
/// `Number(1)` by convention and falsehood is `Nil`.
#[derive(Clone)]
pub enum Value {
    Nil,
    Number(f64),
    String(Rc<String>),
    Symbol(Rc<str>),
    List(Rc<Vec<Value>>),
    Lambda(Rc<Lambda>),
    Special(Rc<Special>),
}

impl Value {
    pub fn nil() -> Value {
        Value::Nil
    }

    pub fn number(n: f64) -> Value {
        Value::Number(n)
    }

    pub fn string(s: impl Into<String>) -> Value {
        Value::String(Rc::new(s.into()))
    }

    pub fn symbol(s: impl Into<Rc<str>>) -> Value {
        Value::Symbol(s.into())
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(items))
    }

    pub fn lambda(l: Lambda) -> Value {
        Value::Lambda(Rc::new(l))
    }

    pub fn special(s: Special) -> Value {
        Value::Special(Rc::new(s))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "variable",
            Value::List(_) => "list",
            Value::Lambda(_) => "lambda",
            Value::Special(_) => "special",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Nil, zero, and the empty list are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Number(n) => *n != 0.0,
            Value::List(items) => !items.is_empty(),
            _ => true,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The integer projection of a number, used by the bitwise and modulo
    /// operations.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

// ── PartialEq ─────────────────────────────────────────────────────

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Lambda(a), Value::Lambda(b)) => Rc::ptr_eq(a, b),
            (Value::Special(a), Value::Special(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// ── Display ───────────────────────────────────────────────────────

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    // Integral values print without a fractional part so the reader can
    // round-trip them. 2^53 bounds exact integer representation.
    if n == n.trunc() && n.abs() < 9_007_199_254_740_992.0 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "\"")?;
    for c in s.chars() {
        match c {
            '\\' => write!(f, "\\\\")?,
            '"' => write!(f, "\\\"")?,
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            _ => write!(f, "{c}")?,
        }
    }
    write!(f, "\"")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Number(n) => write_number(f, *n),
            Value::String(s) => write_quoted(f, s),
            Value::Symbol(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Value::Lambda(l) => {
                write!(f, "(lambda (")?;
                for (i, param) in l.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ") ...)")
            }
            Value::Special(s) => write!(f, "<special {}>", s.name),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::String(s) => write!(f, "String({:?})", &**s),
            Value::Symbol(s) => write!(f, "Symbol({s})"),
            Value::List(items) => write!(f, "List({items:?})"),
            Value::Lambda(l) => write!(f, "Lambda({} params)", l.params.len()),
            Value::Special(s) => write!(f, "Special({})", s.name),
        }
    }
}

// ── Env ───────────────────────────────────────────────────────────

/// A lexical scope: insertion-ordered bindings plus a parent link.
///
/// Lookup scans the newest bindings first, so a redefinition in the same
/// scope shadows the older entry until the scope is released. Scopes form
/// a tree; a scope stays alive as long as the context or a lambda that
/// captured it holds a handle.
#[derive(Debug)]
pub struct Env {
    bindings: RefCell<Vec<(Rc<str>, Value)>>,
    parent: Option<Rc<Env>>,
}

impl Env {
    pub fn new() -> Self {
        Env {
            bindings: RefCell::new(Vec::new()),
            parent: None,
        }
    }

    pub fn with_parent(parent: Rc<Env>) -> Self {
        Env {
            bindings: RefCell::new(Vec::new()),
            parent: Some(parent),
        }
    }

    pub fn parent(&self) -> Option<&Rc<Env>> {
        self.parent.as_ref()
    }

    /// Append a binding. Redefining a name adds a shadowing entry rather
    /// than overwriting the old one.
    pub fn define(&self, name: impl Into<Rc<str>>, value: Value) {
        self.bindings.borrow_mut().push((name.into(), value));
    }

    /// Resolve a name against this scope, newest binding first, then the
    /// parent chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some((_, value)) = self
            .bindings
            .borrow()
            .iter()
            .rev()
            .find(|(bound, _)| &**bound == name)
        {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|p| p.get(name))
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────
