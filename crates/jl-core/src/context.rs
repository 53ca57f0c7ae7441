use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::{Env, JlError, Value};

/// Default evaluation recursion limit.
pub const DEFAULT_DEPTH_LIMIT: usize = 512;

/// A JL interpreter instance: the current scope plus evaluation state.
///
/// A context is a sequential object; all operations on it are serialized by
/// the caller and it must stay on one thread. Two contexts in the same
/// process are fully independent.
pub struct Context {
    scope: RefCell<Rc<Env>>,
    depth: Cell<usize>,
    depth_limit: Cell<usize>,
}

impl Context {
    /// Create a context with an empty root scope.
    pub fn new() -> Self {
        Context {
            scope: RefCell::new(Rc::new(Env::new())),
            depth: Cell::new(0),
            depth_limit: Cell::new(DEFAULT_DEPTH_LIMIT),
        }
    }

    /// A handle to the current scope.
    pub fn scope(&self) -> Rc<Env> {
        self.scope.borrow().clone()
    }

    /// Push a fresh scope whose parent is the current scope.
    pub fn enter_scope(&self) {
        let child = Env::with_parent(self.scope());
        *self.scope.borrow_mut() = Rc::new(child);
    }

    /// Pop the current scope, making its parent current. The popped scope
    /// stays alive while a lambda captures it.
    pub fn leave_scope(&self) {
        let parent = self.scope().parent().cloned();
        if let Some(parent) = parent {
            *self.scope.borrow_mut() = parent;
        }
    }

    /// Replace the current scope, returning the previous one. Lambda
    /// application uses this: the new scope chains to the lambda's captured
    /// scope rather than to the caller's.
    pub fn swap_scope(&self, scope: Rc<Env>) -> Rc<Env> {
        self.scope.replace(scope)
    }

    /// Bind a name in the current scope.
    pub fn define(&self, name: impl Into<Rc<str>>, value: Value) {
        self.scope.borrow().define(name, value);
    }

    /// Resolve a name against the current scope chain.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.scope.borrow().get(name)
    }

    /// Adjust the recursion limit. Evaluation that nests deeper than this
    /// fails instead of exhausting the native stack.
    pub fn set_depth_limit(&self, limit: usize) {
        self.depth_limit.set(limit);
    }

    pub(crate) fn enter_eval(&self) -> Result<(), JlError> {
        let depth = self.depth.get() + 1;
        if depth > self.depth_limit.get() {
            return Err(JlError::eval("maximum recursion depth exceeded"));
        }
        self.depth.set(depth);
        Ok(())
    }

    pub(crate) fn leave_eval(&self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
