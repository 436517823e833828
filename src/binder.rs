//! The replacement seam: swapping a named callable for a spy handler and
//! restoring it on demand.
//!
//! The recorder itself never reaches into shared state. Everything about
//! "temporarily replace one named capability of a host object" lives behind
//! the [`Binder`] trait: attach a handler, and later detach to restore
//! whatever was there before. [`CallableTable`] is the provided host object:
//! a registry of named callables standing in for a host environment's
//! ambient functions (a `console.log`, a stdout writer), which keeps the one
//! piece of mutable shared state in the system behind a narrow, testable
//! interface.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::record::ReturnValue;

/// A named callable slot's implementation.
///
/// Callables take a dynamically-typed argument list and produce a
/// [`ReturnValue`]; a spy's capture handler has exactly this shape.
pub type Callable = Box<dyn FnMut(Vec<Value>) -> ReturnValue>;

/// Errors from binder operations. The recorder core itself is total; these
/// are the only failures the crate surfaces.
#[derive(Debug, Error)]
pub enum BindError {
    /// The target has no callable registered under this name.
    #[error("no callable named '{0}' is registered")]
    UnknownCallable(String),

    /// Detach was requested for a name that has nothing attached.
    #[error("callable '{0}' has no replacement to restore")]
    NotAttached(String),
}

/// Replaces a named callable on a host object and restores it on demand.
///
/// Implementors keep the displaced callable so [`Binder::detach`] can put it
/// back. The spy core only depends on this trait; how the replacement is
/// performed is the host object's concern.
pub trait Binder {
    /// Replace the callable under `name` with `handler`, keeping the
    /// original for later restoration.
    ///
    /// # Errors
    ///
    /// [`BindError::UnknownCallable`] when no callable is registered under
    /// `name`.
    fn attach(&mut self, name: &str, handler: Callable) -> Result<(), BindError>;

    /// Restore the callable displaced by the most recent attach of `name`.
    ///
    /// # Errors
    ///
    /// [`BindError::NotAttached`] when nothing was attached under `name`.
    fn detach(&mut self, name: &str) -> Result<(), BindError>;
}

/// A registry of named callables that can have entries spied on.
///
/// # Example
///
/// ```rust
/// use tattle::{args, Binder, CallableTable, ReturnValue, Spy};
///
/// let mut table = CallableTable::new();
/// table.register("console.log", Box::new(|_| ReturnValue::None));
///
/// let spy = Spy::new();
/// spy.spy_on(&mut table, "console.log").unwrap();
///
/// table.invoke("console.log", args!["hello"]).unwrap();
/// assert!(spy.have_been_called_with(args!["hello"]));
///
/// table.detach("console.log").unwrap();
/// ```
#[derive(Default)]
pub struct CallableTable {
    entries: HashMap<String, Callable>,
    saved: HashMap<String, Callable>,
}

impl CallableTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or overwrite) the callable under `name`.
    pub fn register(&mut self, name: impl Into<String>, callable: Callable) {
        self.entries.insert(name.into(), callable);
    }

    /// True when a callable is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Invoke the callable under `name` with `args`.
    ///
    /// # Errors
    ///
    /// [`BindError::UnknownCallable`] when no callable is registered under
    /// `name`.
    pub fn invoke(&mut self, name: &str, args: Vec<Value>) -> Result<ReturnValue, BindError> {
        match self.entries.get_mut(name) {
            Some(callable) => Ok(callable(args)),
            None => Err(BindError::UnknownCallable(name.to_string())),
        }
    }
}

impl Binder for CallableTable {
    fn attach(&mut self, name: &str, handler: Callable) -> Result<(), BindError> {
        if !self.entries.contains_key(name) {
            return Err(BindError::UnknownCallable(name.to_string()));
        }
        if let Some(original) = self.entries.insert(name.to_string(), handler) {
            self.saved.insert(name.to_string(), original);
        }
        Ok(())
    }

    fn detach(&mut self, name: &str) -> Result<(), BindError> {
        match self.saved.remove(name) {
            Some(original) => {
                self.entries.insert(name.to_string(), original);
                Ok(())
            }
            None => Err(BindError::NotAttached(name.to_string())),
        }
    }
}

impl fmt::Debug for CallableTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        let mut attached: Vec<&str> = self.saved.keys().map(String::as_str).collect();
        attached.sort_unstable();
        f.debug_struct("CallableTable")
            .field("entries", &names)
            .field("attached", &attached)
            .finish()
    }
}
