//! Binding environment interface.
//!
//! The script runtime exposes its variables through [`Environment`]. Keys
//! pull from and push to it; the function adapter registers into it. The core
//! never holds on to an environment between calls: it is passed explicitly to
//! every operation that needs one.

use rustc_hash::FxHashMap;

use crate::error::EnvError;
use crate::Dynamic;

/// A mutable namespace of script variables.
pub trait Environment {
    /// Whether `name` is bound to a non-nil value.
    fn has(&self, name: &str) -> bool;

    /// Read a binding.
    fn get(&self, name: &str) -> Result<Dynamic, EnvError>;

    /// Bind `name`, creating the binding or replacing an existing one.
    fn set(&mut self, name: &str, value: Dynamic) -> Result<(), EnvError>;

    /// Create a new binding; fails if `name` is already bound.
    fn create(&mut self, name: &str, value: Dynamic) -> Result<(), EnvError>;
}

/// Plain map-backed variable namespace.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    vars: FxHashMap<String, Dynamic>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is bound at all, including to nil.
    pub fn is_bound(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Bound names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.vars.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn remove(&mut self, name: &str) -> Option<Dynamic> {
        self.vars.remove(name)
    }
}

impl Environment for Bindings {
    fn has(&self, name: &str) -> bool {
        self.vars.get(name).is_some_and(|v| !v.is_void())
    }

    fn get(&self, name: &str) -> Result<Dynamic, EnvError> {
        self.vars
            .get(name)
            .cloned()
            .ok_or_else(|| EnvError::Undefined(name.to_string()))
    }

    fn set(&mut self, name: &str, value: Dynamic) -> Result<(), EnvError> {
        self.vars.insert(name.to_string(), value);
        Ok(())
    }

    fn create(&mut self, name: &str, value: Dynamic) -> Result<(), EnvError> {
        if self.vars.contains_key(name) {
            return Err(EnvError::AlreadyDefined(name.to_string()));
        }
        self.vars.insert(name.to_string(), value);
        Ok(())
    }
}
