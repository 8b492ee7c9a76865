//! Named collections of host functions.

use rustc_hash::FxHashMap;
use tracing::debug;
use twig_core::{Dynamic, EnvError, Environment, NativeFn};

use crate::adapter::BoundFn;
use crate::format::format;
use crate::params::IntoNativeFn;

/// An environment that can hold bound host functions.
pub trait FunctionScope: Environment {
    /// Register `f` under `name`; fails if the name is already bound.
    fn create_fn(&mut self, name: &str, f: BoundFn) -> Result<(), EnvError>;
}

/// Host functions (and plain values, for documentation) keyed by name.
#[derive(Debug, Clone, Default)]
pub struct FuncMap {
    entries: FxHashMap<String, Dynamic>,
}

impl FuncMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, name: impl Into<String>, value: Dynamic) -> Option<Dynamic> {
        self.entries.insert(name.into(), value)
    }

    /// Add or replace a typed host function.
    pub fn insert_fn<Args, Ret>(
        &mut self,
        name: impl Into<String>,
        f: impl IntoNativeFn<Args, Ret>,
    ) -> Option<Dynamic> {
        self.insert(name, Dynamic::Function(f.into_native_fn()))
    }

    pub fn get(&self, name: &str) -> Option<&Dynamic> {
        self.entries.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Dynamic> {
        self.entries.remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every entry of `other` into this map, overwriting on collision.
    pub fn import(&mut self, other: &FuncMap) {
        for (name, value) in &other.entries {
            self.entries.insert(name.clone(), value.clone());
        }
    }

    /// Entry names in sorted order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Canonical rendering of every entry, sorted by name.
    pub fn format_list(&self) -> Vec<String> {
        self.keys()
            .into_iter()
            .map(|name| format(&name, &self.entries[&name]))
            .collect()
    }

    /// Bind every non-nil entry into `scope`.
    ///
    /// Stops at the first registration failure; entries registered before it
    /// stay registered.
    ///
    /// # Panics
    ///
    /// Panics if a non-nil entry is not a function.
    pub fn export<S: FunctionScope + ?Sized>(&self, scope: &mut S) -> Result<(), EnvError> {
        for name in self.keys() {
            let value = &self.entries[&name];
            if value.is_void() {
                continue;
            }
            scope.create_fn(&name, BoundFn::wrap_value(&name, value))?;
        }
        debug!(count = self.entries.len(), "exported function map");
        Ok(())
    }
}

impl FromIterator<(String, NativeFn)> for FuncMap {
    fn from_iter<I: IntoIterator<Item = (String, NativeFn)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, f)| (name, Dynamic::Function(f)))
                .collect(),
        }
    }
}
