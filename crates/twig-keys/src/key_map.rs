//! Registry of keys and batch synchronization.
//!
//! Batch operations visit keys in name order and stop at the first error.
//! Keys processed before the failure keep their effects.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};
use twig_core::{Dynamic, Environment, TypeDesc};

use crate::error::KeyError;
use crate::key::Key;
use crate::mode::Mode;

/// Keys owned by a single registry, unique by name.
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    keys: FxHashMap<String, Key>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a key with an explicit type descriptor.
    pub fn create(
        &mut self,
        name: &str,
        type_desc: impl Into<TypeDesc>,
        default: impl Into<Dynamic>,
        mode: Mode,
        desc: &str,
    ) -> Result<&mut Key, KeyError> {
        if self.keys.contains_key(name) {
            return Err(KeyError::Exists(name.to_string()));
        }
        let key = Key::new(name, type_desc, default, mode, desc)?;
        Ok(self.keys.entry(name.to_string()).or_insert(key))
    }

    /// Create and register a key typed after its default.
    pub fn create_auto(
        &mut self,
        name: &str,
        default: impl Into<Dynamic>,
        mode: Mode,
        desc: &str,
    ) -> Result<&mut Key, KeyError> {
        if self.keys.contains_key(name) {
            return Err(KeyError::Exists(name.to_string()));
        }
        let key = Key::new_auto(name, default, mode, desc)?;
        Ok(self.keys.entry(name.to_string()).or_insert(key))
    }

    pub fn get(&self, name: &str) -> Option<&Key> {
        self.keys.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Key> {
        self.keys.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Key names in sorted order.
    pub fn key_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.keys.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Keys in name order.
    pub fn keys(&self) -> Vec<&Key> {
        let mut keys: Vec<&Key> = self.keys.values().collect();
        keys.sort_unstable_by(|a, b| a.name().cmp(b.name()));
        keys
    }

    fn keys_mut(&mut self) -> Vec<&mut Key> {
        let mut keys: Vec<&mut Key> = self.keys.values_mut().collect();
        keys.sort_unstable_by(|a, b| a.name().cmp(b.name()));
        keys
    }

    /// Acquire every key.
    ///
    /// Each failure is passed to `handler`. Returning `Ok(())` suppresses the
    /// error and continues; returning an error aborts the batch with it.
    /// See [`handlers`] for common choices.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn acquire<E, H>(&mut self, env: &E, mut handler: H) -> Result<(), KeyError>
    where
        E: Environment + ?Sized,
        H: FnMut(&Key, KeyError) -> Result<(), KeyError>,
    {
        for key in self.keys_mut() {
            if let Err(err) = key.acquire(env) {
                if let Err(err) = handler(key, err) {
                    debug!(key = %key.name(), error = %err, "acquire aborted");
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Apply every key; existing bindings are kept.
    pub fn apply<E: Environment + ?Sized>(&self, env: &mut E) -> Result<(), KeyError> {
        self.keys().into_iter().try_for_each(|key| key.apply(env))
    }

    /// Apply every key, binding nil for keys that may not write.
    pub fn apply_or_nil<E: Environment + ?Sized>(&self, env: &mut E) -> Result<(), KeyError> {
        self.keys()
            .into_iter()
            .try_for_each(|key| key.apply_or_nil(env))
    }

    /// Clobber every key; existing bindings are replaced.
    pub fn clobber<E: Environment + ?Sized>(&self, env: &mut E) -> Result<(), KeyError> {
        self.keys().into_iter().try_for_each(|key| key.clobber(env))
    }
}

/// Error handlers for [`KeyMap::acquire`].
pub mod handlers {
    use super::*;

    /// Abort on the first error.
    pub fn quit(_key: &Key, err: KeyError) -> Result<(), KeyError> {
        Err(err)
    }

    /// Log and continue.
    pub fn ignore(key: &Key, err: KeyError) -> Result<(), KeyError> {
        warn!(key = %key.name(), error = %err, "ignoring acquire error");
        Ok(())
    }

    /// Record every error and continue.
    pub fn collect(
        errors: &mut Vec<KeyError>,
    ) -> impl FnMut(&Key, KeyError) -> Result<(), KeyError> + '_ {
        move |_key: &Key, err: KeyError| {
            errors.push(err);
            Ok(())
        }
    }
}
