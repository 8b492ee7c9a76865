//! A single typed configuration key.

use tracing::trace;
use twig_core::{Dynamic, Environment, FromDynamic, TypeDesc, TypeError, check};

use crate::error::KeyError;
use crate::mode::Mode;

/// A named, typed value that synchronizes with an [`Environment`].
///
/// The stored value is either nil or conforms to the key's type descriptor.
/// Every write goes through [`set`](Key::set), which validates and coerces.
#[derive(Debug, Clone)]
pub struct Key {
    name: String,
    desc: String,
    mode: Mode,
    type_desc: TypeDesc,
    value: Dynamic,
}

impl Key {
    /// Create a key with an explicit type descriptor.
    ///
    /// The default is checked against `type_desc` like any other value; a
    /// nil default leaves the key empty.
    pub fn new(
        name: impl Into<String>,
        type_desc: impl Into<TypeDesc>,
        default: impl Into<Dynamic>,
        mode: Mode,
        desc: impl Into<String>,
    ) -> Result<Self, KeyError> {
        let type_desc = type_desc.into();
        if !type_desc.is_valid() {
            return Err(TypeError::NotATypeDescriptor.into());
        }

        let mut key = Self {
            name: name.into(),
            desc: desc.into(),
            mode,
            type_desc,
            value: Dynamic::Void,
        };
        key.set(default)?;
        Ok(key)
    }

    /// Create a key whose type is the exact type of `default`.
    pub fn new_auto(
        name: impl Into<String>,
        default: impl Into<Dynamic>,
        mode: Mode,
        desc: impl Into<String>,
    ) -> Result<Self, KeyError> {
        let default = default.into();
        if default.is_void() {
            return Err(KeyError::MissingDefault);
        }
        Ok(Self {
            name: name.into(),
            desc: desc.into(),
            mode,
            type_desc: TypeDesc::Exact(default.type_tag()),
            value: default,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn type_desc(&self) -> &TypeDesc {
        &self.type_desc
    }

    /// Display name of the key's type.
    pub fn type_name(&self) -> &'static str {
        self.type_desc.name()
    }

    /// Whether the key holds no value.
    pub fn is_empty(&self) -> bool {
        self.value.is_void()
    }

    /// Current value, nil if empty.
    pub fn get(&self) -> &Dynamic {
        &self.value
    }

    /// Current value, or `fallback` if empty.
    pub fn get_or(&self, fallback: impl Into<Dynamic>) -> Dynamic {
        if self.value.is_void() {
            fallback.into()
        } else {
            self.value.clone()
        }
    }

    /// Current value as a Rust type; `None` if empty.
    pub fn get_as<T: FromDynamic>(&self) -> Result<Option<T>, KeyError> {
        if self.value.is_void() {
            return Ok(None);
        }
        Ok(Some(T::from_dynamic(self.value.clone())?))
    }

    /// Store a value.
    ///
    /// Nil clears the key without validation. Anything else must pass the
    /// key's type descriptor; on failure the key is left unchanged.
    pub fn set(&mut self, value: impl Into<Dynamic>) -> Result<(), KeyError> {
        let value = value.into();
        if value.is_void() {
            self.value = Dynamic::Void;
            return Ok(());
        }
        self.value = check(&self.name, &self.type_desc, value)?;
        Ok(())
    }

    /// Pull the environment binding into the key.
    ///
    /// Only keys with `READ` are updated. A missing binding is an error only
    /// for `REQUIRED` keys.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn acquire<E: Environment + ?Sized>(&mut self, env: &E) -> Result<(), KeyError> {
        if !self.mode.can_read() {
            return Ok(());
        }
        if !env.has(&self.name) {
            if self.mode.is_required() {
                return Err(KeyError::Required(self.name.clone()));
            }
            trace!(key = %self.name, "not bound, keeping current value");
            return Ok(());
        }

        let value = env.get(&self.name)?;
        self.set(value)?;
        trace!(key = %self.name, "acquired");
        Ok(())
    }

    /// Push the key's value into the environment unless it is already bound.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn apply<E: Environment + ?Sized>(&self, env: &mut E) -> Result<(), KeyError> {
        if !self.mode.can_write() {
            return Ok(());
        }
        if env.has(&self.name) {
            trace!(key = %self.name, "already bound, not applying");
            return Ok(());
        }
        env.set(&self.name, self.value.clone())?;
        trace!(key = %self.name, "applied");
        Ok(())
    }

    /// Like [`apply`](Self::apply), but keys without `WRITE` bind nil.
    ///
    /// Reserved keys are never touched, and neither are required keys
    /// without `WRITE`: a reset must not erase a binding the script is
    /// obliged to provide.
    pub fn apply_or_nil<E: Environment + ?Sized>(&self, env: &mut E) -> Result<(), KeyError> {
        if self.mode.is_reserved() {
            return Ok(());
        }
        if !self.mode.can_write() {
            if self.mode.is_required() {
                return Ok(());
            }
            env.set(&self.name, Dynamic::Void)?;
            trace!(key = %self.name, "reset to nil");
            return Ok(());
        }
        self.apply(env)
    }

    /// Push the key's value into the environment, replacing any binding.
    pub fn clobber<E: Environment + ?Sized>(&self, env: &mut E) -> Result<(), KeyError> {
        if !self.mode.can_write() {
            return Ok(());
        }
        env.set(&self.name, self.value.clone())?;
        trace!(key = %self.name, "clobbered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twig_core::{Bindings, Typer, interfaces, tags, typers};

    fn retries(mode: Mode) -> Key {
        Key::new("retries", typers::INTEGER, 3i64, mode, "connection attempts").unwrap()
    }

    #[test]
    fn default_is_coerced() {
        let key = Key::new("ratio", typers::FLOAT, 0.5f32, Mode::READ, "").unwrap();
        assert_eq!(key.get(), &Dynamic::Float64(0.5));
        assert_eq!(key.type_name(), "float");
    }

    #[test]
    fn bad_default_fails() {
        let err = Key::new("retries", typers::INTEGER, "three", Mode::READ, "").unwrap_err();
        assert_eq!(
            err.to_string(),
            "retries: value (type string) is not of type integer"
        );
    }

    #[test]
    fn invalid_descriptor() {
        let err = Key::new("x", tags::NIL, (), Mode::READ, "").unwrap_err();
        assert_eq!(err, KeyError::Type(TypeError::NotATypeDescriptor));
    }

    #[test]
    fn nil_default_leaves_key_empty() {
        let key = Key::new("host", tags::STRING, (), Mode::READ, "").unwrap();
        assert!(key.is_empty());
        assert_eq!(key.get_or("localhost"), Dynamic::from("localhost"));
    }

    #[test]
    fn auto_infers_exact_type() {
        let mut key = Key::new_auto("name", "twig", Mode::READ_WRITE, "").unwrap();
        assert_eq!(key.type_name(), "string");
        assert!(key.set(1i64).is_err());
        assert_eq!(key.get(), &Dynamic::from("twig"));
    }

    #[test]
    fn auto_requires_default() {
        assert_eq!(
            Key::new_auto("name", (), Mode::READ, "").unwrap_err(),
            KeyError::MissingDefault
        );
    }

    #[test]
    fn failed_set_leaves_value() {
        let mut key = retries(Mode::READ);
        assert!(key.set("five").is_err());
        assert_eq!(key.get(), &Dynamic::Int(3));
    }

    #[test]
    fn set_nil_always_clears() {
        let mut key = retries(Mode::RESERVED);
        key.set(()).unwrap();
        assert!(key.is_empty());
        assert_eq!(key.get(), &Dynamic::Void);
    }

    #[test]
    fn get_as_extracts() {
        let key = retries(Mode::READ);
        assert_eq!(key.get_as::<i64>().unwrap(), Some(3));
        assert!(key.get_as::<String>().is_err());

        let empty = Key::new("x", typers::INTEGER, (), Mode::READ, "").unwrap();
        assert_eq!(empty.get_as::<i64>().unwrap(), None);
    }

    #[test]
    fn acquire_reads_and_coerces() {
        let mut env = Bindings::new();
        env.set("retries", Dynamic::Int16(9)).unwrap();
        let mut key = retries(Mode::READ);
        key.acquire(&env).unwrap();
        assert_eq!(key.get(), &Dynamic::Int(9));
    }

    #[test]
    fn acquire_without_read_is_noop() {
        let mut env = Bindings::new();
        env.set("retries", Dynamic::Int(9)).unwrap();
        let mut key = retries(Mode::WRITE);
        key.acquire(&env).unwrap();
        assert_eq!(key.get(), &Dynamic::Int(3));
    }

    #[test]
    fn acquire_required_missing() {
        let env = Bindings::new();
        let mut key = retries(Mode::READ | Mode::REQUIRED);
        assert_eq!(
            key.acquire(&env).unwrap_err(),
            KeyError::Required("retries".into())
        );

        let mut optional = retries(Mode::READ);
        optional.acquire(&env).unwrap();
        assert_eq!(optional.get(), &Dynamic::Int(3));
    }

    #[test]
    fn acquire_nil_binding_counts_as_missing() {
        let mut env = Bindings::new();
        env.set("retries", Dynamic::Void).unwrap();
        let mut key = retries(Mode::READ | Mode::REQUIRED);
        assert!(matches!(key.acquire(&env), Err(KeyError::Required(_))));
    }

    #[test]
    fn acquire_type_error_names_key() {
        let mut env = Bindings::new();
        env.set("retries", Dynamic::from("many")).unwrap();
        let mut key = retries(Mode::READ);
        let err = key.acquire(&env).unwrap_err();
        assert_eq!(err.key_name(), Some("retries"));
        assert_eq!(key.get(), &Dynamic::Int(3));
    }

    #[test]
    fn apply_never_overwrites() {
        let mut env = Bindings::new();
        let key = retries(Mode::WRITE);
        key.apply(&mut env).unwrap();
        assert_eq!(env.get("retries").unwrap(), Dynamic::Int(3));

        env.set("retries", Dynamic::Int(7)).unwrap();
        key.apply(&mut env).unwrap();
        assert_eq!(env.get("retries").unwrap(), Dynamic::Int(7));
    }

    #[test]
    fn apply_without_write_is_noop() {
        let mut env = Bindings::new();
        retries(Mode::READ).apply(&mut env).unwrap();
        assert!(!env.is_bound("retries"));
    }

    #[test]
    fn clobber_overwrites() {
        let mut env = Bindings::new();
        env.set("retries", Dynamic::Int(7)).unwrap();
        retries(Mode::WRITE).clobber(&mut env).unwrap();
        assert_eq!(env.get("retries").unwrap(), Dynamic::Int(3));

        retries(Mode::READ).clobber(&mut env).unwrap();
        assert_eq!(env.get("retries").unwrap(), Dynamic::Int(3));
    }

    #[test]
    fn apply_or_nil_resets_read_only() {
        let mut env = Bindings::new();
        env.set("retries", Dynamic::Int(7)).unwrap();
        retries(Mode::READ).apply_or_nil(&mut env).unwrap();
        assert!(env.is_bound("retries"));
        assert_eq!(env.get("retries").unwrap(), Dynamic::Void);
    }

    #[test]
    fn apply_or_nil_leaves_required_and_reserved() {
        let mut env = Bindings::new();
        env.set("retries", Dynamic::Int(7)).unwrap();
        retries(Mode::READ | Mode::REQUIRED)
            .apply_or_nil(&mut env)
            .unwrap();
        retries(Mode::RESERVED).apply_or_nil(&mut env).unwrap();
        assert_eq!(env.get("retries").unwrap(), Dynamic::Int(7));
    }

    #[test]
    fn apply_or_nil_writes_like_apply() {
        let mut env = Bindings::new();
        retries(Mode::READ_WRITE).apply_or_nil(&mut env).unwrap();
        assert_eq!(env.get("retries").unwrap(), Dynamic::Int(3));
    }

    #[test]
    fn interface_keys() {
        let key = Key::new("anything", interfaces::ANYTHING, 1i64, Mode::READ, "").unwrap();
        assert_eq!(key.type_name(), "{}");
    }

    #[test]
    fn custom_typer() {
        fn upper(v: &Dynamic) -> Result<Dynamic, twig_core::CoerceError> {
            match v {
                Dynamic::String(s) => Ok(Dynamic::String(s.to_uppercase())),
                _ => Err(twig_core::CoerceError::NotApplicable),
            }
        }
        const UPPER: Typer = Typer::new("upper", upper);

        let mut key = Key::new("level", UPPER, "info", Mode::READ, "log level").unwrap();
        assert_eq!(key.get(), &Dynamic::from("INFO"));
        let err = key.set(1i64).unwrap_err();
        assert_eq!(err.to_string(), "level: value (type int) is not of type upper");
    }
}
