//! Key registry errors.

use thiserror::Error;
use twig_core::{ConversionError, EnvError, TypeError};

/// Errors raised by keys and key maps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// A key with this name is already registered.
    #[error("key already exists in map: {0}")]
    Exists(String),

    /// A key's type cannot be inferred from a nil default.
    #[error("default value required")]
    MissingDefault,

    /// A required key was not bound in the environment.
    #[error("{0}: required but unset")]
    Required(String),

    /// A value does not conform to the key's type.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// The environment refused a read or write.
    #[error(transparent)]
    Env(#[from] EnvError),

    /// The key's value could not be extracted as the requested Rust type.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl KeyError {
    /// Name of the key the error concerns, if known.
    pub fn key_name(&self) -> Option<&str> {
        match self {
            KeyError::Exists(name) | KeyError::Required(name) => Some(name),
            KeyError::Type(e) => e.name(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            KeyError::Exists("retries".into()).to_string(),
            "key already exists in map: retries"
        );
        assert_eq!(KeyError::MissingDefault.to_string(), "default value required");
        assert_eq!(
            KeyError::Required("host".into()).to_string(),
            "host: required but unset"
        );
        assert_eq!(
            KeyError::from(TypeError::NotATypeDescriptor).to_string(),
            "type checker is invalid"
        );
    }

    #[test]
    fn key_name() {
        let err = KeyError::from(TypeError::mismatch("string", "integer").with_name("retries"));
        assert_eq!(err.key_name(), Some("retries"));
        assert_eq!(KeyError::MissingDefault.key_name(), None);
    }
}
