//! Top-level error type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use twig_core::{EnvError, TypeError};
use twig_ffi::CallError;
use twig_keys::KeyError;

use crate::script::ScriptError;

pub type Result<T> = std::result::Result<T, TwigError>;

/// Any error raised by twig.
#[derive(Debug, Error)]
pub enum TwigError {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Call(#[from] CallError),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no evaluator installed")]
    NoEvaluator,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_messages() {
        let err = TwigError::from(KeyError::Required("host".into()));
        assert_eq!(err.to_string(), "host: required but unset");

        let err = TwigError::from(EnvError::FunctionNotGettable("add".into()));
        assert_eq!(err.to_string(), "functions cannot be gotten: add");
    }

    #[test]
    fn io_message_names_path() {
        let err = TwigError::Io {
            path: PathBuf::from("config.tw"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "failed to read config.tw: not found");
    }
}
