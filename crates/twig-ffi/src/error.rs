//! Error types for the function adapter.

use thiserror::Error;
use twig_core::{NativeError, TypeError, join_alternatives};

/// Errors raised when invoking a bound host function.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CallError {
    /// Wrong number of arguments. The host function was not called.
    #[error("Incorrect number of parameters to function {name}.\n\n\t{signature}.")]
    ParamCount { name: String, signature: String },

    /// An argument does not have the declared parameter type.
    #[error(
        "Incorrect parameter type to function {name}.\n\n\tGot type {got} but need type {}.\n\t{signature}",
        join_alternatives(wants)
    )]
    ParamType {
        name: String,
        /// Position of the offending argument
        index: Option<usize>,
        got: &'static str,
        wants: Vec<&'static str>,
        signature: String,
    },

    /// A type check inside the host function failed.
    #[error(transparent)]
    Type(TypeError),

    /// The host function returned an error.
    #[error(transparent)]
    Native(NativeError),

    /// The host function produced a different number of values than declared.
    #[error("{name}: host function produced {got} return values, expected {expected}")]
    ReturnShape {
        name: String,
        expected: usize,
        got: usize,
    },
}

impl CallError {
    /// Name of the function the error was raised for, if it carries one.
    pub fn function_name(&self) -> Option<&str> {
        match self {
            CallError::ParamCount { name, .. }
            | CallError::ParamType { name, .. }
            | CallError::ReturnShape { name, .. } => Some(name),
            CallError::Type(e) => e.name(),
            CallError::Native(_) => None,
        }
    }
}

/// A host function that cannot be bound.
///
/// These are programming errors in the embedding host, not runtime
/// conditions. They are raised by panicking when a function is wrapped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("{name}: value of type {got} is not a function")]
    NotCallable { name: String, got: &'static str },

    #[error("{name}: a function can return at most two values, found {count}")]
    TooManyReturns { name: String, count: usize },

    #[error("{name}: second return value can only be an error, found {got}")]
    SecondNotError { name: String, got: &'static str },

    #[error("variadic parameter must be the last parameter, found at position {position} of {count}")]
    RestNotLast { position: usize, count: usize },
}
