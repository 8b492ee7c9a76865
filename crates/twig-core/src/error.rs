//! Error types shared by every twig crate.
//!
//! ## Error Hierarchy
//!
//! ```text
//! TypeError        - a value does not conform to a type descriptor
//! CoerceError      - outcome of a coercion rule (internal sentinel or TypeError)
//! ConversionError  - Dynamic -> Rust extraction failures
//! NativeError      - errors returned by host functions
//! EnvError         - binding environment failures
//! ```
//!
//! A [`TypeError`] may be raised without knowing which field it belongs to.
//! The first layer that knows the name fills it in with
//! [`TypeError::fill_name`]; once set it is never overwritten.

use thiserror::Error;

/// A value did not conform to a type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// The value's type is not the expected exact type or coercion target.
    #[error("{name}: value (type {got}) is not of type {wants}")]
    Mismatch {
        name: String,
        got: &'static str,
        wants: &'static str,
    },

    /// The value does not provide every capability of an interface.
    #[error("{name}: value (type {got}) does not implement {wants}")]
    Implements {
        name: String,
        got: &'static str,
        wants: &'static str,
    },

    /// The descriptor itself is malformed.
    #[error("type checker is invalid")]
    NotATypeDescriptor,
}

impl TypeError {
    /// Create a mismatch error that does not name its field yet.
    pub fn mismatch(got: &'static str, wants: &'static str) -> Self {
        TypeError::Mismatch {
            name: String::new(),
            got,
            wants,
        }
    }

    /// Create an implements error that does not name its field yet.
    pub fn implements(got: &'static str, wants: &'static str) -> Self {
        TypeError::Implements {
            name: String::new(),
            got,
            wants,
        }
    }

    /// The field name, if one has been attached.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeError::Mismatch { name, .. } | TypeError::Implements { name, .. } => {
                (!name.is_empty()).then_some(name.as_str())
            }
            TypeError::NotATypeDescriptor => None,
        }
    }

    /// Attach a field name unless one is already present.
    pub fn fill_name(&mut self, field: &str) {
        match self {
            TypeError::Mismatch { name, .. } | TypeError::Implements { name, .. } => {
                if name.is_empty() {
                    *name = field.to_string();
                }
            }
            TypeError::NotATypeDescriptor => {}
        }
    }

    /// Builder form of [`fill_name`](Self::fill_name).
    pub fn with_name(mut self, field: &str) -> Self {
        self.fill_name(field);
        self
    }
}

/// Result of a coercion rule that did not produce a value.
///
/// `NotApplicable` is the internal "this rule does not handle that input"
/// signal. [`Typer::coerce`](crate::Typer::coerce) always turns it into a
/// [`TypeError::Mismatch`] naming the rule, so callers never see it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    #[error("hidden: should only be used within a coercion rule")]
    NotApplicable,

    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Errors that can occur when converting a [`Dynamic`](crate::Dynamic) to a Rust value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// Type mismatch during conversion
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Fewer arguments than parameters
    #[error("missing argument at position {index}")]
    MissingArgument { index: usize },
}

/// Errors returned from host functions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NativeError {
    /// A value failed a type descriptor check inside the host function.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// The host function rejected one of its arguments.
    ///
    /// The function name and signature are attached by the adapter.
    #[error("got type {got} but need type {}", join_alternatives(want))]
    ParamType {
        got: &'static str,
        want: Vec<&'static str>,
    },

    /// Error converting arguments or return values
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Generic host error
    #[error("{message}")]
    Other { message: String },
}

impl NativeError {
    /// Create a parameter type error listing the acceptable types.
    pub fn param_type(got: &'static str, want: impl Into<Vec<&'static str>>) -> Self {
        NativeError::ParamType {
            got,
            want: want.into(),
        }
    }

    /// Create a generic host error.
    pub fn other(message: impl Into<String>) -> Self {
        NativeError::Other {
            message: message.into(),
        }
    }
}

/// Errors raised by a binding environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("undefined variable: {0}")]
    Undefined(String),

    #[error("variable already defined: {0}")]
    AlreadyDefined(String),

    #[error("function with that name already exists: {0}")]
    FunctionExists(String),

    #[error("functions cannot be gotten: {0}")]
    FunctionNotGettable(String),

    #[error("no function by that name exists: {0}")]
    NoSuchFunction(String),
}

/// Render a list of acceptable types as `A`, `A or B`, or `A, B, or C`.
pub fn join_alternatives(types: &[&str]) -> String {
    match types {
        [] => String::new(),
        [only] => (*only).to_string(),
        [first, second] => format!("{first} or {second}"),
        [init @ .., last] => {
            let mut out = String::new();
            for t in init {
                out.push_str(t);
                out.push_str(", ");
            }
            out.push_str("or ");
            out.push_str(last);
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message() {
        let err = TypeError::mismatch("string", "integer").with_name("retries");
        assert_eq!(
            err.to_string(),
            "retries: value (type string) is not of type integer"
        );
    }

    #[test]
    fn implements_message() {
        let err = TypeError::implements("int", "io.Reader").with_name("input");
        assert_eq!(
            err.to_string(),
            "input: value (type int) does not implement io.Reader"
        );
    }

    #[test]
    fn name_is_filled_once() {
        let mut err = TypeError::mismatch("string", "int");
        assert_eq!(err.name(), None);

        err.fill_name("first");
        err.fill_name("second");
        assert_eq!(err.name(), Some("first"));
    }

    #[test]
    fn not_a_type_descriptor_has_no_name() {
        let err = TypeError::NotATypeDescriptor.with_name("ignored");
        assert_eq!(err.name(), None);
        assert_eq!(err.to_string(), "type checker is invalid");
    }

    #[test]
    fn alternatives_enumeration() {
        assert_eq!(join_alternatives(&["int"]), "int");
        assert_eq!(join_alternatives(&["int", "string"]), "int or string");
        assert_eq!(
            join_alternatives(&["int", "string", "bool"]),
            "int, string, or bool"
        );
        assert_eq!(
            join_alternatives(&["a", "b", "c", "d"]),
            "a, b, c, or d"
        );
    }

    #[test]
    fn native_param_type_message() {
        let err = NativeError::param_type("bool", vec!["int", "float64"]);
        assert_eq!(err.to_string(), "got type bool but need type int or float64");
    }

    #[test]
    fn coerce_error_wraps_type_error() {
        let err: CoerceError = TypeError::mismatch("bool", "float").into();
        assert!(matches!(err, CoerceError::Type(TypeError::Mismatch { .. })));
    }
}
