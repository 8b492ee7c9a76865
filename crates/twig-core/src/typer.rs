//! Coercion rules and descriptor checking.
//!
//! A [`Typer`] is a named normalization function. It either returns the
//! canonical form of its input or reports [`CoerceError::NotApplicable`],
//! which [`Typer::coerce`] converts into a [`TypeError::Mismatch`] naming the
//! rule.
//!
//! [`check`] is the single entry point used by keys and adapters:
//!
//! ```
//! use twig_core::{check, typers, Dynamic, TypeDesc};
//!
//! let v = check("retries", &TypeDesc::Coerce(typers::INTEGER), Dynamic::Int32(5)).unwrap();
//! assert_eq!(v, Dynamic::Int(5));
//! ```

use std::fmt;

use tracing::trace;

use crate::error::{CoerceError, TypeError};
use crate::types::TypeDesc;
use crate::Dynamic;

/// Normalization function of a coercion rule.
pub type CoerceFn = fn(&Dynamic) -> Result<Dynamic, CoerceError>;

/// A named coercion rule.
#[derive(Clone, Copy)]
pub struct Typer {
    name: &'static str,
    coerce: CoerceFn,
}

impl Typer {
    pub const fn new(name: &'static str, coerce: CoerceFn) -> Self {
        Self { name, coerce }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Apply the rule. The internal "not applicable" signal never escapes.
    pub fn coerce(&self, value: &Dynamic) -> Result<Dynamic, TypeError> {
        match (self.coerce)(value) {
            Ok(v) => Ok(v),
            Err(CoerceError::NotApplicable) => {
                Err(TypeError::mismatch(value.type_name(), self.name))
            }
            Err(CoerceError::Type(e)) => Err(e),
        }
    }
}

impl PartialEq for Typer {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && std::ptr::fn_addr_eq(self.coerce, other.coerce)
    }
}

impl Eq for Typer {}

impl fmt::Debug for Typer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typer").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Built-in coercion rules.
pub mod typers {
    use super::Typer;
    use crate::error::CoerceError;
    use crate::Dynamic;

    /// Widens `float32` to `float64`.
    pub const FLOAT: Typer = Typer::new("float", coerce_float);

    /// Normalizes `int16`, `int32` and `int64` to `int`.
    pub const INTEGER: Typer = Typer::new("integer", coerce_integer);

    fn coerce_float(v: &Dynamic) -> Result<Dynamic, CoerceError> {
        match v {
            Dynamic::Float64(f) => Ok(Dynamic::Float64(*f)),
            Dynamic::Float32(f) => Ok(Dynamic::Float64(f64::from(*f))),
            _ => Err(CoerceError::NotApplicable),
        }
    }

    fn coerce_integer(v: &Dynamic) -> Result<Dynamic, CoerceError> {
        match v {
            Dynamic::Int(i) => Ok(Dynamic::Int(*i)),
            Dynamic::Int64(i) => Ok(Dynamic::Int(*i)),
            Dynamic::Int32(i) => Ok(Dynamic::Int(i64::from(*i))),
            Dynamic::Int16(i) => Ok(Dynamic::Int(i64::from(*i))),
            _ => Err(CoerceError::NotApplicable),
        }
    }
}

/// Check `value` against `desc`, returning its normalized form.
///
/// Exact and interface descriptors pass the value through unchanged.
/// `name` is attached to any error that does not already name a field.
pub fn check(name: &str, desc: &TypeDesc, value: Dynamic) -> Result<Dynamic, TypeError> {
    match desc {
        TypeDesc::Exact(tag) => {
            if !desc.is_valid() {
                return Err(TypeError::NotATypeDescriptor);
            }
            if value.type_tag() == *tag {
                Ok(value)
            } else {
                Err(TypeError::mismatch(value.type_name(), tag.name()).with_name(name))
            }
        }
        TypeDesc::Implements(iface) => {
            if iface.is_satisfied_by(value.capabilities()) {
                Ok(value)
            } else {
                Err(TypeError::implements(value.type_name(), iface.name()).with_name(name))
            }
        }
        TypeDesc::Coerce(typer) => {
            let coerced = typer.coerce(&value).map_err(|e| e.with_name(name))?;
            trace!(field = name, rule = typer.name(), "coerced value");
            Ok(coerced)
        }
    }
}
