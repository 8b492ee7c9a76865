//! Conversion traits between Rust values and [`Dynamic`].
//!
//! - [`FromDynamic`]: extract a Rust value (arguments, key values)
//! - [`IntoDynamic`]: produce a [`Dynamic`] (return values)
//! - [`Typed`]: the static [`ParamType`] a Rust type is declared as
//!
//! Extraction is exact: an `i32` is only read from `Dynamic::Int32`. Widening
//! between integer sizes is the job of the `integer` coercion rule, not of
//! conversion.

use std::sync::Arc;

use crate::any::Any;
use crate::error::ConversionError;
use crate::native_fn::{NativeFn, ParamType};
use crate::types::{interfaces, tags};
use crate::Dynamic;

/// Extract a value from a [`Dynamic`].
pub trait FromDynamic: Sized {
    fn from_dynamic(value: Dynamic) -> Result<Self, ConversionError>;
}

/// Convert a value into a [`Dynamic`].
pub trait IntoDynamic {
    fn into_dynamic(self) -> Dynamic;
}

/// Static script type of a Rust type.
pub trait Typed {
    fn param_type() -> ParamType;
}

macro_rules! impl_primitive {
    ($($ty:ty => $variant:ident, $tag:expr);* $(;)?) => {
        $(
            impl FromDynamic for $ty {
                fn from_dynamic(value: Dynamic) -> Result<Self, ConversionError> {
                    match value {
                        Dynamic::$variant(v) => Ok(v),
                        other => Err(ConversionError::TypeMismatch {
                            expected: $tag.name(),
                            actual: other.type_name(),
                        }),
                    }
                }
            }

            impl IntoDynamic for $ty {
                fn into_dynamic(self) -> Dynamic {
                    Dynamic::$variant(self)
                }
            }

            impl Typed for $ty {
                fn param_type() -> ParamType {
                    ParamType::Exact($tag)
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Bool, tags::BOOL;
    i64 => Int, tags::INT;
    i16 => Int16, tags::INT16;
    i32 => Int32, tags::INT32;
    f32 => Float32, tags::FLOAT32;
    f64 => Float64, tags::FLOAT64;
    String => String, tags::STRING;
    Vec<u8> => Bytes, tags::BYTES;
    Vec<Dynamic> => List, tags::LIST;
    NativeFn => Function, tags::FUNC;
}

impl FromDynamic for Dynamic {
    fn from_dynamic(value: Dynamic) -> Result<Self, ConversionError> {
        Ok(value)
    }
}

impl IntoDynamic for Dynamic {
    fn into_dynamic(self) -> Dynamic {
        self
    }
}

impl Typed for Dynamic {
    fn param_type() -> ParamType {
        ParamType::Implements(interfaces::ANYTHING)
    }
}

impl<T: Any> FromDynamic for Arc<T> {
    fn from_dynamic(value: Dynamic) -> Result<Self, ConversionError> {
        value
            .downcast_native::<T>()
            .ok_or_else(|| ConversionError::TypeMismatch {
                expected: T::type_name(),
                actual: value.type_name(),
            })
    }
}

impl<T: Any> IntoDynamic for Arc<T> {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::Native(self)
    }
}

impl<T: Any> Typed for Arc<T> {
    fn param_type() -> ParamType {
        ParamType::Exact(T::type_tag())
    }
}

impl IntoDynamic for &str {
    fn into_dynamic(self) -> Dynamic {
        Dynamic::String(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Point {
        x: i64,
    }

    impl Any for Point {
        fn type_name() -> &'static str {
            "Point"
        }
    }

    #[test]
    fn primitive_round_trip() {
        assert_eq!(i64::from_dynamic(42i64.into_dynamic()).unwrap(), 42);
        assert_eq!(String::from_dynamic("hi".into_dynamic()).unwrap(), "hi");
        assert!(bool::from_dynamic(Dynamic::Bool(true)).unwrap());
    }

    #[test]
    fn extraction_is_exact() {
        let err = i64::from_dynamic(Dynamic::Int32(1)).unwrap_err();
        assert_eq!(
            err,
            ConversionError::TypeMismatch {
                expected: "int",
                actual: "int32"
            }
        );
    }

    #[test]
    fn declared_types() {
        assert_eq!(<i64 as Typed>::param_type().name(), "int");
        assert_eq!(<Vec<u8> as Typed>::param_type().name(), "[]byte");
        assert_eq!(<Vec<Dynamic> as Typed>::param_type().name(), "[]{}");
        assert_eq!(<Dynamic as Typed>::param_type().name(), "{}");
        assert_eq!(<Arc<Point> as Typed>::param_type().name(), "Point");
    }

    #[test]
    fn native_extraction() {
        let value = Arc::new(Point { x: 3 }).into_dynamic();
        let back = Arc::<Point>::from_dynamic(value).unwrap();
        assert_eq!(back.x, 3);

        let err = Arc::<Point>::from_dynamic(Dynamic::Int(1)).unwrap_err();
        assert!(err.to_string().contains("Point"));
    }
}
