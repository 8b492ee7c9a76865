//! Host type identity.
//!
//! The [`Any`] trait must be implemented by every Rust type that is handed to
//! scripts as an opaque object. It provides the script-visible type name, a
//! [`TypeHash`], and the capability list used to match [`Interface`]s.
//!
//! # Example
//!
//! ```
//! use twig_core::{Any, Dynamic};
//!
//! #[derive(Debug)]
//! struct Buffer {
//!     data: Vec<u8>,
//! }
//!
//! impl Any for Buffer {
//!     fn type_name() -> &'static str {
//!         "bytes.Buffer"
//!     }
//!
//!     fn capabilities() -> &'static [&'static str] {
//!         &["read", "write"]
//!     }
//! }
//!
//! let value = Dynamic::native(Buffer { data: vec![] });
//! assert_eq!(value.type_name(), "bytes.Buffer");
//! ```
//!
//! [`Interface`]: crate::Interface

use std::fmt;
use std::sync::Arc;

use crate::types::TypeTag;
use crate::TypeHash;

/// Trait for host types exposed to scripts.
pub trait Any: 'static + fmt::Debug + Send + Sync {
    /// Script-visible type name.
    fn type_name() -> &'static str;

    /// Type hash; derived from the name unless overridden.
    fn type_hash() -> TypeHash {
        TypeHash::from_name(Self::type_name())
    }

    /// Methods this type provides, for interface matching.
    fn capabilities() -> &'static [&'static str] {
        &[]
    }

    /// Exact type tag of this type.
    fn type_tag() -> TypeTag {
        TypeTag::with_hash(Self::type_hash(), Self::type_name())
    }
}

/// Object-safe view of an [`Any`] value stored inside a [`Dynamic`](crate::Dynamic).
pub trait NativeObject: fmt::Debug + Send + Sync {
    fn object_tag(&self) -> TypeTag;

    fn object_capabilities(&self) -> &'static [&'static str];

    fn as_any(&self) -> &dyn std::any::Any;

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn std::any::Any + Send + Sync>;
}

impl<T: Any> NativeObject for T {
    fn object_tag(&self) -> TypeTag {
        <T as Any>::type_tag()
    }

    fn object_capabilities(&self) -> &'static [&'static str] {
        <T as Any>::capabilities()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn std::any::Any + Send + Sync> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Clock;

    impl Any for Clock {
        fn type_name() -> &'static str {
            "time.Clock"
        }
    }

    #[derive(Debug)]
    struct Pinned;

    impl Any for Pinned {
        fn type_name() -> &'static str {
            "Pinned"
        }

        fn type_hash() -> TypeHash {
            TypeHash(42)
        }

        fn capabilities() -> &'static [&'static str] {
            &["pin"]
        }
    }

    #[test]
    fn default_hash_is_name_hash() {
        assert_eq!(Clock::type_hash(), TypeHash::from_name("time.Clock"));
        assert_eq!(Clock::type_tag().name(), "time.Clock");
        assert!(Clock::capabilities().is_empty());
    }

    #[test]
    fn overridden_identity() {
        assert_eq!(Pinned::type_tag().hash(), TypeHash(42));
        assert_eq!(Pinned.object_capabilities(), &["pin"]);
    }

    #[test]
    fn object_downcast() {
        let obj: Arc<dyn NativeObject> = Arc::new(Clock);
        assert!(obj.as_any().downcast_ref::<Clock>().is_some());
        assert!(obj.into_any_arc().downcast::<Pinned>().is_err());
    }
}
