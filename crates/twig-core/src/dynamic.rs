//! Runtime value type exchanged with the script environment.

use std::fmt;
use std::sync::Arc;

use crate::any::{Any, NativeObject};
use crate::native_fn::NativeFn;
use crate::types::{TypeTag, tags};

/// A dynamically typed script value.
///
/// `Void` is the absent value (nil). Every other variant maps to exactly one
/// [`TypeTag`], which is what exact type descriptors compare against.
///
/// Integers of different widths are distinct types: `Int` is the canonical
/// integer, `Int16`/`Int32`/`Int64` are only produced by hosts that hand out
/// sized values, and the `integer` coercion rule folds them into `Int`.
#[derive(Clone, Default)]
pub enum Dynamic {
    /// Absent value
    #[default]
    Void,
    Bool(bool),
    /// Canonical integer
    Int(i64),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Bytes(Vec<u8>),
    /// Sequence of arbitrary values
    List(Vec<Dynamic>),
    /// Host object
    Native(Arc<dyn NativeObject>),
    /// Host function value
    Function(NativeFn),
}

impl Dynamic {
    /// Wrap a host object.
    pub fn native<T: Any>(value: T) -> Self {
        Dynamic::Native(Arc::new(value))
    }

    /// Exact runtime type of this value.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Dynamic::Void => tags::NIL,
            Dynamic::Bool(_) => tags::BOOL,
            Dynamic::Int(_) => tags::INT,
            Dynamic::Int16(_) => tags::INT16,
            Dynamic::Int32(_) => tags::INT32,
            Dynamic::Int64(_) => tags::INT64,
            Dynamic::Float32(_) => tags::FLOAT32,
            Dynamic::Float64(_) => tags::FLOAT64,
            Dynamic::String(_) => tags::STRING,
            Dynamic::Bytes(_) => tags::BYTES,
            Dynamic::List(_) => tags::LIST,
            Dynamic::Native(obj) => obj.object_tag(),
            Dynamic::Function(_) => tags::FUNC,
        }
    }

    /// Canonical display name of this value's type.
    pub fn type_name(&self) -> &'static str {
        self.type_tag().name()
    }

    /// Capabilities this value provides for interface matching.
    pub fn capabilities(&self) -> &'static [&'static str] {
        match self {
            Dynamic::Native(obj) => obj.object_capabilities(),
            _ => &[],
        }
    }

    /// Check if this value is absent.
    pub fn is_void(&self) -> bool {
        matches!(self, Dynamic::Void)
    }

    /// Downcast a host object to its concrete type.
    pub fn downcast_native<T: Any>(&self) -> Option<Arc<T>> {
        match self {
            Dynamic::Native(obj) => Arc::clone(obj).into_any_arc().downcast::<T>().ok(),
            _ => None,
        }
    }

    /// The host function, if this value is one.
    pub fn as_function(&self) -> Option<&NativeFn> {
        match self {
            Dynamic::Function(f) => Some(f),
            _ => None,
        }
    }
}

impl fmt::Debug for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dynamic::Void => write!(f, "Void"),
            Dynamic::Bool(v) => write!(f, "Bool({})", v),
            Dynamic::Int(v) => write!(f, "Int({})", v),
            Dynamic::Int16(v) => write!(f, "Int16({})", v),
            Dynamic::Int32(v) => write!(f, "Int32({})", v),
            Dynamic::Int64(v) => write!(f, "Int64({})", v),
            Dynamic::Float32(v) => write!(f, "Float32({})", v),
            Dynamic::Float64(v) => write!(f, "Float64({})", v),
            Dynamic::String(s) => write!(f, "String({:?})", s),
            Dynamic::Bytes(b) => write!(f, "Bytes({:?})", b),
            Dynamic::List(items) => f.debug_tuple("List").field(items).finish(),
            Dynamic::Native(obj) => write!(f, "Native({:?})", obj),
            Dynamic::Function(func) => write!(f, "{:?}", func),
        }
    }
}

impl PartialEq for Dynamic {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Dynamic::Void, Dynamic::Void) => true,
            (Dynamic::Bool(a), Dynamic::Bool(b)) => a == b,
            (Dynamic::Int(a), Dynamic::Int(b)) => a == b,
            (Dynamic::Int16(a), Dynamic::Int16(b)) => a == b,
            (Dynamic::Int32(a), Dynamic::Int32(b)) => a == b,
            (Dynamic::Int64(a), Dynamic::Int64(b)) => a == b,
            (Dynamic::Float32(a), Dynamic::Float32(b)) => a == b,
            (Dynamic::Float64(a), Dynamic::Float64(b)) => a == b,
            (Dynamic::String(a), Dynamic::String(b)) => a == b,
            (Dynamic::Bytes(a), Dynamic::Bytes(b)) => a == b,
            (Dynamic::List(a), Dynamic::List(b)) => a == b,
            // Host objects compare by identity
            (Dynamic::Native(a), Dynamic::Native(b)) => Arc::ptr_eq(a, b),
            (Dynamic::Function(a), Dynamic::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

macro_rules! impl_from_for_dynamic {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Dynamic {
                fn from(v: $ty) -> Self {
                    Dynamic::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_dynamic!(
    bool => Bool,
    i64 => Int,
    i16 => Int16,
    i32 => Int32,
    f32 => Float32,
    f64 => Float64,
    String => String,
    Vec<u8> => Bytes,
    Vec<Dynamic> => List,
    NativeFn => Function,
);

impl From<&str> for Dynamic {
    fn from(s: &str) -> Self {
        Dynamic::String(s.to_string())
    }
}

impl From<()> for Dynamic {
    fn from(_: ()) -> Self {
        Dynamic::Void
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct File {
        path: String,
    }

    impl Any for File {
        fn type_name() -> &'static str {
            "os.File"
        }

        fn capabilities() -> &'static [&'static str] {
            &["read", "write", "close"]
        }
    }

    #[test]
    fn dynamic_type_names() {
        assert_eq!(Dynamic::Void.type_name(), "nil");
        assert_eq!(Dynamic::Bool(false).type_name(), "bool");
        assert_eq!(Dynamic::Int(0).type_name(), "int");
        assert_eq!(Dynamic::Int16(0).type_name(), "int16");
        assert_eq!(Dynamic::Int32(0).type_name(), "int32");
        assert_eq!(Dynamic::Int64(0).type_name(), "int64");
        assert_eq!(Dynamic::Float32(0.0).type_name(), "float32");
        assert_eq!(Dynamic::Float64(0.0).type_name(), "float64");
        assert_eq!(Dynamic::from("").type_name(), "string");
        assert_eq!(Dynamic::Bytes(vec![]).type_name(), "[]byte");
        assert_eq!(Dynamic::List(vec![]).type_name(), "[]{}");
    }

    #[test]
    fn native_identity_and_capabilities() {
        let file = Dynamic::native(File {
            path: "/tmp/x".into(),
        });
        assert_eq!(file.type_name(), "os.File");
        assert_eq!(file.capabilities(), &["read", "write", "close"]);
        assert!(Dynamic::Int(1).capabilities().is_empty());
    }

    #[test]
    fn native_downcast() {
        let file = Dynamic::native(File {
            path: "/tmp/x".into(),
        });
        let back = file.downcast_native::<File>().unwrap();
        assert_eq!(back.path, "/tmp/x");
        assert!(Dynamic::Int(1).downcast_native::<File>().is_none());
    }

    #[test]
    fn native_equality_is_identity() {
        let a = Dynamic::native(File { path: "a".into() });
        let b = Dynamic::native(File { path: "a".into() });
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn widths_are_distinct() {
        assert_ne!(Dynamic::Int(5), Dynamic::Int32(5));
        assert_ne!(Dynamic::Int64(5), Dynamic::Int(5));
        assert_eq!(Dynamic::from(5i64), Dynamic::Int(5));
    }

    #[test]
    fn void_is_default() {
        assert!(Dynamic::default().is_void());
        assert!(Dynamic::from(()).is_void());
        assert!(!Dynamic::Int(0).is_void());
    }

    #[test]
    fn dynamic_debug() {
        assert_eq!(format!("{:?}", Dynamic::Void), "Void");
        assert_eq!(format!("{:?}", Dynamic::Int(42)), "Int(42)");
        assert_eq!(format!("{:?}", Dynamic::from("test")), "String(\"test\")");
        assert!(format!("{:?}", Dynamic::List(vec![Dynamic::Bool(true)])).contains("Bool(true)"));
    }
}
