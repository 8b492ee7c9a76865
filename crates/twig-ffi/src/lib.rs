//! Function adapter for twig scripts.
//!
//! Host functions are plain Rust closures. Their parameter and return types
//! become a declared [`Signature`](twig_core::Signature) through
//! [`IntoNativeFn`]; [`BoundFn`] validates that signature once and checks
//! every call against it.
//!
//! # Example
//!
//! ```ignore
//! use twig_ffi::{BoundFn, Rest};
//! use twig_core::Dynamic;
//!
//! let add = BoundFn::wrap("add", |a: i64, b: i64| a + b);
//! assert_eq!(add.invoke(&[Dynamic::Int(1), Dynamic::Int(2)])?, Dynamic::Int(3));
//! assert_eq!(add.format(), "add :: int -> int => int");
//! ```

mod adapter;
mod error;
mod format;
mod func_map;
mod params;

pub use adapter::BoundFn;
pub use error::{CallError, ContractViolation};
pub use format::{format, format_signature};
pub use func_map::{FuncMap, FunctionScope};
pub use params::{
    Capability, HostParam, Iface, IntoNativeFn, ParamKind, Rest, ReturnSpec, signature_from_kinds,
};
