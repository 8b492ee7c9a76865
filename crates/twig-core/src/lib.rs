//! Core value model for twig bindings.
//!
//! This crate holds everything shared between the function adapter
//! (`twig-ffi`) and the typed key registry (`twig-keys`):
//!
//! - [`Dynamic`]: the script-visible value
//! - [`TypeDesc`]: exact, interface, or coercion type descriptors
//! - [`Typer`] and the built-in [`typers`], plus [`check`]
//! - [`NativeFn`] and [`Signature`]: type-erased host functions
//! - [`Environment`]: the binding environment interface
//! - Error types

mod any;
mod convert;
mod dynamic;
mod env;
mod error;
mod native_fn;
mod type_hash;
mod typer;
mod types;

pub use any::{Any, NativeObject};
pub use convert::{FromDynamic, IntoDynamic, Typed};
pub use dynamic::Dynamic;
pub use env::{Bindings, Environment};
pub use error::{
    CoerceError, ConversionError, EnvError, NativeError, TypeError, join_alternatives,
};
pub use native_fn::{NativeCallable, NativeFn, ParamType, ReturnType, Signature, Slot};
pub use type_hash::TypeHash;
pub use typer::{CoerceFn, Typer, check, typers};
pub use types::{Interface, TypeDesc, TypeTag, interfaces, tags};
