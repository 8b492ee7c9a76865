//! # twig
//!
//! Typed bindings between a Rust host and an embedded, dynamically typed
//! scripting environment.
//!
//! - **Function adapter** ([`twig_ffi`]): expose Rust closures to scripts with
//!   argument checking on every call and canonical signature rendering.
//! - **Typed keys** ([`twig_keys`]): named configuration values with type
//!   descriptors, coercion, and read/write/required modes, synchronized
//!   against the script's variables.
//! - **Executer**: a reference binding environment that holds both, plus
//!   the seam where an external script evaluator plugs in.
//!
//! ## Example
//!
//! ```ignore
//! use twig::prelude::*;
//!
//! let mut exec = Executer::with_loader(|_| {
//!     let mut fm = FuncMap::new();
//!     fm.insert_fn("add", |a: i64, b: i64| a + b);
//!     fm
//! })?;
//!
//! let mut keys = KeyMap::new();
//! keys.create("retries", typers::INTEGER, 3i64, Mode::READ_WRITE, "connection attempts")?;
//! keys.apply(&mut exec)?;
//!
//! assert_eq!(exec.call("add", &[Dynamic::Int(1), Dynamic::Int(2)])?, Dynamic::Int(3));
//! ```

pub mod error;
pub mod executer;
pub mod script;

pub use error::{Result, TwigError};
pub use executer::Executer;
pub use script::{
    Evaluator, LineTable, PosInfo, Preprocessor, Processed, ScriptError, SourceMap, remap_error,
};

pub use twig_core;
pub use twig_ffi;
pub use twig_keys;

pub mod prelude {
    pub use crate::error::TwigError;
    pub use crate::executer::Executer;
    pub use crate::script::{Evaluator, Preprocessor, ScriptError, SourceMap};

    pub use twig_core::{
        Any, Bindings, Dynamic, EnvError, Environment, FromDynamic, Interface, IntoDynamic,
        NativeError, TypeDesc, TypeError, Typer, check, interfaces, tags, typers,
    };
    pub use twig_ffi::{
        BoundFn, CallError, Capability, FuncMap, FunctionScope, Iface, IntoNativeFn, Rest,
        format,
    };
    pub use twig_keys::{Key, KeyError, KeyMap, Mode, handlers};
}
