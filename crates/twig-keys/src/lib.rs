//! Typed configuration keys for twig scripts.
//!
//! A [`Key`] is a named value with a type descriptor, a default, and a
//! [`Mode`] deciding whether it is read from, written to, or required in a
//! binding environment. A [`KeyMap`] owns a set of keys and synchronizes
//! them in name order.
//!
//! ```ignore
//! use twig_core::{Bindings, Dynamic, Environment, typers};
//! use twig_keys::{KeyMap, Mode, handlers};
//!
//! let mut keys = KeyMap::new();
//! keys.create("retries", typers::INTEGER, 3i64, Mode::READ_WRITE, "connection attempts")?;
//!
//! let mut env = Bindings::new();
//! keys.apply(&mut env)?;
//! env.set("retries", Dynamic::Int32(5))?;
//! keys.acquire(&env, handlers::quit)?;
//! assert_eq!(keys.get("retries").unwrap().get(), &Dynamic::Int(5));
//! ```

mod error;
mod key;
mod key_map;
mod mode;

pub use error::KeyError;
pub use key::Key;
pub use key_map::{KeyMap, handlers};
pub use mode::Mode;
