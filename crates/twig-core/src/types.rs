//! Type descriptors.
//!
//! A [`TypeDesc`] is the runtime type identity a value is checked against. It is
//! one of:
//!
//! - [`TypeDesc::Exact`]: the value's [`TypeTag`] must be equal
//! - [`TypeDesc::Implements`]: the value must provide every capability of an [`Interface`]
//! - [`TypeDesc::Coerce`]: a named [`Typer`] normalizes the value
//!
//! Built-in tags live in [`tags`], built-in interfaces in [`interfaces`].

use std::fmt;

use crate::typer::Typer;
use crate::TypeHash;

/// Exact runtime type identity of a value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTag {
    hash: TypeHash,
    name: &'static str,
}

impl TypeTag {
    /// Create a tag from a display name; the hash is derived from the name.
    pub const fn new(name: &'static str) -> Self {
        Self {
            hash: TypeHash::from_name(name),
            name,
        }
    }

    /// Create a tag with an explicit hash (used for host types).
    pub const fn with_hash(hash: TypeHash, name: &'static str) -> Self {
        Self { hash, name }
    }

    pub const fn hash(&self) -> TypeHash {
        self.hash
    }

    /// Canonical display name, as used in diagnostics and signatures.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({})", self.name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Tags for the built-in value types.
pub mod tags {
    use super::TypeTag;

    /// The type of the absent value. Not a valid descriptor target.
    pub const NIL: TypeTag = TypeTag::new("nil");
    pub const BOOL: TypeTag = TypeTag::new("bool");
    /// Canonical integer width.
    pub const INT: TypeTag = TypeTag::new("int");
    pub const INT16: TypeTag = TypeTag::new("int16");
    pub const INT32: TypeTag = TypeTag::new("int32");
    pub const INT64: TypeTag = TypeTag::new("int64");
    pub const FLOAT32: TypeTag = TypeTag::new("float32");
    pub const FLOAT64: TypeTag = TypeTag::new("float64");
    pub const STRING: TypeTag = TypeTag::new("string");
    pub const BYTES: TypeTag = TypeTag::new("[]byte");
    /// Sequence of arbitrary values.
    pub const LIST: TypeTag = TypeTag::new("[]{}");
    pub const FUNC: TypeTag = TypeTag::new("func");
}

/// A named capability set.
///
/// A value satisfies an interface when it provides every listed method.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interface {
    name: &'static str,
    methods: &'static [&'static str],
}

impl Interface {
    pub const fn new(name: &'static str, methods: &'static [&'static str]) -> Self {
        Self { name, methods }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn methods(&self) -> &'static [&'static str] {
        self.methods
    }

    /// Whether a capability list covers every method of this interface.
    pub fn is_satisfied_by(&self, capabilities: &[&str]) -> bool {
        self.methods.iter().all(|m| capabilities.contains(m))
    }
}

impl fmt::Debug for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interface")
            .field("name", &self.name)
            .field("methods", &self.methods)
            .finish()
    }
}

/// Built-in interfaces.
pub mod interfaces {
    use super::Interface;

    /// The empty interface: every value, including nil, satisfies it.
    pub const ANYTHING: Interface = Interface::new("{}", &[]);
}

/// Runtime type descriptor used by keys and the function adapter.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum TypeDesc {
    Exact(TypeTag),
    Implements(Interface),
    Coerce(Typer),
}

impl TypeDesc {
    /// Display name of the descriptor.
    pub fn name(&self) -> &'static str {
        match self {
            TypeDesc::Exact(tag) => tag.name(),
            TypeDesc::Implements(iface) => iface.name(),
            TypeDesc::Coerce(typer) => typer.name(),
        }
    }

    /// A descriptor is well formed unless it targets the nil tag.
    pub fn is_valid(&self) -> bool {
        !matches!(self, TypeDesc::Exact(tag) if *tag == tags::NIL)
    }
}

impl fmt::Debug for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Exact(tag) => write!(f, "Exact({})", tag.name()),
            TypeDesc::Implements(iface) => write!(f, "Implements({})", iface.name()),
            TypeDesc::Coerce(typer) => write!(f, "Coerce({})", typer.name()),
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<TypeTag> for TypeDesc {
    fn from(tag: TypeTag) -> Self {
        TypeDesc::Exact(tag)
    }
}

impl From<Interface> for TypeDesc {
    fn from(iface: Interface) -> Self {
        TypeDesc::Implements(iface)
    }
}

impl From<Typer> for TypeDesc {
    fn from(typer: Typer) -> Self {
        TypeDesc::Coerce(typer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typers;

    #[test]
    fn tags_compare_by_identity() {
        assert_eq!(tags::INT, TypeTag::new("int"));
        assert_ne!(tags::INT, tags::INT64);
        assert_eq!(tags::INT.hash(), TypeHash::from_name("int"));
    }

    #[test]
    fn canonical_tag_names() {
        assert_eq!(tags::LIST.name(), "[]{}");
        assert_eq!(tags::BYTES.name(), "[]byte");
        assert_eq!(interfaces::ANYTHING.name(), "{}");
    }

    #[test]
    fn interface_satisfaction() {
        const READER: Interface = Interface::new("io.Reader", &["read"]);
        assert!(READER.is_satisfied_by(&["read", "close"]));
        assert!(!READER.is_satisfied_by(&["close"]));
        assert!(interfaces::ANYTHING.is_satisfied_by(&[]));
    }

    #[test]
    fn descriptor_names() {
        assert_eq!(TypeDesc::from(tags::STRING).name(), "string");
        assert_eq!(TypeDesc::from(interfaces::ANYTHING).name(), "{}");
        assert_eq!(TypeDesc::from(typers::INTEGER).name(), "integer");
        assert_eq!(TypeDesc::from(typers::FLOAT).to_string(), "float");
    }

    #[test]
    fn nil_descriptor_is_invalid() {
        assert!(!TypeDesc::Exact(tags::NIL).is_valid());
        assert!(TypeDesc::Exact(tags::INT).is_valid());
        assert!(TypeDesc::Coerce(typers::FLOAT).is_valid());
    }
}
