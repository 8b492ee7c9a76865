//! Host function values.
//!
//! A [`NativeFn`] is a type-erased host function: a declared [`Signature`]
//! plus an opaque hook that receives the raw argument list and produces one
//! [`Slot`] per declared return value. No validation happens here; the
//! function adapter checks the signature once when the function is bound and
//! the arguments on every call.

use std::fmt;
use std::sync::Arc;

use crate::error::NativeError;
use crate::types::{Interface, TypeDesc, TypeTag};
use crate::Dynamic;

/// Declared type of a parameter or returned value.
///
/// Call boundaries never coerce, so only exact and interface matches exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Exact(TypeTag),
    Implements(Interface),
}

impl ParamType {
    pub fn name(&self) -> &'static str {
        match self {
            ParamType::Exact(tag) => tag.name(),
            ParamType::Implements(iface) => iface.name(),
        }
    }

    /// Whether `value` may be passed for a parameter of this type.
    pub fn accepts(&self, value: &Dynamic) -> bool {
        match self {
            ParamType::Exact(tag) => value.type_tag() == *tag,
            ParamType::Implements(iface) => iface.is_satisfied_by(value.capabilities()),
        }
    }
}

impl From<ParamType> for TypeDesc {
    fn from(param: ParamType) -> Self {
        match param {
            ParamType::Exact(tag) => TypeDesc::Exact(tag),
            ParamType::Implements(iface) => TypeDesc::Implements(iface),
        }
    }
}

/// Declared kind of a return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnType {
    Value(ParamType),
    /// The distinguished error kind
    Error,
}

impl ReturnType {
    pub fn is_error(&self) -> bool {
        matches!(self, ReturnType::Error)
    }
}

/// Declared calling convention of a host function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    /// Required leading parameters
    pub params: Vec<ParamType>,
    /// Element type of the trailing repeated parameter
    pub variadic: Option<ParamType>,
    pub returns: Vec<ReturnType>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, param: ParamType) -> Self {
        self.params.push(param);
        self
    }

    pub fn variadic(mut self, element: ParamType) -> Self {
        self.variadic = Some(element);
        self
    }

    pub fn returns(mut self, ret: ReturnType) -> Self {
        self.returns.push(ret);
        self
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic.is_some()
    }

    /// Number of required arguments.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// One produced return value.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Value(Dynamic),
    Error(Option<NativeError>),
}

/// Trait for callable host functions.
pub trait NativeCallable {
    /// Call with the raw argument list, producing one slot per declared return.
    fn call(&self, args: Vec<Dynamic>) -> Vec<Slot>;
}

impl<F> NativeCallable for F
where
    F: Fn(Vec<Dynamic>) -> Vec<Slot>,
{
    fn call(&self, args: Vec<Dynamic>) -> Vec<Slot> {
        (self)(args)
    }
}

/// Type-erased host function.
///
/// Cloning shares the underlying callable.
#[derive(Clone)]
pub struct NativeFn {
    signature: Arc<Signature>,
    inner: Arc<dyn NativeCallable + Send + Sync>,
}

impl NativeFn {
    pub fn new<F>(signature: Signature, f: F) -> Self
    where
        F: NativeCallable + Send + Sync + 'static,
    {
        Self {
            signature: Arc::new(signature),
            inner: Arc::new(f),
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Invoke the hook without any checking.
    pub fn call(&self, args: Vec<Dynamic>) -> Vec<Slot> {
        self.inner.call(args)
    }

    /// Whether both values share the same underlying callable.
    pub fn ptr_eq(&self, other: &NativeFn) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{interfaces, tags};

    #[test]
    fn param_type_accepts() {
        assert!(ParamType::Exact(tags::STRING).accepts(&Dynamic::from("x")));
        assert!(!ParamType::Exact(tags::STRING).accepts(&Dynamic::Int(1)));
        assert!(ParamType::Implements(interfaces::ANYTHING).accepts(&Dynamic::Void));
    }

    #[test]
    fn signature_builder() {
        let sig = Signature::new()
            .param(ParamType::Exact(tags::STRING))
            .variadic(ParamType::Implements(interfaces::ANYTHING))
            .returns(ReturnType::Value(ParamType::Exact(tags::INT)))
            .returns(ReturnType::Error);

        assert_eq!(sig.arity(), 1);
        assert!(sig.is_variadic());
        assert!(sig.returns[1].is_error());
    }

    #[test]
    fn native_fn_call() {
        let sig = Signature::new()
            .param(ParamType::Exact(tags::INT))
            .param(ParamType::Exact(tags::INT))
            .returns(ReturnType::Value(ParamType::Exact(tags::INT)));
        let add = NativeFn::new(sig, |args: Vec<Dynamic>| match (&args[0], &args[1]) {
            (Dynamic::Int(a), Dynamic::Int(b)) => vec![Slot::Value(Dynamic::Int(a + b))],
            _ => vec![Slot::Value(Dynamic::Void)],
        });

        let out = add.call(vec![Dynamic::Int(10), Dynamic::Int(20)]);
        assert_eq!(out, vec![Slot::Value(Dynamic::Int(30))]);
    }

    #[test]
    fn native_fn_clone_shares_callable() {
        let f = NativeFn::new(Signature::new(), |_: Vec<Dynamic>| Vec::<Slot>::new());
        let g = f.clone();
        let h = NativeFn::new(Signature::new(), |_: Vec<Dynamic>| Vec::<Slot>::new());
        assert!(f.ptr_eq(&g));
        assert!(!f.ptr_eq(&h));
        assert_eq!(Dynamic::Function(f.clone()), Dynamic::Function(g));
    }

    #[test]
    fn native_fn_debug() {
        let f = NativeFn::new(Signature::new(), |_: Vec<Dynamic>| Vec::<Slot>::new());
        assert!(format!("{:?}", f).contains("NativeFn"));
    }
}
