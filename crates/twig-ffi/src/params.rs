//! Typed host function registration.
//!
//! Any `Fn(A, B, ...) -> R` whose parameters implement [`HostParam`] and whose
//! result implements [`ReturnSpec`] converts into a [`NativeFn`] through
//! [`IntoNativeFn`]. The declared [`Signature`] is derived from the Rust
//! types, so a host function cannot drift from what it advertises.
//!
//! ```ignore
//! let add = (|a: i64, b: i64| a + b).into_native_fn();
//! let printf = (|fmt: String, Rest(args): Rest<Dynamic>| -> Result<i64, NativeError> {
//!     ...
//! }).into_native_fn();
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::vec;

use twig_core::{
    Any, ConversionError, Dynamic, FromDynamic, Interface, IntoDynamic, NativeError, NativeFn,
    ParamType, ReturnType, Signature, Slot, Typed,
};

use crate::error::ContractViolation;

/// How a parameter consumes the argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Exactly one argument
    Single(ParamType),
    /// Every remaining argument, each of the element type
    Rest(ParamType),
}

/// A Rust type usable as a host function parameter.
pub trait HostParam: Sized {
    fn kind() -> ParamKind;

    /// Take this parameter's value(s) from the remaining arguments.
    fn from_args(args: &mut vec::IntoIter<Dynamic>, index: usize) -> Result<Self, ConversionError>;
}

impl<T: Typed + FromDynamic> HostParam for T {
    fn kind() -> ParamKind {
        ParamKind::Single(T::param_type())
    }

    fn from_args(args: &mut vec::IntoIter<Dynamic>, index: usize) -> Result<Self, ConversionError> {
        let value = args
            .next()
            .ok_or(ConversionError::MissingArgument { index })?;
        T::from_dynamic(value)
    }
}

/// Trailing repeated parameter. Only valid as the last parameter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rest<T>(pub Vec<T>);

impl<T> Rest<T> {
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T: Typed + FromDynamic> HostParam for Rest<T> {
    fn kind() -> ParamKind {
        ParamKind::Rest(T::param_type())
    }

    fn from_args(args: &mut vec::IntoIter<Dynamic>, _index: usize) -> Result<Self, ConversionError> {
        args.map(T::from_dynamic).collect::<Result<Vec<_>, _>>().map(Rest)
    }
}

/// Marker for an interface a parameter must satisfy.
///
/// ```ignore
/// struct Reader;
/// impl Capability for Reader {
///     const INTERFACE: Interface = Interface::new("io.Reader", &["read"]);
/// }
/// ```
pub trait Capability: 'static {
    const INTERFACE: Interface;
}

/// A parameter accepted by capability rather than by exact type.
pub struct Iface<I> {
    value: Dynamic,
    _marker: PhantomData<fn() -> I>,
}

impl<I: Capability> Iface<I> {
    /// Wrap a value, checking that it provides every capability of `I`.
    pub fn new(value: Dynamic) -> Result<Self, ConversionError> {
        if !I::INTERFACE.is_satisfied_by(value.capabilities()) {
            return Err(ConversionError::TypeMismatch {
                expected: I::INTERFACE.name(),
                actual: value.type_name(),
            });
        }
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    pub fn value(&self) -> &Dynamic {
        &self.value
    }

    pub fn into_inner(self) -> Dynamic {
        self.value
    }

    /// Downcast the underlying host object.
    pub fn downcast<T: Any>(&self) -> Option<Arc<T>> {
        self.value.downcast_native::<T>()
    }
}

impl<I> fmt::Debug for Iface<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iface").field(&self.value).finish()
    }
}

impl<I: Capability> HostParam for Iface<I> {
    fn kind() -> ParamKind {
        ParamKind::Single(ParamType::Implements(I::INTERFACE))
    }

    fn from_args(args: &mut vec::IntoIter<Dynamic>, index: usize) -> Result<Self, ConversionError> {
        let value = args
            .next()
            .ok_or(ConversionError::MissingArgument { index })?;
        Iface::new(value)
    }
}

/// A Rust type usable as a host function result.
///
/// `into_slots` must produce exactly one slot per entry of `return_types`.
pub trait ReturnSpec {
    fn return_types() -> Vec<ReturnType>;

    fn into_slots(self) -> Vec<Slot>;
}

impl ReturnSpec for () {
    fn return_types() -> Vec<ReturnType> {
        Vec::new()
    }

    fn into_slots(self) -> Vec<Slot> {
        Vec::new()
    }
}

macro_rules! impl_return_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ReturnSpec for $ty {
                fn return_types() -> Vec<ReturnType> {
                    vec![ReturnType::Value(<$ty as Typed>::param_type())]
                }

                fn into_slots(self) -> Vec<Slot> {
                    vec![Slot::Value(self.into_dynamic())]
                }
            }
        )*
    };
}

impl_return_value!(
    bool,
    i64,
    i16,
    i32,
    f32,
    f64,
    String,
    Vec<u8>,
    Vec<Dynamic>,
    NativeFn,
    Dynamic,
);

impl<T: Any> ReturnSpec for Arc<T> {
    fn return_types() -> Vec<ReturnType> {
        vec![ReturnType::Value(<Arc<T> as Typed>::param_type())]
    }

    fn into_slots(self) -> Vec<Slot> {
        vec![Slot::Value(self.into_dynamic())]
    }
}

impl<T, E> ReturnSpec for Result<T, E>
where
    T: ReturnSpec,
    E: Into<NativeError>,
{
    fn return_types() -> Vec<ReturnType> {
        let mut types = T::return_types();
        types.push(ReturnType::Error);
        types
    }

    fn into_slots(self) -> Vec<Slot> {
        match self {
            Ok(value) => {
                let mut slots = value.into_slots();
                slots.push(Slot::Error(None));
                slots
            }
            Err(err) => {
                let mut slots: Vec<Slot> = T::return_types()
                    .iter()
                    .map(|_| Slot::Value(Dynamic::Void))
                    .collect();
                slots.push(Slot::Error(Some(err.into())));
                slots
            }
        }
    }
}

impl<A: ReturnSpec, B: ReturnSpec> ReturnSpec for (A, B) {
    fn return_types() -> Vec<ReturnType> {
        let mut types = A::return_types();
        types.extend(B::return_types());
        types
    }

    fn into_slots(self) -> Vec<Slot> {
        let mut slots = self.0.into_slots();
        slots.extend(self.1.into_slots());
        slots
    }
}

/// Build a signature from parameter kinds.
///
/// # Panics
///
/// Panics with [`ContractViolation::RestNotLast`] if a repeated parameter is
/// followed by another parameter.
pub fn signature_from_kinds(kinds: &[ParamKind], returns: Vec<ReturnType>) -> Signature {
    let mut signature = Signature::new();
    for (position, kind) in kinds.iter().enumerate() {
        match *kind {
            ParamKind::Single(param) => signature.params.push(param),
            ParamKind::Rest(element) if position + 1 == kinds.len() => {
                signature.variadic = Some(element)
            }
            ParamKind::Rest(_) => panic!(
                "{}",
                ContractViolation::RestNotLast {
                    position,
                    count: kinds.len(),
                }
            ),
        }
    }
    signature.returns = returns;
    signature
}

/// Slots reporting an argument conversion failure.
fn conversion_failure(returns: &[ReturnType], err: ConversionError) -> Vec<Slot> {
    let mut slots: Vec<Slot> = returns
        .iter()
        .take(returns.len().saturating_sub(1))
        .map(|_| Slot::Value(Dynamic::Void))
        .collect();
    slots.push(Slot::Error(Some(NativeError::Conversion(err))));
    slots
}

/// Conversion of a typed Rust callable into a [`NativeFn`].
pub trait IntoNativeFn<Args, Ret> {
    fn into_native_fn(self) -> NativeFn;
}

impl IntoNativeFn<NativeFn, NativeFn> for NativeFn {
    fn into_native_fn(self) -> NativeFn {
        self
    }
}

macro_rules! impl_into_native_fn {
    ($($arg:ident),*) => {
        impl<F, R, $($arg,)*> IntoNativeFn<($($arg,)*), R> for F
        where
            F: Fn($($arg),*) -> R + Send + Sync + 'static,
            R: ReturnSpec + 'static,
            $($arg: HostParam + 'static,)*
        {
            #[allow(non_snake_case, unused_mut, unused_variables, unused_assignments)]
            fn into_native_fn(self) -> NativeFn {
                let kinds: Vec<ParamKind> = vec![$(<$arg as HostParam>::kind()),*];
                let returns = R::return_types();
                let signature = signature_from_kinds(&kinds, returns.clone());

                NativeFn::new(signature, move |args: Vec<Dynamic>| {
                    let mut args = args.into_iter();
                    let mut index = 0usize;
                    $(
                        let $arg = match <$arg as HostParam>::from_args(&mut args, index) {
                            Ok(value) => value,
                            Err(err) => return conversion_failure(&returns, err),
                        };
                        index += 1;
                    )*
                    (self)($($arg),*).into_slots()
                })
            }
        }
    };
}

impl_into_native_fn!();
impl_into_native_fn!(A);
impl_into_native_fn!(A, B);
impl_into_native_fn!(A, B, C);
impl_into_native_fn!(A, B, C, D);
impl_into_native_fn!(A, B, C, D, E);
impl_into_native_fn!(A, B, C, D, E, G);
impl_into_native_fn!(A, B, C, D, E, G, H);
impl_into_native_fn!(A, B, C, D, E, G, H, J);
