//! Bound host functions.
//!
//! [`BoundFn::wrap`] validates a host function's declared return contract
//! once and produces a value that can be invoked many times with untyped
//! script arguments. Every invocation checks argument count and types
//! against the declared [`Signature`] before the host function runs, then
//! normalizes whatever it produced into a single value or error.

use tracing::{debug, trace};
use twig_core::{Dynamic, NativeError, NativeFn, ReturnType, Signature, Slot};

use crate::error::{CallError, ContractViolation};
use crate::format::format_signature;
use crate::params::IntoNativeFn;

/// A host function bound to a script-visible name.
#[derive(Debug, Clone)]
pub struct BoundFn {
    name: String,
    func: NativeFn,
}

impl BoundFn {
    /// Bind a host function under `name`.
    ///
    /// # Panics
    ///
    /// Panics with a [`ContractViolation`] if the function declares more than
    /// two return values, or two return values where the second is not an
    /// error.
    pub fn wrap<Args, Ret>(name: &str, f: impl IntoNativeFn<Args, Ret>) -> Self {
        let func = f.into_native_fn();
        if let Err(violation) = validate(name, func.signature()) {
            panic!("{violation}");
        }

        debug!(
            function = %name,
            arity = func.signature().arity(),
            variadic = func.signature().is_variadic(),
            "wrapped host function"
        );

        Self {
            name: name.to_string(),
            func,
        }
    }

    /// Bind a function held in a script value.
    ///
    /// # Panics
    ///
    /// Panics with [`ContractViolation::NotCallable`] if `value` is not a
    /// function, and otherwise as [`wrap`](Self::wrap).
    pub fn wrap_value(name: &str, value: &Dynamic) -> Self {
        match value.as_function() {
            Some(func) => Self::wrap(name, func.clone()),
            None => panic!(
                "{}",
                ContractViolation::NotCallable {
                    name: name.to_string(),
                    got: value.type_name(),
                }
            ),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        self.func.signature()
    }

    pub fn native_fn(&self) -> &NativeFn {
        &self.func
    }

    /// Canonical rendering, e.g. `add :: int -> int => int`.
    pub fn format(&self) -> String {
        format_signature(&self.name, self.signature())
    }

    /// Check the arguments and call the host function.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn invoke(&self, args: &[Dynamic]) -> Result<Dynamic, CallError> {
        self.check_args(args)?;
        let slots = self.func.call(args.to_vec());
        self.normalize(slots)
    }

    fn check_args(&self, args: &[Dynamic]) -> Result<(), CallError> {
        let signature = self.signature();
        let arity = signature.arity();

        let count_ok = match signature.variadic {
            Some(_) => args.len() >= arity,
            None => args.len() == arity,
        };
        if !count_ok {
            trace!(function = %self.name, got = args.len(), arity, "parameter count mismatch");
            return Err(CallError::ParamCount {
                name: self.name.clone(),
                signature: self.format(),
            });
        }

        for (index, arg) in args.iter().enumerate() {
            let expected = match signature.params.get(index) {
                Some(param) => *param,
                None => match signature.variadic {
                    Some(element) => element,
                    None => break,
                },
            };
            if !expected.accepts(arg) {
                trace!(function = %self.name, index, got = arg.type_name(), "parameter type mismatch");
                return Err(CallError::ParamType {
                    name: self.name.clone(),
                    index: Some(index),
                    got: arg.type_name(),
                    wants: vec![expected.name()],
                    signature: self.format(),
                });
            }
        }
        Ok(())
    }

    fn normalize(&self, slots: Vec<Slot>) -> Result<Dynamic, CallError> {
        let returns = &self.signature().returns;
        let produced = slots.len();
        let mut value = Dynamic::Void;

        for (position, slot) in slots.into_iter().enumerate() {
            match slot {
                Slot::Error(Some(err)) => return Err(self.attach(err)),
                Slot::Error(None) => {}
                Slot::Value(v) => {
                    if position == 0 {
                        value = v;
                    }
                }
            }
        }

        if produced != returns.len() {
            return Err(CallError::ReturnShape {
                name: self.name.clone(),
                expected: returns.len(),
                got: produced,
            });
        }
        match returns.first() {
            Some(ReturnType::Value(_)) => Ok(value),
            _ => Ok(Dynamic::Void),
        }
    }

    /// Attach this function's name to an error raised by the host function.
    fn attach(&self, err: NativeError) -> CallError {
        match err {
            NativeError::ParamType { got, want } => CallError::ParamType {
                name: self.name.clone(),
                index: None,
                got,
                wants: want,
                signature: self.format(),
            },
            NativeError::Type(e) => CallError::Type(e.with_name(&self.name)),
            other => CallError::Native(other),
        }
    }
}

/// Check the return contract of a host function.
fn validate(name: &str, signature: &Signature) -> Result<(), ContractViolation> {
    match signature.returns.as_slice() {
        [] | [_] => Ok(()),
        [_, ReturnType::Error] => Ok(()),
        [_, ReturnType::Value(second)] => Err(ContractViolation::SecondNotError {
            name: name.to_string(),
            got: second.name(),
        }),
        more => Err(ContractViolation::TooManyReturns {
            name: name.to_string(),
            count: more.len(),
        }),
    }
}
