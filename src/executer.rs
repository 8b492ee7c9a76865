//! Reference binding environment.
//!
//! [`Executer`] keeps script variables and bound host functions in separate
//! tables that share one namespace. Variables are reachable through
//! [`Environment`], so keys can synchronize against it; functions are only
//! reachable through [`Executer::call`] and cannot be read or overwritten as
//! variables.

use std::fmt;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;
use twig_core::{Bindings, Dynamic, EnvError, Environment};
use twig_ffi::{BoundFn, FuncMap, FunctionScope, IntoNativeFn};

use crate::error::{Result, TwigError};
use crate::script::{Evaluator, Preprocessor, remap_error};

/// Variables, host functions, and the script evaluator that uses them.
#[derive(Default)]
pub struct Executer {
    vars: Bindings,
    funcs: FxHashMap<String, BoundFn>,
    // Every name the loader returned, nil entries included
    reserved: FxHashSet<String>,
    evaluator: Option<Rc<dyn Evaluator>>,
    preprocessor: Option<Rc<dyn Preprocessor>>,
}

impl Executer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an executer and bind every function the loader returns.
    ///
    /// The loader sees the executer before its functions are bound, so it
    /// may define variables the functions depend on. Every name in the
    /// returned map is reserved for functions, even when its entry is nil.
    pub fn with_loader<L>(loader: L) -> Result<Self>
    where
        L: FnOnce(&mut Executer) -> FuncMap,
    {
        let mut exec = Self::new();
        let funcs = loader(&mut exec);
        funcs.export(&mut exec)?;
        exec.reserved.extend(funcs.keys());
        Ok(exec)
    }

    pub fn set_evaluator(&mut self, evaluator: impl Evaluator + 'static) {
        self.evaluator = Some(Rc::new(evaluator));
    }

    /// Rewrite scripts before evaluation; errors are mapped back afterwards.
    pub fn set_preprocessor(&mut self, preprocessor: impl Preprocessor + 'static) {
        self.preprocessor = Some(Rc::new(preprocessor));
    }

    pub fn clear_preprocessor(&mut self) {
        self.preprocessor = None;
    }

    /// Whether `name` is bound to a host function.
    pub fn is_function(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    /// Whether `name` is unavailable as a variable.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.funcs.contains_key(name) || self.reserved.contains(name)
    }

    pub fn function(&self, name: &str) -> Option<&BoundFn> {
        self.funcs.get(name)
    }

    /// Bound function names in sorted order.
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.funcs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Variable names in sorted order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.vars.names()
    }

    /// Wrap and bind a host function. Fails if `name` is already bound.
    pub fn create_fn<Args, Ret>(
        &mut self,
        name: &str,
        f: impl IntoNativeFn<Args, Ret>,
    ) -> Result<()> {
        self.bind(name, BoundFn::wrap(name, f))?;
        Ok(())
    }

    /// Replace an existing host function.
    pub fn override_fn<Args, Ret>(
        &mut self,
        name: &str,
        f: impl IntoNativeFn<Args, Ret>,
    ) -> Result<()> {
        let Some(slot) = self.funcs.get_mut(name) else {
            return Err(EnvError::NoSuchFunction(name.to_string()).into());
        };
        *slot = BoundFn::wrap(name, f);
        debug!(function = %name, "overrode host function");
        Ok(())
    }

    /// Invoke a bound host function.
    pub fn call(&self, name: &str, args: &[Dynamic]) -> Result<Dynamic> {
        let func = self
            .funcs
            .get(name)
            .ok_or_else(|| EnvError::NoSuchFunction(name.to_string()))?;
        Ok(func.invoke(args)?)
    }

    fn bind(&mut self, name: &str, f: BoundFn) -> std::result::Result<(), EnvError> {
        if self.funcs.contains_key(name) {
            return Err(EnvError::FunctionExists(name.to_string()));
        }
        if self.vars.is_bound(name) {
            return Err(EnvError::AlreadyDefined(name.to_string()));
        }
        debug!(function = %name, arity = f.signature().arity(), "bound host function");
        self.funcs.insert(name.to_string(), f);
        Ok(())
    }

    /// Evaluate a script file.
    pub fn exec(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let code = fs::read_to_string(path).map_err(|source| TwigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.exec_string(&path.to_string_lossy(), &code)
    }

    /// Evaluate script source, preprocessing it first if configured.
    ///
    /// The evaluator may call back into `exec_string`, e.g. to include
    /// another script.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn exec_string(&mut self, name: &str, code: &str) -> Result<()> {
        let evaluator = self.evaluator.clone().ok_or(TwigError::NoEvaluator)?;

        let result = match self.preprocessor.clone() {
            Some(preprocessor) => preprocessor.process(name, code).and_then(|processed| {
                evaluator
                    .eval(self, name, &processed.code)
                    .map_err(|err| remap_error(name, processed.map.as_ref(), err))
            }),
            None => evaluator.eval(self, name, code),
        };

        result.map_err(TwigError::from)
    }
}

impl fmt::Debug for Executer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executer")
            .field("vars", &self.vars)
            .field("funcs", &self.function_names())
            .field("evaluator", &self.evaluator.is_some())
            .field("preprocessor", &self.preprocessor.is_some())
            .finish()
    }
}

impl Environment for Executer {
    fn has(&self, name: &str) -> bool {
        !self.is_reserved(name) && self.vars.has(name)
    }

    fn get(&self, name: &str) -> std::result::Result<Dynamic, EnvError> {
        if self.is_reserved(name) {
            return Err(EnvError::FunctionNotGettable(name.to_string()));
        }
        self.vars.get(name)
    }

    fn set(&mut self, name: &str, value: Dynamic) -> std::result::Result<(), EnvError> {
        if self.is_reserved(name) {
            return Err(EnvError::FunctionExists(name.to_string()));
        }
        self.vars.set(name, value)
    }

    fn create(&mut self, name: &str, value: Dynamic) -> std::result::Result<(), EnvError> {
        if self.is_reserved(name) {
            return Err(EnvError::FunctionExists(name.to_string()));
        }
        self.vars.create(name, value)
    }
}

impl FunctionScope for Executer {
    fn create_fn(&mut self, name: &str, f: BoundFn) -> std::result::Result<(), EnvError> {
        self.bind(name, f)
    }
}
