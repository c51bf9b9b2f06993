// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexically nested variable and function environments.

use std::sync::Arc;

use indexmap::IndexMap;
use texp_ast::Type;
use texp_types::{is_builtin_function, Declarations};

use crate::{builtins, Callable, RuntimeError, ScopeError, Value};

/// A function bound in a scope. The signature is documentation only; calls
/// are never checked against it.
#[derive(Debug, Clone)]
pub struct FunctionEntry {
    pub signature: Option<Type>,
    pub callable: Callable,
}

impl FunctionEntry {
    pub fn new(
        f: impl Fn(Vec<Value>) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    ) -> Self {
        Self { signature: None, callable: Callable::new(f) }
    }

    pub fn with_signature(mut self, signature: Type) -> Self {
        self.signature = Some(signature);
        self
    }
}

#[derive(Debug)]
struct Frame {
    vars: IndexMap<String, Value>,
    funcs: IndexMap<String, FunctionEntry>,
    parent: Option<Scope>,
}

/// An immutable environment level with an optional parent.
///
/// Lookups walk outward and take the first match. No level may bind a name
/// that is already visible through its parents, and only the root holds the
/// built-in functions. Cloning is cheap; clones share their frames.
#[derive(Debug, Clone)]
pub struct Scope(Arc<Frame>);

impl Default for Scope {
    fn default() -> Self {
        Scope::root()
    }
}

impl Scope {
    /// A root scope holding nothing but the built-ins.
    pub fn root() -> Scope {
        Scope::new(Vec::<(String, Value)>::new())
    }

    /// A root scope with the given variables.
    ///
    /// # Panics
    ///
    /// Panics if the bindings are invalid; see [`Scope::try_with_parent`].
    pub fn new<I, S>(vars: I) -> Scope
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Scope::with_parent(vars, Vec::<(String, FunctionEntry)>::new(), None)
    }

    /// A child scope of `self` with the given variables.
    ///
    /// # Panics
    ///
    /// Panics if a variable is already visible from `self`.
    pub fn sub<I, S>(&self, vars: I) -> Scope
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Scope::with_parent(vars, Vec::<(String, FunctionEntry)>::new(), Some(self))
    }

    pub fn try_sub<I, S>(&self, vars: I) -> Result<Scope, ScopeError>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Scope::try_with_parent(vars, Vec::<(String, FunctionEntry)>::new(), Some(self))
    }

    /// General constructor.
    ///
    /// # Panics
    ///
    /// Binding problems are programming errors in the host, not bad input,
    /// so this panics on them. Use [`Scope::try_with_parent`] to inspect
    /// them instead.
    pub fn with_parent<V, F, S, T>(vars: V, funcs: F, parent: Option<&Scope>) -> Scope
    where
        V: IntoIterator<Item = (S, Value)>,
        F: IntoIterator<Item = (T, FunctionEntry)>,
        S: Into<String>,
        T: Into<String>,
    {
        match Scope::try_with_parent(vars, funcs, parent) {
            Ok(scope) => scope,
            Err(e) => panic!("invalid scope: {}", e),
        }
    }

    /// Build a scope, rejecting names already visible through `parent` and
    /// any attempt to rebind a built-in function. A scope without a parent
    /// is a root and gets the built-ins.
    pub fn try_with_parent<V, F, S, T>(
        vars: V,
        funcs: F,
        parent: Option<&Scope>,
    ) -> Result<Scope, ScopeError>
    where
        V: IntoIterator<Item = (S, Value)>,
        F: IntoIterator<Item = (T, FunctionEntry)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut own_vars = IndexMap::new();
        for (name, value) in vars {
            let name = name.into();
            if parent.is_some_and(|p| p.get(&name).is_some()) {
                return Err(ScopeError::Shadowing { kind: "variable", name });
            }
            own_vars.insert(name, value);
        }

        let mut own_funcs = IndexMap::new();
        if parent.is_none() {
            own_funcs.extend(builtins::install());
        }
        for (name, entry) in funcs {
            let name = name.into();
            if is_builtin_function(&name) {
                return Err(ScopeError::ReservedFunction { name });
            }
            if parent.is_some_and(|p| p.function(&name).is_some()) {
                return Err(ScopeError::Shadowing { kind: "function", name });
            }
            own_funcs.insert(name, entry);
        }

        tracing::trace!(
            vars = own_vars.len(),
            funcs = own_funcs.len(),
            root = parent.is_none(),
            "scope created"
        );
        Ok(Scope(Arc::new(Frame { vars: own_vars, funcs: own_funcs, parent: parent.cloned() })))
    }

    pub fn parent(&self) -> Option<&Scope> {
        self.0.parent.as_ref()
    }

    /// Look up a variable here or in any enclosing scope.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let mut scope = self;
        loop {
            if let Some(value) = scope.0.vars.get(name) {
                return Some(value);
            }
            scope = scope.0.parent.as_ref()?;
        }
    }

    /// Look up a function here or in any enclosing scope.
    pub fn function(&self, name: &str) -> Option<&FunctionEntry> {
        let mut scope = self;
        loop {
            if let Some(entry) = scope.0.funcs.get(name) {
                return Some(entry);
            }
            scope = scope.0.parent.as_ref()?;
        }
    }

    /// Every visible variable, innermost level first.
    pub fn variables(&self) -> Vec<(&str, &Value)> {
        let mut out = Vec::new();
        let mut scope = Some(self);
        while let Some(s) = scope {
            out.extend(s.0.vars.iter().map(|(k, v)| (k.as_str(), v)));
            scope = s.0.parent.as_ref();
        }
        out
    }

    /// Declarations for every visible variable, with types inferred from
    /// their values. Lets a host parse bare references to its variables.
    pub fn declarations(&self) -> Result<Declarations, RuntimeError> {
        let mut decls = Declarations::new();
        for (name, value) in self.variables() {
            let ty = value.infer_type().map_err(|e| match e {
                RuntimeError::CannotInferType { reason } => RuntimeError::CannotInferType {
                    reason: format!("variable `{}`: {}", name, reason),
                },
                other => other,
            })?;
            decls = decls
                .with(name, ty)
                .map_err(|_| ScopeError::Shadowing { kind: "variable", name: name.to_string() })?;
        }
        Ok(decls)
    }
}
