// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Evaluation and scope errors.

use texp_ast::{Span, Type};

use crate::Mismatch;

/// A runtime failure. Evaluation stops at the first one.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),

    #[error("undefined function `{0}`")]
    UndefinedFunction(String),

    #[error("{what} does not match its declared type {ty}: {mismatch}")]
    TypeAssertion {
        what: String,
        ty: Type,
        mismatch: Mismatch,
    },

    #[error(
        "`{function}` expects {expected} argument{}, got {got}",
        if *.expected == 1 { "" } else { "s" }
    )]
    ArityMismatch {
        function: String,
        expected: usize,
        got: usize,
    },

    #[error("argument {index} of `{function}` must be {expected}, found {found}")]
    BadArgument {
        function: String,
        index: usize,
        expected: &'static str,
        found: String,
    },

    #[error("operator `{op}` cannot be applied to {found}")]
    BadOperand { op: &'static str, found: String },

    #[error("integer overflow in `{op}`")]
    Overflow { op: &'static str },

    #[error("no field `{field}` on {ty}")]
    NoSuchField { ty: String, field: String },

    #[error("cannot read field `{field}` of {found}")]
    NotAStruct { field: String, found: String },

    #[error("key {key} not found")]
    MissingKey { key: String },

    #[error("index {index} out of bounds (length is {len})")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("cannot index into {found} with {key}")]
    NotIndexable { found: String, key: String },

    #[error("cannot infer a type: {reason}")]
    CannotInferType { reason: String },

    #[error(transparent)]
    Scope(#[from] ScopeError),

    /// Failure inside a lambda body, with the span of the node that failed
    /// there. Unwrapped again when it reaches the enclosing call.
    #[error("{0}")]
    InLambda(Box<EvalError>),
}

/// Misuse of the scope constructors by the host.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScopeError {
    #[error("{kind} `{name}` is already visible from an enclosing scope")]
    Shadowing { kind: &'static str, name: String },

    #[error("built-in function `{name}` cannot be rebound")]
    ReservedFunction { name: String },
}

/// Runtime error with the location of the node that raised it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{error}")]
pub struct EvalError {
    pub error: RuntimeError,
    pub span: Span,
}

impl EvalError {
    pub fn new(error: RuntimeError, span: Span) -> Self {
        Self { error, span }
    }
}
