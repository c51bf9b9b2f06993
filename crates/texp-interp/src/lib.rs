// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tree-walking evaluator for texp expressions.
//!
//! Values are evaluated directly from the AST against a [`Scope`]. Scopes
//! are immutable and cheap to clone, so one expression can be evaluated
//! against many scopes, from many threads.

mod builtins;
mod check;
mod error;
mod eval;
mod scope;
mod value;

pub use check::{check_value, Mismatch, PathSegment};
pub use error::{EvalError, RuntimeError, ScopeError};
pub use eval::Evaluate;
pub use scope::{FunctionEntry, Scope};
pub use value::{Callable, MapKey, StructValue, Value};
