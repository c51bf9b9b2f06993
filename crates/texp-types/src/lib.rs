// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Static side of texp: the type registry, annotation resolution,
//! per-parse declarations, and the operator rules the parser enforces.

mod builtins;
mod declarations;
mod errors;
mod registry;
pub mod rules;

pub use builtins::{
    builtin_signatures, is_builtin_function, is_builtin_type, BUILTIN_FUNCTIONS, BUILTIN_TYPES,
};
pub use declarations::{Declaration, Declarations};
pub use errors::TypeError;
pub use registry::Types;
