// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Static type errors.

use texp_ast::{Span, Type};

/// A static type error, raised while parsing. Always fatal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeError {
    #[error("unknown type: {name}")]
    UnknownType { name: String, span: Span },
    #[error("type {name} takes no type arguments")]
    TypeTakesNoArgs { name: String, span: Span },
    #[error("{name} expects {expected} type argument(s), found {found}")]
    WrongArity {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },
    #[error("invalid key type {found}: map keys must be int or string")]
    InvalidKeyType { found: Type, span: Span },
    #[error("duplicate field '{name}'")]
    DuplicateField { name: String, span: Span },
    #[error("type mismatch: expected {expected}, found {found}")]
    Mismatch {
        expected: Type,
        found: Type,
        span: Span,
    },
    #[error("operand of '{op}' must be {expected}, found {found}")]
    BadOperand {
        op: &'static str,
        expected: &'static str,
        found: Type,
        span: Span,
    },
    #[error("'{name}' is already declared")]
    Redeclared {
        name: String,
        span: Span,
        previous: Span,
    },
    #[error("'{name}' is declared as {declared} at {declared_at} but annotated as {annotated}")]
    DeclarationConflict {
        name: String,
        declared: Type,
        annotated: Type,
        span: Span,
        declared_at: Span,
    },
    #[error("{what} '{name}' is already defined")]
    AlreadyDefined { what: &'static str, name: String },
    #[error("cannot redefine built-in {what} '{name}'")]
    ReservedName { what: &'static str, name: String },
    #[error("lambda has no static type")]
    LambdaHasNoType { span: Span },
    #[error("cannot access field '{field}' on non-struct type {found}")]
    NotAStruct {
        found: Type,
        field: String,
        span: Span,
    },
    #[error("no such field '{field}' on type {ty}")]
    NoSuchField { ty: Type, field: String, span: Span },
    #[error("type {found} cannot be indexed")]
    NotIndexable { found: Type, span: Span },
}

impl TypeError {
    /// Primary location. Registry errors come from host calls and carry a
    /// synthetic span.
    pub fn span(&self) -> Span {
        match self {
            TypeError::UnknownType { span, .. }
            | TypeError::TypeTakesNoArgs { span, .. }
            | TypeError::WrongArity { span, .. }
            | TypeError::InvalidKeyType { span, .. }
            | TypeError::DuplicateField { span, .. }
            | TypeError::Mismatch { span, .. }
            | TypeError::BadOperand { span, .. }
            | TypeError::Redeclared { span, .. }
            | TypeError::DeclarationConflict { span, .. }
            | TypeError::LambdaHasNoType { span }
            | TypeError::NotAStruct { span, .. }
            | TypeError::NoSuchField { span, .. }
            | TypeError::NotIndexable { span, .. } => *span,
            TypeError::AlreadyDefined { .. } | TypeError::ReservedName { .. } => Span::default(),
        }
    }

    /// Second location worth pointing at, if any.
    pub fn related_span(&self) -> Option<Span> {
        match self {
            TypeError::Redeclared { previous, .. } => Some(*previous),
            TypeError::DeclarationConflict { declared_at, .. } => Some(*declared_at),
            _ => None,
        }
    }

    pub fn hint(&self) -> Option<String> {
        match self {
            TypeError::InvalidKeyType { .. } => {
                Some("use map<int, V> or map<string, V>".to_string())
            }
            TypeError::DeclarationConflict { name, .. } => Some(format!(
                "drop the annotation and write `{}` alone to use the declared type",
                name
            )),
            TypeError::LambdaHasNoType { .. } => {
                Some("lambdas can only be passed as call arguments".to_string())
            }
            TypeError::NotAStruct { field, .. } => {
                Some(format!("annotate the access as `.{}:Type`", field))
            }
            _ => None,
        }
    }
}
