// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Untyped syntax of type annotations, before resolution.

use std::fmt;

use crate::Span;

/// A type annotation as written. Resolved against a type registry into a
/// [`crate::Type`].
#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    pub kind: TypeNodeKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeNodeKind {
    /// `name` or `name<arg, ...>`
    Named { name: String, args: Vec<TypeNode> },
    /// `fn(param, ...) -> ret`
    Func { params: Vec<TypeNode>, ret: Box<TypeNode> },
    /// `{field: Type, ...}`
    Struct { fields: Vec<FieldNode> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    pub name: String,
    pub ty: TypeNode,
    pub span: Span,
}

impl TypeNode {
    pub fn named(name: impl Into<String>, args: Vec<TypeNode>, span: Span) -> Self {
        Self { kind: TypeNodeKind::Named { name: name.into(), args }, span }
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeNodeKind::Named { name, args } => {
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeNodeKind::Func { params, ret } => {
                write!(f, "fn(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p)?;
                }
                write!(f, ") -> {}", ret)
            }
            TypeNodeKind::Struct { fields } => {
                write!(f, "{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.ty)?;
                }
                write!(f, "}}")
            }
        }
    }
}
