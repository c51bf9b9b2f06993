// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Per-parse declaration table, filled by `declare name: Type` and by hosts.

use indexmap::IndexMap;
use texp_ast::{Span, Type};

use crate::TypeError;

/// A variable whose type is known ahead of its use.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub ty: Type,
    /// Synthetic for host-supplied declarations.
    pub span: Span,
}

/// Declarations visible for the rest of a parse.
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    entries: IndexMap<String, Declaration>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declaration. Declaring a name twice is an error.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        ty: Type,
        span: Span,
    ) -> Result<(), TypeError> {
        let name = name.into();
        if let Some(previous) = self.entries.get(&name) {
            return Err(TypeError::Redeclared { name, span, previous: previous.span });
        }
        tracing::debug!(name = %name, ty = %ty, "declared");
        self.entries.insert(name.clone(), Declaration { name, ty, span });
        Ok(())
    }

    /// Builder form for hosts seeding a parse.
    pub fn with(mut self, name: impl Into<String>, ty: Type) -> Result<Self, TypeError> {
        self.declare(name, ty, Span::default())?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.entries.get(name)
    }

    /// Type of a reference written `name:annotated`. A prior declaration
    /// must agree exactly with the annotation.
    pub fn check_annotation(
        &self,
        name: &str,
        annotated: Type,
        span: Span,
    ) -> Result<Type, TypeError> {
        match self.entries.get(name) {
            Some(decl) if !decl.ty.equals(&annotated) => Err(TypeError::DeclarationConflict {
                name: name.to_string(),
                declared: decl.ty.clone(),
                annotated,
                span,
                declared_at: decl.span,
            }),
            _ => Ok(annotated),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redeclaring_names_both_locations() {
        let mut decls = Declarations::new();
        let first = Span::new(1, 9, 1, 12);
        let second = Span::new(1, 25, 1, 28);
        decls.declare("foo", Type::Int, first).unwrap();
        let err = decls.declare("foo", Type::String, second).unwrap_err();
        let expected = TypeError::Redeclared { name: "foo".into(), span: second, previous: first };
        assert_eq!(err, expected);
    }

    #[test]
    fn annotation_must_match_declaration() {
        let decls = Declarations::new().with("foo", Type::Int).unwrap();
        assert!(decls.check_annotation("foo", Type::Int, Span::default()).is_ok());
        let err = decls.check_annotation("foo", Type::String, Span::new(2, 1, 2, 4)).unwrap_err();
        assert!(matches!(err, TypeError::DeclarationConflict { .. }));
        assert_eq!(err.span(), Span::new(2, 1, 2, 4));
        assert_eq!(err.related_span(), Some(Span::default()));
    }

    #[test]
    fn undeclared_annotations_are_trusted() {
        let decls = Declarations::new();
        let ty = decls.check_annotation("bar", Type::list(Type::Int), Span::default()).unwrap();
        assert!(ty.equals(&Type::list(Type::Int)));
    }
}
