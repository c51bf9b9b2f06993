// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Static rules checked while parsing.
//!
//! Each check takes operand types with the spans errors should point at, and
//! either accepts or returns the first violation.

use texp_ast::{Span, Type};

use crate::TypeError;

/// `left === right`: the right side must have exactly the left side's type.
pub fn check_eq(left: &Type, right: &Type, right_span: Span) -> Result<(), TypeError> {
    expect_equal(left, right, right_span)
}

/// `left || right`: both sides must be `bool`.
pub fn check_or(
    left: &Type,
    left_span: Span,
    right: &Type,
    right_span: Span,
) -> Result<(), TypeError> {
    for (ty, span) in [(left, left_span), (right, right_span)] {
        if !matches!(ty.canonical(), Type::Bool) {
            let found = ty.clone();
            return Err(TypeError::BadOperand { op: "||", expected: "bool", found, span });
        }
    }
    Ok(())
}

/// Unary `-`.
pub fn check_negative(operand: &Type, span: Span) -> Result<(), TypeError> {
    expect_numeric("-", operand, span)
}

/// Binary `-` and `>`: both sides numeric, and of the same type.
pub fn check_arithmetic(
    op: &'static str,
    left: &Type,
    left_span: Span,
    right: &Type,
    right_span: Span,
) -> Result<(), TypeError> {
    expect_numeric(op, left, left_span)?;
    expect_numeric(op, right, right_span)?;
    expect_equal(left, right, right_span)
}

/// Type of `target.field`, with or without a `:Type` annotation.
///
/// Struct targets answer from their field map; an annotation must agree
/// with it. Other targets need the annotation, which is trusted.
pub fn field_type(
    target: &Type,
    field: &str,
    annotated: Option<Type>,
    span: Span,
) -> Result<Type, TypeError> {
    match (target.fields(), annotated) {
        (Some(fields), annotated) => {
            let field_ty = fields.get(field).ok_or_else(|| TypeError::NoSuchField {
                ty: target.clone(),
                field: field.to_string(),
                span,
            })?;
            if let Some(annotated) = annotated {
                expect_equal(field_ty, &annotated, span)?;
            }
            Ok(field_ty.clone())
        }
        (None, Some(annotated)) => Ok(annotated),
        (None, None) => {
            Err(TypeError::NotAStruct { found: target.clone(), field: field.to_string(), span })
        }
    }
}

/// Type of `target[key]`. Lists take `int` keys, maps take their key type.
pub fn offset_type(
    target: &Type,
    target_span: Span,
    key: &Type,
    key_span: Span,
) -> Result<Type, TypeError> {
    match target.canonical() {
        Type::List(elem) => {
            expect_equal(&Type::Int, key, key_span)?;
            Ok((**elem).clone())
        }
        Type::Map { key: key_ty, value } => {
            expect_equal(key_ty, key, key_span)?;
            Ok((**value).clone())
        }
        _ => Err(TypeError::NotIndexable { found: target.clone(), span: target_span }),
    }
}

/// Later elements of a list literal must fit the first element's type.
pub fn check_list_element(first: &Type, element: &Type, span: Span) -> Result<(), TypeError> {
    if element.is_subtype_of(first) {
        Ok(())
    } else {
        Err(TypeError::Mismatch { expected: first.clone(), found: element.clone(), span })
    }
}

/// Exact type equality, reported against `span`.
pub fn expect_equal(expected: &Type, found: &Type, span: Span) -> Result<(), TypeError> {
    if found.equals(expected) {
        Ok(())
    } else {
        Err(TypeError::Mismatch { expected: expected.clone(), found: found.clone(), span })
    }
}

fn expect_numeric(op: &'static str, ty: &Type, span: Span) -> Result<(), TypeError> {
    if ty.is_numeric() {
        Ok(())
    } else {
        Err(TypeError::BadOperand { op, expected: "int or float", found: ty.clone(), span })
    }
}
