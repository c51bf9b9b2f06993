// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Syntax and type model shared by every texp phase.
//!
//! This crate defines the pieces the lexer, parser, evaluator, and lowering
//! backends agree on: source spans, tokens, the structural `Type` model,
//! untyped type annotations, and the closed set of expression nodes.

pub mod span;
pub mod token;
pub mod ty;
pub mod type_node;
pub mod expr;

pub use expr::{Expr, ExprKind, Literal, NodeKind};
pub use span::{LineMap, Span};
pub use ty::Type;
pub use type_node::{TypeNode, TypeNodeKind};
