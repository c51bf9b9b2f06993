// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser for texp expressions.
//!
//! Turns source text into a type-checked [`Expr`] in one pass. Syntax and
//! static type errors are both fatal; there is no recovery and no partial
//! tree.

mod cursor;
mod hints;
mod parser;
mod type_grammar;

use texp_ast::{Expr, Span, Type};
use texp_lexer::{SyntaxError, Tokenizer};
use texp_types::{rules, Declarations, TypeError, Types};

pub use parser::Parser;

/// Why a parse failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Type(#[from] TypeError),
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Syntax(e) => e.span,
            ParseError::Type(e) => e.span(),
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, ParseError::Syntax(_))
    }
}

/// Parse `text` against the registry's aliases.
pub fn parse(text: &str, types: &Types) -> Result<Expr, ParseError> {
    parse_with(text, types, Declarations::new())
}

/// Parse with declarations the host already knows about.
pub fn parse_with(text: &str, types: &Types, decls: Declarations) -> Result<Expr, ParseError> {
    let tokenizer = Tokenizer::new(text);
    let mut parser = Parser::new(&tokenizer, types, decls)?;
    let expr = parser.parse_program()?;
    match expr.try_ty() {
        Some(ty) => tracing::debug!(%ty, "parsed expression"),
        None => tracing::debug!("parsed lambda expression"),
    }
    Ok(expr)
}

/// Parse, then require the static type to be exactly `expected`.
pub fn parse_typed(text: &str, expected: &Type, types: &Types) -> Result<Expr, ParseError> {
    let expr = parse(text, types)?;
    let found = parser::static_type(&expr)?;
    rules::expect_equal(expected, &found, expr.span)?;
    Ok(expr)
}

/// Parse a standalone type annotation such as `map<string, list<int>>`.
pub fn parse_type(text: &str, types: &Types) -> Result<Type, ParseError> {
    let tokenizer = Tokenizer::new(text);
    let mut parser = Parser::new(&tokenizer, types, Declarations::new())?;
    let ty = parser.parse_type()?;
    parser.expect_end()?;
    Ok(ty)
}
