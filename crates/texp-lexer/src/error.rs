// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Syntax errors, shared by the lexer and the parser.

use texp_ast::Span;

/// A malformed token or grammar violation. Always fatal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self { span, message: message.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub(crate) fn unexpected_char(ch: char, span: Span) -> Self {
        Self::new(format!("Unexpected character '{}'", ch), span)
    }

    pub(crate) fn unterminated_string(span: Span) -> Self {
        Self::new("Unterminated string", span).with_hint("Add a closing '\"'")
    }

    pub(crate) fn incomplete_triple_eq(span: Span) -> Self {
        Self::new("Expected '==' after '='", span)
            .with_hint("equality is written '==='")
    }

    pub(crate) fn invalid_number(span: Span) -> Self {
        Self::new("Invalid number", span).with_hint("integers must fit in 64 bits")
    }
}
