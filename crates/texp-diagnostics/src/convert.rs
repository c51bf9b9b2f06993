// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Conversions from phase error types to `Diagnostic`.
//!
//! The `ToDiagnostic` trait is implemented for every error type a texp
//! phase can raise.

use texp_interp::{EvalError, RuntimeError, ScopeError};
use texp_lexer::SyntaxError;
use texp_lower::LowerError;
use texp_parser::ParseError;
use texp_types::{TypeError, BUILTIN_FUNCTIONS, BUILTIN_TYPES};

use crate::suggestions::did_you_mean;
use crate::{Diagnostic, ToDiagnostic};

// ============================================================================
// Syntax Errors
// ============================================================================

/// Syntax errors carry no kind, only a message; classify by its wording.
fn syntax_code(message: &str) -> &'static str {
    if message.starts_with("Unexpected character") {
        "E0101"
    } else if message.starts_with("Unterminated string") {
        "E0102"
    } else if message.starts_with("Expected '=='") {
        "E0103"
    } else if message.starts_with("Invalid number") {
        "E0104"
    } else if message.starts_with("Expected ") {
        "E0105"
    } else if message.starts_with("Unexpected token") {
        "E0106"
    } else if message.ends_with("is not declared") {
        "E0107"
    } else if message.starts_with("Call to ") {
        "E0108"
    } else {
        "E0100"
    }
}

impl ToDiagnostic for SyntaxError {
    fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(&self.message)
            .with_code(syntax_code(&self.message))
            .with_primary(self.span, "here");

        if let Some(ref hint) = self.hint {
            diag = diag.with_help(hint.as_str());
        }

        diag
    }
}

// ============================================================================
// Type Errors
// ============================================================================

impl ToDiagnostic for TypeError {
    fn to_diagnostic(&self) -> Diagnostic {
        let message = self.to_string();
        let span = self.span();

        let mut diag = match self {
            TypeError::UnknownType { name, .. } => {
                let diag = Diagnostic::error(message)
                    .with_code("E0200")
                    .with_primary(span, "not a known type or alias");
                match did_you_mean(name, BUILTIN_TYPES.iter().copied()) {
                    Some(suggestion) => diag.with_help(suggestion),
                    None => diag,
                }
            }
            TypeError::TypeTakesNoArgs { .. } => Diagnostic::error(message)
                .with_code("E0201")
                .with_primary(span, "remove the type arguments"),
            TypeError::WrongArity { expected, .. } => Diagnostic::error(message)
                .with_code("E0202")
                .with_primary(span, format!("expected {} type argument(s)", expected)),
            TypeError::InvalidKeyType { .. } => Diagnostic::error(message)
                .with_code("E0203")
                .with_primary(span, "not a valid key type"),
            TypeError::DuplicateField { .. } => Diagnostic::error(message)
                .with_code("E0204")
                .with_primary(span, "field repeated here"),
            TypeError::Mismatch { expected, .. } => Diagnostic::error(message)
                .with_code("E0205")
                .with_primary(span, format!("expected `{}`", expected)),
            TypeError::BadOperand { found, .. } => Diagnostic::error(message)
                .with_code("E0206")
                .with_primary(span, format!("this is `{}`", found)),
            TypeError::Redeclared { .. } => Diagnostic::error(message)
                .with_code("E0207")
                .with_primary(span, "declared again here"),
            TypeError::DeclarationConflict { annotated, .. } => Diagnostic::error(message)
                .with_code("E0208")
                .with_primary(span, format!("annotated as `{}`", annotated)),
            TypeError::AlreadyDefined { .. } => Diagnostic::error(message).with_code("E0209"),
            TypeError::ReservedName { .. } => Diagnostic::error(message).with_code("E0210"),
            TypeError::LambdaHasNoType { .. } => Diagnostic::error(message)
                .with_code("E0211")
                .with_primary(span, "lambda used as a value"),
            TypeError::NotAStruct { found, .. } => Diagnostic::error(message)
                .with_code("E0212")
                .with_primary(span, format!("this is `{}`", found)),
            TypeError::NoSuchField { .. } => Diagnostic::error(message)
                .with_code("E0213")
                .with_primary(span, "unknown field"),
            TypeError::NotIndexable { .. } => Diagnostic::error(message)
                .with_code("E0214")
                .with_primary(span, "not a list or map"),
        };

        if let Some(related) = self.related_span() {
            diag = diag.with_secondary(related, "declared here");
        }
        if diag.help.is_none() {
            if let Some(hint) = self.hint() {
                diag = diag.with_help(hint);
            }
        }

        diag
    }
}

impl ToDiagnostic for ParseError {
    fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ParseError::Syntax(e) => e.to_diagnostic(),
            ParseError::Type(e) => e.to_diagnostic(),
        }
    }
}

// ============================================================================
// Evaluation Errors
// ============================================================================

fn runtime_code(error: &RuntimeError) -> &'static str {
    match error {
        RuntimeError::UndefinedVariable(_) => "E0300",
        RuntimeError::UndefinedFunction(_) => "E0301",
        RuntimeError::TypeAssertion { .. } => "E0302",
        RuntimeError::ArityMismatch { .. } => "E0303",
        RuntimeError::BadArgument { .. } => "E0304",
        RuntimeError::BadOperand { .. } => "E0305",
        RuntimeError::Overflow { .. } => "E0306",
        RuntimeError::NoSuchField { .. } => "E0307",
        RuntimeError::NotAStruct { .. } => "E0308",
        RuntimeError::MissingKey { .. } => "E0309",
        RuntimeError::IndexOutOfBounds { .. } => "E0310",
        RuntimeError::NotIndexable { .. } => "E0311",
        RuntimeError::CannotInferType { .. } => "E0312",
        RuntimeError::Scope(_) => "E0313",
        RuntimeError::InLambda(inner) => runtime_code(&inner.error),
    }
}

impl ToDiagnostic for EvalError {
    fn to_diagnostic(&self) -> Diagnostic {
        if let RuntimeError::InLambda(inner) = &self.error {
            return inner.to_diagnostic();
        }
        let diag = Diagnostic::error(self.error.to_string())
            .with_code(runtime_code(&self.error))
            .with_primary(self.span, "while evaluating this");

        match &self.error {
            RuntimeError::UndefinedVariable(_) => {
                diag.with_help("pass a value for it when evaluating")
            }
            RuntimeError::UndefinedFunction(name) => {
                match did_you_mean(name, BUILTIN_FUNCTIONS.iter().copied()) {
                    Some(suggestion) => diag.with_help(suggestion),
                    None => diag.with_note("functions come from the built-ins or the host"),
                }
            }
            RuntimeError::Scope(ScopeError::Shadowing { .. }) => diag.with_note(
                "lambda parameters cannot reuse a name visible from the enclosing scope",
            ),
            _ => diag,
        }
    }
}

impl ToDiagnostic for RuntimeError {
    fn to_diagnostic(&self) -> Diagnostic {
        if let RuntimeError::InLambda(inner) = self {
            return inner.to_diagnostic();
        }
        Diagnostic::error(self.to_string()).with_code(runtime_code(self))
    }
}

// ============================================================================
// Lowering Errors
// ============================================================================

impl ToDiagnostic for LowerError {
    fn to_diagnostic(&self) -> Diagnostic {
        match self {
            LowerError::Unsupported { backend, .. } => Diagnostic::error(self.to_string())
                .with_code("E0400")
                .with_primary(self.span(), format!("no {} equivalent", backend)),
        }
    }
}
