// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error hints - suggestions for fixing common mistakes.
//!
//! Kept separate from the grammar to avoid clutter.

use texp_ast::token::TokenKind;

/// Get a hint for an "expected X" error based on what was found instead.
pub fn for_expected(expected: &str, found: Option<&TokenKind>) -> Option<&'static str> {
    match (expected, found) {
        ("')'", None) => Some("add ')' to close the parenthesis"),
        ("']'", None) => Some("add ']' to close the bracket"),
        ("'}'", None) => Some("add '}' to close the struct literal"),
        ("'|'", _) => Some("lambda parameters are bare names: |a, b| body"),
        ("'>'", _) => Some("close the type argument list with '>'"),
        ("'->'", _) => Some("function types are written fn(params) -> Return"),
        ("':'", _) => Some("syntax: name: Type"),

        ("expression", Some(TokenKind::Int(n))) if *n < 0 => {
            Some("write '- 5' with a space to subtract a literal")
        }
        ("expression", Some(TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace)) => {
            Some("remove the extra closing delimiter")
        }
        ("expression", None) => Some("the expression is incomplete"),
        ("expression", _) => Some("try a literal, a variable like `name:Type`, or a lambda"),

        ("a name", Some(TokenKind::Int(_) | TokenKind::Float(_))) => {
            Some("names can't start with a number")
        }
        ("type", _) => Some("try a type like 'int', 'list<string>', or 'fn(int) -> bool'"),
        ("end of input", Some(TokenKind::Int(n))) if *n < 0 => {
            Some("write '- 5' with a space to subtract a literal")
        }
        ("end of input", _) => Some("only one expression is allowed"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_literal_after_operand() {
        assert!(for_expected("end of input", Some(&TokenKind::Int(-5))).unwrap().contains("- 5"));
    }

    #[test]
    fn incomplete_expression() {
        assert_eq!(for_expected("expression", None), Some("the expression is incomplete"));
    }
}
