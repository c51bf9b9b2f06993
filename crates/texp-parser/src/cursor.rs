// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Pull-based token cursor with one token of lookahead.

use texp_ast::token::{Token, TokenKind};
use texp_ast::Span;
use texp_lexer::{Lexer, SyntaxError, Tokenizer};

use crate::hints;

pub(crate) struct Cursor<'a> {
    lexer: Lexer<'a>,
    current: Option<Token>,
    /// End of the last token pulled from the lexer; end-of-input errors
    /// point here.
    last_end: Option<Span>,
    /// Span of the last consumed token.
    previous: Span,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(tokenizer: &'a Tokenizer<'_>) -> Result<Self, SyntaxError> {
        let mut cursor = Cursor {
            lexer: tokenizer.tokens(),
            current: None,
            last_end: None,
            previous: Span::point(1, 1),
        };
        cursor.pull()?;
        Ok(cursor)
    }

    fn pull(&mut self) -> Result<(), SyntaxError> {
        self.current = self.lexer.next().transpose()?;
        if let Some(tok) = &self.current {
            self.last_end = Some(Span::point(tok.span.end_line, tok.span.end_col));
        }
        Ok(())
    }

    pub(crate) fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    pub(crate) fn current_kind(&self) -> Option<&TokenKind> {
        self.current.as_ref().map(|t| &t.kind)
    }

    /// Span of the current token, or the end-of-input point.
    pub(crate) fn current_span(&self) -> Span {
        match &self.current {
            Some(tok) => tok.span,
            None => self.eof_span(),
        }
    }

    pub(crate) fn previous_span(&self) -> Span {
        self.previous
    }

    /// One column past the last token, or 1:1 for empty input.
    pub(crate) fn eof_span(&self) -> Span {
        self.last_end.unwrap_or(Span::point(1, 1))
    }

    pub(crate) fn at_end(&self) -> bool {
        self.current.is_none()
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind()
            .is_some_and(|k| std::mem::discriminant(k) == std::mem::discriminant(kind))
    }

    pub(crate) fn check_ident(&self, name: &str) -> bool {
        matches!(self.current_kind(), Some(TokenKind::Ident(n)) if n == name)
    }

    pub(crate) fn advance(&mut self) -> Result<Token, SyntaxError> {
        let tok = match self.current.take() {
            Some(tok) => tok,
            None => return Err(self.expected("more input")),
        };
        self.previous = tok.span;
        self.pull()?;
        Ok(tok)
    }

    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> Result<bool, SyntaxError> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind) -> Result<Token, SyntaxError> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.expected(kind.display_name()))
        }
    }

    pub(crate) fn expect_ident(&mut self) -> Result<(String, Span), SyntaxError> {
        match self.current_kind() {
            Some(TokenKind::Ident(_)) => {
                let tok = self.advance()?;
                match tok.kind {
                    TokenKind::Ident(name) => Ok((name, tok.span)),
                    _ => Err(self.expected("a name")),
                }
            }
            _ => Err(self.expected("a name")),
        }
    }

    /// "Expected X, found Y" at the current position.
    pub(crate) fn expected(&self, expected: &str) -> SyntaxError {
        let found = self.current_kind();
        let err = SyntaxError::new(format_expected_message(expected, found), self.current_span());
        match hints::for_expected(expected, found) {
            Some(hint) => err.with_hint(hint),
            None => err,
        }
    }
}

/// Format a user-friendly "expected X, found Y" message.
fn format_expected_message(expected: &str, found: Option<&TokenKind>) -> String {
    let found_name = found.map_or("end of input", |k| k.display_name());
    match (expected, found) {
        ("')'", None) => "Unclosed '(' - missing ')'".to_string(),
        ("']'", None) => "Unclosed '[' - missing ']'".to_string(),
        ("'}'", None) => "Unclosed '{' - missing '}'".to_string(),
        ("'|'", None) => "Unclosed lambda parameter list - missing '|'".to_string(),
        ("a name", _) => format!("Expected name, found {}", found_name),
        _ => format!("Expected {}, found {}", expected, found_name),
    }
}
