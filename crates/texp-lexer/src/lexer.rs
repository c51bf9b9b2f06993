// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lexer implementation using logos.

use logos::Logos;
use texp_ast::token::{Token, TokenKind};
use texp_ast::{LineMap, Span};

use crate::SyntaxError;

/// Raw token type for logos - we parse values in a second pass.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    // === Operators (order matters - longer first) ===
    #[token("===")]
    TripleEq,
    #[token("||")]
    PipePipe,
    #[token("->")]
    Arrow,

    #[token("|")]
    Pipe,
    #[token("-")]
    Minus,
    #[token(".")]
    Dot,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,

    // === Literals ===
    // A digit or leading '-' starts a number; the match is the longest
    // prefix that is still numeric, so "1.2.3" yields "1.2".
    #[regex(r"-?[0-9]+\.[0-9]*")]
    Float,
    #[regex(r"-?[0-9]+")]
    Int,

    // No escapes: the string ends at the next quote.
    #[regex(r#""[^"]*""#)]
    String,

    // === Identifier ===
    // Anything up to whitespace or a reserved character.
    #[regex(r#"[^.\[\](){}<>"=|:, \t\r\n\f\-0-9][^.\[\](){}<>"=|:, \t\r\n\f\-]*"#)]
    Ident,
}

/// Entry point for tokenizing a piece of source text.
///
/// Each call to [`Tokenizer::tokens`] starts a fresh pass over the source.
pub struct Tokenizer<'a> {
    source: &'a str,
    line_map: LineMap,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, line_map: LineMap::new(source) }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn line_map(&self) -> &LineMap {
        &self.line_map
    }

    /// A lazy token stream from the start of the source.
    pub fn tokens(&self) -> Lexer<'_> {
        tracing::trace!(len = self.source.len(), "starting token stream");
        Lexer {
            source: self.source,
            raw: RawToken::lexer(self.source),
            line_map: &self.line_map,
            failed: false,
        }
    }

    /// Tokenize everything, stopping at the first error.
    pub fn tokenize(&self) -> Result<Vec<Token>, SyntaxError> {
        self.tokens().collect()
    }
}

/// Forward-only token stream. Fused after the first error.
pub struct Lexer<'a> {
    source: &'a str,
    raw: logos::Lexer<'a, RawToken>,
    line_map: &'a LineMap,
    failed: bool,
}

impl<'a> Lexer<'a> {
    /// Span pointing just past the end of the source.
    pub fn end_of_input(&self) -> Span {
        let (line, col) = self.line_map.offset_to_line_col(self.source.len());
        Span::point(line, col)
    }

    fn error_at(&self, start: usize, end: usize) -> SyntaxError {
        let span = self.line_map.span(start, end);
        match self.source[start..].chars().next() {
            Some('"') => {
                SyntaxError::unterminated_string(self.line_map.span(start, self.source.len()))
            }
            Some('=') => SyntaxError::incomplete_triple_eq(span),
            Some(ch) => SyntaxError::unexpected_char(ch, span),
            None => SyntaxError::new("Unexpected end of input", span),
        }
    }

    /// Convert a raw logos token to our TokenKind, parsing literals.
    fn convert_token(
        &self,
        raw: RawToken,
        slice: &str,
        span: Span,
    ) -> Result<TokenKind, SyntaxError> {
        Ok(match raw {
            RawToken::TripleEq => TokenKind::TripleEq,
            RawToken::PipePipe => TokenKind::PipePipe,
            RawToken::Arrow => TokenKind::Arrow,
            RawToken::Pipe => TokenKind::Pipe,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,

            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Comma => TokenKind::Comma,

            RawToken::Int => {
                let value = slice.parse::<i64>().map_err(|_| SyntaxError::invalid_number(span))?;
                TokenKind::Int(value)
            }
            RawToken::Float => {
                let value = slice.parse::<f64>().map_err(|_| SyntaxError::invalid_number(span))?;
                TokenKind::Float(value)
            }
            RawToken::String => TokenKind::String(slice[1..slice.len() - 1].to_string()),
            RawToken::Ident => TokenKind::Ident(slice.to_string()),
        })
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let result = self.raw.next()?;
        let range = self.raw.span();
        let span = self.line_map.span(range.start, range.end);

        let converted = match result {
            Ok(raw) => self.convert_token(raw, self.raw.slice(), span),
            Err(()) => Err(self.error_at(range.start, range.end)),
        };

        match converted {
            Ok(kind) => Some(Ok(Token { kind, span })),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Tokenizer::new(src)
            .tokenize()
            .unwrap_or_else(|e| panic!("lex error in {:?}: {}", src, e))
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn lex_error(src: &str) -> SyntaxError {
        Tokenizer::new(src).tokenize().expect_err("expected a lex error")
    }

    #[test]
    fn punctuation_maps_one_to_one() {
        use TokenKind::*;
        assert_eq!(
            kinds(". === ( ) [ ] < > { } || | , : - ->"),
            vec![
                Dot, TripleEq, LParen, RParen, LBracket, RBracket, Lt, Gt, LBrace, RBrace, PipePipe,
                Pipe, Comma, Colon, Minus, Arrow
            ],
        );
    }

    #[test]
    fn variable_reference_with_type() {
        use TokenKind::*;
        assert_eq!(
            kinds("foo:int - bar:int"),
            vec![
                Ident("foo".into()),
                Colon,
                Ident("int".into()),
                Minus,
                Ident("bar".into()),
                Colon,
                Ident("int".into()),
            ],
        );
    }

    #[test]
    fn numbers() {
        use TokenKind::*;
        assert_eq!(kinds("42"), vec![Int(42)]);
        assert_eq!(kinds("-7"), vec![Int(-7)]);
        assert_eq!(kinds("1.5"), vec![Float(1.5)]);
        assert_eq!(kinds("-0.25"), vec![Float(-0.25)]);
        assert_eq!(kinds("1.2.3"), vec![Float(1.2), Dot, Int(3)]);
    }

    #[test]
    fn lone_minus_is_an_operator() {
        use TokenKind::*;
        assert_eq!(kinds("- 5"), vec![Minus, Int(5)]);
        assert_eq!(kinds("-x"), vec![Minus, Ident("x".into())]);
    }

    #[test]
    fn strings_have_no_escapes() {
        assert_eq!(kinds(r#""Rudolph""#), vec![TokenKind::String("Rudolph".into())]);
        assert_eq!(kinds(r#""a\""#), vec![TokenKind::String("a\\".into())]);
    }

    #[test]
    fn identifiers_stop_at_reserved_characters() {
        use TokenKind::*;
        assert_eq!(
            kinds("items.some(x)"),
            vec![
                Ident("items".into()),
                Dot,
                Ident("some".into()),
                LParen,
                Ident("x".into()),
                RParen,
            ],
        );
        assert_eq!(kinds("a1_b?"), vec![Ident("a1_b?".into())]);
    }

    #[test]
    fn whitespace_is_never_emitted() {
        assert_eq!(kinds("  \n\t  ").len(), 0);
    }

    #[test]
    fn unterminated_string_is_fatal() {
        let err = lex_error("\"abc");
        assert_eq!(err.message, "Unterminated string");
        assert_eq!(err.span.start_col, 1);
    }

    #[test]
    fn single_equals_names_the_continuation() {
        let err = lex_error("a = b");
        assert!(err.message.contains("'=='"), "{}", err.message);
        assert_eq!(err.span.start_col, 3);
    }

    #[test]
    fn oversized_integer_is_rejected() {
        let err = lex_error("99999999999999999999");
        assert_eq!(err.message, "Invalid number");
    }

    #[test]
    fn stream_is_lazy_and_restartable() {
        let tokenizer = Tokenizer::new("a b = c");
        let mut first = tokenizer.tokens();
        assert!(matches!(first.next(), Some(Ok(_))));
        assert!(matches!(first.next(), Some(Ok(_))));
        assert!(matches!(first.next(), Some(Err(_))));
        assert!(first.next().is_none());

        // A new pass starts from the beginning again.
        let again = tokenizer.tokens().next();
        assert!(matches!(again, Some(Ok(Token { kind: TokenKind::Ident(ref n), .. })) if n == "a"));
    }

    #[test]
    fn spans_are_one_based() {
        let tokens = Tokenizer::new("ab\n  cd").tokenize().unwrap();
        assert_eq!(tokens[0].span, Span::new(1, 1, 1, 3));
        assert_eq!(tokens[1].span, Span::new(2, 3, 2, 5));
    }

    #[test]
    fn end_of_input_is_past_the_last_character() {
        let tokenizer = Tokenizer::new("foo");
        assert_eq!(tokenizer.tokens().end_of_input(), Span::point(1, 4));
    }
}
