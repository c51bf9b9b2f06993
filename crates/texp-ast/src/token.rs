// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Token definitions for the lexer.

use std::fmt;

use crate::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Int(i64),
    Float(f64),
    String(String),

    // Identifier
    Ident(String),

    // Operators
    TripleEq,
    PipePipe,
    Pipe,
    Minus,
    Arrow,
    Dot,
    Lt,
    Gt,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Colon,
    Comma,
}

impl TokenKind {
    /// Returns a human-readable name for this token kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Int(_) => "a number",
            TokenKind::Float(_) => "a number",
            TokenKind::String(_) => "a string",
            TokenKind::Ident(_) => "a name",

            TokenKind::TripleEq => "'==='",
            TokenKind::PipePipe => "'||'",
            TokenKind::Pipe => "'|'",
            TokenKind::Minus => "'-'",
            TokenKind::Arrow => "'->'",
            TokenKind::Dot => "'.'",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",

            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
        }
    }
}

/// Source-like rendering, used by `texp lex`.
impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(n) => write!(f, "Int({})", n),
            TokenKind::Float(n) => write!(f, "Float({:?})", n),
            TokenKind::String(s) => write!(f, "String({:?})", s),
            TokenKind::Ident(name) => write!(f, "Ident({})", name),
            other => write!(f, "{}", other.display_name().trim_matches('\'')),
        }
    }
}
