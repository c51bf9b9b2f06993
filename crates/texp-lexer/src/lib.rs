// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexer for texp expressions.
//!
//! Turns source text into a lazy stream of tokens for the parser.

mod error;
mod lexer;

pub use error::SyntaxError;
pub use lexer::{Lexer, Tokenizer};
