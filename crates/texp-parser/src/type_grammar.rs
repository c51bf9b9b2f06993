// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type annotation grammar.
//!
//! ```text
//! type   := name ('<' type (',' type)* ','? '>')?
//!         | 'fn' '(' (type (',' type)* ','?)? ')' '->' type
//!         | '{' (name ':' type (',' name ':' type)* ','?)? '}'
//! ```

use texp_ast::token::TokenKind;
use texp_ast::type_node::FieldNode;
use texp_ast::{Span, Type, TypeNode, TypeNodeKind};

use crate::parser::Parser;
use crate::ParseError;

impl Parser<'_> {
    /// Parse an annotation and resolve it against the registry.
    pub(crate) fn parse_type(&mut self) -> Result<Type, ParseError> {
        let node = self.parse_type_node()?;
        Ok(self.types.resolve(&node)?)
    }

    pub(crate) fn parse_type_node(&mut self) -> Result<TypeNode, ParseError> {
        match self.cursor.current_kind() {
            Some(TokenKind::LBrace) => self.parse_struct_type(),
            Some(TokenKind::Ident(_)) => {
                let (name, name_span) = self.cursor.expect_ident()?;
                if name == "fn" && self.cursor.check(&TokenKind::LParen) {
                    return self.parse_fn_type(name_span);
                }
                let mut args = Vec::new();
                if self.cursor.match_token(&TokenKind::Lt)? {
                    args = self.parse_type_list(&TokenKind::Gt)?;
                }
                let span = if args.is_empty() {
                    name_span
                } else {
                    Span::merge(name_span, self.cursor.previous_span())
                };
                Ok(TypeNode::named(name, args, span))
            }
            _ => Err(self.cursor.expected("type").into()),
        }
    }

    fn parse_fn_type(&mut self, start: Span) -> Result<TypeNode, ParseError> {
        self.cursor.expect(&TokenKind::LParen)?;
        let params = self.parse_type_list(&TokenKind::RParen)?;
        self.cursor.expect(&TokenKind::Arrow)?;
        let ret = self.parse_type_node()?;
        let span = Span::merge(start, ret.span);
        Ok(TypeNode { kind: TypeNodeKind::Func { params, ret: Box::new(ret) }, span })
    }

    fn parse_struct_type(&mut self) -> Result<TypeNode, ParseError> {
        let start = self.cursor.expect(&TokenKind::LBrace)?.span;
        let mut fields = Vec::new();
        while !self.cursor.check(&TokenKind::RBrace) {
            let (name, name_span) = self.cursor.expect_ident()?;
            self.cursor.expect(&TokenKind::Colon)?;
            let ty = self.parse_type_node()?;
            let span = Span::merge(name_span, ty.span);
            fields.push(FieldNode { name, ty, span });
            if !self.cursor.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        let end = self.cursor.expect(&TokenKind::RBrace)?.span;
        Ok(TypeNode { kind: TypeNodeKind::Struct { fields }, span: Span::merge(start, end) })
    }

    /// Comma-separated types up to `close`, trailing comma tolerated. The
    /// opening delimiter has already been consumed.
    fn parse_type_list(&mut self, close: &TokenKind) -> Result<Vec<TypeNode>, ParseError> {
        let mut items = Vec::new();
        while !self.cursor.check(close) {
            items.push(self.parse_type_node()?);
            if !self.cursor.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        self.cursor.expect(close)?;
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use texp_ast::Type;
    use texp_types::{TypeError, Types};

    use crate::{parse_type, ParseError};

    fn ty(src: &str) -> Type {
        parse_type(src, &Types::new()).unwrap_or_else(|e| panic!("{}: {}", src, e))
    }

    #[test]
    fn nested_generics() {
        assert_eq!(ty("map<string, list<int>>").to_string(), "map<string, list<int>>");
        assert_eq!(ty("Option<list<bool>>").to_string(), "Option<list<bool>>");
        assert_eq!(ty("list<int,>").to_string(), "list<int>");
    }

    #[test]
    fn function_types() {
        assert_eq!(ty("fn(int, string) -> bool").to_string(), "fn(int, string) -> bool");
        assert_eq!(ty("fn() -> fn(any) -> int").to_string(), "fn() -> fn(any) -> int");
    }

    #[test]
    fn struct_types() {
        let record = ty("{name: string, tags: list<string>,}");
        assert_eq!(record.to_string(), "{name: string, tags: list<string>}");
        assert_eq!(ty("{}").to_string(), "{}");
    }

    #[test]
    fn missing_type_is_a_syntax_error() {
        let err = parse_type("<int>", &Types::new()).unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
        assert!(err.to_string().starts_with("Expected type"));
    }

    #[test]
    fn unclosed_generic() {
        let err = parse_type("list<int", &Types::new()).unwrap_err();
        assert_eq!(err.to_string(), "Expected '>', found end of input");
    }

    #[test]
    fn fn_needs_an_arrow() {
        let err = parse_type("fn(int) bool", &Types::new()).unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
    }

    #[test]
    fn unknown_names_are_type_errors() {
        let err = parse_type("list<User>", &Types::new()).unwrap_err();
        assert!(matches!(err, ParseError::Type(TypeError::UnknownType { .. })));
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        assert!(parse_type("int int", &Types::new()).is_err());
    }
}
