// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression grammar. Every node is type-checked as soon as it is built.
//!
//! ```text
//! program  := expr
//! expr     := 'declare' name ':' type expr
//!           | unary (('===' | '||' | '-' | '>') postfix)*
//! unary    := '-' postfix | postfix
//! postfix  := primary ('.' name (':' type ('(' args ')')?)? | '[' expr ']')*
//! primary  := literal | name (':' type)? | lambda | '(' expr ')'
//!           | '[' items ']' | '{' fields '}'
//! lambda   := '|' names '|' expr | '||' expr
//! ```
//!
//! Binary operators share one level and chain to the left.

use std::collections::HashSet;

use texp_ast::expr::FieldInit;
use texp_ast::token::TokenKind;
use texp_ast::{Expr, ExprKind, Literal, Span, Type};
use texp_lexer::{SyntaxError, Tokenizer};
use texp_types::{rules, Declarations, TypeError, Types};

use crate::cursor::Cursor;
use crate::ParseError;

/// Single-pass parser over one source text.
pub struct Parser<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) types: &'a Types,
    decls: Declarations,
}

#[derive(Clone, Copy)]
enum BinaryOp {
    Eq,
    Or,
    Subtract,
    Gt,
}

impl<'a> Parser<'a> {
    pub fn new(
        tokenizer: &'a Tokenizer<'_>,
        types: &'a Types,
        decls: Declarations,
    ) -> Result<Self, ParseError> {
        Ok(Self { cursor: Cursor::new(tokenizer)?, types, decls })
    }

    /// Parse one expression that must span the whole input.
    pub fn parse_program(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expr()?;
        self.expect_end()?;
        Ok(expr)
    }

    pub(crate) fn expect_end(&self) -> Result<(), ParseError> {
        if self.cursor.at_end() {
            Ok(())
        } else {
            let found = self.cursor.current_kind().map_or("end of input", |k| k.display_name());
            let message = format!("Unexpected token: {}", found);
            let err = SyntaxError::new(message, self.cursor.current_span());
            let err = match crate::hints::for_expected("end of input", self.cursor.current_kind()) {
                Some(hint) => err.with_hint(hint),
                None => err,
            };
            Err(err.into())
        }
    }

    /// Declarations recorded so far, including any the host seeded.
    pub fn declarations(&self) -> &Declarations {
        &self.decls
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    /// Step loop: a fresh primary while there is no left-hand side, then
    /// continuations consuming it, until no step applies.
    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left: Option<Expr> = None;
        loop {
            let Some(lhs) = left.take() else {
                if self.cursor.check_ident("declare") {
                    if let Some(reference) = self.parse_declaration()? {
                        left = Some(self.parse_postfix_steps(reference)?);
                    }
                    continue;
                }
                left = Some(self.parse_unary()?);
                continue;
            };

            let op = match self.cursor.current_kind() {
                Some(TokenKind::TripleEq) => BinaryOp::Eq,
                Some(TokenKind::PipePipe) => BinaryOp::Or,
                Some(TokenKind::Minus) => BinaryOp::Subtract,
                Some(TokenKind::Gt) => BinaryOp::Gt,
                Some(TokenKind::Dot | TokenKind::LBracket) => {
                    left = Some(self.parse_postfix_steps(lhs)?);
                    continue;
                }
                _ => return Ok(lhs),
            };
            self.cursor.advance()?;
            let rhs = self.parse_postfix()?;
            left = Some(self.binary(op, lhs, rhs)?);
        }
    }

    /// `declare name: Type`. The keyword is only special when another name
    /// follows it; otherwise `declare` is an ordinary variable reference,
    /// returned so the caller can continue from it.
    fn parse_declaration(&mut self) -> Result<Option<Expr>, ParseError> {
        let keyword = self.cursor.advance()?;
        if !self.cursor.check(&TokenKind::Ident(String::new())) {
            return self.finish_reference("declare".to_string(), keyword.span).map(Some);
        }
        let (name, name_span) = self.cursor.expect_ident()?;
        self.cursor.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;
        self.decls.declare(name, ty, name_span)?;
        Ok(None)
    }

    fn binary(&self, op: BinaryOp, left: Expr, right: Expr) -> Result<Expr, ParseError> {
        let lty = static_type(&left)?;
        let rty = static_type(&right)?;
        let span = Span::merge(left.span, right.span);
        let (left, right) = (Box::new(left), Box::new(right));
        let kind = match op {
            BinaryOp::Eq => {
                rules::check_eq(&lty, &rty, right.span)?;
                ExprKind::Eq { left, right }
            }
            BinaryOp::Or => {
                rules::check_or(&lty, left.span, &rty, right.span)?;
                ExprKind::Or { left, right }
            }
            BinaryOp::Subtract => {
                rules::check_arithmetic("-", &lty, left.span, &rty, right.span)?;
                ExprKind::Subtract { left, right }
            }
            BinaryOp::Gt => {
                rules::check_arithmetic(">", &lty, left.span, &rty, right.span)?;
                ExprKind::Gt { left, right }
            }
        };
        Ok(Expr::new(kind, span))
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.cursor.check(&TokenKind::Minus) {
            let start = self.cursor.advance()?.span;
            let operand = self.parse_postfix()?;
            rules::check_negative(&static_type(&operand)?, operand.span)?;
            let span = Span::merge(start, operand.span);
            return Ok(Expr::new(ExprKind::Negative(Box::new(operand)), span));
        }
        self.parse_primary()
    }

    /// Operand of a binary operator: a unary or primary with its postfix
    /// continuations, but no further binary operators.
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_unary()?;
        self.parse_postfix_steps(base)
    }

    fn parse_postfix_steps(&mut self, mut expr: Expr) -> Result<Expr, ParseError> {
        loop {
            expr = match self.cursor.current_kind() {
                Some(TokenKind::Dot) => self.parse_member(expr)?,
                Some(TokenKind::LBracket) => self.parse_offset(expr)?,
                _ => return Ok(expr),
            };
        }
    }

    /// `.name`, `.name:Type`, or `.name:Type(args)`.
    fn parse_member(&mut self, target: Expr) -> Result<Expr, ParseError> {
        self.cursor.expect(&TokenKind::Dot)?;
        let (name, name_span) = self.cursor.expect_ident()?;

        if self.cursor.check(&TokenKind::LParen) {
            let message = format!("Call to '{}' needs a return type", name);
            let err = SyntaxError::new(message, self.cursor.current_span())
                .with_hint(format!("write `.{}:ReturnType(...)`", name));
            return Err(err.into());
        }

        let annotation = if self.cursor.match_token(&TokenKind::Colon)? {
            Some(self.parse_type()?)
        } else {
            None
        };

        match annotation {
            Some(ret) if self.cursor.check(&TokenKind::LParen) => {
                self.cursor.advance()?;
                let args = self.parse_comma_list(&TokenKind::RParen, |p| p.parse_expr())?;
                let span = Span::merge(target.span, self.cursor.previous_span());
                if self.types.function(&name).is_none() {
                    tracing::debug!(function = %name, "call to a function with no known signature");
                }
                Ok(Expr::new(ExprKind::Call { target: Box::new(target), name, ret, args }, span))
            }
            annotation => {
                let target_ty = static_type(&target)?;
                let ty = rules::field_type(&target_ty, &name, annotation, name_span)?;
                let span = Span::merge(target.span, self.cursor.previous_span());
                let kind = ExprKind::FieldAccess { target: Box::new(target), field: name, ty };
                Ok(Expr::new(kind, span))
            }
        }
    }

    fn parse_offset(&mut self, target: Expr) -> Result<Expr, ParseError> {
        self.cursor.expect(&TokenKind::LBracket)?;
        let key = self.parse_expr()?;
        let end = self.cursor.expect(&TokenKind::RBracket)?.span;
        rules::offset_type(&static_type(&target)?, target.span, &static_type(&key)?, key.span)?;
        let span = Span::merge(target.span, end);
        Ok(Expr::new(ExprKind::Offset { target: Box::new(target), key: Box::new(key) }, span))
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let Some(tok) = self.cursor.current() else {
            return Err(self.cursor.expected("expression").into());
        };
        let (kind, span) = (tok.kind.clone(), tok.span);
        match kind {
            TokenKind::Int(n) => self.literal(Literal::Int(n), span),
            TokenKind::Float(n) => self.literal(Literal::Float(n), span),
            TokenKind::String(s) => self.literal(Literal::String(s), span),
            TokenKind::Ident(_) => {
                let (name, span) = self.cursor.expect_ident()?;
                self.finish_reference(name, span)
            }
            TokenKind::Pipe => {
                self.cursor.advance()?;
                let params = self.parse_lambda_params()?;
                self.finish_lambda(params, span)
            }
            TokenKind::PipePipe => {
                self.cursor.advance()?;
                self.finish_lambda(Vec::new(), span)
            }
            TokenKind::LParen => {
                self.cursor.advance()?;
                let inner = self.parse_expr()?;
                self.cursor.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => self.parse_list(),
            TokenKind::LBrace => self.parse_struct(),
            _ => Err(self.cursor.expected("expression").into()),
        }
    }

    fn literal(&mut self, lit: Literal, span: Span) -> Result<Expr, ParseError> {
        self.cursor.advance()?;
        Ok(Expr::new(ExprKind::Literal(lit), span))
    }

    /// Variable reference after its name: `name:Type`, or a bare `name`
    /// resolved from the declarations.
    fn finish_reference(&mut self, name: String, name_span: Span) -> Result<Expr, ParseError> {
        if self.cursor.match_token(&TokenKind::Colon)? {
            let annotated = self.parse_type()?;
            let span = Span::merge(name_span, self.cursor.previous_span());
            let ty = self.decls.check_annotation(&name, annotated, span)?;
            return Ok(Expr::new(ExprKind::Get { name, ty }, span));
        }

        match self.decls.get(&name) {
            Some(decl) => {
                let ty = decl.ty.clone();
                Ok(Expr::new(ExprKind::Get { name, ty }, name_span))
            }
            None => {
                let err = SyntaxError::new(format!("'{}' is not declared", name), name_span)
                    .with_hint(format!("annotate it as `{}:Type` or declare it first", name));
                Err(err.into())
            }
        }
    }

    fn parse_lambda_params(&mut self) -> Result<Vec<String>, ParseError> {
        let mut params = Vec::new();
        while !self.cursor.check(&TokenKind::Pipe) {
            let (name, _) = self.cursor.expect_ident()?;
            params.push(name);
            if !self.cursor.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        self.cursor.expect(&TokenKind::Pipe)?;
        Ok(params)
    }

    fn finish_lambda(&mut self, params: Vec<String>, start: Span) -> Result<Expr, ParseError> {
        let body = self.parse_expr()?;
        let span = Span::merge(start, body.span);
        Ok(Expr::new(ExprKind::Lambda { params, body: body.into() }, span))
    }

    fn parse_list(&mut self) -> Result<Expr, ParseError> {
        let start = self.cursor.expect(&TokenKind::LBracket)?.span;
        let items = self.parse_comma_list(&TokenKind::RBracket, |p| p.parse_expr())?;
        if let Some((first, rest)) = items.split_first() {
            let first_ty = static_type(first)?;
            for item in rest {
                rules::check_list_element(&first_ty, &static_type(item)?, item.span)?;
            }
        }
        let span = Span::merge(start, self.cursor.previous_span());
        Ok(Expr::new(ExprKind::ListLiteral(items), span))
    }

    fn parse_struct(&mut self) -> Result<Expr, ParseError> {
        let start = self.cursor.expect(&TokenKind::LBrace)?.span;
        let mut seen = HashSet::new();
        let fields = self.parse_comma_list(&TokenKind::RBrace, |p| {
            let (name, name_span) = p.cursor.expect_ident()?;
            if !seen.insert(name.clone()) {
                return Err(TypeError::DuplicateField { name, span: name_span }.into());
            }
            p.cursor.expect(&TokenKind::Colon)?;
            let value = p.parse_expr()?;
            static_type(&value)?;
            Ok(FieldInit { name, value })
        })?;
        let span = Span::merge(start, self.cursor.previous_span());
        Ok(Expr::new(ExprKind::StructLiteral(fields), span))
    }

    /// Comma-separated items up to `close`, trailing comma tolerated. The
    /// opening delimiter has already been consumed; the closing one is
    /// consumed here.
    fn parse_comma_list<T>(
        &mut self,
        close: &TokenKind,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = Vec::new();
        while !self.cursor.check(close) {
            items.push(item(self)?);
            if !self.cursor.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        self.cursor.expect(close)?;
        Ok(items)
    }
}

/// Static type of a node in a position that needs one.
pub(crate) fn static_type(expr: &Expr) -> Result<Type, TypeError> {
    expr.try_ty().ok_or(TypeError::LambdaHasNoType { span: expr.span })
}
