// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression AST nodes.
//!
//! The node set is closed. Every node knows its static type without being
//! evaluated (lambdas excepted) and prints in a canonical form that parses
//! back to a structurally equal node.

use std::fmt;
use std::sync::Arc;

use crate::{Span, Type};

/// An expression in the AST.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Variable reference with its declared type.
    Get { name: String, ty: Type },
    Literal(Literal),
    /// Deep structural equality, `===`
    Eq { left: Box<Expr>, right: Box<Expr> },
    /// `||`, both sides always evaluated
    Or { left: Box<Expr>, right: Box<Expr> },
    Gt { left: Box<Expr>, right: Box<Expr> },
    Subtract { left: Box<Expr>, right: Box<Expr> },
    Negative(Box<Expr>),
    /// `target.name:Ret(args)`; the target becomes the first argument.
    Call {
        target: Box<Expr>,
        name: String,
        ret: Type,
        args: Vec<Expr>,
    },
    Lambda { params: Vec<String>, body: Arc<Expr> },
    ListLiteral(Vec<Expr>),
    StructLiteral(Vec<FieldInit>),
    FieldAccess {
        target: Box<Expr>,
        field: String,
        ty: Type,
    },
    Offset { target: Box<Expr>, key: Box<Expr> },
}

/// A field initializer in a struct literal.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInit {
    pub name: String,
    pub value: Expr,
}

/// A constant value embedded in the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Int(i64),
    Float(f64),
    /// No literal syntax; only built by hosts.
    Bool(bool),
    /// No literal syntax; only built by hosts.
    None,
}

impl Literal {
    pub fn ty(&self) -> Type {
        match self {
            Literal::String(_) => Type::String,
            Literal::Int(_) => Type::Int,
            Literal::Float(_) => Type::Float,
            Literal::Bool(_) => Type::Bool,
            Literal::None => Type::None,
        }
    }
}

/// Tag of each node variant, for consumers that support only a subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Get,
    Literal,
    Eq,
    Or,
    Gt,
    Subtract,
    Negative,
    Call,
    Lambda,
    ListLiteral,
    StructLiteral,
    FieldAccess,
    Offset,
}

impl NodeKind {
    pub const ALL: [NodeKind; 13] = [
        NodeKind::Get,
        NodeKind::Literal,
        NodeKind::Eq,
        NodeKind::Or,
        NodeKind::Gt,
        NodeKind::Subtract,
        NodeKind::Negative,
        NodeKind::Call,
        NodeKind::Lambda,
        NodeKind::ListLiteral,
        NodeKind::StructLiteral,
        NodeKind::FieldAccess,
        NodeKind::Offset,
    ];
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Spans never take part in equality.
impl PartialEq for Expr {
    fn eq(&self, other: &Expr) -> bool {
        self.kind == other.kind
    }
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn node_kind(&self) -> NodeKind {
        match &self.kind {
            ExprKind::Get { .. } => NodeKind::Get,
            ExprKind::Literal(_) => NodeKind::Literal,
            ExprKind::Eq { .. } => NodeKind::Eq,
            ExprKind::Or { .. } => NodeKind::Or,
            ExprKind::Gt { .. } => NodeKind::Gt,
            ExprKind::Subtract { .. } => NodeKind::Subtract,
            ExprKind::Negative(_) => NodeKind::Negative,
            ExprKind::Call { .. } => NodeKind::Call,
            ExprKind::Lambda { .. } => NodeKind::Lambda,
            ExprKind::ListLiteral(_) => NodeKind::ListLiteral,
            ExprKind::StructLiteral(_) => NodeKind::StructLiteral,
            ExprKind::FieldAccess { .. } => NodeKind::FieldAccess,
            ExprKind::Offset { .. } => NodeKind::Offset,
        }
    }

    /// Direct children, left to right.
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Get { .. } | ExprKind::Literal(_) => Vec::new(),
            ExprKind::Eq { left, right }
            | ExprKind::Or { left, right }
            | ExprKind::Gt { left, right }
            | ExprKind::Subtract { left, right } => vec![left, right],
            ExprKind::Negative(operand) => vec![operand],
            ExprKind::Call { target, args, .. } => {
                let mut children = vec![target.as_ref()];
                children.extend(args.iter());
                children
            }
            ExprKind::Lambda { body, .. } => vec![body.as_ref()],
            ExprKind::ListLiteral(items) => items.iter().collect(),
            ExprKind::StructLiteral(fields) => fields.iter().map(|f| &f.value).collect(),
            ExprKind::FieldAccess { target, .. } => vec![target],
            ExprKind::Offset { target, key } => vec![target, key],
        }
    }

    /// Static type, or `None` when the expression is (or is built from) a
    /// lambda in a position that needs a type.
    pub fn try_ty(&self) -> Option<Type> {
        Some(match &self.kind {
            ExprKind::Get { ty, .. } => ty.clone(),
            ExprKind::Literal(lit) => lit.ty(),
            ExprKind::Eq { .. } | ExprKind::Or { .. } | ExprKind::Gt { .. } => Type::Bool,
            ExprKind::Subtract { left, .. } => left.try_ty()?,
            ExprKind::Negative(operand) => operand.try_ty()?,
            ExprKind::Call { ret, .. } => ret.clone(),
            ExprKind::Lambda { .. } => return None,
            ExprKind::ListLiteral(items) => match items.first() {
                Some(first) => Type::list(first.try_ty()?),
                None => Type::list(Type::Never),
            },
            ExprKind::StructLiteral(fields) => {
                let mut tys = indexmap::IndexMap::with_capacity(fields.len());
                for field in fields {
                    tys.insert(field.name.clone(), field.value.try_ty()?);
                }
                Type::Struct(tys)
            }
            ExprKind::FieldAccess { ty, .. } => ty.clone(),
            ExprKind::Offset { target, .. } => {
                let target_ty = target.try_ty()?;
                match target_ty.canonical() {
                    Type::List(elem) => (**elem).clone(),
                    Type::Map { value, .. } => (**value).clone(),
                    _ => Type::Any,
                }
            }
        })
    }

    /// Static type of this expression.
    ///
    /// # Panics
    ///
    /// Lambdas have no expressible static type; asking for one is a bug in
    /// the caller.
    pub fn ty(&self) -> Type {
        match self.try_ty() {
            Some(ty) => ty,
            None => panic!("lambda expressions have no static type (at {})", self.span),
        }
    }

    fn is_binary(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Eq { .. }
                | ExprKind::Or { .. }
                | ExprKind::Gt { .. }
                | ExprKind::Subtract { .. }
        )
    }

    fn is_lambda(&self) -> bool {
        matches!(self.kind, ExprKind::Lambda { .. })
    }
}

// ============================================================================
// Builders
// ============================================================================

impl Expr {
    fn synthetic(kind: ExprKind) -> Expr {
        Expr { kind, span: Span::default() }
    }

    pub fn get(name: impl Into<String>, ty: Type) -> Expr {
        Self::synthetic(ExprKind::Get { name: name.into(), ty })
    }

    pub fn literal(lit: Literal) -> Expr {
        Self::synthetic(ExprKind::Literal(lit))
    }

    pub fn int(n: i64) -> Expr {
        Self::literal(Literal::Int(n))
    }

    pub fn float(n: f64) -> Expr {
        Self::literal(Literal::Float(n))
    }

    pub fn string(s: impl Into<String>) -> Expr {
        Self::literal(Literal::String(s.into()))
    }

    pub fn eq(left: Expr, right: Expr) -> Expr {
        Self::synthetic(ExprKind::Eq { left: Box::new(left), right: Box::new(right) })
    }

    pub fn or(left: Expr, right: Expr) -> Expr {
        Self::synthetic(ExprKind::Or { left: Box::new(left), right: Box::new(right) })
    }

    pub fn gt(left: Expr, right: Expr) -> Expr {
        Self::synthetic(ExprKind::Gt { left: Box::new(left), right: Box::new(right) })
    }

    pub fn subtract(left: Expr, right: Expr) -> Expr {
        Self::synthetic(ExprKind::Subtract { left: Box::new(left), right: Box::new(right) })
    }

    pub fn negative(operand: Expr) -> Expr {
        Self::synthetic(ExprKind::Negative(Box::new(operand)))
    }

    pub fn call(target: Expr, name: impl Into<String>, ret: Type, args: Vec<Expr>) -> Expr {
        Self::synthetic(ExprKind::Call { target: Box::new(target), name: name.into(), ret, args })
    }

    pub fn lambda(params: Vec<String>, body: Expr) -> Expr {
        Self::synthetic(ExprKind::Lambda { params, body: Arc::new(body) })
    }

    pub fn list(items: Vec<Expr>) -> Expr {
        Self::synthetic(ExprKind::ListLiteral(items))
    }

    pub fn record<I, S>(fields: I) -> Expr
    where
        I: IntoIterator<Item = (S, Expr)>,
        S: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(name, value)| FieldInit { name: name.into(), value })
            .collect();
        Self::synthetic(ExprKind::StructLiteral(fields))
    }

    pub fn field(target: Expr, field: impl Into<String>, ty: Type) -> Expr {
        Self::synthetic(ExprKind::FieldAccess { target: Box::new(target), field: field.into(), ty })
    }

    pub fn offset(target: Expr, key: Expr) -> Expr {
        Self::synthetic(ExprKind::Offset { target: Box::new(target), key: Box::new(key) })
    }
}

// ============================================================================
// Canonical form
// ============================================================================

/// Right operand of a binary operator: binary operators chain to the left
/// without precedence, so a nested binary on the right needs parentheses.
struct Operand<'a>(&'a Expr);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_binary() || self.0.is_lambda() {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Target of `.name` or `[key]`. An int literal followed by `.` would lex
/// as a float, and a negative literal would absorb the minus sign.
struct Postfix<'a>(&'a Expr);

impl fmt::Display for Postfix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.kind {
            ExprKind::Negative(_) | ExprKind::Literal(Literal::Int(_)) => {
                write!(f, "({})", self.0)
            }
            ExprKind::Literal(Literal::Float(n)) if n.is_sign_negative() => {
                write!(f, "({})", self.0)
            }
            _ => Operand(self.0).fmt(f),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "\"{}\"", s),
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(n) => {
                let text = n.to_string();
                if text.contains('.') || !n.is_finite() {
                    write!(f, "{}", text)
                } else {
                    write!(f, "{}.0", text)
                }
            }
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::None => write!(f, "None"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Get { name, ty } => write!(f, "{}:{}", name, ty),
            ExprKind::Literal(lit) => write!(f, "{}", lit),
            ExprKind::Eq { left, right } => write!(f, "{} === {}", Left(left), Operand(right)),
            ExprKind::Or { left, right } => write!(f, "{} || {}", Left(left), Operand(right)),
            ExprKind::Gt { left, right } => write!(f, "{} > {}", Left(left), Operand(right)),
            ExprKind::Subtract { left, right } => write!(f, "{} - {}", Left(left), Operand(right)),
            // The space keeps `- 5` from lexing as the literal `-5`.
            ExprKind::Negative(operand) => match operand.kind {
                ExprKind::Negative(_) => write!(f, "- {}", operand),
                _ => write!(f, "- {}", Operand(operand)),
            },
            ExprKind::Call { target, name, ret, args } => {
                write!(f, "{}.{}:{}(", Postfix(target), name, ret)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            ExprKind::Lambda { params, body } => write!(f, "|{}| {}", params.join(", "), body),
            ExprKind::ListLiteral(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            ExprKind::StructLiteral(fields) => {
                write!(f, "{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.value)?;
                }
                write!(f, "}}")
            }
            ExprKind::FieldAccess { target, field, ty } => {
                write!(f, "{}.{}:{}", Postfix(target), field, ty)
            }
            ExprKind::Offset { target, key } => write!(f, "{}[{}]", Postfix(target), key),
        }
    }
}

/// Left operand of a binary operator; only a lambda would swallow the rest.
struct Left<'a>(&'a Expr);

impl fmt::Display for Left<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_lambda() {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_do_not_affect_equality() {
        let a = Expr::int(5).with_span(Span::new(1, 1, 1, 2));
        let b = Expr::int(5).with_span(Span::new(3, 7, 3, 8));
        assert_eq!(a, b);
        assert_ne!(Expr::int(5), Expr::int(6));
    }

    #[test]
    fn static_types() {
        let sub = Expr::subtract(Expr::get("a", Type::Float), Expr::float(1.5));
        assert!(sub.ty().equals(&Type::Float));
        assert!(Expr::list(vec![]).ty().equals(&Type::list(Type::Never)));
        assert!(Expr::list(vec![Expr::string("x")]).ty().equals(&Type::list(Type::String)));

        let rec = Expr::record([("n", Expr::int(1))]);
        assert_eq!(rec.ty().to_string(), "{n: int}");

        let nums = Expr::get("nums", Type::map(Type::String, Type::Float));
        assert!(Expr::offset(nums, Expr::string("k")).ty().equals(&Type::Float));
    }

    #[test]
    fn lambda_has_no_static_type() {
        let lambda = Expr::lambda(vec!["x".into()], Expr::get("x", Type::Int));
        assert!(lambda.try_ty().is_none());
        assert!(Expr::list(vec![lambda]).try_ty().is_none());
    }

    #[test]
    #[should_panic(expected = "lambda expressions have no static type")]
    fn querying_lambda_type_panics() {
        Expr::lambda(vec![], Expr::int(1)).ty();
    }

    #[test]
    fn canonical_form_parenthesizes_right_nesting() {
        let a = || Expr::get("a", Type::Int);
        let left = Expr::subtract(Expr::subtract(a(), a()), a());
        assert_eq!(left.to_string(), "a:int - a:int - a:int");
        let right = Expr::subtract(a(), Expr::subtract(a(), a()));
        assert_eq!(right.to_string(), "a:int - (a:int - a:int)");
    }

    #[test]
    fn canonical_form_of_calls_and_lambdas() {
        let nums = Expr::get("nums", Type::list(Type::Int));
        let body = Expr::eq(Expr::get("item", Type::Int), Expr::int(5));
        let lambda = Expr::lambda(vec!["item".into()], body);
        let call = Expr::call(nums, "some", Type::Bool, vec![lambda]);
        assert_eq!(call.to_string(), "nums:list<int>.some:bool(|item| item:int === 5)");
    }

    #[test]
    fn canonical_form_of_negation() {
        assert_eq!(Expr::negative(Expr::int(5)).to_string(), "- 5");
        assert_eq!(Expr::int(-5).to_string(), "-5");
        assert_eq!(Expr::negative(Expr::negative(Expr::int(5))).to_string(), "- - 5");
        let neg = Expr::negative(Expr::get("x", Type::Int));
        let call = Expr::call(neg, "abs", Type::Int, vec![]);
        assert_eq!(call.to_string(), "(- x:int).abs:int()");
    }

    #[test]
    fn numeric_call_targets_are_parenthesized() {
        let abs = |target| Expr::call(target, "abs", Type::Int, vec![]);
        assert_eq!(abs(Expr::int(5)).to_string(), "(5).abs:int()");
        assert_eq!(abs(Expr::int(-5)).to_string(), "(-5).abs:int()");
        assert_eq!(abs(Expr::float(-1.5)).to_string(), "(-1.5).abs:int()");
        assert_eq!(abs(Expr::float(1.5)).to_string(), "1.5.abs:int()");
    }

    #[test]
    fn float_literals_keep_their_point() {
        assert_eq!(Expr::float(2.0).to_string(), "2.0");
        assert_eq!(Expr::float(-0.25).to_string(), "-0.25");
    }

    #[test]
    fn children_in_order() {
        let args = vec![Expr::int(1), Expr::int(2)];
        let call = Expr::call(Expr::string("s"), "substr", Type::String, args);
        let kinds: Vec<_> = call.children().iter().map(|c| c.to_string()).collect();
        assert_eq!(kinds, vec!["\"s\"", "1", "2"]);
        assert_eq!(call.node_kind(), NodeKind::Call);
    }
}
