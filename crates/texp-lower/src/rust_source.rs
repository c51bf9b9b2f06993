// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Reference backend producing a Rust expression as source text.

use texp_ast::{Expr, ExprKind, Literal, NodeKind, Type};

use crate::{Backend, LowerError};

/// Emits Rust source. Variables are referenced by name, `===` becomes `==`,
/// calls become free functions taking the target first, and lambdas become
/// closures. Struct literals have no anonymous Rust counterpart and are
/// rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustSource;

const SUPPORTED: [NodeKind; 12] = [
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
    NodeKind::FieldAccess,
    NodeKind::Offset,
];

impl Backend for RustSource {
    type Output = String;

    fn name(&self) -> &str {
        "rust"
    }

    fn supported(&self) -> &[NodeKind] {
        &SUPPORTED
    }

    fn emit(&self, expr: &Expr) -> Result<String, LowerError> {
        let mut p = Printer::default();
        p.expr(expr);
        p.finish()
    }
}

#[derive(Default)]
struct Printer {
    output: String,
    unsupported: Option<LowerError>,
}

impl Printer {
    fn finish(self) -> Result<String, LowerError> {
        match self.unsupported {
            Some(err) => Err(err),
            None => Ok(self.output),
        }
    }

    /// Keeps the first node with no Rust counterpart.
    fn reject(&mut self, expr: &Expr) {
        if self.unsupported.is_none() {
            self.unsupported = Some(LowerError::Unsupported {
                backend: "rust".to_string(),
                kind: expr.node_kind(),
                span: expr.span,
            });
        }
    }

    fn emit(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Get { name, .. } => self.emit(name),
            ExprKind::Literal(lit) => self.literal(lit),
            ExprKind::Eq { left, right } => self.binary(left, "==", right),
            ExprKind::Or { left, right } => self.binary(left, "||", right),
            ExprKind::Gt { left, right } => self.binary(left, ">", right),
            ExprKind::Subtract { left, right } => self.binary(left, "-", right),
            ExprKind::Negative(operand) => {
                self.emit("-");
                self.operand(operand);
            }
            ExprKind::Call { target, name, args, .. } => {
                self.emit(name);
                self.emit("(");
                self.expr(target);
                for arg in args {
                    self.emit(", ");
                    self.expr(arg);
                }
                self.emit(")");
            }
            ExprKind::Lambda { params, body } => {
                self.emit("|");
                self.emit(&params.join(", "));
                self.emit("| ");
                self.expr(body);
            }
            ExprKind::ListLiteral(items) => {
                self.emit("vec![");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    self.expr(item);
                }
                self.emit("]");
            }
            ExprKind::StructLiteral(_) => self.reject(expr),
            ExprKind::FieldAccess { target, field, .. } => {
                self.operand(target);
                self.emit(".");
                self.emit(field);
            }
            ExprKind::Offset { target, key } => {
                self.operand(target);
                // Maps are indexed by reference, lists by usize.
                let is_map =
                    target.try_ty().is_some_and(|ty| matches!(ty.canonical(), Type::Map { .. }));
                if is_map {
                    self.emit("[&");
                    self.operand(key);
                    self.emit("]");
                } else {
                    self.emit("[");
                    self.operand(key);
                    self.emit(" as usize]");
                }
            }
        }
    }

    fn literal(&mut self, lit: &Literal) {
        let text = match lit {
            Literal::String(s) => format!("{:?}", s),
            Literal::Int(n) => format!("{}i64", n),
            Literal::Float(n) => format!("{:?}f64", n),
            Literal::Bool(b) => b.to_string(),
            Literal::None => "None".to_string(),
        };
        self.emit(&text);
    }

    /// Rust refuses to chain comparisons, so both sides of a binary operator
    /// get parentheses when they are compound.
    fn binary(&mut self, left: &Expr, op: &str, right: &Expr) {
        self.operand(left);
        self.emit(" ");
        self.emit(op);
        self.emit(" ");
        self.operand(right);
    }

    fn operand(&mut self, expr: &Expr) {
        if needs_parens(expr) {
            self.emit("(");
            self.expr(expr);
            self.emit(")");
        } else {
            self.expr(expr);
        }
    }
}

fn needs_parens(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Eq { .. }
        | ExprKind::Or { .. }
        | ExprKind::Gt { .. }
        | ExprKind::Subtract { .. }
        | ExprKind::Negative(_)
        | ExprKind::Lambda { .. } => true,
        ExprKind::Literal(Literal::Int(n)) => *n < 0,
        ExprKind::Literal(Literal::Float(n)) => n.is_sign_negative(),
        _ => false,
    }
}
