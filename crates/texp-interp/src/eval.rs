// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression evaluation.

use std::sync::Arc;

use indexmap::IndexMap;
use texp_ast::{Expr, ExprKind, Literal, Type};

use crate::{check_value, Callable, EvalError, RuntimeError, Scope, StructValue, Value};

/// Evaluate an expression against a scope.
pub trait Evaluate {
    fn evaluate(&self, scope: &Scope) -> Result<Value, EvalError>;
}

impl Evaluate for Expr {
    fn evaluate(&self, scope: &Scope) -> Result<Value, EvalError> {
        let at = |error: RuntimeError| match error {
            RuntimeError::InLambda(inner) => *inner,
            error => EvalError::new(error, self.span),
        };
        match &self.kind {
            ExprKind::Get { name, ty } => {
                let value = scope
                    .get(name)
                    .ok_or_else(|| at(RuntimeError::UndefinedVariable(name.clone())))?;
                assert_type(ty, value, || format!("variable `{}`", name)).map_err(at)?;
                Ok(value.clone())
            }

            ExprKind::Literal(lit) => Ok(literal_value(lit)),

            ExprKind::Eq { left, right } => {
                let l = left.evaluate(scope)?;
                let r = right.evaluate(scope)?;
                Ok(Value::Bool(l == r))
            }

            ExprKind::Or { left, right } => {
                let l = left.evaluate(scope)?;
                let r = right.evaluate(scope)?;
                match (&l, &r) {
                    (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(*a || *b)),
                    (Value::Bool(_), other) | (other, _) => Err(at(RuntimeError::BadOperand {
                        op: "||",
                        found: other.type_name().to_string(),
                    })),
                }
            }

            ExprKind::Gt { left, right } => {
                let l = left.evaluate(scope)?;
                let r = right.evaluate(scope)?;
                greater_than(&l, &r).map(Value::Bool).map_err(at)
            }

            ExprKind::Subtract { left, right } => {
                let l = left.evaluate(scope)?;
                let r = right.evaluate(scope)?;
                subtract(&l, &r).map_err(at)
            }

            ExprKind::Negative(operand) => {
                let value = operand.evaluate(scope)?;
                negate(&value).map_err(at)
            }

            ExprKind::Call { target, name, ret, args } => {
                let mut values = Vec::with_capacity(args.len() + 1);
                values.push(target.evaluate(scope)?);
                for arg in args {
                    values.push(arg.evaluate(scope)?);
                }
                let entry = scope
                    .function(name)
                    .ok_or_else(|| at(RuntimeError::UndefinedFunction(name.clone())))?;
                tracing::debug!(function = %name, args = values.len(), "call");
                let result = entry.callable.call(values).map_err(at)?;
                assert_type(ret, &result, || format!("result of `{}`", name)).map_err(at)?;
                Ok(result)
            }

            ExprKind::Lambda { params, body } => Ok(Value::Func(closure(scope, params, body))),

            ExprKind::ListLiteral(items) => {
                let values =
                    items.iter().map(|item| item.evaluate(scope)).collect::<Result<Vec<_>, _>>()?;
                Ok(Value::List(values))
            }

            ExprKind::StructLiteral(fields) => {
                let mut values = IndexMap::with_capacity(fields.len());
                for field in fields {
                    values.insert(field.name.clone(), field.value.evaluate(scope)?);
                }
                Ok(Value::Struct(StructValue { kind: None, fields: values }))
            }

            ExprKind::FieldAccess { target, field, .. } => match target.evaluate(scope)? {
                Value::Struct(s) => {
                    let ty = s.kind.clone().unwrap_or_else(|| "struct".to_string());
                    s.fields
                        .get(field)
                        .cloned()
                        .ok_or_else(|| at(RuntimeError::NoSuchField { ty, field: field.clone() }))
                }
                other => Err(at(RuntimeError::NotAStruct {
                    field: field.clone(),
                    found: other.type_name().to_string(),
                })),
            },

            ExprKind::Offset { target, key } => {
                let collection = target.evaluate(scope)?;
                let key = key.evaluate(scope)?;
                offset(collection, &key).map_err(at)
            }
        }
    }
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::String(s) => Value::String(s.clone()),
        Literal::Int(n) => Value::Int(*n),
        Literal::Float(n) => Value::Float(*n),
        Literal::Bool(b) => Value::Bool(*b),
        Literal::None => Value::None,
    }
}

fn assert_type(
    ty: &Type,
    value: &Value,
    what: impl FnOnce() -> String,
) -> Result<(), RuntimeError> {
    check_value(ty, value).map_err(|mismatch| RuntimeError::TypeAssertion {
        what: what(),
        ty: ty.clone(),
        mismatch,
    })
}

/// A closure over the defining scope. Parameters are bound positionally in a
/// child scope; extra arguments are ignored.
fn closure(scope: &Scope, params: &[String], body: &Arc<Expr>) -> Callable {
    let scope = scope.clone();
    let params = params.to_vec();
    let body = Arc::clone(body);
    Callable::new(move |args| {
        if args.len() < params.len() {
            return Err(RuntimeError::ArityMismatch {
                function: "lambda".to_string(),
                expected: params.len(),
                got: args.len(),
            });
        }
        let child = scope.try_sub(params.iter().cloned().zip(args))?;
        body.evaluate(&child).map_err(|e| RuntimeError::InLambda(Box::new(e)))
    })
}

fn greater_than(l: &Value, r: &Value) -> Result<bool, RuntimeError> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => Ok(a > b),
        (Value::Float(a), Value::Float(b)) => Ok(a > b),
        _ => Err(operand_error(">", l, r)),
    }
}

fn subtract(l: &Value, r: &Value) -> Result<Value, RuntimeError> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => {
            a.checked_sub(*b).map(Value::Int).ok_or(RuntimeError::Overflow { op: "-" })
        }
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a - b)),
        _ => Err(operand_error("-", l, r)),
    }
}

fn negate(value: &Value) -> Result<Value, RuntimeError> {
    match value {
        Value::Int(n) => {
            n.checked_neg().map(Value::Int).ok_or(RuntimeError::Overflow { op: "unary -" })
        }
        Value::Float(n) => Ok(Value::Float(-n)),
        other => {
            Err(RuntimeError::BadOperand { op: "unary -", found: other.type_name().to_string() })
        }
    }
}

fn operand_error(op: &'static str, l: &Value, r: &Value) -> RuntimeError {
    RuntimeError::BadOperand { op, found: format!("{} and {}", l.type_name(), r.type_name()) }
}

fn offset(collection: Value, key: &Value) -> Result<Value, RuntimeError> {
    match (collection, key) {
        (Value::List(mut items), Value::Int(index)) => {
            let len = items.len();
            match usize::try_from(*index) {
                Ok(i) if i < len => Ok(items.swap_remove(i)),
                _ => Err(RuntimeError::IndexOutOfBounds { index: *index, len }),
            }
        }
        (Value::Map(mut entries), key) => {
            let missing = || RuntimeError::MissingKey { key: key.to_string() };
            let map_key = key.as_map_key().ok_or_else(missing)?;
            entries.swap_remove(&map_key).ok_or_else(missing)
        }
        (other, key) => Err(RuntimeError::NotIndexable {
            found: other.type_name().to_string(),
            key: key.type_name().to_string(),
        }),
    }
}
