// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Conversion between JSON and runtime values.

use indexmap::IndexMap;
use serde_json::{Map, Number};
use texp_ast::Type;
use texp_interp::{MapKey, StructValue, Value};

/// Convert a JSON value, guided by the declared type when there is one.
///
/// Without a type, objects become anonymous structs. With a `map<K, V>`
/// type they become maps, and int keys are parsed from their JSON strings.
pub fn from_json(json: &serde_json::Value, ty: Option<&Type>) -> Result<Value, String> {
    let ty = ty.map(unwrap_option);
    Ok(match json {
        serde_json::Value::Null => Value::None,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => number(n, ty)?,
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => {
            let elem = match ty {
                Some(Type::List(elem)) => Some(&**elem),
                _ => None,
            };
            Value::List(items.iter().map(|item| from_json(item, elem)).collect::<Result<_, _>>()?)
        }
        serde_json::Value::Object(fields) => object(fields, ty)?,
    })
}

fn unwrap_option(ty: &Type) -> &Type {
    match ty.canonical() {
        Type::Option(inner) | Type::Some(inner) => unwrap_option(inner),
        other => other,
    }
}

fn number(n: &Number, ty: Option<&Type>) -> Result<Value, String> {
    if matches!(ty, Some(Type::Float)) {
        return n.as_f64().map(Value::Float).ok_or_else(|| format!("{} is not a float", n));
    }
    if let Some(i) = n.as_i64() {
        return Ok(Value::Int(i));
    }
    if n.is_u64() {
        return Err(format!("{} does not fit in an int", n));
    }
    n.as_f64().map(Value::Float).ok_or_else(|| format!("{} is not a number", n))
}

fn object(fields: &Map<String, serde_json::Value>, ty: Option<&Type>) -> Result<Value, String> {
    match ty {
        Some(Type::Map { key, value }) => {
            let mut entries = IndexMap::new();
            for (k, v) in fields {
                let key = match key.canonical() {
                    Type::Int => {
                        let n = k.parse().map_err(|_| format!("map key '{}' is not an int", k))?;
                        MapKey::Int(n)
                    }
                    _ => MapKey::String(k.clone()),
                };
                entries.insert(key, from_json(v, Some(&**value))?);
            }
            Ok(Value::Map(entries))
        }
        Some(Type::Object(kind)) => {
            let fields = fields
                .iter()
                .map(|(k, v)| Ok((k.clone(), from_json(v, None)?)))
                .collect::<Result<Vec<_>, String>>()?;
            Ok(Value::Struct(StructValue::object(kind.clone(), fields)))
        }
        _ => {
            let field_types = ty.and_then(Type::fields);
            let mut out = Vec::with_capacity(fields.len());
            for (k, v) in fields {
                out.push((k.clone(), from_json(v, field_types.and_then(|f| f.get(k)))?));
            }
            Ok(Value::Struct(StructValue::anonymous(out)))
        }
    }
}

/// Render a runtime value as JSON. Non-finite floats become `null` and
/// callables become the string `"<function>"`.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Int(n) => serde_json::Value::from(*n),
        Value::Float(f) => {
            Number::from_f64(*f).map(serde_json::Value::Number).unwrap_or(serde_json::Value::Null)
        }
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::None => serde_json::Value::Null,
        Value::List(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Map(entries) => serde_json::Value::Object(
            entries
                .iter()
                .map(|(k, v)| {
                    let key = match k {
                        MapKey::Int(n) => n.to_string(),
                        MapKey::String(s) => s.clone(),
                    };
                    (key, to_json(v))
                })
                .collect(),
        ),
        Value::Struct(s) => serde_json::Value::Object(
            s.fields.iter().map(|(k, v)| (k.clone(), to_json(v))).collect(),
        ),
        Value::Func(_) => serde_json::Value::String("<function>".to_string()),
    }
}
