// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Runtime values.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use texp_ast::Type;

use crate::RuntimeError;

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
    List(Vec<Value>),
    Map(IndexMap<MapKey, Value>),
    Struct(StructValue),
    Func(Callable),
}

/// Map keys are restricted to ints and strings, like `map<K, V>` types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    Int(i64),
    String(String),
}

/// A record. Host objects carry the name of their concrete kind, which
/// makes them nominally typed; anonymous records are typed by their fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructValue {
    pub kind: Option<String>,
    pub fields: IndexMap<String, Value>,
}

type NativeFn = dyn Fn(Vec<Value>) -> Result<Value, RuntimeError> + Send + Sync;

/// Something that can be invoked with a list of arguments: a lambda
/// closure, a built-in, or a host function.
///
/// Callables compare by identity.
#[derive(Clone)]
pub struct Callable(Arc<NativeFn>);

impl Callable {
    pub fn new(
        f: impl Fn(Vec<Value>) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    ) -> Self {
        Callable(Arc::new(f))
    }

    pub fn call(&self, args: Vec<Value>) -> Result<Value, RuntimeError> {
        (self.0)(args)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Callable) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<callable>")
    }
}

impl StructValue {
    pub fn anonymous<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Self { kind: None, fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect() }
    }

    pub fn object<I, S>(kind: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Self { kind: Some(kind.into()), ..Self::anonymous(fields) }
    }
}

impl Value {
    /// Get the type name for error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Value::String(_) => "string",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::None => "None",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Struct(StructValue { kind: Some(kind), .. }) => kind,
            Value::Struct(_) => "struct",
            Value::Func(_) => "function",
        }
    }

    pub fn as_map_key(&self) -> Option<MapKey> {
        match self {
            Value::Int(n) => Some(MapKey::Int(*n)),
            Value::String(s) => Some(MapKey::String(s.clone())),
            _ => None,
        }
    }

    /// Infer a static type from a value, for host-supplied variables.
    ///
    /// Collections take their element type from the first entry, so empty
    /// collections are ambiguous. Callables have no inferable type.
    pub fn infer_type(&self) -> Result<Type, RuntimeError> {
        Ok(match self {
            Value::String(_) => Type::String,
            Value::Int(_) => Type::Int,
            Value::Float(_) => Type::Float,
            Value::Bool(_) => Type::Bool,
            Value::None => Type::None,
            Value::List(items) => match items.first() {
                Some(first) => Type::list(first.infer_type()?),
                None => return Err(cannot_infer("empty list is ambiguous")),
            },
            Value::Map(entries) => match entries.first() {
                Some((key, value)) => Type::map(key.ty(), value.infer_type()?),
                None => return Err(cannot_infer("empty map is ambiguous")),
            },
            Value::Struct(StructValue { kind: Some(kind), .. }) => Type::object(kind.clone()),
            Value::Struct(StructValue { kind: None, fields }) => {
                let mut tys = IndexMap::with_capacity(fields.len());
                for (name, value) in fields {
                    tys.insert(name.clone(), value.infer_type()?);
                }
                Type::Struct(tys)
            }
            Value::Func(_) => return Err(cannot_infer("functions have no inferable type")),
        })
    }
}

fn cannot_infer(reason: &str) -> RuntimeError {
    RuntimeError::CannotInferType { reason: reason.to_string() }
}

impl MapKey {
    pub fn ty(&self) -> Type {
        match self {
            MapKey::Int(_) => Type::Int,
            MapKey::String(_) => Type::String,
        }
    }
}

impl From<MapKey> for Value {
    fn from(key: MapKey) -> Value {
        match key {
            MapKey::Int(n) => Value::Int(n),
            MapKey::String(s) => Value::String(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Value {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Value {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<StructValue> for Value {
    fn from(s: StructValue) -> Value {
        Value::Struct(s)
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Int(n) => write!(f, "{}", n),
            MapKey::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{:?}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::None => write!(f, "None"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Struct(s) => {
                if let Some(kind) = &s.kind {
                    write!(f, "{} ", kind)?;
                }
                write!(f, "{{")?;
                for (i, (k, v)) in s.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Func(_) => write!(f, "<function>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_equality() {
        let a = Value::from(StructValue::anonymous([("xs", Value::from(vec![1i64, 2]))]));
        let b = Value::from(StructValue::anonymous([("xs", Value::from(vec![1i64, 2]))]));
        let c = Value::from(StructValue::anonymous([("xs", Value::from(vec![1i64, 3]))]));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(Value::Int(1), Value::Float(1.0));
    }

    #[test]
    fn callables_compare_by_identity() {
        let f = Callable::new(|_| Ok(Value::None));
        let g = Callable::new(|_| Ok(Value::None));
        assert_eq!(Value::Func(f.clone()), Value::Func(f));
        assert_ne!(Value::Func(g.clone()), Value::Func(Callable::new(|_| Ok(Value::None))));
    }

    #[test]
    fn infer_scalars_and_collections() {
        assert!(Value::from("x").infer_type().unwrap().equals(&Type::String));
        assert!(Value::None.infer_type().unwrap().equals(&Type::None));
        let nums = Value::from(vec![4i64, 5, 6]);
        assert_eq!(nums.infer_type().unwrap().to_string(), "list<int>");

        let mut entries = IndexMap::new();
        entries.insert(MapKey::String("a".into()), Value::Float(1.0));
        assert_eq!(Value::Map(entries).infer_type().unwrap().to_string(), "map<string, float>");
    }

    #[test]
    fn infer_structs() {
        let anon = Value::from(StructValue::anonymous([("name", Value::from("x"))]));
        assert_eq!(anon.infer_type().unwrap().to_string(), "{name: string}");
        let user = Value::from(StructValue::object("User", [("name", Value::from("x"))]));
        assert_eq!(user.infer_type().unwrap().to_string(), "User");
    }

    #[test]
    fn ambiguous_values_cannot_be_inferred() {
        assert!(Value::List(vec![]).infer_type().is_err());
        assert!(Value::Map(IndexMap::new()).infer_type().is_err());
        assert!(Value::Func(Callable::new(|_| Ok(Value::None))).infer_type().is_err());
    }

    #[test]
    fn display() {
        let v = Value::from(vec![Value::from("a"), Value::Float(2.0), Value::None]);
        assert_eq!(v.to_string(), "[\"a\", 2.0, None]");
    }
}
