// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Runtime assertion of a value against a static type.

use std::fmt;

use texp_ast::Type;

use crate::{MapKey, StructValue, Value};

/// Where inside a value a check failed, and why.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("expected {expected}, found {found}{}", Location(.path))]
pub struct Mismatch {
    pub expected: String,
    pub found: String,
    /// Access path from the checked value down to the offending part,
    /// outermost first.
    pub path: Vec<PathSegment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    Index(usize),
    Key(MapKey),
    Field(String),
}

struct Location<'a>(&'a [PathSegment]);

impl fmt::Display for Location<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        write!(f, " at ")?;
        for seg in self.0 {
            match seg {
                PathSegment::Index(i) => write!(f, "[{}]", i)?,
                PathSegment::Key(k) => write!(f, "[{}]", k)?,
                PathSegment::Field(name) => write!(f, ".{}", name)?,
            }
        }
        Ok(())
    }
}

impl Mismatch {
    fn new(expected: &Type, value: &Value) -> Self {
        Self {
            expected: expected.to_string(),
            found: value.type_name().to_string(),
            path: Vec::new(),
        }
    }

    fn within(mut self, seg: PathSegment) -> Self {
        self.path.insert(0, seg);
        self
    }
}

/// Check that `value` is acceptable where `ty` is declared.
pub fn check_value(ty: &Type, value: &Value) -> Result<(), Mismatch> {
    let fail = || Err(Mismatch::new(ty, value));
    match (ty.canonical(), value) {
        (Type::Any, _) => Ok(()),
        (Type::Never, _) => fail(),
        (Type::String, Value::String(_))
        | (Type::Int, Value::Int(_))
        | (Type::Float, Value::Float(_))
        | (Type::Bool, Value::Bool(_))
        | (Type::None, Value::None)
        | (Type::Option(_), Value::None)
        | (Type::Func { .. }, Value::Func(_)) => Ok(()),
        (Type::Option(inner), _) => check_value(inner, value),
        (Type::Some(_), Value::None) => fail(),
        (Type::Some(inner), _) => check_value(inner, value),
        (Type::List(elem), Value::List(items)) => {
            for (i, item) in items.iter().enumerate() {
                check_value(elem, item).map_err(|m| m.within(PathSegment::Index(i)))?;
            }
            Ok(())
        }
        (Type::Map { key, value: value_ty }, Value::Map(entries)) => {
            for (k, v) in entries {
                check_key(key, k).map_err(|m| m.within(PathSegment::Key(k.clone())))?;
                check_value(value_ty, v).map_err(|m| m.within(PathSegment::Key(k.clone())))?;
            }
            Ok(())
        }
        (Type::Struct(fields), Value::Struct(s)) => check_fields(fields.iter(), s, value),
        (Type::Object(kind), Value::Struct(StructValue { kind: Some(actual), .. }))
            if kind == actual =>
        {
            Ok(())
        }
        _ => fail(),
    }
}

fn check_key(ty: &Type, key: &MapKey) -> Result<(), Mismatch> {
    check_value(ty, &Value::from(key.clone()))
}

/// Every declared field must be present and match; extra fields are fine.
fn check_fields<'a>(
    fields: impl Iterator<Item = (&'a String, &'a Type)>,
    s: &StructValue,
    whole: &Value,
) -> Result<(), Mismatch> {
    for (name, ty) in fields {
        match s.fields.get(name) {
            Some(v) => check_value(ty, v).map_err(|m| m.within(PathSegment::Field(name.clone())))?,
            None => {
                return Err(Mismatch {
                    expected: format!("field '{}'", name),
                    found: format!("{} without it", whole.type_name()),
                    path: Vec::new(),
                })
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn scalars() {
        assert!(check_value(&Type::Int, &Value::Int(1)).is_ok());
        assert!(check_value(&Type::Int, &Value::Float(1.0)).is_err());
        assert!(check_value(&Type::Any, &Value::None).is_ok());
        assert!(check_value(&Type::Never, &Value::Int(1)).is_err());
        assert!(check_value(&Type::alias("userId", Type::Int), &Value::Int(7)).is_ok());
    }

    #[test]
    fn options() {
        let opt = Type::option(Type::String);
        assert!(check_value(&opt, &Value::None).is_ok());
        assert!(check_value(&opt, &Value::from("x")).is_ok());
        assert!(check_value(&opt, &Value::Int(1)).is_err());
        assert!(check_value(&Type::some(Type::String), &Value::None).is_err());
    }

    #[test]
    fn list_mismatch_reports_the_index() {
        let list = Value::from(vec![Value::Int(1), Value::from("two")]);
        let m = check_value(&Type::list(Type::Int), &list).unwrap_err();
        assert_eq!(m.path, vec![PathSegment::Index(1)]);
        assert_eq!(m.to_string(), "expected int, found string at [1]");
    }

    #[test]
    fn map_keys_and_values() {
        let mut entries = IndexMap::new();
        entries.insert(MapKey::String("a".into()), Value::Int(1));
        let map = Value::Map(entries);
        assert!(check_value(&Type::map(Type::String, Type::Int), &map).is_ok());
        assert!(check_value(&Type::map(Type::Int, Type::Int), &map).is_err());
        let m = check_value(&Type::map(Type::String, Type::Bool), &map).unwrap_err();
        assert_eq!(m.to_string(), "expected bool, found int at [\"a\"]");
    }

    #[test]
    fn structs_need_their_fields() {
        let ty = Type::record([("name", Type::String)]);
        let fields = [("name", Value::from("x")), ("extra", Value::Int(1))];
        let ok = Value::from(StructValue::anonymous(fields));
        assert!(check_value(&ty, &ok).is_ok());
        let missing = Value::from(StructValue::anonymous([("other", Value::from("x"))]));
        assert!(check_value(&ty, &missing).is_err());
        let wrong = Value::from(StructValue::anonymous([("name", Value::Int(1))]));
        let path = check_value(&ty, &wrong).unwrap_err().path;
        assert_eq!(path, vec![PathSegment::Field("name".into())]);
    }

    #[test]
    fn objects_are_nominal() {
        let user = Value::from(StructValue::object("User", [("name", Value::from("x"))]));
        assert!(check_value(&Type::object("User"), &user).is_ok());
        assert!(check_value(&Type::object("Group"), &user).is_err());
        assert!(check_value(&Type::record([("name", Type::String)]), &user).is_ok());
    }
}
