// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The structural type model: equality, subtyping, display.

use std::fmt;

use indexmap::IndexMap;

/// A type in texp.
///
/// Aliases are transparent: equality and subtyping always look through an
/// `Alias` to its target. The alias name only shows up in `Display`.
#[derive(Debug, Clone)]
pub enum Type {
    String,
    Int,
    Float,
    Bool,
    /// Top type.
    Any,
    /// Bottom type.
    Never,
    /// The type of the `None` value.
    None,
    Option(Box<Type>),
    Some(Box<Type>),
    List(Box<Type>),
    Map {
        key: Box<Type>,
        value: Box<Type>,
    },
    Func {
        ret: Box<Type>,
        params: Vec<Type>,
    },
    /// Structural record type, `{field: Type, ...}`.
    Struct(IndexMap<String, Type>),
    /// Nominal type of a host object, named after its concrete kind.
    Object(String),
    Alias {
        name: String,
        target: Box<Type>,
    },
}

impl Type {
    pub fn list(elem: Type) -> Type {
        Type::List(Box::new(elem))
    }

    pub fn map(key: Type, value: Type) -> Type {
        Type::Map { key: Box::new(key), value: Box::new(value) }
    }

    pub fn option(inner: Type) -> Type {
        Type::Option(Box::new(inner))
    }

    pub fn some(inner: Type) -> Type {
        Type::Some(Box::new(inner))
    }

    pub fn func(ret: Type, params: Vec<Type>) -> Type {
        Type::Func { ret: Box::new(ret), params }
    }

    pub fn alias(name: impl Into<String>, target: Type) -> Type {
        Type::Alias { name: name.into(), target: Box::new(target) }
    }

    pub fn object(name: impl Into<String>) -> Type {
        Type::Object(name.into())
    }

    pub fn record<I, S>(fields: I) -> Type
    where
        I: IntoIterator<Item = (S, Type)>,
        S: Into<String>,
    {
        Type::Struct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// The tag of this type. Aliases report their own name.
    pub fn name(&self) -> &str {
        match self {
            Type::String => "string",
            Type::Int => "int",
            Type::Float => "float",
            Type::Bool => "bool",
            Type::Any => "any",
            Type::Never => "never",
            Type::None => "None",
            Type::Option(_) => "Option",
            Type::Some(_) => "Some",
            Type::List(_) => "list",
            Type::Map { .. } => "map",
            Type::Func { .. } => "Func",
            Type::Struct(_) => "struct",
            Type::Object(name) => name,
            Type::Alias { name, .. } => name,
        }
    }

    /// Ordered child types. For `Func` the return type comes first, then
    /// the parameters. Aliases have no children of their own.
    pub fn args(&self) -> Vec<&Type> {
        match self {
            Type::Option(inner) | Type::Some(inner) | Type::List(inner) => vec![inner],
            Type::Map { key, value } => vec![key, value],
            Type::Func { ret, params } => {
                let mut args = Vec::with_capacity(params.len() + 1);
                args.push(ret.as_ref());
                args.extend(params.iter());
                args
            }
            _ => Vec::new(),
        }
    }

    pub fn alias_target(&self) -> Option<&Type> {
        match self {
            Type::Alias { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Look through any chain of aliases.
    pub fn canonical(&self) -> &Type {
        let mut ty = self;
        while let Type::Alias { target, .. } = ty {
            ty = target;
        }
        ty
    }

    /// Field map of a struct type (after alias unwrapping).
    pub fn fields(&self) -> Option<&IndexMap<String, Type>> {
        match self.canonical() {
            Type::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// `int` or `float`, after alias unwrapping.
    pub fn is_numeric(&self) -> bool {
        matches!(self.canonical(), Type::Int | Type::Float)
    }

    /// Type equality.
    ///
    /// Canonical names must match. Only `Func` and `list` go on to compare
    /// their arguments; `map<string, int>` equals `map<bool, bool>` and all
    /// struct types are equal to each other.
    pub fn equals(&self, other: &Type) -> bool {
        let a = self.canonical();
        let b = other.canonical();
        if a.name() != b.name() {
            return false;
        }
        match a {
            Type::Func { .. } | Type::List(_) => {
                let (xs, ys) = (a.args(), b.args());
                xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(x, y)| x.equals(y))
            }
            _ => true,
        }
    }

    /// Subtyping. Both sides are canonicalized before any rule applies.
    pub fn is_subtype_of(&self, other: &Type) -> bool {
        let a = self.canonical();
        let b = other.canonical();

        if matches!(a, Type::None) && matches!(b, Type::None | Type::Option(_)) {
            return true;
        }

        // Implicit lifting of a plain value into an Option position.
        if let Type::Option(inner) = b {
            if !matches!(a, Type::Option(_) | Type::Some(_)) {
                return a.is_subtype_of(inner);
            }
        }

        if matches!(a, Type::Never) {
            return true;
        }
        if matches!(b, Type::Any) {
            return true;
        }
        if matches!(a, Type::Any) {
            return false;
        }

        match (a, b) {
            (Type::Option(x), Type::Option(y)) => return x.is_subtype_of(y),
            (Type::Some(x), Type::Option(y) | Type::Some(y)) => return x.is_subtype_of(y),
            _ => {}
        }

        if a.name() != b.name() {
            return false;
        }

        match (a, b) {
            (Type::List(x), Type::List(y)) => x.is_subtype_of(y),
            (Type::Func { ret, params }, Type::Func { ret: other_ret, params: other_params }) => {
                ret.is_subtype_of(other_ret)
                    && params.iter().enumerate().all(|(i, p)| {
                        other_params.get(i).is_some_and(|q| q.is_subtype_of(p))
                    })
            }
            // map, struct, object and primitives match on name alone
            _ => true,
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Type) -> bool {
        self.equals(other)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Option(inner) => write!(f, "Option<{}>", inner),
            Type::Some(inner) => write!(f, "Some<{}>", inner),
            Type::List(inner) => write!(f, "list<{}>", inner),
            Type::Map { key, value } => write!(f, "map<{}, {}>", key, value),
            Type::Func { ret, params } => {
                write!(f, "fn(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p)?;
                }
                write!(f, ") -> {}", ret)
            }
            Type::Struct(fields) => {
                write!(f, "{{")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, ty)?;
                }
                write!(f, "}}")
            }
            other => write!(f, "{}", other.name()),
        }
    }
}
