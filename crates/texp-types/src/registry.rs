// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The `Types` registry: aliases, function signatures, and resolution of
//! type annotations.

use indexmap::IndexMap;
use texp_ast::type_node::FieldNode;
use texp_ast::{Type, TypeNode, TypeNodeKind};

use crate::builtins::{self, is_builtin_function, is_builtin_type};
use crate::TypeError;

/// Alias table plus declared function signatures.
///
/// Passed by reference to every parse. Signatures are informational: the
/// registry only refuses duplicates and attempts to replace a built-in.
#[derive(Debug, Clone)]
pub struct Types {
    aliases: IndexMap<String, Type>,
    functions: IndexMap<String, Type>,
}

impl Default for Types {
    fn default() -> Self {
        Self::new()
    }
}

impl Types {
    /// A registry holding only the built-in function signatures.
    pub fn new() -> Self {
        let functions = builtins::builtin_signatures()
            .into_iter()
            .map(|(name, sig)| (name.to_string(), sig))
            .collect();
        Self { aliases: IndexMap::new(), functions }
    }

    pub fn define_alias(&mut self, name: impl Into<String>, target: Type) -> Result<(), TypeError> {
        let name = name.into();
        if is_builtin_type(&name) {
            return Err(TypeError::ReservedName { what: "type", name });
        }
        if self.aliases.contains_key(&name) {
            return Err(TypeError::AlreadyDefined { what: "type alias", name });
        }
        tracing::debug!(alias = %name, target = %target, "type alias defined");
        self.aliases.insert(name, target);
        Ok(())
    }

    pub fn declare_function(
        &mut self,
        name: impl Into<String>,
        signature: Type,
    ) -> Result<(), TypeError> {
        let name = name.into();
        if is_builtin_function(&name) {
            return Err(TypeError::ReservedName { what: "function", name });
        }
        if self.functions.contains_key(&name) {
            return Err(TypeError::AlreadyDefined { what: "function", name });
        }
        self.functions.insert(name, signature);
        Ok(())
    }

    /// The aliased type, wrapped so it still displays under its alias name.
    pub fn alias(&self, name: &str) -> Option<Type> {
        self.aliases.get(name).map(|target| Type::alias(name, target.clone()))
    }

    pub fn function(&self, name: &str) -> Option<&Type> {
        self.functions.get(name)
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn functions(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.functions.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolve an annotation into a type.
    pub fn resolve(&self, node: &TypeNode) -> Result<Type, TypeError> {
        match &node.kind {
            TypeNodeKind::Named { name, args } => self.resolve_named(node, name, args),
            TypeNodeKind::Func { params, ret } => {
                let params = params.iter().map(|p| self.resolve(p)).collect::<Result<Vec<_>, _>>()?;
                let ret = self.resolve(ret)?;
                Ok(Type::func(ret, params))
            }
            TypeNodeKind::Struct { fields } => self.resolve_struct(fields),
        }
    }

    fn resolve_named(
        &self,
        node: &TypeNode,
        name: &str,
        args: &[TypeNode],
    ) -> Result<Type, TypeError> {
        let primitive = match name {
            "string" => Some(Type::String),
            "int" => Some(Type::Int),
            "float" => Some(Type::Float),
            "bool" => Some(Type::Bool),
            "any" => Some(Type::Any),
            "never" => Some(Type::Never),
            "None" => Some(Type::None),
            _ => None,
        };
        if let Some(ty) = primitive {
            return if args.is_empty() {
                Ok(ty)
            } else {
                Err(TypeError::TypeTakesNoArgs { name: name.to_string(), span: node.span })
            };
        }

        match name {
            "list" => {
                let [elem] = self.resolve_args::<1>(node, name, args)?;
                Ok(Type::list(elem))
            }
            "Option" => {
                let [inner] = self.resolve_args::<1>(node, name, args)?;
                Ok(Type::option(inner))
            }
            "Some" => {
                let [inner] = self.resolve_args::<1>(node, name, args)?;
                Ok(Type::some(inner))
            }
            "map" => {
                let [key, value] = self.resolve_args::<2>(node, name, args)?;
                if !matches!(key.canonical(), Type::Int | Type::String) {
                    return Err(TypeError::InvalidKeyType { found: key, span: args[0].span });
                }
                Ok(Type::map(key, value))
            }
            _ => {
                let (name, span) = (name.to_string(), node.span);
                let Some(alias) = self.alias(&name) else {
                    return Err(TypeError::UnknownType { name, span });
                };
                if !args.is_empty() {
                    return Err(TypeError::TypeTakesNoArgs { name, span });
                }
                Ok(alias)
            }
        }
    }

    fn resolve_args<const N: usize>(
        &self,
        node: &TypeNode,
        name: &str,
        args: &[TypeNode],
    ) -> Result<[Type; N], TypeError> {
        if args.len() != N {
            return Err(TypeError::WrongArity {
                name: name.to_string(),
                expected: N,
                found: args.len(),
                span: node.span,
            });
        }
        let resolved = args.iter().map(|a| self.resolve(a)).collect::<Result<Vec<_>, _>>()?;
        resolved.try_into().map_err(|_: Vec<Type>| TypeError::WrongArity {
            name: name.to_string(),
            expected: N,
            found: args.len(),
            span: node.span,
        })
    }

    fn resolve_struct(&self, fields: &[FieldNode]) -> Result<Type, TypeError> {
        let mut resolved = IndexMap::with_capacity(fields.len());
        for field in fields {
            if resolved.contains_key(&field.name) {
                let name = field.name.clone();
                return Err(TypeError::DuplicateField { name, span: field.span });
            }
            resolved.insert(field.name.clone(), self.resolve(&field.ty)?);
        }
        Ok(Type::Struct(resolved))
    }
}
