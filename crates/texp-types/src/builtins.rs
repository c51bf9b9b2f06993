// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Built-in type names and function signatures.

use texp_ast::Type;

/// Type names the registry resolves itself; aliases may not reuse them.
pub const BUILTIN_TYPES: [&str; 11] = [
    "string", "int", "float", "bool", "any", "never", "None", "Option", "Some", "list", "map",
];

/// Functions bound at the root scope. No scope or registry may rebind them.
pub const BUILTIN_FUNCTIONS: [&str; 9] = [
    "contains", "count", "filter", "isSome", "map", "some", "substr", "take", "unique",
];

pub fn is_builtin_type(name: &str) -> bool {
    BUILTIN_TYPES.contains(&name) || name == "fn"
}

pub fn is_builtin_function(name: &str) -> bool {
    BUILTIN_FUNCTIONS.contains(&name)
}

/// Documentation signatures of the built-ins. Call sites are never checked
/// against them.
pub fn builtin_signatures() -> Vec<(&'static str, Type)> {
    let any_list = || Type::list(Type::Any);
    let predicate = || Type::func(Type::Bool, vec![Type::Any]);

    vec![
        // contains(collection, needle) -> bool
        ("contains", Type::func(Type::Bool, vec![Type::Any, Type::Any])),
        // count(collection) -> int
        ("count", Type::func(Type::Int, vec![Type::Any])),
        // filter(collection, predicate) -> collection
        ("filter", Type::func(Type::Any, vec![Type::Any, predicate()])),
        // isSome(value) -> bool
        ("isSome", Type::func(Type::Bool, vec![Type::option(Type::Any)])),
        // map(collection, fn) -> collection
        ("map", Type::func(Type::Any, vec![Type::Any, Type::func(Type::Any, vec![Type::Any])])),
        // some(list, predicate) -> bool
        ("some", Type::func(Type::Bool, vec![any_list(), predicate()])),
        // substr(string, start, length) -> string
        ("substr", Type::func(Type::String, vec![Type::String, Type::Int, Type::Int])),
        // take(list, n) -> list
        ("take", Type::func(any_list(), vec![any_list(), Type::Int])),
        // unique(list) -> list
        ("unique", Type::func(any_list(), vec![any_list()])),
    ]
}
