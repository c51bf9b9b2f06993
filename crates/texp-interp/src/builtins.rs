// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Built-in functions bound at the root scope.
//!
//! Each built-in receives the call target as its first argument.

use indexmap::IndexMap;
use texp_types::builtin_signatures;

use crate::{Callable, FunctionEntry, RuntimeError, Value};

type Builtin = fn(Vec<Value>) -> Result<Value, RuntimeError>;

/// Entries for every built-in, with their documentation signatures.
pub(crate) fn install() -> Vec<(String, FunctionEntry)> {
    builtin_signatures()
        .into_iter()
        .filter_map(|(name, signature)| {
            let f = lookup(name)?;
            let entry = FunctionEntry { signature: Some(signature), callable: Callable::new(f) };
            Some((name.to_string(), entry))
        })
        .collect()
}

fn lookup(name: &str) -> Option<Builtin> {
    Some(match name {
        "contains" => contains,
        "count" => count,
        "filter" => filter,
        "isSome" => is_some,
        "map" => map,
        "some" => some,
        "substr" => substr,
        "take" => take,
        "unique" => unique,
        _ => return None,
    })
}

// ----------------------------------------------------------------------------
// Argument helpers
// ----------------------------------------------------------------------------

fn expect_args<const N: usize>(
    function: &str,
    args: Vec<Value>,
) -> Result<[Value; N], RuntimeError> {
    let got = args.len();
    args.try_into().map_err(|_: Vec<Value>| RuntimeError::ArityMismatch {
        function: function.to_string(),
        expected: N,
        got,
    })
}

fn bad_argument(
    function: &str,
    index: usize,
    expected: &'static str,
    found: &Value,
) -> RuntimeError {
    RuntimeError::BadArgument {
        function: function.to_string(),
        index,
        expected,
        found: found.type_name().to_string(),
    }
}

fn expect_int(function: &str, index: usize, value: &Value) -> Result<i64, RuntimeError> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(bad_argument(function, index, "an int", other)),
    }
}

fn expect_list(function: &str, index: usize, value: Value) -> Result<Vec<Value>, RuntimeError> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(bad_argument(function, index, "a list", &other)),
    }
}

fn expect_callable(function: &str, index: usize, value: &Value) -> Result<Callable, RuntimeError> {
    match value {
        Value::Func(f) => Ok(f.clone()),
        other => Err(bad_argument(function, index, "a function", other)),
    }
}

/// Run a predicate; anything but a bool result is an error.
fn test(function: &str, predicate: &Callable, item: Value) -> Result<bool, RuntimeError> {
    match predicate.call(vec![item])? {
        Value::Bool(b) => Ok(b),
        other => Err(RuntimeError::BadArgument {
            function: function.to_string(),
            index: 1,
            expected: "a predicate returning bool",
            found: format!("one returning {}", other.type_name()),
        }),
    }
}

// ----------------------------------------------------------------------------
// Built-ins
// ----------------------------------------------------------------------------

fn contains(args: Vec<Value>) -> Result<Value, RuntimeError> {
    let [collection, needle] = expect_args::<2>("contains", args)?;
    let found = match &collection {
        Value::List(items) => items.contains(&needle),
        Value::Map(entries) => entries.values().any(|v| *v == needle),
        other => return Err(bad_argument("contains", 0, "a list or map", other)),
    };
    Ok(Value::Bool(found))
}

fn count(args: Vec<Value>) -> Result<Value, RuntimeError> {
    let [collection] = expect_args::<1>("count", args)?;
    let len = match &collection {
        Value::List(items) => items.len(),
        Value::Map(entries) => entries.len(),
        other => return Err(bad_argument("count", 0, "a list or map", other)),
    };
    Ok(Value::Int(len as i64))
}

fn filter(args: Vec<Value>) -> Result<Value, RuntimeError> {
    let [collection, predicate] = expect_args::<2>("filter", args)?;
    let predicate = expect_callable("filter", 1, &predicate)?;
    match collection {
        Value::List(items) => {
            let mut kept = Vec::new();
            for item in items {
                if test("filter", &predicate, item.clone())? {
                    kept.push(item);
                }
            }
            Ok(Value::List(kept))
        }
        Value::Map(entries) => {
            let mut kept = IndexMap::new();
            for (key, value) in entries {
                if test("filter", &predicate, value.clone())? {
                    kept.insert(key, value);
                }
            }
            Ok(Value::Map(kept))
        }
        other => Err(bad_argument("filter", 0, "a list or map", &other)),
    }
}

fn is_some(args: Vec<Value>) -> Result<Value, RuntimeError> {
    let [value] = expect_args::<1>("isSome", args)?;
    Ok(Value::Bool(!matches!(value, Value::None)))
}

fn map(args: Vec<Value>) -> Result<Value, RuntimeError> {
    let [collection, f] = expect_args::<2>("map", args)?;
    let f = expect_callable("map", 1, &f)?;
    match collection {
        Value::List(items) => {
            let mapped =
                items.into_iter().map(|item| f.call(vec![item])).collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(mapped))
        }
        Value::Map(entries) => {
            let mut mapped = IndexMap::with_capacity(entries.len());
            for (key, value) in entries {
                mapped.insert(key, f.call(vec![value])?);
            }
            Ok(Value::Map(mapped))
        }
        other => Err(bad_argument("map", 0, "a list or map", &other)),
    }
}

fn some(args: Vec<Value>) -> Result<Value, RuntimeError> {
    let [list, predicate] = expect_args::<2>("some", args)?;
    let items = expect_list("some", 0, list)?;
    let predicate = expect_callable("some", 1, &predicate)?;
    for item in items {
        if test("some", &predicate, item)? {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

/// Character-based. A negative start counts from the end; a negative
/// length stops that many characters before the end.
fn substr(args: Vec<Value>) -> Result<Value, RuntimeError> {
    let [string, start, length] = expect_args::<3>("substr", args)?;
    let Value::String(s) = &string else {
        return Err(bad_argument("substr", 0, "a string", &string));
    };
    let start = expect_int("substr", 1, &start)?;
    let length = expect_int("substr", 2, &length)?;

    let chars: Vec<char> = s.chars().collect();
    let len = chars.len() as i64;
    let from = if start < 0 { (len + start).max(0) } else { start.min(len) };
    let to = if length < 0 { len + length } else { from.saturating_add(length).min(len) };
    if to <= from {
        return Ok(Value::String(String::new()));
    }
    Ok(Value::String(chars[from as usize..to as usize].iter().collect()))
}

/// First `n` elements; a negative `n` drops that many from the end.
fn take(args: Vec<Value>) -> Result<Value, RuntimeError> {
    let [list, n] = expect_args::<2>("take", args)?;
    let mut items = expect_list("take", 0, list)?;
    let n = expect_int("take", 1, &n)?;
    let keep = if n >= 0 {
        (n as u64).min(items.len() as u64) as usize
    } else {
        items.len().saturating_sub(n.unsigned_abs().min(items.len() as u64) as usize)
    };
    items.truncate(keep);
    Ok(Value::List(items))
}

fn unique(args: Vec<Value>) -> Result<Value, RuntimeError> {
    let [list] = expect_args::<1>("unique", args)?;
    let items = expect_list("unique", 0, list)?;
    let mut seen: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    Ok(Value::List(seen))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapKey;

    fn s(text: &str) -> Value {
        Value::from(text)
    }

    fn ints(ns: &[i64]) -> Value {
        Value::from(ns.to_vec())
    }

    fn callable(
        f: impl Fn(Vec<Value>) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    ) -> Value {
        Value::Func(Callable::new(f))
    }

    fn is_even() -> Value {
        callable(|args| match args.first() {
            Some(Value::Int(n)) => Ok(Value::Bool(n % 2 == 0)),
            _ => Ok(Value::Bool(false)),
        })
    }

    fn sample_map() -> Value {
        let mut entries = IndexMap::new();
        entries.insert(MapKey::String("a".into()), Value::Int(1));
        entries.insert(MapKey::String("b".into()), Value::Int(2));
        entries.insert(MapKey::String("c".into()), Value::Int(4));
        Value::Map(entries)
    }

    #[test]
    fn every_signature_has_an_implementation() {
        assert_eq!(install().len(), texp_types::BUILTIN_FUNCTIONS.len());
    }

    #[test]
    fn substr_basic() {
        assert_eq!(substr(vec![s("Rudolph"), Value::Int(1), Value::Int(3)]).unwrap(), s("udo"));
        assert_eq!(substr(vec![s("Rudolph"), Value::Int(5), Value::Int(10)]).unwrap(), s("ph"));
        assert_eq!(substr(vec![s("Rudolph"), Value::Int(10), Value::Int(2)]).unwrap(), s(""));
    }

    #[test]
    fn substr_negative_bounds() {
        assert_eq!(substr(vec![s("Rudolph"), Value::Int(-3), Value::Int(2)]).unwrap(), s("lp"));
        assert_eq!(substr(vec![s("Rudolph"), Value::Int(1), Value::Int(-2)]).unwrap(), s("udol"));
        assert_eq!(substr(vec![s("Rudolph"), Value::Int(-100), Value::Int(2)]).unwrap(), s("Ru"));
        assert_eq!(substr(vec![s("Rudolph"), Value::Int(5), Value::Int(-4)]).unwrap(), s(""));
    }

    #[test]
    fn substr_counts_characters() {
        assert_eq!(substr(vec![s("héllo"), Value::Int(1), Value::Int(2)]).unwrap(), s("él"));
    }

    #[test]
    fn take_positive_and_negative() {
        assert_eq!(take(vec![ints(&[1, 2, 3]), Value::Int(2)]).unwrap(), ints(&[1, 2]));
        assert_eq!(take(vec![ints(&[1, 2, 3]), Value::Int(10)]).unwrap(), ints(&[1, 2, 3]));
        assert_eq!(take(vec![ints(&[1, 2, 3]), Value::Int(-1)]).unwrap(), ints(&[1, 2]));
        assert_eq!(take(vec![ints(&[1, 2, 3]), Value::Int(-5)]).unwrap(), ints(&[]));
    }

    #[test]
    fn unique_keeps_first_occurrence() {
        assert_eq!(unique(vec![ints(&[3, 1, 3, 2, 1])]).unwrap(), ints(&[3, 1, 2]));
    }

    #[test]
    fn filter_renumbers_lists_and_keeps_map_keys() {
        assert_eq!(filter(vec![ints(&[1, 2, 3, 4]), is_even()]).unwrap(), ints(&[2, 4]));

        let Value::Map(kept) = filter(vec![sample_map(), is_even()]).unwrap() else {
            panic!("expected a map");
        };
        let keys: Vec<_> = kept.keys().cloned().collect();
        assert_eq!(keys, vec![MapKey::String("b".into()), MapKey::String("c".into())]);
    }

    #[test]
    fn filter_needs_a_bool_predicate() {
        let not_bool = callable(|_| Ok(Value::Int(1)));
        let result = filter(vec![ints(&[1]), not_bool]);
        assert!(matches!(result, Err(RuntimeError::BadArgument { .. })));
    }

    #[test]
    fn map_over_lists_and_maps() {
        let double = callable(|args| match args.first() {
            Some(Value::Int(n)) => Ok(Value::Int(n * 2)),
            _ => Ok(Value::None),
        });
        assert_eq!(map(vec![ints(&[1, 2]), double.clone()]).unwrap(), ints(&[2, 4]));
        let Value::Map(mapped) = map(vec![sample_map(), double]).unwrap() else {
            panic!("expected a map");
        };
        assert_eq!(mapped.get(&MapKey::String("c".into())), Some(&Value::Int(8)));
    }

    #[test]
    fn contains_and_count() {
        assert_eq!(contains(vec![ints(&[4, 5]), Value::Int(5)]).unwrap(), Value::Bool(true));
        assert_eq!(contains(vec![sample_map(), Value::Int(3)]).unwrap(), Value::Bool(false));
        assert_eq!(count(vec![sample_map()]).unwrap(), Value::Int(3));
        assert!(count(vec![s("abc")]).is_err());
    }

    #[test]
    fn some_and_is_some() {
        assert_eq!(some(vec![ints(&[1, 3, 4]), is_even()]).unwrap(), Value::Bool(true));
        assert_eq!(some(vec![ints(&[1, 3]), is_even()]).unwrap(), Value::Bool(false));
        assert_eq!(is_some(vec![Value::None]).unwrap(), Value::Bool(false));
        assert_eq!(is_some(vec![Value::Int(0)]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn arity_is_checked() {
        let err = substr(vec![s("x"), Value::Int(1)]).unwrap_err();
        let expected =
            RuntimeError::ArityMismatch { function: "substr".into(), expected: 3, got: 2 };
        assert_eq!(err, expected);
    }
}
