// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! End-to-end: parse text, then evaluate it against a scope.

use indexmap::IndexMap;
use texp_ast::{Span, Type};
use texp_interp::{Evaluate, FunctionEntry, MapKey, RuntimeError, Scope, StructValue, Value};
use texp_parser::{parse, parse_with};
use texp_types::Types;

fn eval(src: &str, scope: &Scope) -> Result<Value, RuntimeError> {
    let expr =
        parse(src, &Types::new()).unwrap_or_else(|e| panic!("parse of {:?} failed: {}", src, e));
    expr.evaluate(scope).map_err(|e| e.error)
}

fn ints(ns: &[i64]) -> Value {
    Value::from(ns.to_vec())
}

#[test]
fn subtraction_is_left_associative() {
    let scope =
        Scope::new([("foo", Value::Int(10)), ("bar", Value::Int(3)), ("baz", Value::Int(4))]);
    assert_eq!(eval("foo:int - bar:int - baz:int", &scope).unwrap(), Value::Int(3));
    assert_eq!(eval("foo:int - (bar:int - baz:int)", &scope).unwrap(), Value::Int(11));
}

#[test]
fn some_with_a_lambda() {
    let src = "nums:list<int>.some:bool(|item| item:int === 5)";
    let yes = Scope::new([("nums", ints(&[4, 5, 6]))]);
    let no = Scope::new([("nums", ints(&[4, 6]))]);
    assert_eq!(eval(src, &yes).unwrap(), Value::Bool(true));
    assert_eq!(eval(src, &no).unwrap(), Value::Bool(false));
}

#[test]
fn substr_on_a_literal() {
    assert_eq!(eval("\"Rudolph\".substr:string(1,3)", &Scope::root()).unwrap(), Value::from("udo"));
}

#[test]
fn chained_builtins() {
    let scope = Scope::new([("nums", ints(&[3, 1, 3, 2, 1]))]);
    let distinct = eval("nums:list<int>.unique:list<int>().count:int()", &scope).unwrap();
    assert_eq!(distinct, Value::Int(3));
    assert_eq!(eval("nums:list<int>.take:list<int>(-2)", &scope).unwrap(), ints(&[3, 1, 3]));
    let filtered = eval("nums:list<int>.filter:list<int>(|n| n:int > 1)", &scope).unwrap();
    assert_eq!(filtered, ints(&[3, 3, 2]));
    let first = eval("nums:list<int>.map:list<int>(|n| - n:int)[0]", &scope).unwrap();
    assert_eq!(first, Value::Int(-3));
}

#[test]
fn declared_type_is_asserted_at_runtime() {
    let scope = Scope::new([("nums", Value::from(vec![Value::Int(1), Value::from("two")]))]);
    match eval("nums:list<int>.count:int()", &scope).unwrap_err() {
        RuntimeError::TypeAssertion { what, mismatch, .. } => {
            assert_eq!(what, "variable `nums`");
            assert_eq!(mismatch.to_string(), "expected int, found string at [1]");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn return_annotation_is_asserted_at_runtime() {
    let err = eval("\"abc\".count:int()", &Scope::root()).unwrap_err();
    assert!(matches!(err, RuntimeError::BadArgument { .. }));
    let err = eval("\"abc\".substr:int(0, 1)", &Scope::root()).unwrap_err();
    assert!(matches!(err, RuntimeError::TypeAssertion { .. }));
}

#[test]
fn missing_variable_and_function() {
    let err = eval("x:int", &Scope::root()).unwrap_err();
    assert_eq!(err, RuntimeError::UndefinedVariable("x".into()));
    let err = eval("\"x\".nope:int()", &Scope::root()).unwrap_err();
    assert_eq!(err, RuntimeError::UndefinedFunction("nope".into()));
}

#[test]
fn errors_inside_lambdas_point_into_the_body() {
    let scope = Scope::new([("nums", ints(&[1, 2]))]);
    let src = "nums:list<int>.map:list<int>(|n| n:int - missing:int)";
    let expr = parse(src, &Types::new()).unwrap();
    let err = expr.evaluate(&scope).unwrap_err();
    assert_eq!(err.error, RuntimeError::UndefinedVariable("missing".into()));
    assert_eq!(err.span, Span::new(1, 42, 1, 53));
}

#[test]
fn overflow() {
    let scope = Scope::new([("big", Value::Int(i64::MIN))]);
    assert_eq!(eval("big:int - 1", &scope).unwrap_err(), RuntimeError::Overflow { op: "-" });
}

#[test]
fn map_offsets() {
    let mut entries = IndexMap::new();
    entries.insert(MapKey::String("a".into()), Value::Int(1));
    let scope = Scope::new([("m", Value::Map(entries))]);
    assert_eq!(eval("m:map<string, int>[\"a\"]", &scope).unwrap(), Value::Int(1));
    assert_eq!(
        eval("m:map<string, int>[\"b\"]", &scope).unwrap_err(),
        RuntimeError::MissingKey { key: "\"b\"".into() }
    );
}

#[test]
fn struct_values() {
    let user = StructValue::anonymous([("name", Value::from("Ada")), ("age", Value::Int(36))]);
    let scope = Scope::new([("u", Value::from(user))]);
    assert_eq!(eval("u:{name: string}.name", &scope).unwrap(), Value::from("Ada"));
    assert_eq!(eval("{n: 1, s: \"x\"}.n", &Scope::root()).unwrap(), Value::Int(1));
    assert_eq!(eval("{n: 1} === {n: 1}", &Scope::root()).unwrap(), Value::Bool(true));
}

#[test]
fn host_declarations_allow_bare_references() {
    let scope = Scope::new([("nums", ints(&[4, 5])), ("limit", Value::Int(4))]);
    let decls = scope.declarations().unwrap();
    let src = "nums.filter:list<int>(|n| n:int > limit).count:int()";
    let expr = parse_with(src, &Types::new(), decls).unwrap();
    assert!(expr.ty().equals(&Type::Int));
    assert_eq!(expr.evaluate(&scope).unwrap(), Value::Int(1));
}

#[test]
fn host_functions_are_called_with_the_target_first() {
    let upper = FunctionEntry::new(|args| match args.first() {
        Some(Value::String(s)) => Ok(Value::from(s.to_uppercase())),
        _ => Ok(Value::None),
    })
    .with_signature(Type::func(Type::String, vec![Type::String]));
    let scope = Scope::with_parent([("name", Value::from("ada"))], [("upper", upper)], None);
    assert_eq!(eval("name:string.upper:string()", &scope).unwrap(), Value::from("ADA"));

    let child = scope.sub([("other", Value::from("bob"))]);
    assert_eq!(eval("other:string.upper:string()", &child).unwrap(), Value::from("BOB"));
}

#[test]
fn one_tree_many_scopes() {
    let expr = parse("x:int - 1", &Types::new()).unwrap();
    let handles: Vec<_> = (0..4i64)
        .map(|n| {
            let expr = expr.clone();
            std::thread::spawn(move || {
                expr.evaluate(&Scope::new([("x", Value::Int(n))])).map_err(|e| e.error)
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect();
    assert_eq!(results, vec![Value::Int(-1), Value::Int(0), Value::Int(1), Value::Int(2)]);
}
