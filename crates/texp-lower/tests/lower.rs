// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lowering parsed expressions to Rust source.

use texp_ast::{NodeKind, Span};
use texp_lower::{lower, LowerError, RustSource};
use texp_parser::parse;
use texp_types::Types;

fn rust(src: &str) -> Result<String, LowerError> {
    let expr =
        parse(src, &Types::new()).unwrap_or_else(|e| panic!("parse of {:?} failed: {}", src, e));
    lower(&expr, &RustSource)
}

#[test]
fn arithmetic_and_comparison() {
    assert_eq!(rust("foo:int - bar:int - baz:int").unwrap(), "(foo - bar) - baz");
    assert_eq!(rust("a:int > 1 || b:bool").unwrap(), "(a > 1i64) || b");
    assert_eq!(rust("- x:float").unwrap(), "-x");
}

#[test]
fn calls_take_the_target_first() {
    assert_eq!(
        rust("nums:list<int>.some:bool(|item| item:int === 5)").unwrap(),
        "some(nums, |item| item == 5i64)"
    );
    assert_eq!(rust("\"Rudolph\".substr:string(1, 3)").unwrap(), "substr(\"Rudolph\", 1i64, 3i64)");
}

#[test]
fn field_access_and_lists() {
    assert_eq!(rust("u:{name: string}.name").unwrap(), "u.name");
    assert_eq!(rust("[1, 2][0]").unwrap(), "vec![1i64, 2i64][0i64 as usize]");
}

#[test]
fn struct_literals_fail_with_their_span() {
    let err = rust("[{a: 1}]").unwrap_err();
    assert_eq!(
        err,
        LowerError::Unsupported {
            backend: "rust".into(),
            kind: NodeKind::StructLiteral,
            span: Span::new(1, 2, 1, 8),
        }
    );
}
