// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser integration tests: grammar, parse-time type rules, error spans.

use texp_ast::{Expr, ExprKind, Span, Type};
use texp_lexer::SyntaxError;
use texp_parser::{parse, parse_typed, parse_with, ParseError};
use texp_types::{Declarations, TypeError, Types};

fn ok(src: &str) -> Expr {
    parse(src, &Types::new()).unwrap_or_else(|e| panic!("parse of {:?} failed: {}", src, e))
}

fn err(src: &str) -> ParseError {
    match parse(src, &Types::new()) {
        Ok(expr) => panic!("expected {:?} to fail, got {}", src, expr),
        Err(e) => e,
    }
}

fn syntax(src: &str) -> SyntaxError {
    match err(src) {
        ParseError::Syntax(e) => e,
        other => panic!("expected a syntax error for {:?}, got {:?}", src, other),
    }
}

fn type_error(src: &str) -> TypeError {
    match err(src) {
        ParseError::Type(e) => e,
        other => panic!("expected a type error for {:?}, got {:?}", src, other),
    }
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn canonical_forms_parse_back_to_equal_trees() {
    let int = |n| Expr::int(n);
    let get = |name: &str, ty: Type| Expr::get(name, ty);

    let samples = vec![
        int(42),
        int(-7),
        Expr::float(1.5),
        Expr::string("Rudolph"),
        get("foo", Type::Int),
        get("m", Type::map(Type::String, Type::list(Type::Int))),
        get("o", Type::option(Type::String)),
        get("s", Type::some(Type::String)),
        get("f", Type::func(Type::Bool, vec![Type::Int])),
        get("u", Type::record([("name", Type::String), ("age", Type::Int)])),
        Expr::subtract(
            Expr::subtract(get("a", Type::Int), get("b", Type::Int)),
            get("c", Type::Int),
        ),
        Expr::subtract(
            get("a", Type::Int),
            Expr::subtract(get("b", Type::Int), get("c", Type::Int)),
        ),
        Expr::eq(get("a", Type::String), Expr::string("x")),
        Expr::or(Expr::gt(get("a", Type::Float), Expr::float(2.0)), get("b", Type::Bool)),
        Expr::negative(int(5)),
        Expr::negative(int(-5)),
        Expr::negative(Expr::negative(get("x", Type::Float))),
        Expr::subtract(Expr::negative(get("x", Type::Int)), int(1)),
        Expr::negative(Expr::subtract(get("x", Type::Int), int(1))),
        Expr::call(Expr::string("Rudolph"), "substr", Type::String, vec![int(1), int(3)]),
        Expr::call(Expr::negative(get("x", Type::Int)), "abs", Type::Int, vec![]),
        Expr::call(int(5), "abs", Type::Int, vec![]),
        Expr::call(int(-5), "abs", Type::Int, vec![]),
        Expr::call(Expr::float(-1.5), "abs", Type::Float, vec![]),
        Expr::call(Expr::float(1.5), "abs", Type::Float, vec![]),
        Expr::eq(Expr::call(int(12), "count", Type::Int, vec![]), int(1)),
        Expr::call(
            Expr::subtract(get("a", Type::Int), int(1)),
            "clamp",
            Type::Int,
            vec![Expr::subtract(int(0), int(1)), int(10)],
        ),
        Expr::list(vec![int(1), int(2), int(3)]),
        Expr::list(vec![]),
        Expr::record([("name", Expr::string("x")), ("n", int(1))]),
        Expr::eq(get("xs", Type::list(Type::Int)), Expr::list(vec![int(1)])),
    ];

    for expr in samples {
        let text = expr.to_string();
        let parsed = ok(&text);
        assert_eq!(parsed, expr, "round trip of {}", text);
    }
}

#[test]
fn aliases_round_trip_under_their_name() {
    let mut types = Types::new();
    types.define_alias("userId", Type::Int).unwrap();
    let expr = parse("id:userId - 1", &types).unwrap();
    assert_eq!(expr.to_string(), "id:userId - 1");
    assert_eq!(parse(&expr.to_string(), &types).unwrap(), expr);
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn binary_operators_chain_left() {
    let expr = ok("foo:int - bar:int - baz:int");
    let ExprKind::Subtract { left, right } = &expr.kind else {
        panic!("expected subtract, got {:?}", expr.kind);
    };
    assert!(matches!(left.kind, ExprKind::Subtract { .. }));
    assert!(matches!(&right.kind, ExprKind::Get { name, .. } if name == "baz"));
}

#[test]
fn no_precedence_between_operators() {
    // ((a - b) > c) === d
    let expr = ok("a:int - b:int > c:int === d:bool");
    assert!(matches!(expr.kind, ExprKind::Eq { .. }));
}

#[test]
fn call_with_lambda_argument() {
    let expr = ok("nums:list<int>.some:bool(|item| item:int === 5)");
    let ExprKind::Call { name, ret, args, .. } = &expr.kind else {
        panic!("expected call");
    };
    assert_eq!(name, "some");
    assert!(ret.equals(&Type::Bool));
    let ExprKind::Lambda { params, .. } = &args[0].kind else {
        panic!("expected a lambda argument, got {:?}", args[0].kind);
    };
    assert_eq!(params, &["item".to_string()]);
    assert!(expr.ty().equals(&Type::Bool));
}

#[test]
fn trailing_commas_are_tolerated() {
    ok("s:string.substr:string(1, 3,)");
    ok("xs:list<int>.map:list<int>(|a, b,| a:int)");
    ok("[1, 2,]");
    ok("{a: 1,}");
}

#[test]
fn zero_parameter_lambda() {
    let expr = ok("xs:list<int>.map:list<int>(|| 1)");
    let ExprKind::Call { args, .. } = &expr.kind else { panic!("expected call") };
    assert!(matches!(&args[0].kind, ExprKind::Lambda { params, .. } if params.is_empty()));
}

#[test]
fn declared_names_need_no_annotation() {
    let expr = ok("declare foo: int foo - 1");
    assert!(expr.ty().equals(&Type::Int));
    assert_eq!(expr.to_string(), "foo:int - 1");

    let expr = ok("declare a: int declare b: int a - b");
    assert!(matches!(expr.kind, ExprKind::Subtract { .. }));
}

#[test]
fn declare_alone_is_a_variable() {
    let expr = ok("declare:int - 1");
    let ExprKind::Subtract { left, .. } = &expr.kind else { panic!("expected subtract") };
    assert!(matches!(&left.kind, ExprKind::Get { name, .. } if name == "declare"));
}

#[test]
fn host_declarations() {
    let decls = Declarations::new().with("nums", Type::list(Type::Int)).unwrap();
    let expr = parse_with("nums[0] - 1", &Types::new(), decls).unwrap();
    assert!(expr.ty().equals(&Type::Int));
}

#[test]
fn field_access() {
    assert!(ok("u:{name: string}.name").ty().equals(&Type::String));
    assert!(ok("u:{name: string}.name:string").ty().equals(&Type::String));
    assert!(ok("o:any.name:string").ty().equals(&Type::String));
    assert!(matches!(type_error("u:{name: string}.age"), TypeError::NoSuchField { .. }));
    assert!(matches!(type_error("u:{name: string}.name:int"), TypeError::Mismatch { .. }));
    assert!(matches!(type_error("o:any.name"), TypeError::NotAStruct { .. }));
}

#[test]
fn offsets() {
    assert!(ok("xs:list<string>[0]").ty().equals(&Type::String));
    assert!(ok("m:map<string, float>[\"k\"]").ty().equals(&Type::Float));
    assert!(matches!(type_error("xs:list<string>[\"k\"]"), TypeError::Mismatch { .. }));
    assert!(matches!(type_error("n:int[0]"), TypeError::NotIndexable { .. }));
}

#[test]
fn literal_collections() {
    assert!(ok("[]").ty().equals(&Type::list(Type::Never)));
    assert!(ok("[1, 2]").ty().equals(&Type::list(Type::Int)));
    assert_eq!(ok("{a: 1, b: \"x\"}").ty().to_string(), "{a: int, b: string}");
    assert!(matches!(type_error("[1, \"a\"]"), TypeError::Mismatch { .. }));
    assert!(matches!(type_error("{a: 1, a: 2}"), TypeError::DuplicateField { .. }));
}

#[test]
fn grouping() {
    let expr = ok("(a:int - b:int)");
    assert!(matches!(expr.kind, ExprKind::Subtract { .. }));
    let expr = ok("a:int - (b:int - c:int)");
    let ExprKind::Subtract { right, .. } = &expr.kind else { panic!("expected subtract") };
    assert!(matches!(right.kind, ExprKind::Subtract { .. }));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn bare_name_is_undeclared() {
    let e = syntax("foo");
    assert!(e.message.contains("not declared"), "{}", e.message);
    assert_eq!(e.span, Span::new(1, 1, 1, 4));
}

#[test]
fn bool_map_key_is_invalid() {
    let e = type_error("foo:map<bool,string>");
    assert!(matches!(e, TypeError::InvalidKeyType { .. }));
    assert!(e.to_string().contains("invalid key type"));
    assert_eq!(e.span(), Span::new(1, 9, 1, 13));
}

#[test]
fn empty_input() {
    let e = syntax("");
    assert_eq!(e.message, "Expected expression, found end of input");
    assert_eq!(e.span, Span::point(1, 1));
}

#[test]
fn end_of_input_points_past_the_last_token() {
    let e = syntax("a:int -   ");
    assert_eq!(e.message, "Expected expression, found end of input");
    assert_eq!(e.span, Span::point(1, 8));
}

#[test]
fn trailing_tokens() {
    let e = syntax("1 2");
    assert_eq!(e.message, "Unexpected token: a number");
    assert_eq!(e.span, Span::new(1, 3, 1, 4));

    assert_eq!(syntax("1 foo").message, "Unexpected token: a name");

    let e = syntax("a:int -5");
    assert!(e.hint.unwrap().contains("- 5"));
}

#[test]
fn calls_need_a_return_type() {
    let e = syntax("\"x\".upper()");
    assert!(e.message.contains("return type"), "{}", e.message);
}

#[test]
fn unterminated_string_surfaces() {
    assert_eq!(syntax("\"abc").message, "Unterminated string");
}

#[test]
fn operator_checks_pin_operands() {
    let e = type_error("a:int === \"x\"");
    assert!(matches!(e, TypeError::Mismatch { .. }));
    assert_eq!(e.span(), Span::new(1, 11, 1, 14));

    let e = type_error("a:bool || b:int");
    assert!(matches!(e, TypeError::BadOperand { op: "||", .. }));
    assert_eq!(e.span(), Span::new(1, 11, 1, 16));

    assert!(matches!(type_error("a:int - b:float"), TypeError::Mismatch { .. }));
    assert!(matches!(type_error("a:string > b:string"), TypeError::BadOperand { op: ">", .. }));
    assert!(matches!(type_error("- a:string"), TypeError::BadOperand { op: "-", .. }));
    assert!(matches!(type_error("a:int === b:Option<int>"), TypeError::Mismatch { .. }));
}

#[test]
fn redeclaration_is_fatal() {
    let e = type_error("declare foo: int declare foo: string 1");
    assert!(matches!(e, TypeError::Redeclared { .. }));
    assert_eq!(e.related_span(), Some(Span::new(1, 9, 1, 12)));
}

#[test]
fn conflicting_annotation_names_both_locations() {
    let e = type_error("declare foo: int foo:string");
    let TypeError::DeclarationConflict { declared_at, span, .. } = e else {
        panic!("expected a declaration conflict, got {:?}", e);
    };
    assert_eq!(declared_at, Span::new(1, 9, 1, 12));
    assert_eq!(span, Span::new(1, 18, 1, 28));
}

#[test]
fn lambdas_have_no_static_type() {
    assert!(matches!(type_error("(|x| x:int) === 1"), TypeError::LambdaHasNoType { .. }));
    assert!(matches!(type_error("[|x| x:int]"), TypeError::LambdaHasNoType { .. }));
}

#[test]
fn unknown_annotation() {
    assert!(matches!(type_error("u:User"), TypeError::UnknownType { .. }));
    assert!(matches!(type_error("x:int<string>"), TypeError::TypeTakesNoArgs { .. }));
    assert!(matches!(type_error("x:list<int, int>"), TypeError::WrongArity { .. }));
}

// ============================================================================
// parse_typed
// ============================================================================

#[test]
fn typed_parse_requires_exact_type() {
    let types = Types::new();
    assert!(parse_typed("1", &Type::Int, &types).is_ok());
    assert!(parse_typed("a:int > 1", &Type::Bool, &types).is_ok());

    let e = parse_typed("1", &Type::Float, &types).unwrap_err();
    assert!(matches!(e, ParseError::Type(TypeError::Mismatch { .. })));

    // subtype is not enough
    let e = parse_typed("1", &Type::option(Type::Int), &types).unwrap_err();
    assert!(matches!(e, ParseError::Type(_)));

    let e = parse_typed("|x| x:int", &Type::func(Type::Int, vec![Type::Int]), &types).unwrap_err();
    assert!(matches!(e, ParseError::Type(TypeError::LambdaHasNoType { .. })));
}
