// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Commands that stop after a front-end phase: lex, parse, check, lower.

use serde_json::json;
use texp_ast::Expr;
use texp_lexer::Tokenizer;
use texp_lower::{lower, RustSource};
use texp_parser::parse_with;
use texp_types::{rules, TypeError};

use super::{type_arg, CommandResult, Failure, Input, Session};
use crate::args::Format;
use crate::output;

pub fn cmd_lex(input: &Input, format: Format) -> CommandResult {
    let tokens = Tokenizer::new(&input.source).tokenize().map_err(|e| Failure::new("lex", &e))?;

    match format {
        Format::Json => {
            let tokens: Vec<_> = tokens
                .iter()
                .map(|tok| json!({ "kind": tok.kind.to_string(), "span": tok.span }))
                .collect();
            println!("{}", json!({ "success": true, "tokens": tokens }));
        }
        Format::Human => {
            println!("{}\n", output::section_header(&format!("=== Tokens ({}) ===", tokens.len())));
            for tok in &tokens {
                println!("{:<14} {}", output::span(&tok.span.to_string()), tok.kind);
            }
            println!("\n{}", output::banner_ok("Lex"));
        }
    }
    Ok(())
}

fn parse_input(input: &Input, session: &Session) -> Result<Expr, Failure> {
    parse_with(&input.source, &session.types, session.decls.clone())
        .map_err(|e| Failure::new("parse", &e))
}

fn type_label(expr: &Expr) -> String {
    match expr.try_ty() {
        Some(ty) => ty.to_string(),
        None => "<lambda>".to_string(),
    }
}

pub fn cmd_parse(input: &Input, session: &Session, format: Format) -> CommandResult {
    let expr = parse_input(input, session)?;

    match format {
        Format::Json => {
            let report = json!({
                "success": true,
                "expression": expr.to_string(),
                "type": type_label(&expr),
            });
            println!("{}", report)
        }
        Format::Human => {
            println!("{}", expr);
            println!("type: {}", output::type_name(&type_label(&expr)));
        }
    }
    Ok(())
}

/// Parse, then require the static type given with `--expect`.
pub fn cmd_check(
    input: &Input,
    session: &Session,
    expect: Option<&str>,
    format: Format,
) -> CommandResult {
    let expected = match expect {
        Some(text) => Some(type_arg(text, &session.types, "--expect")?),
        None => None,
    };
    let expr = parse_input(input, session)?;

    let found = expr
        .try_ty()
        .ok_or_else(|| Failure::new("check", &TypeError::LambdaHasNoType { span: expr.span }))?;
    if let Some(expected) = &expected {
        rules::expect_equal(expected, &found, expr.span).map_err(|e| Failure::new("check", &e))?;
    }

    match format {
        Format::Json => println!("{}", json!({ "success": true, "type": found.to_string() })),
        Format::Human => {
            println!("type: {}", output::type_name(&found.to_string()));
            println!("{}", output::banner_ok("Check"));
        }
    }
    Ok(())
}

pub fn cmd_lower(input: &Input, session: &Session, format: Format) -> CommandResult {
    let expr = parse_input(input, session)?;
    let rust = lower(&expr, &RustSource).map_err(|e| Failure::new("lower", &e))?;

    match format {
        Format::Json => {
            println!("{}", json!({ "success": true, "backend": "rust", "output": rust }))
        }
        Format::Human => println!("{}", rust),
    }
    Ok(())
}
