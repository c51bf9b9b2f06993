// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `texp eval`: parse against the `--var` bindings and evaluate.

use serde_json::json;
use texp_interp::{Evaluate, RuntimeError, Scope};
use texp_parser::parse_with;

use super::{CommandResult, Failure, Input, Session};
use crate::args::Format;
use crate::values::to_json;

pub fn cmd_eval(input: &Input, session: Session, format: Format) -> CommandResult {
    let expr = parse_with(&input.source, &session.types, session.decls)
        .map_err(|e| Failure::new("parse", &e))?;

    let scope = Scope::root()
        .try_sub(session.vars)
        .map_err(|e| Failure::new("eval", &RuntimeError::Scope(e)))?;
    let value = expr.evaluate(&scope).map_err(|e| Failure::new("eval", &e))?;
    tracing::debug!(result = value.type_name(), "evaluated");

    let rendered = to_json(&value);
    match format {
        Format::Json => println!("{}", json!({ "success": true, "value": rendered })),
        Format::Human => println!("{}", rendered),
    }
    Ok(())
}
