// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `texp explain <code>`

use colored::Colorize;
use texp_diagnostics::codes::ErrorCodeRegistry;

use super::{CommandResult, Failure};

pub fn cmd_explain(code: &str) -> CommandResult {
    let registry = ErrorCodeRegistry::default();
    let code = code.to_ascii_uppercase();
    let info = registry
        .get(&code)
        .ok_or_else(|| Failure::message("explain", format!("unknown error code '{}'", code)))?;

    println!("{}[{}]: {}", "error".red().bold(), info.code.red().bold(), info.title.bold());
    println!();
    println!("  Category: {}", info.category);
    Ok(())
}
