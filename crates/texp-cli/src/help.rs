// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Help text for CLI commands.

use crate::output;

pub fn print_usage() {
    println!(
        "{} {} - typed expressions",
        output::title("texp"),
        output::version(env!("CARGO_PKG_VERSION"))
    );
    println!();
    println!(
        "{}: {} {} {} {}",
        output::section_header("Usage"),
        output::command("texp"),
        output::arg("<command>"),
        output::arg("<EXPR | -f FILE>"),
        output::arg("[options]")
    );
    println!();
    println!("{}", output::section_header("Commands:"));
    println!(
        "  {}             Tokenize an expression and print the tokens",
        output::command("lex")
    );
    println!(
        "  {}           Parse and print the canonical form and static type",
        output::command("parse")
    );
    println!(
        "  {}           Parse and require the type given with --expect",
        output::command("check")
    );
    println!(
        "  {}            Evaluate against variables given with --var",
        output::command("eval")
    );
    println!("  {}           Print the expression as Rust source", output::command("lower"));
    println!("  {} {}  Explain an error code", output::command("explain"), output::arg("<code>"));
    println!("  {}            Show this help", output::command("help"));
    println!("  {}         Show version", output::command("version"));
    println!();
    println!("{}", output::section_header("Options:"));
    println!("  {}          Read the expression from a file", output::arg("-f FILE"));
    println!(
        "  {}   Bind a variable; the type is inferred unless given",
        output::arg("--var NAME[:TYPE]=JSON")
    );
    println!("  {}   Define a type alias", output::arg("--alias NAME=TYPE"));
    println!(
        "  {}   Define aliases from a JSON object of name to type",
        output::arg("--aliases FILE")
    );
    println!("  {}     Expected static type (check)", output::arg("--expect TYPE"));
    println!("  {}            Output results and diagnostics as JSON", output::arg("--json"));
    println!();
    println!("{}", output::section_header("Environment:"));
    println!(
        "  {}      Log filter, e.g. debug or texp_parser=trace (default warn)",
        output::arg("TEXP_LOG")
    );
    println!("  {}      Disable colors", output::arg("NO_COLOR"));
    println!("  {}   Force colors even when piped", output::arg("FORCE_COLOR"));
}
