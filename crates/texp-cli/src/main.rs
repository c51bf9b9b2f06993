// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! texp CLI: lex, parse, check, evaluate and lower typed expressions.

mod args;
mod commands;
mod help;
mod output;
mod values;

use std::env;
use std::process;

use args::{Format, Options};
use commands::{show_diagnostics, CommandResult, Failure, Input, Session};

fn main() {
    output::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        help::print_usage();
        return;
    }

    let command = args[1].as_str();
    match command {
        "help" | "--help" | "-h" => {
            help::print_usage();
            return;
        }
        "version" | "--version" | "-V" => {
            println!("texp {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        "explain" => {
            let Some(code) = args.get(2) else {
                usage_error("Usage: texp explain <code>");
            };
            finish(commands::explain::cmd_explain(code), None, Format::Human);
            return;
        }
        "lex" | "parse" | "check" | "eval" | "lower" => {}
        other => {
            eprintln!("{}: unknown command '{}'", output::error_label(), other);
            help::print_usage();
            process::exit(1);
        }
    }

    let opts = match Options::parse(&args[2..]) {
        Ok(opts) => opts,
        Err(msg) => usage_error(&msg),
    };
    let Some(source) = &opts.input else {
        usage_error(&format!("Usage: texp {} <EXPR | -f FILE> [options]", command));
    };
    let format = opts.format;

    let input = match Input::load(source) {
        Ok(input) => input,
        Err(failure) => {
            finish(Err(failure), None, format);
            return;
        }
    };

    let result = run(command, &input, &opts);
    finish(result, Some(&input), format);
}

fn run(command: &str, input: &Input, opts: &Options) -> CommandResult {
    if command == "lex" {
        return commands::phase::cmd_lex(input, opts.format);
    }

    let session = Session::from_options(opts)?;
    match command {
        "parse" => commands::phase::cmd_parse(input, &session, opts.format),
        "check" => commands::phase::cmd_check(input, &session, opts.expect.as_deref(), opts.format),
        "lower" => commands::phase::cmd_lower(input, &session, opts.format),
        _ => commands::eval::cmd_eval(input, session, opts.format),
    }
}

/// Report a failure against the text it points into and exit with status 1.
fn finish(result: CommandResult, input: Option<&Input>, format: Format) {
    let Err(failure) = result else {
        return;
    };
    let Failure { phase, diagnostics, context } = failure;
    let (file, source) = match (&context, input) {
        (Some(ctx), _) | (None, Some(ctx)) => (ctx.name.as_str(), ctx.source.as_str()),
        (None, None) => ("<expr>", ""),
    };
    show_diagnostics(&diagnostics, source, file, phase, format);
    process::exit(1);
}

fn usage_error(msg: &str) -> ! {
    eprintln!("{}: {}", output::error_label(), msg);
    process::exit(1);
}
