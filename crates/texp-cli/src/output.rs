// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! CLI output formatting with colors and styling.
//!
//! Respects NO_COLOR and FORCE_COLOR environment variables.
//! Colors are automatically disabled when output is piped.

use colored::{ColoredString, Colorize};

/// Initialize color support and logging based on environment.
/// Call once at startup.
pub fn init() {
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    } else if std::env::var("FORCE_COLOR").is_ok() {
        colored::control::set_override(true);
    }

    let filter = tracing_subscriber::EnvFilter::try_from_env("TEXP_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

// === Error Output ===

pub fn error_label() -> ColoredString {
    "error".red().bold()
}

// === Success Output ===

pub fn banner_ok(phase: &str) -> String {
    format!("{} {} {}", "===".dimmed(), format!("{} OK", phase).green().bold(), "===".dimmed())
}

pub fn banner_fail(phase: &str, count: usize) -> String {
    let msg = if count == 1 {
        format!("{} FAILED: 1 error", phase)
    } else {
        format!("{} FAILED: {} errors", phase, count)
    };
    format!("{} {} {}", "===".dimmed(), msg.red().bold(), "===".dimmed())
}

// === Help Output ===

pub fn title(name: &str) -> ColoredString {
    name.bold()
}

pub fn version(v: &str) -> ColoredString {
    v.dimmed()
}

pub fn section_header(header: &str) -> ColoredString {
    header.yellow().bold()
}

pub fn command(name: &str) -> ColoredString {
    name.green()
}

pub fn arg(name: &str) -> ColoredString {
    name.cyan()
}

// === Results ===

pub fn type_name(ty: &str) -> ColoredString {
    ty.cyan()
}

pub fn span(s: &str) -> ColoredString {
    s.dimmed()
}
