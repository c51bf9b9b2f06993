// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! JSON diagnostic output for machine consumption.
//!
//! Use `--json` with any texp command to get this output.

use serde::Serialize;
use texp_ast::LineMap;

use crate::codes::ErrorCodeRegistry;
use crate::{Diagnostic, LabelStyle, Severity};

/// All diagnostics from one command run.
#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    /// Schema version for forward compatibility.
    pub version: u32,
    /// Where the expression came from: a file name or `<expr>`.
    pub file: String,
    pub success: bool,
    /// The phase that produced these diagnostics (lex, parse, eval, lower).
    pub phase: String,
    pub diagnostics: Vec<JsonDiagnostic>,
    pub error_count: usize,
}

/// A single diagnostic in JSON form, enriched with source context.
#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Error category (e.g., "Syntax", "Type").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub message: String,
    pub labels: Vec<JsonLabel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// A labeled span in JSON form.
#[derive(Debug, Serialize)]
pub struct JsonLabel {
    pub role: LabelStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub start: LineCol,
    pub end: LineCol,
    /// The source line containing the start of this label.
    pub source_line: String,
}

/// Line/column pair (1-based).
#[derive(Debug, Serialize)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

/// Convert diagnostics to a structured JSON report.
pub fn to_json_report(
    diagnostics: &[Diagnostic],
    source: &str,
    file: &str,
    phase: &str,
) -> DiagnosticReport {
    let registry = ErrorCodeRegistry::default();
    let line_map = LineMap::new(source);

    let error_count = diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
    let diagnostics = diagnostics
        .iter()
        .map(|d| to_json_diagnostic(d, source, &line_map, &registry))
        .collect();

    DiagnosticReport {
        version: 1,
        file: file.to_string(),
        success: error_count == 0,
        phase: phase.to_string(),
        diagnostics,
        error_count,
    }
}

fn to_json_diagnostic(
    diag: &Diagnostic,
    source: &str,
    line_map: &LineMap,
    registry: &ErrorCodeRegistry,
) -> JsonDiagnostic {
    let code = diag.code.as_ref().map(|c| c.0.clone());
    let category =
        code.as_deref().and_then(|c| registry.get(c)).map(|info| info.category.to_string());

    let labels = diag
        .labels
        .iter()
        .map(|l| JsonLabel {
            role: l.style,
            message: l.message.clone(),
            start: LineCol { line: l.span.start_line, column: l.span.start_col },
            end: LineCol { line: l.span.end_line, column: l.span.end_col },
            source_line: line_map.line_text(source, l.span.start_line).unwrap_or("").to_string(),
        })
        .collect();

    JsonDiagnostic {
        severity: diag.severity,
        code,
        category,
        message: diag.message.clone(),
        labels,
        notes: diag.notes.clone(),
        help: diag.help.clone(),
    }
}

/// Serialize a diagnostic report to pretty JSON.
pub fn to_json_string(report: &DiagnosticReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use texp_ast::Span;

    #[test]
    fn report_shape() {
        let d = Diagnostic::error("'foo' is not declared")
            .with_code("E0107")
            .with_primary(Span::new(1, 1, 1, 4), "here")
            .with_help("annotate it");
        let report = to_json_report(&[d], "foo", "<expr>", "parse");
        let value: serde_json::Value = serde_json::from_str(&to_json_string(&report)).unwrap();

        assert_eq!(value["success"], false);
        assert_eq!(value["error_count"], 1);
        let diag = &value["diagnostics"][0];
        assert_eq!(diag["severity"], "error");
        assert_eq!(diag["category"], "Syntax");
        assert_eq!(diag["labels"][0]["role"], "primary");
        assert_eq!(diag["labels"][0]["end"]["column"], 4);
        assert_eq!(diag["labels"][0]["source_line"], "foo");
        assert!(diag.get("notes").is_none());
    }
}
