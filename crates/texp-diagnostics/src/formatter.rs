// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Terminal formatter for diagnostics.
//!
//! ```text
//! error[E0208]: 'x' is declared as int at 1:9-1:15 but annotated as string
//!   --> <expr>:1:16
//!     |
//!   1 | declare x: int x:string
//!     |         ------ ^^^^^^^^
//!     |                | annotated as `string`
//!     |         | declared here
//!     |
//!     = help: drop the annotation and write `x` alone to use the declared type
//! ```

use std::collections::BTreeMap;

use colored::Colorize;
use texp_ast::LineMap;

use crate::{Diagnostic, LabelStyle, Severity};

/// Formats diagnostics for terminal output.
pub struct DiagnosticFormatter<'a> {
    source: &'a str,
    file_name: Option<&'a str>,
    line_map: LineMap,
}

/// A source line with its labels.
struct AnnotatedLine {
    line_num: u32,
    text: String,
    annotations: Vec<Annotation>,
}

struct Annotation {
    col_start: usize,
    col_end: usize,
    style: LabelStyle,
    message: Option<String>,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, file_name: None, line_map: LineMap::new(source) }
    }

    pub fn with_file_name(mut self, name: &'a str) -> Self {
        self.file_name = Some(name);
        self
    }

    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();

        self.format_header(&mut out, diagnostic);

        let annotated = self.collect_annotated_lines(diagnostic);
        let Some(primary) = diagnostic.primary_span() else {
            self.format_footer(&mut out, diagnostic);
            return out;
        };
        if annotated.is_empty() {
            self.format_footer(&mut out, diagnostic);
            return out;
        }

        let file = self.file_name.unwrap_or("<expr>");
        let (line, col) = (primary.start_line, primary.start_col);
        out.push_str(&format!("  {} {}:{}:{}\n", "-->".blue(), file, line, col));

        let max_line = annotated.last().map(|a| a.line_num).unwrap_or(1);
        let gutter_width = max_line.to_string().len().max(2);

        out.push_str(&format!("{} {}\n", " ".repeat(gutter_width + 1), "|".blue()));

        let mut prev_line_num: Option<u32> = None;
        for annotated_line in &annotated {
            if let Some(prev) = prev_line_num {
                if annotated_line.line_num > prev + 1 {
                    out.push_str(&format!("{} {}\n", " ".repeat(gutter_width), "...".blue()));
                }
            }

            out.push_str(&format!(
                "{:>width$} {} {}\n",
                annotated_line.line_num.to_string().blue().bold(),
                "|".blue(),
                annotated_line.text,
                width = gutter_width + 1,
            ));

            self.format_annotations(&mut out, annotated_line, gutter_width);

            prev_line_num = Some(annotated_line.line_num);
        }

        if !diagnostic.notes.is_empty() || diagnostic.help.is_some() {
            out.push_str(&format!("{} {}\n", " ".repeat(gutter_width + 1), "|".blue()));
        }
        self.format_footer(&mut out, diagnostic);

        out
    }

    fn format_header(&self, out: &mut String, diagnostic: &Diagnostic) {
        let severity_str = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Note => "note".blue().bold(),
        };

        if let Some(ref code) = diagnostic.code {
            let message = diagnostic.message.bold();
            out.push_str(&format!("{}[{}]: {}\n", severity_str, code.0.red().bold(), message));
        } else {
            out.push_str(&format!("{}: {}\n", severity_str, diagnostic.message.bold()));
        }
    }

    fn format_footer(&self, out: &mut String, diagnostic: &Diagnostic) {
        let indent = " ".repeat(3);

        for note in &diagnostic.notes {
            let label = "note".cyan().bold();
            out.push_str(&format!("{} {} {}: {}\n", indent, "=".cyan(), label, note));
        }
        if let Some(ref help) = diagnostic.help {
            let label = "help".cyan().bold();
            out.push_str(&format!("{} {} {}: {}\n", indent, "=".cyan(), label, help));
        }
    }

    fn collect_annotated_lines(&self, diagnostic: &Diagnostic) -> Vec<AnnotatedLine> {
        let mut lines_map: BTreeMap<u32, AnnotatedLine> = BTreeMap::new();

        for label in &diagnostic.labels {
            let span = label.span;
            let Some(text) = self.line_map.line_text(self.source, span.start_line) else {
                continue;
            };

            let col_start = span.start_col as usize;
            // Multi-line spans are underlined to the end of their first line.
            let col_end = if span.end_line == span.start_line {
                span.end_col as usize
            } else {
                text.len() + 1
            };

            let entry = lines_map.entry(span.start_line).or_insert_with(|| AnnotatedLine {
                line_num: span.start_line,
                text: text.to_string(),
                annotations: Vec::new(),
            });

            entry.annotations.push(Annotation {
                col_start,
                col_end: col_end.max(col_start + 1), // At least 1 char wide
                style: label.style,
                message: label.message.clone(),
            });
        }

        lines_map.into_values().collect()
    }

    fn format_annotations(
        &self,
        out: &mut String,
        annotated_line: &AnnotatedLine,
        gutter_width: usize,
    ) {
        let mut sorted: Vec<&Annotation> = annotated_line.annotations.iter().collect();
        sorted.sort_by(|a, b| {
            a.style.cmp_priority().cmp(&b.style.cmp_priority()).then(a.col_start.cmp(&b.col_start))
        });

        let line_len = annotated_line.text.len() + 2;
        let mut underline = vec![' '; line_len];
        let mut messages: Vec<(usize, LabelStyle, &str)> = Vec::new();

        for ann in &sorted {
            let ch = match ann.style {
                LabelStyle::Primary => '^',
                LabelStyle::Secondary => '-',
            };
            let start = ann.col_start.saturating_sub(1).min(line_len);
            let end = ann.col_end.saturating_sub(1).min(line_len);
            for slot in &mut underline[start..end] {
                if *slot == ' ' {
                    *slot = ch;
                }
            }
            if let Some(ref msg) = ann.message {
                messages.push((start, ann.style, msg));
            }
        }

        let underline_str: String = underline.iter().collect::<String>().trim_end().to_string();
        if underline_str.is_empty() {
            return;
        }
        let colored_underline = color_underline(&underline_str);
        let gutter = format!("{} {}", " ".repeat(gutter_width + 1), "|".blue());

        if messages.len() <= 1 {
            match messages.first() {
                Some((_, style, msg)) => {
                    let msg = styled(msg, *style);
                    out.push_str(&format!("{} {} {}\n", gutter, colored_underline, msg))
                }
                None => out.push_str(&format!("{} {}\n", gutter, colored_underline)),
            }
            return;
        }

        // Several labels on one line: underline first, then one message per
        // line, rightmost first.
        out.push_str(&format!("{} {}\n", gutter, colored_underline));
        messages.sort_by(|a, b| b.0.cmp(&a.0));
        for (col, style, msg) in messages {
            let pipe = match style {
                LabelStyle::Primary => "|".red().bold().to_string(),
                LabelStyle::Secondary => "|".blue().to_string(),
            };
            let msg = styled(msg, style);
            out.push_str(&format!("{} {}{} {}\n", gutter, " ".repeat(col), pipe, msg));
        }
    }
}

impl LabelStyle {
    fn cmp_priority(&self) -> u8 {
        match self {
            LabelStyle::Primary => 0,
            LabelStyle::Secondary => 1,
        }
    }
}

fn styled(msg: &str, style: LabelStyle) -> String {
    match style {
        LabelStyle::Primary => msg.red().bold().to_string(),
        LabelStyle::Secondary => msg.blue().to_string(),
    }
}

/// Carets in red, dashes in blue.
fn color_underline(s: &str) -> String {
    let mut out = String::new();
    let mut rest = s;
    while let Some(ch) = rest.chars().next() {
        let len = rest.find(|c| c != ch).unwrap_or(rest.len());
        let (run, tail) = rest.split_at(len);
        match ch {
            '^' => out.push_str(&run.red().bold().to_string()),
            '-' => out.push_str(&run.blue().to_string()),
            _ => out.push_str(run),
        }
        rest = tail;
    }
    out
}
