// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Command implementations and the setup they share.

pub mod eval;
pub mod explain;
pub mod phase;

use std::fs;

use indexmap::IndexMap;
use texp_ast::{Span, Type};
use texp_diagnostics::json::{to_json_report, to_json_string};
use texp_diagnostics::{Diagnostic, DiagnosticFormatter, ToDiagnostic};
use texp_interp::{check_value, Value};
use texp_parser::parse_type;
use texp_types::{Declarations, Types};

use crate::args::{Format, InputSource, Options};
use crate::output;
use crate::values;

/// The expression text and the name it is reported under.
pub struct Input {
    pub name: String,
    pub source: String,
}

impl Input {
    pub fn load(source: &InputSource) -> Result<Input, Failure> {
        match source {
            InputSource::Inline(text) => {
                Ok(Input { name: "<expr>".to_string(), source: text.clone() })
            }
            InputSource::File(path) => match fs::read_to_string(path) {
                Ok(text) => Ok(Input { name: path.display().to_string(), source: text }),
                Err(e) => {
                    let message = format!("cannot read {}: {}", path.display(), e);
                    Err(Failure::message("input", message))
                }
            },
        }
    }
}

/// A failed command: the phase it stopped in and what went wrong.
pub struct Failure {
    pub phase: &'static str,
    pub diagnostics: Vec<Diagnostic>,
    /// Text the diagnostics point into, when it is not the expression.
    pub context: Option<Input>,
}

impl Failure {
    pub fn new(phase: &'static str, error: &impl ToDiagnostic) -> Self {
        Self { phase, diagnostics: vec![error.to_diagnostic()], context: None }
    }

    pub fn message(phase: &'static str, message: impl Into<String>) -> Self {
        Self { phase, diagnostics: vec![Diagnostic::error(message)], context: None }
    }

    /// Point the diagnostics at `source` instead of the expression.
    pub fn within(mut self, name: impl Into<String>, source: &str) -> Self {
        self.context = Some(Input { name: name.into(), source: source.to_string() });
        self
    }
}

pub type CommandResult = Result<(), Failure>;

/// Aliases and variables assembled from the command line.
pub struct Session {
    pub types: Types,
    pub decls: Declarations,
    pub vars: Vec<(String, Value)>,
}

impl Session {
    pub fn from_options(opts: &Options) -> Result<Session, Failure> {
        let mut types = Types::new();

        let mut aliases: Vec<(String, String)> = Vec::new();
        for path in &opts.alias_files {
            let text = fs::read_to_string(path).map_err(|e| {
                Failure::message("config", format!("cannot read {}: {}", path.display(), e))
            })?;
            let table: IndexMap<String, String> = serde_json::from_str(&text)
                .map_err(|e| Failure::message("config", format!("{}: {}", path.display(), e)))?;
            aliases.extend(table);
        }
        aliases.extend(opts.aliases.iter().cloned());

        for (name, text) in &aliases {
            let ty = type_arg(text, &types, &format!("alias {}", name))?;
            types.define_alias(name.as_str(), ty).map_err(|e| Failure::new("config", &e))?;
        }

        let mut decls = Declarations::new();
        let mut vars = Vec::with_capacity(opts.vars.len());
        for var in &opts.vars {
            let declared = match &var.ty {
                Some(text) => Some(type_arg(text, &types, &format!("type of {}", var.name))?),
                None => None,
            };
            let json: serde_json::Value = serde_json::from_str(&var.json).map_err(|e| {
                Failure::message("config", format!("--var {}: invalid JSON: {}", var.name, e))
            })?;
            let value = values::from_json(&json, declared.as_ref())
                .map_err(|e| Failure::message("config", format!("--var {}: {}", var.name, e)))?;

            let ty = match declared {
                Some(ty) => {
                    check_value(&ty, &value).map_err(|m| {
                        Failure::message("config", format!("--var {}: {}", var.name, m))
                    })?;
                    ty
                }
                None => value.infer_type().map_err(|e| Failure::new("config", &e))?,
            };
            decls
                .declare(var.name.as_str(), ty, Span::default())
                .map_err(|e| Failure::new("config", &e))?;
            vars.push((var.name.clone(), value));
        }

        Ok(Session { types, decls, vars })
    }
}

/// Parse a type given on the command line.
pub fn type_arg(text: &str, types: &Types, what: &str) -> Result<Type, Failure> {
    parse_type(text, types).map_err(|e| Failure::new("config", &e).within(what, text))
}

/// Print diagnostics to stderr, or a JSON report to stdout.
pub fn show_diagnostics(
    diagnostics: &[Diagnostic],
    source: &str,
    file: &str,
    phase: &str,
    format: Format,
) {
    match format {
        Format::Json => {
            let report = to_json_report(diagnostics, source, file, phase);
            println!("{}", to_json_string(&report));
        }
        Format::Human => {
            let formatter = DiagnosticFormatter::new(source).with_file_name(file);
            for diagnostic in diagnostics {
                eprintln!("{}", formatter.format(diagnostic));
            }
            eprintln!("{}", output::banner_fail(&capitalize(phase), diagnostics.len()));
        }
    }
}

fn capitalize(phase: &str) -> String {
    let mut chars = phase.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
