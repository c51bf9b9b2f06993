// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Command-line flag parsing shared by every expression command.

use std::path::PathBuf;

/// Output format for results and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Human,
    Json,
}

/// Where the expression text comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    Inline(String),
    File(PathBuf),
}

/// `--var name[:TYPE]=JSON`
#[derive(Debug, Clone, PartialEq)]
pub struct VarArg {
    pub name: String,
    pub ty: Option<String>,
    pub json: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    pub input: Option<InputSource>,
    pub vars: Vec<VarArg>,
    pub aliases: Vec<(String, String)>,
    pub alias_files: Vec<PathBuf>,
    pub expect: Option<String>,
    pub format: Format,
}

impl Options {
    pub fn parse(args: &[String]) -> Result<Options, String> {
        let mut opts = Options::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            let mut value = |flag: &str| {
                iter.next().cloned().ok_or_else(|| format!("{} requires a value", flag))
            };
            match arg.as_str() {
                "-f" | "--file" => {
                    let path = value(arg)?;
                    opts.set_input(InputSource::File(PathBuf::from(path)))?;
                }
                "--var" => {
                    let spec = value(arg)?;
                    opts.vars.push(parse_var(&spec)?);
                }
                "--alias" => {
                    let spec = value(arg)?;
                    let (name, ty) = spec
                        .split_once('=')
                        .ok_or_else(|| format!("--alias expects NAME=TYPE, got '{}'", spec))?;
                    opts.aliases.push((name.trim().to_string(), ty.trim().to_string()));
                }
                "--aliases" => {
                    let path = value(arg)?;
                    opts.alias_files.push(PathBuf::from(path));
                }
                "--expect" => opts.expect = Some(value(arg)?),
                "--json" => opts.format = Format::Json,
                flag if flag.starts_with("--") => return Err(format!("unknown option '{}'", flag)),
                text => opts.set_input(InputSource::Inline(text.to_string()))?,
            }
        }

        Ok(opts)
    }

    fn set_input(&mut self, input: InputSource) -> Result<(), String> {
        if self.input.is_some() {
            return Err("only one expression may be given".to_string());
        }
        self.input = Some(input);
        Ok(())
    }
}

fn parse_var(spec: &str) -> Result<VarArg, String> {
    let (binding, json) = spec
        .split_once('=')
        .ok_or_else(|| format!("--var expects NAME=JSON or NAME:TYPE=JSON, got '{}'", spec))?;
    let (name, ty) = match binding.split_once(':') {
        Some((name, ty)) => (name.trim(), Some(ty.trim().to_string())),
        None => (binding.trim(), None),
    };
    if name.is_empty() {
        return Err(format!("--var is missing a variable name in '{}'", spec));
    }
    Ok(VarArg { name: name.to_string(), ty, json: json.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options, String> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        Options::parse(&args)
    }

    #[test]
    fn inline_expression_and_flags() {
        let opts = parse(&["foo:int - 1", "--var", "foo=3", "--json"]).unwrap();
        assert_eq!(opts.input, Some(InputSource::Inline("foo:int - 1".into())));
        assert_eq!(opts.vars, vec![VarArg { name: "foo".into(), ty: None, json: "3".into() }]);
        assert_eq!(opts.format, Format::Json);
    }

    #[test]
    fn typed_var_keeps_equals_in_json() {
        let opts = parse(&["--var", "m:map<string,string>={\"a\":\"=\"}"]).unwrap();
        let var = &opts.vars[0];
        assert_eq!(var.name, "m");
        assert_eq!(var.ty.as_deref(), Some("map<string,string>"));
        assert_eq!(var.json, "{\"a\":\"=\"}");
    }

    #[test]
    fn aliases() {
        let opts = parse(&["--alias", "Id = int", "--aliases", "types.json", "x:Id"]).unwrap();
        assert_eq!(opts.aliases, vec![("Id".to_string(), "int".to_string())]);
        assert_eq!(opts.alias_files, vec![PathBuf::from("types.json")]);
    }

    #[test]
    fn errors() {
        assert!(parse(&["a", "b"]).unwrap_err().contains("only one"));
        assert!(parse(&["--var"]).unwrap_err().contains("requires a value"));
        assert!(parse(&["--var", "x"]).unwrap_err().contains("NAME=JSON"));
        assert!(parse(&["--bogus"]).unwrap_err().contains("unknown option"));
    }
}
