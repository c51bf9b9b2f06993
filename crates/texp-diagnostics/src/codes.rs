// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error code registry.
//!
//! Maps error codes (E0101, E0205, etc.) to titles and categories.
//! Used by `texp explain <code>` and the JSON output.

use std::collections::HashMap;

/// Registry of all known error codes.
pub struct ErrorCodeRegistry {
    codes: HashMap<&'static str, ErrorCodeInfo>,
}

/// Information about a single error code.
pub struct ErrorCodeInfo {
    pub code: &'static str,
    pub title: &'static str,
    pub category: ErrorCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Type,
    Evaluation,
    Lowering,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Syntax => write!(f, "Syntax"),
            ErrorCategory::Type => write!(f, "Type"),
            ErrorCategory::Evaluation => write!(f, "Evaluation"),
            ErrorCategory::Lowering => write!(f, "Lowering"),
        }
    }
}

macro_rules! register_codes {
    ($($code:literal => ($title:literal, $cat:expr)),* $(,)?) => {{
        let mut map = HashMap::new();
        $(
            map.insert($code, ErrorCodeInfo {
                code: $code,
                title: $title,
                category: $cat,
            });
        )*
        map
    }};
}

impl Default for ErrorCodeRegistry {
    fn default() -> Self {
        use ErrorCategory::*;

        Self {
            codes: register_codes! {
                // Syntax errors (E01xx)
                "E0100" => ("invalid syntax", Syntax),
                "E0101" => ("unexpected character", Syntax),
                "E0102" => ("unterminated string literal", Syntax),
                "E0103" => ("incomplete equality operator", Syntax),
                "E0104" => ("invalid number", Syntax),
                "E0105" => ("expected token not found", Syntax),
                "E0106" => ("unexpected token", Syntax),
                "E0107" => ("undeclared variable", Syntax),
                "E0108" => ("call without return type", Syntax),

                // Static type errors (E02xx)
                "E0200" => ("unknown type", Type),
                "E0201" => ("type takes no arguments", Type),
                "E0202" => ("wrong number of type arguments", Type),
                "E0203" => ("invalid map key type", Type),
                "E0204" => ("duplicate field", Type),
                "E0205" => ("mismatched types", Type),
                "E0206" => ("invalid operand", Type),
                "E0207" => ("variable declared twice", Type),
                "E0208" => ("annotation conflicts with declaration", Type),
                "E0209" => ("name already defined", Type),
                "E0210" => ("built-in name redefined", Type),
                "E0211" => ("lambda has no static type", Type),
                "E0212" => ("field access on non-struct", Type),
                "E0213" => ("no such field", Type),
                "E0214" => ("type cannot be indexed", Type),

                // Evaluation errors (E03xx)
                "E0300" => ("undefined variable", Evaluation),
                "E0301" => ("undefined function", Evaluation),
                "E0302" => ("value does not match declared type", Evaluation),
                "E0303" => ("wrong number of arguments", Evaluation),
                "E0304" => ("invalid argument", Evaluation),
                "E0305" => ("invalid operand", Evaluation),
                "E0306" => ("integer overflow", Evaluation),
                "E0307" => ("no such field", Evaluation),
                "E0308" => ("field access on non-struct", Evaluation),
                "E0309" => ("missing key", Evaluation),
                "E0310" => ("index out of bounds", Evaluation),
                "E0311" => ("value cannot be indexed", Evaluation),
                "E0312" => ("cannot infer type", Evaluation),
                "E0313" => ("invalid scope", Evaluation),

                // Lowering errors (E04xx)
                "E0400" => ("node kind not supported by backend", Lowering),
            },
        }
    }
}

impl ErrorCodeRegistry {
    pub fn get(&self, code: &str) -> Option<&ErrorCodeInfo> {
        self.codes.get(code)
    }

    pub fn all(&self) -> impl Iterator<Item = &ErrorCodeInfo> {
        self.codes.values()
    }
}
