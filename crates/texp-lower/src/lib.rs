// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lowering of finished expressions into other host languages.
//!
//! A [`Backend`] names the node kinds it can translate. [`lower`] checks the
//! whole tree against that list before emitting anything, so a backend
//! never sees a node it did not promise to handle and never approximates.

mod rust_source;

use texp_ast::{Expr, NodeKind, Span};

pub use rust_source::RustSource;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LowerError {
    #[error("{backend} cannot lower {kind} expressions")]
    Unsupported {
        backend: String,
        kind: NodeKind,
        span: Span,
    },
}

impl LowerError {
    pub fn span(&self) -> Span {
        match self {
            LowerError::Unsupported { span, .. } => *span,
        }
    }
}

/// A lowering target.
pub trait Backend {
    type Output;

    /// Short name used in error messages.
    fn name(&self) -> &str;

    /// The fixed set of node kinds this backend translates.
    fn supported(&self) -> &[NodeKind];

    /// Translate a tree whose every node kind is in [`Backend::supported`].
    /// Emit a whole tree. Nodes outside `supported()` are an error here
    /// too, for hosts that call this without going through [`lower`].
    fn emit(&self, expr: &Expr) -> Result<Self::Output, LowerError>;
}

/// Lower `expr` with `backend`, failing on the first unsupported node in
/// source order.
pub fn lower<B: Backend>(expr: &Expr, backend: &B) -> Result<B::Output, LowerError> {
    if let Some(node) = first_unsupported(expr, backend.supported()) {
        return Err(LowerError::Unsupported {
            backend: backend.name().to_string(),
            kind: node.node_kind(),
            span: node.span,
        });
    }
    tracing::debug!(backend = backend.name(), "lowering");
    backend.emit(expr)
}

fn first_unsupported<'e>(expr: &'e Expr, supported: &[NodeKind]) -> Option<&'e Expr> {
    let mut stack = vec![expr];
    while let Some(node) = stack.pop() {
        if !supported.contains(&node.node_kind()) {
            return Some(node);
        }
        stack.extend(node.children().into_iter().rev());
    }
    None
}
