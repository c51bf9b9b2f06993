// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source location tracking.

use std::fmt;

/// A range of source text, 1-based. `end_col` points one column past the
/// last character covered.
///
/// Spans exist for diagnostics only: they never take part in node equality
/// or evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl Span {
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self { start_line, start_col, end_line, end_col }
    }

    /// An empty span sitting at a single position.
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, line, col)
    }

    /// The smallest span covering both `a` and `b`.
    pub fn merge(a: Span, b: Span) -> Span {
        let (start_line, start_col) = (a.start_line, a.start_col).min((b.start_line, b.start_col));
        let (end_line, end_col) = (a.end_line, a.end_col).max((b.end_line, b.end_col));
        Span { start_line, start_col, end_line, end_col }
    }

    /// Span used for nodes built by the host rather than parsed from text.
    pub fn is_synthetic(&self) -> bool {
        self.start_line == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}:{}", self.start_line, self.start_col, self.end_line, self.end_col)
    }
}

/// Precomputed line-start offsets for O(log n) byte-offset → line:col lookup.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offset of the start of each line. line_starts[0] is always 0.
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map by scanning source for newlines. O(n).
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        LineMap { line_starts }
    }

    /// Convert byte offset to (line, col), both 1-based. O(log n).
    ///
    /// Columns count bytes; texp sources are expected to be mostly ASCII.
    pub fn offset_to_line_col(&self, offset: usize) -> (u32, u32) {
        let offset = offset as u32;
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line = (line_idx + 1) as u32;
        let col = offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Convert a byte range into a line/column span.
    pub fn span(&self, start: usize, end: usize) -> Span {
        let (start_line, start_col) = self.offset_to_line_col(start);
        let (end_line, end_col) = self.offset_to_line_col(end);
        Span { start_line, start_col, end_line, end_col }
    }

    /// Get the source text of a 1-based line number. O(1).
    pub fn line_text<'a>(&self, source: &'a str, line: u32) -> Option<&'a str> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)? as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| (s as usize).saturating_sub(1)) // exclude the \n
            .unwrap_or(source.len());
        source.get(start..end)
    }

    /// Number of lines in the source.
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }
}
