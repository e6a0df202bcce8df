use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Source location span.
///
/// Line and column values are 1-based and count characters, not bytes, so
/// that a position inside a text literal containing native symbols still
/// lines up with what the user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    #[serde(rename = "line")]
    pub start_line: u32,
    #[serde(rename = "column")]
    pub start_col: u32,
    pub end_line: u32,
    #[serde(rename = "end_column")]
    pub end_col: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Create a zero-width span at a single position.
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, line, col)
    }

    /// The single-column span `offset` characters to the right of this
    /// span's start.
    ///
    /// Used to point at one character inside a token, e.g. the offending
    /// character of a text literal.
    pub fn column_at(self, offset: usize) -> Span {
        let col = self
            .start_col
            .saturating_add(u32::try_from(offset).unwrap_or(u32::MAX));
        Span::point(self.start_line, col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// A FOCAL program text: one statement per line.
///
/// Lines are split once up front. Lookups take the character-based line and
/// column numbers used by [`Span`], so they can pull the exact characters a
/// token or error points at out of lines containing native symbols.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub source: String,
    /// Byte range of every line, terminator (`\n` or `\r\n`) excluded.
    lines: Vec<Range<usize>>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let mut lines = Vec::new();
        let mut start = 0;
        for (newline, _) in source.match_indices('\n') {
            lines.push(start..newline);
            start = newline + 1;
        }
        lines.push(start..source.len());
        for range in &mut lines {
            if source[range.clone()].ends_with('\r') {
                range.end -= 1;
            }
        }
        Self {
            name: name.into(),
            source,
            lines,
        }
    }

    /// The text of a 1-based line, without its terminator.
    pub fn line(&self, line_number: u32) -> Option<&str> {
        let idx = usize::try_from(line_number.checked_sub(1)?).ok()?;
        self.lines.get(idx).map(|range| &self.source[range.clone()])
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The character a span starts on.
    pub fn char_at(&self, span: Span) -> Option<char> {
        let col = usize::try_from(span.start_col.checked_sub(1)?).ok()?;
        self.line(span.start_line)?.chars().nth(col)
    }

    /// The characters covered by a single-line span, end column included.
    ///
    /// Returns `None` for multi-line spans or columns outside the line.
    pub fn span_text(&self, span: Span) -> Option<&str> {
        if span.end_line != span.start_line || span.end_col < span.start_col {
            return None;
        }
        let line = self.line(span.start_line)?;
        let byte_at = |col: u32| -> Option<usize> {
            let idx = usize::try_from(col.checked_sub(1)?).ok()?;
            line.char_indices()
                .map(|(i, _)| i)
                .chain(std::iter::once(line.len()))
                .nth(idx)
        };
        let start = byte_at(span.start_col)?;
        let end = byte_at(span.end_col.saturating_add(1))?;
        Some(&line[start..end])
    }
}
