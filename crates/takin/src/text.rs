//! Byte spans into source text and diagnostic snippet rendering.

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open byte range `[start, end)` into a source buffer.
///
/// Spans do not borrow the buffer; rendering functions take the source
/// explicitly so that errors stay `'static`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub(crate) fn of(start: usize, end: usize) -> Self {
        Self {
            start: u32::try_from(start).unwrap_or(u32::MAX),
            end: u32::try_from(end).unwrap_or(u32::MAX),
        }
    }

    #[must_use]
    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Render a `line:column` header, the source line clipped to `padding`
    /// characters on either side of the span, and a caret/tilde underline
    /// beneath the offending text.
    ///
    /// The window never crosses line breaks and is clamped to character
    /// boundaries, so any byte offsets are safe to pass in.
    #[must_use]
    pub fn snippet(self, source: &str, padding: usize) -> String {
        let mut start = (self.start as usize).min(source.len());
        while !source.is_char_boundary(start) {
            start -= 1;
        }
        let mut end = (self.end as usize).clamp(start, source.len());
        while !source.is_char_boundary(end) {
            end += 1;
        }

        let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = source[start..]
            .find('\n')
            .map_or(source.len(), |i| start + i);
        let underline_end = end.min(line_end).max(start);

        let mut win_start = start.saturating_sub(padding).max(line_start);
        while !source.is_char_boundary(win_start) {
            win_start -= 1;
        }
        let mut win_end = (underline_end + padding).min(line_end);
        while !source.is_char_boundary(win_end) {
            win_end += 1;
        }

        let (line, column) = line_col(source, start);
        let caret_pad = " ".repeat(source[win_start..start].chars().count());
        let tildes = source[start..underline_end]
            .chars()
            .count()
            .saturating_sub(1);

        format!(
            "at line {line}, column {column}\n    {}\n    {caret_pad}^{}",
            &source[win_start..win_end],
            "~".repeat(tildes),
        )
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(feature = "diagnostics")]
impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        use miette::SourceOffset;
        Self::new(
            SourceOffset::from(span.start as usize),
            span.len() as usize,
        )
    }
}

/// One-based line and column of a byte offset. Columns count characters,
/// not bytes.
#[must_use]
pub fn line_col(source: &str, offset: usize) -> (u32, u32) {
    let offset = offset.min(source.len());
    let mut line = 1u32;
    let mut line_start = 0usize;
    for (i, b) in source.as_bytes().iter().enumerate().take(offset) {
        if *b == b'\n' {
            line += 1;
            line_start = i + 1;
        }
    }
    let chars = source
        .get(line_start..offset)
        .map_or(0, |s| s.chars().count());
    let column = u32::try_from(chars).unwrap_or(u32::MAX) + 1;
    (line, column)
}
