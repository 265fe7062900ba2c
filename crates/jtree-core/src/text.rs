//! Text position utilities: byte spans and line:column conversions.
//!
//! ## Coordinate Conventions
//!
//! - Lines and columns are **1-indexed** (matching editor conventions)
//! - Byte offsets are **0-indexed**
//! - Columns count Unicode scalar values, not bytes
//! - Line/column values of 0 are treated as 1

use serde::{Deserialize, Serialize};

// ============================================================================
// Span
// ============================================================================

/// A half-open byte range `[start, end)` into source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    ///
    /// # Panics
    /// Panics if `start > end`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(
            start <= end,
            "Span start ({}) must be <= end ({})",
            start,
            end
        );
        Span { start, end }
    }

    /// A zero-width span at `offset`.
    pub fn empty(offset: usize) -> Self {
        Span {
            start: offset,
            end: offset,
        }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this span contains another span entirely.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Check if `offset` falls inside the span. The end offset is included so
    /// that a caret placed right after a token still selects it.
    pub fn touches(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Check if this span overlaps with another.
    ///
    /// Adjacent spans (one ends where another starts) do NOT overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

// ============================================================================
// Conversions
// ============================================================================

/// Convert a byte offset to 1-indexed line and column.
///
/// If `offset` exceeds content length, returns the position at end of content.
pub fn offset_to_position(content: &str, offset: usize) -> (u32, u32) {
    let mut line = 1u32;
    let mut col = 1u32;
    let mut current = 0usize;

    for ch in content.chars() {
        if current >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
        current += ch.len_utf8();
    }

    (line, col)
}

/// Convert 1-indexed line and column to a byte offset.
///
/// A column past the end of the line clamps to the line end; a line past the
/// end of the content returns the content length.
pub fn position_to_offset(content: &str, line: u32, col: u32) -> usize {
    let line = line.max(1);
    let col = col.max(1);

    let mut line_start = 0usize;
    for _ in 1..line {
        match content[line_start..].find('\n') {
            Some(nl) => line_start += nl + 1,
            None => return content.len(),
        }
    }

    let line_end = content[line_start..]
        .find('\n')
        .map(|p| line_start + p)
        .unwrap_or(content.len());

    content[line_start..line_end]
        .char_indices()
        .nth((col - 1) as usize)
        .map(|(i, _)| line_start + i)
        .unwrap_or(line_end)
}

/// Extract the text covered by `span`, or `None` if it is out of range or
/// splits a UTF-8 character.
pub fn extract_span<'a>(content: &'a str, span: &Span) -> Option<&'a str> {
    content.get(span.start..span.end)
}

/// Byte offset of the start of the line containing `offset`.
pub fn line_start(content: &str, offset: usize) -> usize {
    let offset = offset.min(content.len());
    content[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_basics() {
        let span = Span::new(3, 7);
        assert_eq!(span.len(), 4);
        assert!(!span.is_empty());
        assert!(span.contains(&Span::new(4, 7)));
        assert!(!span.contains(&Span::new(2, 5)));
        assert!(span.touches(7));
        assert!(!span.overlaps(&Span::new(7, 9)));
        assert!(Span::empty(5).is_empty());
    }

    #[test]
    #[should_panic]
    fn span_rejects_inverted_range() {
        let _ = Span::new(5, 2);
    }

    #[test]
    fn offsets_and_positions() {
        let text = "class A {\n  int x;\n}\n";
        assert_eq!(offset_to_position(text, 0), (1, 1));
        assert_eq!(offset_to_position(text, 12), (2, 3));
        assert_eq!(position_to_offset(text, 2, 3), 12);
        assert_eq!(position_to_offset(text, 2, 100), 18);
        assert_eq!(position_to_offset(text, 9, 1), text.len());
        assert_eq!(line_start(text, 14), 10);
    }

    #[test]
    fn columns_count_chars() {
        let text = "é = 1;";
        assert_eq!(offset_to_position(text, 2), (1, 2));
        assert_eq!(position_to_offset(text, 1, 2), 2);
    }
}
