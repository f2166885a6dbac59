//! Cursor tracker
//!
//! Converts between an absolute byte offset into the linear text form of a
//! line sequence (lines joined by `\n`) and a `(line, column)` pair.
//!
//! Boundary convention: an offset equal to a line's length belongs to that
//! line (the caret sits at its end), so the offset right after a `\n` is
//! column 0 of the next line. Offsets past the end of the document clamp to
//! the end of the last line.

use crate::string_utils::floor_char_boundary;
use log::warn;

/// A position expressed as a line index and a byte column within that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinePosition {
    /// Zero-based line index
    pub line: usize,
    /// Byte offset within the line
    pub column: usize,
}

impl LinePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Total length of the linear text form of `lines`.
pub fn text_len<S: AsRef<str>>(lines: &[S]) -> usize {
    let content: usize = lines.iter().map(|l| l.as_ref().len()).sum();
    content + lines.len().saturating_sub(1)
}

/// Resolve an absolute offset to a line position.
///
/// Out-of-range offsets are clamped to the end of the document, and columns
/// that fall inside a multi-byte character are moved to its start.
pub fn to_line_offset<S: AsRef<str>>(lines: &[S], offset: usize) -> LinePosition {
    if lines.is_empty() {
        return LinePosition::default();
    }

    let mut line_start = 0;
    for (index, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let line_end = line_start + line.len();
        if offset <= line_end {
            let column = floor_char_boundary(line, offset - line_start);
            return LinePosition::new(index, column);
        }
        line_start = line_end + 1;
    }

    let last = lines.len() - 1;
    warn!(
        "Cursor offset {} beyond document end, clamping to end of line {}",
        offset, last
    );
    LinePosition::new(last, lines[last].as_ref().len())
}

/// Convert a line position back to an absolute offset.
///
/// The line index is clamped to the last line and the column to that line's
/// length.
pub fn from_line_offset<S: AsRef<str>>(lines: &[S], line: usize, column: usize) -> usize {
    if lines.is_empty() {
        return 0;
    }
    let line = line.min(lines.len() - 1);
    let preceding: usize = lines[..line].iter().map(|l| l.as_ref().len() + 1).sum();
    let text = lines[line].as_ref();
    preceding + floor_char_boundary(text, column.min(text.len()))
}

/// Index of the line the cursor is on.
pub fn current_line_index<S: AsRef<str>>(lines: &[S], offset: usize) -> usize {
    to_line_offset(lines, offset).line
}

/// Clamp an offset to the valid range for `lines`, snapping to a char boundary.
pub fn clamp_offset<S: AsRef<str>>(lines: &[S], offset: usize) -> usize {
    let position = to_line_offset(lines, offset);
    from_line_offset(lines, position.line, position.column)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
