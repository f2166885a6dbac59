//! Line sequence store
//!
//! The canonical, undecorated list of outline lines. Every structural edit
//! goes through [`LineSequence::splice`]; reads are by index or as the joined
//! linear text used by the cursor tracker.

use std::ops::Range;

/// The canonical ordered sequence of outline lines.
///
/// Always holds at least one line: an empty outline is a single empty line,
/// the same way an empty text buffer still has one line to type into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSequence {
    lines: Vec<String>,
}

impl Default for LineSequence {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }
}

impl LineSequence {
    /// Create an empty sequence (one empty line).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sequence from owned lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sequence = Self {
            lines: lines.into_iter().map(Into::into).collect(),
        };
        sequence.ensure_non_empty();
        sequence
    }

    /// Create a sequence by splitting linear text on `\n`.
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.split('\n'))
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the sequence holds only a single empty line.
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Get a line by index.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// All lines as a slice.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The linear text form: lines joined with single `\n` separators.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Replace the whole sequence.
    pub fn replace_all(&mut self, lines: Vec<String>) {
        self.lines = lines;
        self.ensure_non_empty();
    }

    /// Remove `range` and insert `insert` in its place.
    ///
    /// The range is clamped to the sequence bounds. Returns the removed lines.
    pub(crate) fn splice(&mut self, range: Range<usize>, insert: Vec<String>) -> Vec<String> {
        let end = range.end.min(self.lines.len());
        let start = range.start.min(end);
        let removed: Vec<String> = self.lines.splice(start..end, insert).collect();
        self.ensure_non_empty();
        removed
    }

    fn ensure_non_empty(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
    }
}

impl AsRef<[String]> for LineSequence {
    fn as_ref(&self) -> &[String] {
        &self.lines
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
