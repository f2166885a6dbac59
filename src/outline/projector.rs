//! Collapse/visibility projector
//!
//! Turns the canonical sequence plus a collapse set into the displayed view:
//! descendants of collapsed lines are hidden and every visible line that has
//! children gets a fold indicator right after its indentation. The inverse,
//! [`reconcile`], strips the indicators again so edits made against the
//! displayed text can be folded back into the canonical sequence.
//!
//! Offsets in the displayed text and offsets in the canonical text are two
//! different coordinate spaces. [`ProjectedView`] keeps the per-line mapping
//! needed to convert between them.

use super::collapse::CollapseSet;
use super::cursor::{from_line_offset, to_line_offset};
use super::indent::{has_children, leading_spaces, split_indent, subtree_end};

// ─────────────────────────────────────────────────────────────────────────────
// Fold Indicators
// ─────────────────────────────────────────────────────────────────────────────

/// Glyph shown before a collapsed line's payload.
pub const COLLAPSED_MARKER: char = '▶';

/// Glyph shown before an expanded line's payload.
pub const EXPANDED_MARKER: char = '▼';

/// Separator between the glyph and the payload.
pub const MARKER_SEPARATOR: char = ' ';

/// Fold state of a displayed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldMarker {
    /// Line has children and they are hidden
    Collapsed,
    /// Line has children and they are shown
    Expanded,
}

impl FoldMarker {
    pub fn glyph(&self) -> char {
        match self {
            FoldMarker::Collapsed => COLLAPSED_MARKER,
            FoldMarker::Expanded => EXPANDED_MARKER,
        }
    }

    /// The full token inserted into the displayed line.
    pub fn token(&self) -> String {
        format!("{}{}", self.glyph(), MARKER_SEPARATOR)
    }

    /// Byte length of [`FoldMarker::token`].
    pub fn token_len(&self) -> usize {
        self.glyph().len_utf8() + MARKER_SEPARATOR.len_utf8()
    }
}

/// Fold marker for a canonical line, if it has children.
pub fn fold_marker<S: AsRef<str>>(
    lines: &[S],
    collapsed: &CollapseSet,
    index: usize,
) -> Option<FoldMarker> {
    if !has_children(lines, index) {
        None
    } else if collapsed.contains(index) {
        Some(FoldMarker::Collapsed)
    } else {
        Some(FoldMarker::Expanded)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Projected View
// ─────────────────────────────────────────────────────────────────────────────

/// The displayed form of an outline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectedView {
    /// Displayed lines, with fold indicators applied
    pub lines: Vec<String>,
    /// Canonical index of each displayed line
    sources: Vec<usize>,
    /// Byte length of the indicator token inserted into each displayed line
    decorations: Vec<usize>,
}

impl ProjectedView {
    /// Displayed text, lines joined by `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Canonical indices of the displayed lines, in display order.
    pub fn sources(&self) -> &[usize] {
        &self.sources
    }

    /// Canonical index behind a displayed line.
    pub fn canonical_line(&self, display_line: usize) -> Option<usize> {
        self.sources.get(display_line).copied()
    }

    /// Displayed line for a canonical index, `None` when it is hidden.
    pub fn display_line(&self, canonical: usize) -> Option<usize> {
        self.sources.binary_search(&canonical).ok()
    }

    /// Number of canonical lines hidden by collapsing.
    pub fn hidden_count(&self, canonical_len: usize) -> usize {
        canonical_len.saturating_sub(self.sources.len())
    }

    /// Convert a displayed-text offset into a canonical-text offset.
    pub fn to_canonical_offset<S: AsRef<str>>(&self, canonical: &[S], offset: usize) -> usize {
        if self.lines.is_empty() {
            return 0;
        }
        let pos = to_line_offset(&self.lines, offset);
        let source = self.sources[pos.line];
        let indent = leading_spaces(&self.lines[pos.line]);
        let decoration = self.decorations[pos.line];

        let column = if pos.column <= indent {
            pos.column
        } else if pos.column < indent + decoration {
            indent
        } else {
            pos.column - decoration
        };
        from_line_offset(canonical, source, column)
    }

    /// Convert a canonical-text offset into a displayed-text offset.
    ///
    /// A position on a hidden line maps to the end of the nearest visible
    /// line above it, which is the collapsed ancestor hiding it.
    pub fn to_display_offset<S: AsRef<str>>(&self, canonical: &[S], offset: usize) -> usize {
        if self.lines.is_empty() {
            return 0;
        }
        let pos = to_line_offset(canonical, offset);
        match self.display_line(pos.line) {
            Some(display) => {
                let indent = leading_spaces(&self.lines[display]);
                let column = if pos.column <= indent {
                    pos.column
                } else {
                    pos.column + self.decorations[display]
                };
                from_line_offset(&self.lines, display, column)
            }
            None => {
                let display = self
                    .sources
                    .partition_point(|&s| s < pos.line)
                    .saturating_sub(1);
                from_line_offset(&self.lines, display, self.lines[display].len())
            }
        }
    }
}

/// Project the canonical sequence into its displayed form.
pub fn project<S: AsRef<str>>(lines: &[S], collapsed: &CollapseSet) -> ProjectedView {
    let mut view = ProjectedView::default();
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index].as_ref();
        let marker = fold_marker(lines, collapsed, index);

        match marker {
            Some(marker) => {
                let (indent, payload) = split_indent(line);
                view.lines
                    .push(format!("{}{}{}", indent, marker.token(), payload));
                view.decorations.push(marker.token_len());
            }
            None => {
                view.lines.push(line.to_string());
                view.decorations.push(0);
            }
        }
        view.sources.push(index);

        index = if marker == Some(FoldMarker::Collapsed) {
            subtree_end(lines, index)
        } else {
            index + 1
        };
    }

    view
}

// ─────────────────────────────────────────────────────────────────────────────
// Reconciliation
// ─────────────────────────────────────────────────────────────────────────────

/// Strip fold indicators from a single displayed line.
///
/// Every leading indicator token after the indentation is removed, in case
/// more than one ended up there.
pub fn strip_indicators(line: &str) -> String {
    let (indent, mut payload) = split_indent(line);
    while let Some(rest) = payload
        .strip_prefix(COLLAPSED_MARKER)
        .or_else(|| payload.strip_prefix(EXPANDED_MARKER))
    {
        payload = rest.strip_prefix(MARKER_SEPARATOR).unwrap_or(rest);
    }
    format!("{}{}", indent, payload)
}

/// Recover canonical lines from displayed lines.
pub fn reconcile<S: AsRef<str>>(displayed: &[S]) -> Vec<String> {
    displayed
        .iter()
        .map(|line| strip_indicators(line.as_ref()))
        .collect()
}

/// Byte length of the indicator tokens at the start of a displayed line's payload.
pub fn indicator_len(line: &str) -> usize {
    line.len() - strip_indicators(line).len()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn outline() -> Vec<&'static str> {
        vec!["Parent", "  Child 1", "    Grandchild", "  Child 2", "Other"]
    }

    #[test]
    fn test_project_without_collapse_adds_expanded_markers() {
        let view = project(&outline(), &CollapseSet::new());
        assert_eq!(
            view.lines,
            vec![
                "▼ Parent",
                "  ▼ Child 1",
                "    Grandchild",
                "  Child 2",
                "Other"
            ]
        );
        assert_eq!(view.sources(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_collapse_hides_exactly_descendants() {
        let lines = outline();
        let collapsed: CollapseSet = [0].into_iter().collect();
        let view = project(&lines, &collapsed);
        assert_eq!(view.lines, vec!["▶ Parent", "Other"]);
        assert_eq!(view.sources(), &[0, 4]);
        assert_eq!(view.hidden_count(lines.len()), 3);
    }

    #[test]
    fn test_nested_collapse() {
        let collapsed: CollapseSet = [1].into_iter().collect();
        let view = project(&outline(), &collapsed);
        assert_eq!(
            view.lines,
            vec!["▼ Parent", "  ▶ Child 1", "  Child 2", "Other"]
        );
    }

    #[test]
    fn test_reconcile_strips_markers() {
        let view = project(&outline(), &CollapseSet::new());
        assert_eq!(reconcile(&view.lines), outline());
    }

    #[test]
    fn test_reconcile_strips_repeated_markers() {
        assert_eq!(strip_indicators("  ▶ ▼ Text"), "  Text");
        assert_eq!(strip_indicators("▼Text"), "Text");
        assert_eq!(strip_indicators("Plain"), "Plain");
    }

    #[test]
    fn test_display_to_canonical_offset() {
        let lines = outline();
        let view = project(&lines, &CollapseSet::new());
        // "▼ Parent" -> 'P' is at byte 4 in display, byte 0 in canonical
        assert_eq!(view.to_canonical_offset(&lines, 4), 0);
        // inside the marker snaps to the indentation end
        assert_eq!(view.to_canonical_offset(&lines, 1), 0);
        // end of "▼ Parent" (10) -> end of "Parent" (6)
        assert_eq!(view.to_canonical_offset(&lines, 10), 6);
    }

    #[test]
    fn test_canonical_to_display_offset() {
        let lines = outline();
        let view = project(&lines, &CollapseSet::new());
        assert_eq!(view.to_display_offset(&lines, 0), 0);
        assert_eq!(view.to_display_offset(&lines, 3), 7);
    }

    #[test]
    fn test_hidden_line_maps_to_collapsed_ancestor() {
        let lines = outline();
        let collapsed: CollapseSet = [0].into_iter().collect();
        let view = project(&lines, &collapsed);
        // offset 8 is inside "  Child 1"
        let display = view.to_display_offset(&lines, 9);
        assert_eq!(display, "▶ Parent".len());
    }

    #[test]
    fn test_indicator_len() {
        assert_eq!(indicator_len("  ▼ Child"), "▼ ".len());
        assert_eq!(indicator_len("▶ Parent"), "▶ ".len());
        assert_eq!(indicator_len("  Child"), 0);
    }
}
