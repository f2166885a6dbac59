//! Indentation model
//!
//! Pure functions that derive the outline tree from a flat sequence of lines.
//! Hierarchy is never stored: a line's depth is computed from its leading
//! spaces, and children/descendants are found by scanning forward.

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Number of leading space characters per indentation level.
pub const INDENT_UNIT: usize = 2;

/// The indentation prefix inserted by a single indent step.
pub const INDENT_STR: &str = "  ";

// ─────────────────────────────────────────────────────────────────────────────
// Line-level Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Count the leading space characters of a line.
#[inline]
pub fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}

/// Compute the indentation level of a line.
///
/// One level per [`INDENT_UNIT`] leading spaces, rounded down. A line of
/// only spaces has level `len / 2` and an empty payload.
#[inline]
pub fn indent_level(line: &str) -> usize {
    leading_spaces(line) / INDENT_UNIT
}

/// Split a line into its indentation prefix and its payload.
pub fn split_indent(line: &str) -> (&str, &str) {
    line.split_at(leading_spaces(line))
}

/// Build an indentation prefix for the given level.
pub fn indent_prefix(level: usize) -> String {
    " ".repeat(level.saturating_mul(INDENT_UNIT))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree Relationships
// ─────────────────────────────────────────────────────────────────────────────

/// Indices of the direct children of `parent`.
///
/// Scans forward until the first line whose level is at or above the
/// parent's. Deeper lines (grandchildren) are skipped but do not end the scan.
pub fn direct_children<S: AsRef<str>>(lines: &[S], parent: usize) -> Vec<usize> {
    let Some(parent_line) = lines.get(parent) else {
        return Vec::new();
    };
    let parent_level = indent_level(parent_line.as_ref());

    lines
        .iter()
        .enumerate()
        .skip(parent + 1)
        .map(|(i, line)| (i, indent_level(line.as_ref())))
        .take_while(|&(_, level)| level > parent_level)
        .filter(|&(_, level)| level == parent_level + 1)
        .map(|(i, _)| i)
        .collect()
}

/// Indices of every descendant of `parent` (children, grandchildren, ...).
///
/// This is the contiguous run of strictly deeper lines right after `parent`.
pub fn all_descendants<S: AsRef<str>>(lines: &[S], parent: usize) -> Vec<usize> {
    (parent + 1..subtree_end(lines, parent)).collect()
}

/// Exclusive end index of the block made of `index` and all its descendants.
///
/// Returns `index + 1` for a leaf and `lines.len()` when the block runs to
/// the end of the sequence. An out-of-range index yields `lines.len()`.
pub fn subtree_end<S: AsRef<str>>(lines: &[S], index: usize) -> usize {
    let Some(line) = lines.get(index) else {
        return lines.len();
    };
    let level = indent_level(line.as_ref());

    lines[index + 1..]
        .iter()
        .position(|l| indent_level(l.as_ref()) <= level)
        .map(|offset| index + 1 + offset)
        .unwrap_or(lines.len())
}

/// Check whether a line has at least one direct child.
pub fn has_children<S: AsRef<str>>(lines: &[S], index: usize) -> bool {
    !direct_children(lines, index).is_empty()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<&'static str> {
        vec![
            "Root",          // 0
            "  Child A",     // 1
            "    Grand A1",  // 2
            "  Child B",     // 3
            "      Deep",    // 4 (level 3, jump allowed on load)
            "    Grand B1",  // 5
            "Other",         // 6
        ]
    }

    #[test]
    fn test_indent_level() {
        assert_eq!(indent_level("text"), 0);
        assert_eq!(indent_level("  text"), 1);
        assert_eq!(indent_level("   text"), 1);
        assert_eq!(indent_level("    text"), 2);
        assert_eq!(indent_level(""), 0);
    }

    #[test]
    fn test_indent_level_all_spaces() {
        assert_eq!(indent_level("     "), 2);
        let (prefix, payload) = split_indent("     ");
        assert_eq!(prefix.len(), 5);
        assert!(payload.is_empty());
    }

    #[test]
    fn test_tabs_are_not_indentation() {
        assert_eq!(indent_level("\ttext"), 0);
    }

    #[test]
    fn test_direct_children_skips_grandchildren() {
        let lines = sample();
        assert_eq!(direct_children(&lines, 0), vec![1, 3]);
        assert_eq!(direct_children(&lines, 3), vec![5]);
        assert!(direct_children(&lines, 2).is_empty());
    }

    #[test]
    fn test_all_descendants() {
        let lines = sample();
        assert_eq!(all_descendants(&lines, 0), vec![1, 2, 3, 4, 5]);
        assert_eq!(all_descendants(&lines, 1), vec![2]);
        assert_eq!(all_descendants(&lines, 3), vec![4, 5]);
        assert!(all_descendants(&lines, 6).is_empty());
    }

    #[test]
    fn test_last_line_has_no_descendants() {
        let lines = vec!["A", "  B"];
        assert!(all_descendants(&lines, 1).is_empty());
        assert!(direct_children(&lines, 1).is_empty());
    }

    #[test]
    fn test_level_zero_stops_scan() {
        let lines = vec!["A", "B", "  C"];
        assert!(all_descendants(&lines, 0).is_empty());
        assert!(!has_children(&lines, 0));
        assert!(has_children(&lines, 1));
    }

    #[test]
    fn test_out_of_range_index() {
        let lines = vec!["A"];
        assert!(direct_children(&lines, 5).is_empty());
        assert!(all_descendants(&lines, 5).is_empty());
        assert_eq!(subtree_end(&lines, 5), 1);
    }

    #[test]
    fn test_descendant_closure() {
        let lines = vec![
            "A", "  B", "    C", "      D", "    E", "  F", "G", "  H",
        ];
        for i in 0..lines.len() {
            let mut expected: Vec<usize> = Vec::new();
            for child in direct_children(&lines, i) {
                expected.push(child);
                expected.extend(all_descendants(&lines, child));
            }
            expected.sort_unstable();
            assert_eq!(all_descendants(&lines, i), expected, "line {}", i);
        }
    }

    #[test]
    fn test_level_jump_is_descendant_but_not_child() {
        let lines = sample();
        assert!(all_descendants(&lines, 3).contains(&4));
        assert!(!direct_children(&lines, 3).contains(&4));
    }

    #[test]
    fn test_subtree_end() {
        let lines = sample();
        assert_eq!(subtree_end(&lines, 0), 6);
        assert_eq!(subtree_end(&lines, 1), 3);
        assert_eq!(subtree_end(&lines, 6), 7);
    }

    #[test]
    fn test_indent_prefix() {
        assert_eq!(indent_prefix(0), "");
        assert_eq!(indent_prefix(2), "    ");
    }
}
