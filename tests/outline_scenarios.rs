//! Integration tests for the outline edit engine
//!
//! Concrete editing scenarios plus structural properties checked over a set
//! of sample outlines.

use outliner::outline::cursor::from_line_offset;
use outliner::outline::indent::{all_descendants, direct_children, indent_level};
use outliner::outline::ops::{self, EditOutcome, EditState};
use outliner::outline::{project, CollapseSet, LineSequence};
use outliner::storage::{from_storage_format, to_storage_format};

fn state_at(lines: &[&str], line: usize, column: usize) -> EditState {
    let sequence = LineSequence::from_lines(lines.iter().copied());
    let cursor = from_line_offset(sequence.lines(), line, column);
    EditState::with_cursor(sequence, cursor)
}

fn samples() -> Vec<Vec<&'static str>> {
    vec![
        vec!["Only"],
        vec!["Line 1", "Line 2", "  Child of 2"],
        vec!["Line 1", "Parent", "  Child", "Line 4"],
        vec!["Parent", "  Child 1", "  Child 2", "Other"],
        vec![
            "Root",
            "  A",
            "    A1",
            "    A2",
            "      A2x",
            "  B",
            "Second",
            "  C",
            "",
            "Third",
        ],
        vec!["a", "  b", "    c", "      d", "        e", "          f"],
        vec!["x", "  ", "y", "    deep jump", "z"],
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenarios
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_enter_then_tab() {
    let mut state = state_at(&["Line 1"], 0, 6);
    assert_eq!(state.cursor, 6);

    assert!(ops::insert_line(&mut state).is_applied());
    assert_eq!(state.sequence.lines(), &["Line 1", ""]);
    assert_eq!(state.current_line(), 1);

    assert!(ops::indent_with_children(&mut state).is_applied());
    assert_eq!(state.sequence.lines(), &["Line 1", "  "]);
}

#[test]
fn test_indent_with_children() {
    let mut state = state_at(&["Line 1", "Line 2", "  Child of 2"], 1, 0);
    ops::indent_with_children(&mut state);
    assert_eq!(
        state.sequence.lines(),
        &["Line 1", "  Line 2", "    Child of 2"]
    );
}

#[test]
fn test_move_down_with_children() {
    let mut state = state_at(&["Line 1", "Parent", "  Child", "Line 4"], 1, 0);
    assert!(ops::move_down(&mut state).is_applied());
    assert_eq!(
        state.sequence.lines(),
        &["Line 1", "Line 4", "Parent", "  Child"]
    );
    assert_eq!(state.current_line(), 2);
}

#[test]
fn test_toggle_all_twice() {
    let mut state = state_at(&["Parent", "  Child 1", "  Child 2", "Other"], 0, 0);
    ops::toggle_all(&mut state);
    assert_eq!(state.collapsed.iter().collect::<Vec<_>>(), vec![0]);
    ops::toggle_all(&mut state);
    assert!(state.collapsed.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_indent_unindent_inverse() {
    for lines in samples() {
        for (i, line) in lines.iter().enumerate() {
            if indent_level(line) != 0 || line.starts_with(' ') {
                continue;
            }
            let mut state = state_at(&lines, i, 0);
            ops::indent_with_children(&mut state);
            ops::unindent_with_children(&mut state);
            assert_eq!(state.sequence.lines(), lines.as_slice(), "line {}", i);
        }
    }
}

#[test]
fn test_descendant_closure() {
    for lines in samples() {
        for i in 0..lines.len() {
            let mut expected: Vec<usize> = Vec::new();
            for child in direct_children(&lines, i) {
                expected.push(child);
                expected.extend(all_descendants(&lines, child));
            }
            expected.sort_unstable();
            expected.dedup();

            let mut actual = all_descendants(&lines, i);
            actual.sort_unstable();

            // A level jump (child two levels deeper) has no direct parent
            let has_jump = actual.iter().any(|&d| {
                indent_level(lines[d]) > indent_level(lines[d - 1]) + 1
            });
            if !has_jump {
                assert_eq!(actual, expected, "{:?} at {}", lines, i);
            }
        }
    }
}

#[test]
fn test_move_boundaries() {
    for lines in samples() {
        let mut first = state_at(&lines, 0, 0);
        assert_eq!(ops::move_up(&mut first), EditOutcome::NoOp);
        assert_eq!(first.sequence.lines(), lines.as_slice());

        let last = lines.len() - 1;
        let mut end = state_at(&lines, last, 0);
        assert_eq!(ops::move_down(&mut end), EditOutcome::NoOp);
        assert_eq!(end.sequence.lines(), lines.as_slice());
    }
}

#[test]
fn test_move_never_crosses_parent() {
    // "  b" is the first child of "a"; it has no previous sibling
    let mut state = state_at(&["a", "  b", "c"], 1, 0);
    assert_eq!(ops::move_up(&mut state), EditOutcome::NoOp);
    // ... and no next sibling inside "a"
    assert_eq!(ops::move_down(&mut state), EditOutcome::NoOp);
}

#[test]
fn test_collapse_hides_exactly_descendants() {
    for lines in samples() {
        for i in 0..lines.len() {
            if direct_children(&lines, i).is_empty() {
                continue;
            }
            let collapsed: CollapseSet = [i].into_iter().collect();
            let view = project(&lines, &collapsed);
            let hidden = all_descendants(&lines, i);
            let expected: Vec<usize> = (0..lines.len()).filter(|j| !hidden.contains(j)).collect();
            assert_eq!(view.sources(), expected.as_slice());
        }
    }
}

#[test]
fn test_storage_round_trip() {
    for lines in samples() {
        if lines.iter().any(|l| indent_level(l) > 5) {
            continue;
        }
        let restored = from_storage_format(&to_storage_format(&lines));
        assert_eq!(restored.len(), lines.len());
        for (a, b) in lines.iter().zip(&restored) {
            assert_eq!(indent_level(a), indent_level(b));
            assert_eq!(a.trim(), b.trim());
        }
    }
}
