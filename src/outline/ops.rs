//! Edit operations engine
//!
//! Structural edits over the canonical outline. Each operation takes the
//! `(sequence, cursor, collapse set)` triple held in [`EditState`], splices
//! the affected lines, recomputes the cursor and remaps the collapse set.
//!
//! All cursor offsets here are in canonical space. Operations whose
//! precondition does not hold leave the state untouched and report
//! [`EditOutcome::NoOp`]; none of them can fail.

use super::collapse::CollapseSet;
use super::cursor::{clamp_offset, from_line_offset, to_line_offset, LinePosition};
use super::indent::{
    direct_children, has_children, indent_level, leading_spaces, subtree_end, INDENT_STR,
    INDENT_UNIT,
};
use super::sequence::LineSequence;
use log::debug;
use std::ops::Range;

// ─────────────────────────────────────────────────────────────────────────────
// Edit State
// ─────────────────────────────────────────────────────────────────────────────

/// The mutable state of one editing session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditState {
    /// Canonical line sequence
    pub sequence: LineSequence,
    /// Cursor as an absolute offset into the canonical text
    pub cursor: usize,
    /// Collapsed canonical line indices
    pub collapsed: CollapseSet,
}

impl EditState {
    /// Create a state from lines with the cursor at the start.
    pub fn new(sequence: LineSequence) -> Self {
        Self {
            sequence,
            cursor: 0,
            collapsed: CollapseSet::new(),
        }
    }

    /// Create a state from lines and a cursor offset (clamped).
    pub fn with_cursor(sequence: LineSequence, cursor: usize) -> Self {
        let mut state = Self::new(sequence);
        state.set_cursor(cursor);
        state
    }

    /// Move the cursor, clamping it to the document.
    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = clamp_offset(self.sequence.lines(), offset);
    }

    /// The cursor as a line position.
    pub fn position(&self) -> LinePosition {
        to_line_offset(self.sequence.lines(), self.cursor)
    }

    /// Index of the line the cursor is on.
    pub fn current_line(&self) -> usize {
        self.position().line
    }

    /// Place the cursor on `line` at `column`.
    fn place_cursor(&mut self, line: usize, column: usize) {
        self.cursor = from_line_offset(self.sequence.lines(), line, column);
    }

    /// Drop collapsed ancestors of `line` so it stays visible.
    fn reveal_line(&mut self, line: usize) {
        let lines = self.sequence.lines();
        let hiding: Vec<usize> = self
            .collapsed
            .iter()
            .filter(|&c| c < line && line < subtree_end(lines, c))
            .collect();
        for index in hiding {
            debug!("Expanding line {} to reveal cursor line {}", index, line);
            self.collapsed.remove(index);
        }
    }

    fn finish_structural_edit(&mut self) {
        self.collapsed.revalidate(self.sequence.lines());
        let line = self.current_line();
        self.reveal_line(line);
    }
}

/// Whether an operation changed the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The operation was applied
    Applied,
    /// The precondition did not hold; nothing changed
    NoOp,
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Indent / Unindent
// ─────────────────────────────────────────────────────────────────────────────

/// Indent the current line and all its descendants by one level.
pub fn indent_with_children(state: &mut EditState) -> EditOutcome {
    let position = state.position();
    let lines = state.sequence.lines();
    let block = position.line..subtree_end(lines, position.line);

    let indented: Vec<String> = lines[block.clone()]
        .iter()
        .map(|line| format!("{}{}", INDENT_STR, line))
        .collect();
    debug!("Indenting lines {:?}", block);
    state.sequence.splice(block, indented);

    state.place_cursor(position.line, position.column + INDENT_UNIT);
    state.finish_structural_edit();
    EditOutcome::Applied
}

/// Remove one level of indentation from the current line and its descendants.
///
/// Each line loses [`INDENT_UNIT`] leading spaces. A no-op unless the current line holds at least one full level of
/// indentation.
pub fn unindent_with_children(state: &mut EditState) -> EditOutcome {
    let position = state.position();
    let lines = state.sequence.lines();
    if indent_level(&lines[position.line]) == 0 {
        return EditOutcome::NoOp;
    }
    let removed = INDENT_UNIT;

    let block = position.line..subtree_end(lines, position.line);
    let unindented: Vec<String> = lines[block.clone()]
        .iter()
        .map(|line| {
            let strip = leading_spaces(line).min(INDENT_UNIT);
            line[strip..].to_string()
        })
        .collect();
    debug!("Unindenting lines {:?}", block);
    state.sequence.splice(block, unindented);

    state.place_cursor(position.line, position.column.saturating_sub(removed));
    state.finish_structural_edit();
    EditOutcome::Applied
}

// ─────────────────────────────────────────────────────────────────────────────
// Move Up / Move Down
// ─────────────────────────────────────────────────────────────────────────────

/// Swap two adjacent blocks and remap the collapse set to follow them.
///
/// `first` must end where `second` starts.
fn swap_adjacent_blocks(state: &mut EditState, first: Range<usize>, second: Range<usize>) {
    debug_assert_eq!(first.end, second.start);
    let lines = state.sequence.lines();
    let mut reordered: Vec<String> = Vec::with_capacity(second.end - first.start);
    reordered.extend_from_slice(&lines[second.clone()]);
    reordered.extend_from_slice(&lines[first.clone()]);
    state.sequence.splice(first.start..second.end, reordered);

    let first_len = first.len();
    let second_len = second.len();
    state.collapsed.remap(|i| {
        Some(if first.contains(&i) {
            i + second_len
        } else if second.contains(&i) {
            i - first_len
        } else {
            i
        })
    });
}

/// Move the current line and its descendants above the line directly before
/// it.
///
/// Only a preceding line at the same level is swapped with. No-op on the
/// first line, after the parent, and after a deeper line (the end of the
/// previous sibling's subtree).
pub fn move_up(state: &mut EditState) -> EditOutcome {
    let position = state.position();
    let lines = state.sequence.lines();
    let current = position.line;
    let level = indent_level(&lines[current]);

    let previous_sibling = current
        .checked_sub(1)
        .filter(|&i| indent_level(&lines[i]) == level);

    let Some(sibling) = previous_sibling else {
        debug!("Move up refused for line {}", current);
        return EditOutcome::NoOp;
    };

    let block = current..subtree_end(lines, current);
    swap_adjacent_blocks(state, sibling..current, block);

    state.place_cursor(sibling, position.column);
    state.finish_structural_edit();
    EditOutcome::Applied
}

/// Move the current line and its descendants below the next sibling's
/// subtree.
///
/// No-op when the block already reaches the end of the outline, or when the
/// line after the block is shallower (the block would leave its parent).
pub fn move_down(state: &mut EditState) -> EditOutcome {
    let position = state.position();
    let lines = state.sequence.lines();
    let current = position.line;
    let block_end = subtree_end(lines, current);

    if block_end >= lines.len()
        || indent_level(&lines[block_end]) != indent_level(&lines[current])
    {
        debug!("Move down refused for line {}", current);
        return EditOutcome::NoOp;
    }

    let sibling_end = subtree_end(lines, block_end);
    let shift = sibling_end - block_end;
    swap_adjacent_blocks(state, current..block_end, block_end..sibling_end);

    state.place_cursor(current + shift, position.column);
    state.finish_structural_edit();
    EditOutcome::Applied
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Insertion
// ─────────────────────────────────────────────────────────────────────────────

/// Split the current line at the cursor; the new line inherits the original
/// line's indentation.
///
/// A split point inside the indentation prefix is moved to the end of the
/// prefix, so neither half ends up deeper than the original line. When the
/// current line is collapsed the new line goes after its hidden subtree,
/// which is where it appears in the displayed view.
pub fn insert_line(state: &mut EditState) -> EditOutcome {
    let position = state.position();
    let lines = state.sequence.lines();
    let current = position.line;
    let line = &lines[current];

    let indent_len = leading_spaces(line);
    let split = position.column.max(indent_len);
    let head = line[..split].to_string();
    let tail = format!("{}{}", &line[..indent_len], &line[split..]);

    let insert_at = if state.collapsed.contains(current) {
        subtree_end(lines, current)
    } else {
        current + 1
    };

    debug!("Splitting line {} at column {}", current, split);
    state.sequence.splice(current..current + 1, vec![head]);
    state.sequence.splice(insert_at..insert_at, vec![tail]);
    state.collapsed.shift_for_insert(insert_at, 1);

    state.place_cursor(insert_at, indent_len);
    state.finish_structural_edit();
    EditOutcome::Applied
}

// ─────────────────────────────────────────────────────────────────────────────
// Collapse / Expand
// ─────────────────────────────────────────────────────────────────────────────

/// Collapse or expand the children of `line`.
///
/// No-op if the line has no children.
pub fn toggle_children(state: &mut EditState, line: usize) -> EditOutcome {
    if direct_children(state.sequence.lines(), line).is_empty() {
        return EditOutcome::NoOp;
    }
    let collapsed = state.collapsed.toggle(line);
    debug!(
        "Line {} {}",
        line,
        if collapsed { "collapsed" } else { "expanded" }
    );
    EditOutcome::Applied
}

/// Expand everything if anything is collapsed, otherwise collapse every line
/// that has children.
pub fn toggle_all(state: &mut EditState) -> EditOutcome {
    if !state.collapsed.is_empty() {
        state.collapsed.clear();
        return EditOutcome::Applied;
    }

    let lines = state.sequence.lines();
    let parents: CollapseSet = (0..lines.len()).filter(|&i| has_children(lines, i)).collect();
    if parents.is_empty() {
        return EditOutcome::NoOp;
    }
    state.collapsed = parents;
    EditOutcome::Applied
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
