//! Editing session
//!
//! An [`OutlineSession`] owns the `(canonical sequence, collapse set, cursor)`
//! triple for one open outline, plus the projected view shown to the user.
//! It is the only place that crosses between the two coordinate spaces:
//! callers speak displayed-text offsets, the edit engine speaks canonical
//! offsets.
//!
//! Each session is independent. Nothing here is shared between sessions and
//! nothing is safe to drive from more than one thread at a time; saves are
//! the one thing handed to another thread, as an owned snapshot.

use super::collapse::CollapseSet;
use super::cursor::{from_line_offset, to_line_offset};
use super::indent::{leading_spaces, subtree_end};
use super::ops::{self, EditOutcome, EditState};
use super::projector::{indicator_len, project, reconcile, ProjectedView};
use super::sequence::LineSequence;
use crate::document::{OutlineDocument, OutlineStore, DEFAULT_TITLE};
use crate::export::{self, ExportOptions};
use crate::notifications::{Notification, NotificationSink};
use crate::storage::{from_storage_format, to_storage_format};
use log::{debug, info, warn};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

// ─────────────────────────────────────────────────────────────────────────────
// Caret Collaborator
// ─────────────────────────────────────────────────────────────────────────────

/// The platform's text widget: the displayed text and the caret in it.
pub trait Caret {
    /// Current caret offset in the displayed text.
    fn get_absolute_cursor(&self) -> usize;

    /// Move the caret to an offset in the displayed text.
    fn set_absolute_cursor(&mut self, offset: usize);

    /// The displayed text as the user currently sees it, typing included.
    fn displayed_text(&self) -> String;

    /// Replace the displayed text.
    fn set_displayed_text(&mut self, text: &str);
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Tracking
// ─────────────────────────────────────────────────────────────────────────────

/// Result of a background save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    /// Saved under this id
    Saved(u64),
    /// The store rejected the save
    Failed(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// One editing session over one outline.
#[derive(Debug)]
pub struct OutlineSession {
    state: EditState,
    view: ProjectedView,
    title: String,
    document_id: Option<u64>,
    created_at: u64,
    /// Edited since the last successful save
    dirty: bool,
    pending_saves: Vec<Receiver<SaveStatus>>,
}

impl Default for OutlineSession {
    fn default() -> Self {
        Self::from_sequence(LineSequence::new())
    }
}

impl OutlineSession {
    /// Start a session on an empty outline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session on the given canonical lines.
    pub fn from_sequence(sequence: LineSequence) -> Self {
        let state = EditState::new(sequence);
        let view = project(state.sequence.lines(), &state.collapsed);
        Self {
            state,
            view,
            title: DEFAULT_TITLE.to_string(),
            document_id: None,
            created_at: 0,
            dirty: false,
            pending_saves: Vec::new(),
        }
    }

    /// Start a session from storage markup.
    pub fn from_markup(markup: &str) -> Self {
        Self::from_sequence(LineSequence::from_lines(from_storage_format(markup)))
    }

    /// Start a session on a stored document.
    pub fn from_document(document: &OutlineDocument) -> Self {
        let mut session = Self::from_markup(&document.content);
        session.title = document.title.clone();
        session.document_id = document.id;
        session.created_at = document.created_at;
        info!(
            "Opened outline '{}' ({} lines)",
            session.title,
            session.state.sequence.len()
        );
        session
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// The canonical lines.
    pub fn lines(&self) -> &[String] {
        self.state.sequence.lines()
    }

    /// The canonical text.
    pub fn canonical_text(&self) -> String {
        self.state.sequence.to_text()
    }

    /// The edit state (canonical space).
    pub fn state(&self) -> &EditState {
        &self.state
    }

    /// The current projected view.
    pub fn view(&self) -> &ProjectedView {
        &self.view
    }

    /// The displayed text.
    pub fn display_text(&self) -> String {
        self.view.text()
    }

    pub fn collapsed(&self) -> &CollapseSet {
        &self.state.collapsed
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        self.title = if title.trim().is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            title
        };
        self.dirty = true;
    }

    pub fn document_id(&self) -> Option<u64> {
        self.document_id
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Cursor offset in canonical space.
    pub fn canonical_cursor(&self) -> usize {
        self.state.cursor
    }

    /// Set the cursor from a canonical offset (clamped).
    pub fn set_canonical_cursor(&mut self, offset: usize) {
        self.state.set_cursor(offset);
    }

    /// Cursor offset in displayed space.
    pub fn display_cursor(&self) -> usize {
        self.view
            .to_display_offset(self.state.sequence.lines(), self.state.cursor)
    }

    /// Set the cursor from a displayed offset (clamped).
    pub fn set_display_cursor(&mut self, offset: usize) {
        let canonical = self
            .view
            .to_canonical_offset(self.state.sequence.lines(), offset);
        self.state.set_cursor(canonical);
    }

    fn reproject(&mut self) {
        self.view = project(self.state.sequence.lines(), &self.state.collapsed);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reconciliation
    // ─────────────────────────────────────────────────────────────────────────

    /// Fold an edited displayed text back into the canonical sequence.
    ///
    /// Only the region between the unchanged leading and trailing lines is
    /// replaced. Lines hidden under a collapsed line in that region stay
    /// attached to it when its text is still present, and are otherwise
    /// re-inserted expanded at the end of the region, so hidden content is
    /// never dropped. Returns `true` if the canonical sequence changed.
    pub fn sync_display(&mut self, displayed: &str) -> bool {
        let new_lines = reconcile(&displayed.split('\n').collect::<Vec<_>>());
        let old_lines = reconcile(&self.view.lines);
        if new_lines == old_lines {
            return false;
        }

        let canonical_len = self.state.sequence.len();
        let sources = self.view.sources().to_vec();

        let prefix = old_lines
            .iter()
            .zip(&new_lines)
            .take_while(|(a, b)| a == b)
            .count();
        let max_suffix = old_lines.len().min(new_lines.len()) - prefix;
        let suffix = old_lines
            .iter()
            .rev()
            .zip(new_lines.iter().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();

        let old_middle = prefix..old_lines.len() - suffix;
        let new_middle = &new_lines[prefix..new_lines.len() - suffix];

        let start = sources.get(old_middle.start).copied().unwrap_or(canonical_len);
        let end = sources.get(old_middle.end).copied().unwrap_or(canonical_len);

        // Hidden blocks under collapsed lines of the replaced region
        let canonical = self.state.sequence.lines();
        let mut hidden_blocks: Vec<(String, Vec<String>)> = Vec::new();
        for &source in &sources[old_middle.clone()] {
            if self.state.collapsed.contains(source) {
                let block_end = subtree_end(canonical, source);
                hidden_blocks.push((
                    canonical[source].clone(),
                    canonical[source + 1..block_end].to_vec(),
                ));
            }
        }

        let mut replacement: Vec<String> = Vec::with_capacity(new_middle.len());
        let mut recollapse: Vec<usize> = Vec::new();
        for line in new_middle {
            replacement.push(line.clone());
            if let Some(pos) = hidden_blocks.iter().position(|(parent, _)| parent == line) {
                let (_, block) = hidden_blocks.remove(pos);
                recollapse.push(start + replacement.len() - 1);
                replacement.extend(block);
            }
        }
        for (parent, block) in hidden_blocks {
            warn!(
                "Collapsed line '{}' was edited away, keeping its {} hidden lines expanded",
                parent.trim(),
                block.len()
            );
            replacement.extend(block);
        }

        let inserted = replacement.len();
        debug!(
            "Reconciling display: canonical {}..{} replaced by {} lines",
            start, end, inserted
        );
        self.state.sequence.splice(start..end, replacement);
        self.state.collapsed.shift_for_remove(start, end);
        self.state.collapsed.shift_for_insert(start, inserted);
        for index in recollapse {
            self.state.collapsed.insert(index);
        }
        self.state.collapsed.revalidate(self.state.sequence.lines());
        self.state.set_cursor(self.state.cursor);
        self.dirty = true;
        self.reproject();
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Edit Operations
    // ─────────────────────────────────────────────────────────────────────────

    fn apply_structural<F>(&mut self, op: F) -> EditOutcome
    where
        F: FnOnce(&mut EditState) -> EditOutcome,
    {
        let outcome = op(&mut self.state);
        if outcome.is_applied() {
            self.dirty = true;
            self.reproject();
        }
        outcome
    }

    /// Indent the current line with its descendants.
    pub fn indent(&mut self) -> EditOutcome {
        self.apply_structural(ops::indent_with_children)
    }

    /// Unindent the current line with its descendants.
    pub fn unindent(&mut self) -> EditOutcome {
        self.apply_structural(ops::unindent_with_children)
    }

    /// Move the current block above its previous sibling.
    pub fn move_up(&mut self) -> EditOutcome {
        self.apply_structural(ops::move_up)
    }

    /// Move the current block below its next sibling.
    pub fn move_down(&mut self) -> EditOutcome {
        self.apply_structural(ops::move_down)
    }

    /// Split the current line, the new line inheriting its indentation.
    pub fn insert_line(&mut self) -> EditOutcome {
        self.apply_structural(ops::insert_line)
    }

    /// Collapse or expand a canonical line, keeping the displayed cursor
    /// offset where it was.
    pub fn toggle_children(&mut self, line: usize) -> EditOutcome {
        let display_cursor = self.display_cursor();
        let outcome = ops::toggle_children(&mut self.state, line);
        if outcome.is_applied() {
            self.reproject();
            self.set_display_cursor(display_cursor);
        }
        outcome
    }

    /// Collapse or expand the line shown at `display_line`.
    pub fn toggle_children_at(&mut self, display_line: usize) -> EditOutcome {
        match self.view.canonical_line(display_line) {
            Some(line) => self.toggle_children(line),
            None => EditOutcome::NoOp,
        }
    }

    /// Collapse every parent, or expand everything if anything is collapsed.
    pub fn toggle_all(&mut self) -> EditOutcome {
        let display_cursor = self.display_cursor();
        let outcome = ops::toggle_all(&mut self.state);
        if outcome.is_applied() {
            self.reproject();
            self.set_display_cursor(display_cursor);
        }
        outcome
    }

    /// Run an edit against the platform widget.
    ///
    /// Text typed since the last call is folded into the canonical sequence
    /// first, and the caret is read against that text. Afterwards the widget
    /// gets the new displayed text and caret.
    pub fn edit_with_caret<F>(&mut self, caret: &mut dyn Caret, edit: F) -> EditOutcome
    where
        F: FnOnce(&mut Self) -> EditOutcome,
    {
        let displayed = caret.displayed_text();
        let offset = caret.get_absolute_cursor();
        if self.sync_display(&displayed) {
            self.set_cursor_in_displayed(&displayed, offset);
        } else {
            self.set_display_cursor(offset);
        }

        let outcome = edit(self);

        caret.set_displayed_text(&self.display_text());
        caret.set_absolute_cursor(self.display_cursor());
        outcome
    }

    /// Place the cursor from an offset into `displayed`, text that has just
    /// been synced and may carry stale fold indicators.
    fn set_cursor_in_displayed(&mut self, displayed: &str, offset: usize) {
        let displayed_lines: Vec<&str> = displayed.split('\n').collect();
        let position = to_line_offset(&displayed_lines, offset);
        let line = displayed_lines[position.line];
        let indent = leading_spaces(line);
        let decoration = indicator_len(line);
        let column = if position.column >= indent + decoration {
            position.column - decoration
        } else {
            position.column.min(indent)
        };

        match self.view.canonical_line(position.line) {
            Some(canonical) => {
                let cursor = from_line_offset(self.state.sequence.lines(), canonical, column);
                self.state.set_cursor(cursor);
            }
            None => self.set_display_cursor(offset),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────────────────────

    /// The canonical outline in storage markup.
    pub fn to_markup(&self) -> String {
        to_storage_format(self.state.sequence.lines())
    }

    /// A snapshot of this outline as a storable document.
    pub fn to_document(&self) -> OutlineDocument {
        OutlineDocument {
            id: self.document_id,
            title: self.title.clone(),
            content: self.to_markup(),
            created_at: self.created_at,
            updated_at: 0,
        }
    }

    /// Hand a snapshot to `store` on a background thread.
    ///
    /// Returns immediately; editing can continue. The outcome is picked up by
    /// [`poll_saves`](Self::poll_saves) or [`wait_for_saves`](Self::wait_for_saves).
    pub fn request_save(&mut self, store: Arc<dyn OutlineStore>) {
        let document = self.to_document();
        let (tx, rx) = channel();
        debug!("Requesting save of '{}'", document.title);

        thread::spawn(move || {
            let status = match store.save(&document) {
                Ok(id) => SaveStatus::Saved(id),
                Err(e) => SaveStatus::Failed(e.to_string()),
            };
            // The session may have been dropped; nobody to tell then
            let _ = tx.send(status);
        });

        self.pending_saves.push(rx);
    }

    /// Whether any save has not reported back yet.
    pub fn has_pending_saves(&self) -> bool {
        !self.pending_saves.is_empty()
    }

    /// Collect finished saves without blocking and report them to `sink`.
    pub fn poll_saves(&mut self, sink: &mut dyn NotificationSink) {
        let mut still_pending = Vec::new();
        for rx in std::mem::take(&mut self.pending_saves) {
            match rx.try_recv() {
                Ok(status) => self.apply_save_status(status, sink),
                Err(TryRecvError::Empty) => still_pending.push(rx),
                Err(TryRecvError::Disconnected) => self.apply_save_status(
                    SaveStatus::Failed("save worker stopped unexpectedly".to_string()),
                    sink,
                ),
            }
        }
        self.pending_saves = still_pending;
    }

    /// Block until every pending save has reported back.
    pub fn wait_for_saves(&mut self, sink: &mut dyn NotificationSink) {
        for rx in std::mem::take(&mut self.pending_saves) {
            let status = rx.recv().unwrap_or_else(|_| {
                SaveStatus::Failed("save worker stopped unexpectedly".to_string())
            });
            self.apply_save_status(status, sink);
        }
    }

    fn apply_save_status(&mut self, status: SaveStatus, sink: &mut dyn NotificationSink) {
        match status {
            SaveStatus::Saved(id) => {
                if self.document_id.is_none() {
                    self.document_id = Some(id);
                }
                self.dirty = false;
                sink.notify(Notification::success(format!("Saved: {}", self.title)));
            }
            SaveStatus::Failed(message) => {
                // In-memory state is kept as-is; the user can retry
                warn!("Save of '{}' failed: {}", self.title, message);
                sink.notify(Notification::error(format!("Save failed: {}", message)));
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────

    /// Render the canonical outline for export.
    pub fn export(&self, options: &ExportOptions) -> String {
        export::render(self.state.sequence.lines(), options)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
