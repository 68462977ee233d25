//! Editor state: buffer, cursor, viewport, placeholders, review lock, and undo history.
//!
//! Mutation gating:
//! - Every buffer-mutating call checks `EditorLockState` first. While a suggestion
//!   is under review the buffer is read-only: mutations return `EditOutcome::Rejected`
//!   and neither the buffer nor the history changes.
//! - Cursor navigation (`move_cursor`, `set_cursor`, placeholder jumps) is always
//!   allowed.
//! - `set_content` is a reload from persistence, not user input, and is not gated.
//!
//! Every successful mutation pushes exactly one `UndoAction`, marks the state
//! dirty, re-scans placeholders from the new content, and keeps the cursor in view.
//! Saving never touches history.

use core_patch::{EditBatch, PatchError};
use core_text::{Buffer, Position, grapheme, motion};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, trace, warn};

pub mod autosave;
pub mod line_ending;
pub mod placeholder;
pub mod undo;
pub mod viewport;

pub use autosave::AutosaveTracker;
pub use line_ending::{LineEnding, NormalizedText, normalize_line_endings, restore_line_endings};
pub use placeholder::{Placeholder, PlaceholderIssue, PlaceholderKind, PlaceholderValue};
pub use undo::{CursorRestore, UNDO_HISTORY_MAX, UndoAction, UndoLog};
pub use viewport::Viewport;

/// Whether the buffer currently admits mutations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorLockState {
    #[default]
    Unlocked,
    /// A suggestion batch is being reviewed; only navigation is admitted.
    ReadOnlyWhileReviewing(EditBatch),
}

/// Result of a single editing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Buffer content changed and one undo action was recorded.
    Applied,
    /// Cursor, placeholder focus or staged input changed; buffer content did not.
    Moved,
    /// Nothing to do (e.g. backspace at the start of the buffer, empty history).
    Unchanged,
    /// Refused because the buffer is locked for review.
    Rejected,
}

impl EditOutcome {
    pub fn changed_buffer(self) -> bool {
        matches!(self, EditOutcome::Applied)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("buffer is read-only while a suggestion is under review")]
    Locked,
    #[error(transparent)]
    Patch(#[from] PatchError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    LineStart,
    LineEnd,
}

/// Tunables supplied by the embedding application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    /// Spaces inserted by Tab when the buffer has no placeholders.
    pub tab_width: usize,
    pub history_capacity: usize,
    pub viewport_height: usize,
    pub autosave_debounce: Duration,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            tab_width: 4,
            history_capacity: UNDO_HISTORY_MAX,
            viewport_height: 24,
            autosave_debounce: autosave::DEFAULT_DEBOUNCE,
        }
    }
}

/// Snapshot for a status line. Line and column are 1-based; `visual_column`
/// counts terminal cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub line: usize,
    pub column: usize,
    pub visual_column: usize,
    pub line_count: usize,
    pub char_count: usize,
    pub placeholder_count: usize,
    pub dirty: bool,
    pub locked: bool,
    pub can_undo: bool,
    pub can_redo: bool,
    pub message: Option<String>,
}

pub struct EditorState {
    buffer: Buffer,
    cursor: Position,
    viewport: Viewport,
    placeholders: Vec<Placeholder>,
    active_placeholder: Option<usize>,
    lock: EditorLockState,
    undo: UndoLog,
    dirty: bool,
    status_message: Option<String>,
    options: EditorOptions,
    autosave: AutosaveTracker,
}

impl EditorState {
    pub fn new(content: &str) -> Self {
        Self::with_options(content, EditorOptions::default())
    }

    pub fn with_options(content: &str, options: EditorOptions) -> Self {
        let mut state = Self {
            buffer: Buffer::new(&normalize_input(content)),
            cursor: Position::origin(),
            viewport: Viewport::new(options.viewport_height),
            placeholders: Vec::new(),
            active_placeholder: None,
            lock: EditorLockState::Unlocked,
            undo: UndoLog::new(options.history_capacity),
            dirty: false,
            status_message: None,
            autosave: AutosaveTracker::new(options.autosave_debounce),
            options,
        };
        state.rescan_placeholders();
        state.sync_view();
        state
    }

    // ---- queries -------------------------------------------------------

    pub fn content(&self) -> String {
        self.buffer.content()
    }
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }
    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }
    pub fn char_count(&self) -> usize {
        self.buffer.char_count()
    }
    pub fn cursor(&self) -> Position {
        self.cursor
    }
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }
    pub fn active_placeholder(&self) -> Option<&Placeholder> {
        self.active_placeholder.and_then(|i| self.placeholders.get(i))
    }
    pub fn active_placeholder_index(&self) -> Option<usize> {
        self.active_placeholder
    }
    pub fn lock(&self) -> &EditorLockState {
        &self.lock
    }
    pub fn is_locked(&self) -> bool {
        !matches!(self.lock, EditorLockState::Unlocked)
    }
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }
    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }
    pub fn undo_log(&self) -> &UndoLog {
        &self.undo
    }
    pub fn options(&self) -> &EditorOptions {
        &self.options
    }
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn placeholder_issues(&self) -> Vec<PlaceholderIssue> {
        placeholder::validate(&self.placeholders, &self.buffer)
    }

    pub fn status(&self) -> StatusInfo {
        let line_text = self.buffer.line(self.cursor.line).unwrap_or_default();
        StatusInfo {
            line: self.cursor.line + 1,
            column: self.cursor.col + 1,
            visual_column: grapheme::visual_col(&line_text, self.cursor.col) + 1,
            line_count: self.buffer.line_count(),
            char_count: self.buffer.char_count(),
            placeholder_count: self.placeholders.len(),
            dirty: self.dirty,
            locked: self.is_locked(),
            can_undo: self.undo.can_undo(),
            can_redo: self.undo.can_redo(),
            message: self.status_message.clone(),
        }
    }

    // ---- text mutations --------------------------------------------------

    pub fn insert_char(&mut self, c: char) -> EditOutcome {
        if c == '\n' {
            return self.insert_newline();
        }
        let mut tmp = [0u8; 4];
        self.insert_text(c.encode_utf8(&mut tmp))
    }

    /// Insert `text` at the cursor as one action; the cursor ends after it.
    pub fn insert_text(&mut self, text: &str) -> EditOutcome {
        if !self.admits("insert_text") {
            return EditOutcome::Rejected;
        }
        if text.is_empty() {
            return EditOutcome::Unchanged;
        }
        let text = normalize_input(text);
        let before = self.cursor;
        let offset = self.cursor_offset();
        self.buffer.insert(offset, &text);
        self.cursor = self.buffer.position_of(offset + text.chars().count());
        trace!(target: "state.edit", op = "insert_text", offset, chars = text.chars().count(), line = self.cursor.line, col = self.cursor.col, "edit");
        self.undo.push(UndoAction::Insert {
            offset,
            text,
            cursor: CursorRestore::new(before, self.cursor),
        });
        self.content_changed();
        EditOutcome::Applied
    }

    pub fn insert_newline(&mut self) -> EditOutcome {
        if !self.admits("insert_newline") {
            return EditOutcome::Rejected;
        }
        let before = self.cursor;
        let offset = self.cursor_offset();
        self.buffer.insert(offset, "\n");
        self.cursor = Position::new(before.line + 1, 0);
        trace!(target: "state.edit", op = "insert_newline", offset, line = self.cursor.line, "edit");
        self.undo.push(UndoAction::Newline {
            offset,
            cursor: CursorRestore::new(before, self.cursor),
        });
        self.content_changed();
        EditOutcome::Applied
    }

    /// Tab jumps to the next placeholder when the buffer has any; otherwise it
    /// inserts `tab_width` spaces.
    pub fn insert_tab(&mut self) -> EditOutcome {
        if !self.placeholders.is_empty() {
            return match self.next_placeholder() {
                Some(_) => EditOutcome::Moved,
                None => EditOutcome::Unchanged,
            };
        }
        let spaces = " ".repeat(self.options.tab_width);
        self.insert_text(&spaces)
    }

    /// Remove the grapheme cluster before the cursor, or join with the previous
    /// line when the cursor sits at column 0.
    pub fn backspace(&mut self) -> EditOutcome {
        if !self.admits("backspace") {
            return EditOutcome::Rejected;
        }
        let before = self.cursor;
        let offset = self.cursor_offset();
        if offset == 0 {
            return EditOutcome::Unchanged;
        }
        let start = if before.col == 0 {
            offset - 1
        } else {
            let line = self.buffer.line(before.line).unwrap_or_default();
            offset - before.col + grapheme::prev_boundary(&line, before.col)
        };
        let text = self.buffer.remove(start, offset);
        self.cursor = self.buffer.position_of(start);
        trace!(target: "state.edit", op = "backspace", offset = start, chars = text.chars().count(), line = self.cursor.line, col = self.cursor.col, "edit");
        self.undo.push(UndoAction::Delete {
            offset: start,
            text,
            cursor: CursorRestore::new(before, self.cursor),
        });
        self.content_changed();
        EditOutcome::Applied
    }

    /// Remove the grapheme cluster under the cursor, or join the next line when
    /// the cursor sits at the end of its line.
    pub fn delete_forward(&mut self) -> EditOutcome {
        if !self.admits("delete_forward") {
            return EditOutcome::Rejected;
        }
        let offset = self.cursor_offset();
        if offset >= self.buffer.char_count() {
            return EditOutcome::Unchanged;
        }
        let pos = self.cursor;
        let end = if pos.col >= self.buffer.line_len(pos.line) {
            offset + 1
        } else {
            let line = self.buffer.line(pos.line).unwrap_or_default();
            offset - pos.col + grapheme::next_boundary(&line, pos.col)
        };
        let text = self.buffer.remove(offset, end);
        trace!(target: "state.edit", op = "delete_forward", offset, chars = text.chars().count(), "edit");
        self.undo.push(UndoAction::Delete {
            offset,
            text,
            cursor: CursorRestore::new(pos, pos),
        });
        self.content_changed();
        EditOutcome::Applied
    }

    /// Replace the placeholder token at `index` with `value`. The cursor ends
    /// after the inserted value.
    pub fn fill_placeholder(&mut self, index: usize, value: &PlaceholderValue) -> EditOutcome {
        if !self.admits("fill_placeholder") {
            return EditOutcome::Rejected;
        }
        let Some((start, end)) = self.placeholders.get(index).map(|p| (p.start, p.end)) else {
            return EditOutcome::Unchanged;
        };
        let inserted = value.render();
        let before = self.cursor;
        let removed = self.buffer.remove(start, end);
        self.buffer.insert(start, &inserted);
        self.cursor = self.buffer.position_of(start + inserted.chars().count());
        debug!(target: "state.placeholder", index, start, removed_chars = removed.chars().count(), inserted_chars = inserted.chars().count(), "placeholder_filled");
        self.undo.push(UndoAction::PlaceholderFill {
            offset: start,
            removed,
            inserted,
            cursor: CursorRestore::new(before, self.cursor),
        });
        self.active_placeholder = None;
        self.content_changed();
        EditOutcome::Applied
    }

    /// Replace a list placeholder with one `- item` line per entry.
    pub fn fill_list_placeholder(&mut self, index: usize, items: Vec<String>) -> EditOutcome {
        self.fill_placeholder(index, &PlaceholderValue::List(items))
    }

    /// Stage a value for the placeholder at `index` without touching the buffer.
    pub fn stage_placeholder_value(&mut self, index: usize, value: impl Into<String>) -> EditOutcome {
        if !self.admits("stage_placeholder") {
            return EditOutcome::Rejected;
        }
        match self.placeholders.get_mut(index) {
            Some(p) => {
                p.current_value = value.into();
                EditOutcome::Moved
            }
            None => EditOutcome::Unchanged,
        }
    }

    /// Write the staged value of the placeholder at `index` into the buffer.
    /// List placeholders take one item per staged line.
    pub fn commit_placeholder(&mut self, index: usize) -> EditOutcome {
        let Some(p) = self.placeholders.get(index) else {
            return EditOutcome::Unchanged;
        };
        let value = match p.kind {
            Some(PlaceholderKind::List) => PlaceholderValue::List(
                p.current_value
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            _ => PlaceholderValue::Text(p.current_value.clone()),
        };
        self.fill_placeholder(index, &value)
    }

    /// Apply a whole batch as a single `BatchEdit` action. The buffer is left
    /// untouched on any patch error.
    pub fn apply_batch(&mut self, batch: &EditBatch) -> Result<(), StateError> {
        if !self.admits("apply_batch") {
            return Err(StateError::Locked);
        }
        let snapshot = self.buffer.content();
        let updated = core_patch::apply(&snapshot, batch)?;
        let before = self.cursor;
        self.buffer.replace_all(&updated);
        self.clamp_cursor();
        debug!(target: "state.edit", edits = batch.len(), chars_before = snapshot.chars().count(), chars_after = self.buffer.char_count(), "batch_applied");
        self.undo.push(UndoAction::BatchEdit {
            snapshot,
            batch: batch.clone(),
            cursor: CursorRestore::new(before, self.cursor),
        });
        self.content_changed();
        Ok(())
    }

    // ---- history ---------------------------------------------------------

    pub fn undo(&mut self) -> EditOutcome {
        if !self.admits("undo") {
            return EditOutcome::Rejected;
        }
        let Some(action) = self.undo.undo() else {
            return EditOutcome::Unchanged;
        };
        self.revert(&action);
        self.cursor = action.cursor().before;
        self.content_changed();
        EditOutcome::Applied
    }

    pub fn redo(&mut self) -> EditOutcome {
        if !self.admits("redo") {
            return EditOutcome::Rejected;
        }
        let Some(action) = self.undo.redo() else {
            return EditOutcome::Unchanged;
        };
        self.replay(&action);
        self.cursor = action.cursor().after;
        self.content_changed();
        EditOutcome::Applied
    }

    fn revert(&mut self, action: &UndoAction) {
        match action {
            UndoAction::Insert { offset, text, .. } => {
                self.buffer.remove(*offset, offset + text.chars().count());
            }
            UndoAction::Newline { offset, .. } => {
                self.buffer.remove(*offset, offset + 1);
            }
            UndoAction::Delete { offset, text, .. } => self.buffer.insert(*offset, text),
            UndoAction::PlaceholderFill {
                offset,
                removed,
                inserted,
                ..
            } => {
                self.buffer.remove(*offset, offset + inserted.chars().count());
                self.buffer.insert(*offset, removed);
            }
            UndoAction::BatchEdit { snapshot, .. } => self.buffer.replace_all(snapshot),
        }
    }

    fn replay(&mut self, action: &UndoAction) {
        match action {
            UndoAction::Insert { offset, text, .. } => self.buffer.insert(*offset, text),
            UndoAction::Newline { offset, .. } => self.buffer.insert(*offset, "\n"),
            UndoAction::Delete { offset, text, .. } => {
                self.buffer.remove(*offset, offset + text.chars().count());
            }
            UndoAction::PlaceholderFill {
                offset,
                removed,
                inserted,
                ..
            } => {
                self.buffer.remove(*offset, offset + removed.chars().count());
                self.buffer.insert(*offset, inserted);
            }
            UndoAction::BatchEdit {
                snapshot, batch, ..
            } => match core_patch::apply(snapshot, batch) {
                Ok(updated) => self.buffer.replace_all(&updated),
                Err(err) => {
                    warn!(target: "state.undo", error = %err, "batch_redo_failed");
                    self.buffer.replace_all(snapshot);
                }
            },
        }
    }

    // ---- navigation ------------------------------------------------------

    /// Move the cursor. Allowed while locked. Returns true if the cursor moved.
    pub fn move_cursor(&mut self, direction: Direction) -> bool {
        let before = self.cursor;
        match direction {
            Direction::Up => motion::up(&self.buffer, &mut self.cursor),
            Direction::Down => motion::down(&self.buffer, &mut self.cursor),
            Direction::Left => motion::left(&self.buffer, &mut self.cursor),
            Direction::Right => motion::right(&self.buffer, &mut self.cursor),
            Direction::LineStart => motion::line_start(&self.buffer, &mut self.cursor),
            Direction::LineEnd => motion::line_end(&self.buffer, &mut self.cursor),
        }
        let moved = before != self.cursor;
        if moved {
            self.viewport.ensure_visible(self.cursor.line);
            trace!(target: "state.edit", op = "motion", ?direction, line = self.cursor.line, col = self.cursor.col, "motion");
        }
        moved
    }

    /// Place the cursor, clamped into the buffer and onto a grapheme boundary.
    pub fn set_cursor(&mut self, pos: Position) {
        self.cursor = pos;
        self.clamp_cursor();
        self.viewport.ensure_visible(self.cursor.line);
    }

    /// Focus the first placeholder after the cursor, wrapping to the first one.
    pub fn next_placeholder(&mut self) -> Option<usize> {
        let idx = placeholder::next_index(&self.placeholders, self.cursor_offset())?;
        self.focus_placeholder(idx);
        Some(idx)
    }

    /// Focus the last placeholder ending before the cursor, wrapping to the last one.
    pub fn previous_placeholder(&mut self) -> Option<usize> {
        let idx = placeholder::previous_index(&self.placeholders, self.cursor_offset())?;
        self.focus_placeholder(idx);
        Some(idx)
    }

    fn focus_placeholder(&mut self, idx: usize) {
        if let Some(start) = self.placeholders.get(idx).map(|p| p.start) {
            self.cursor = self.buffer.position_of(start);
            self.active_placeholder = Some(idx);
            self.viewport.ensure_visible(self.cursor.line);
            trace!(target: "state.placeholder", index = idx, start, "placeholder_focused");
        }
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport.set_height(height);
        self.viewport.ensure_visible(self.cursor.line);
    }

    // ---- persistence & review hooks --------------------------------------

    /// Replace the content wholesale from persistence. History is cleared since
    /// recorded offsets no longer describe this text.
    pub fn set_content(&mut self, content: &str) {
        self.buffer.replace_all(&normalize_input(content));
        self.undo.clear();
        self.dirty = false;
        self.autosave.mark_saved();
        self.active_placeholder = None;
        self.rescan_placeholders();
        self.sync_view();
        debug!(target: "state.edit", chars = self.buffer.char_count(), lines = self.buffer.line_count(), "content_replaced");
    }

    /// Record a successful save. History survives.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
        self.autosave.mark_saved();
    }

    /// True when unsaved changes have settled for the debounce window.
    pub fn autosave_due(&self, now: Instant) -> bool {
        self.dirty && self.autosave.is_due(now)
    }

    /// Make the buffer read-only while `batch` is reviewed.
    pub fn lock_for_review(&mut self, batch: EditBatch) {
        debug!(target: "state.lock", edits = batch.len(), "locked_for_review");
        self.lock = EditorLockState::ReadOnlyWhileReviewing(batch);
    }

    /// Lift the review lock, returning the batch that was pending.
    pub fn release_lock(&mut self) -> Option<EditBatch> {
        match std::mem::take(&mut self.lock) {
            EditorLockState::ReadOnlyWhileReviewing(batch) => {
                debug!(target: "state.lock", edits = batch.len(), "lock_released");
                Some(batch)
            }
            EditorLockState::Unlocked => None,
        }
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status_message(&mut self) {
        self.status_message = None;
    }

    // ---- internals -------------------------------------------------------

    fn admits(&self, op: &'static str) -> bool {
        if self.is_locked() {
            trace!(target: "state.edit", op, "rejected_while_reviewing");
            return false;
        }
        true
    }

    fn cursor_offset(&self) -> usize {
        self.buffer.char_index(self.cursor)
    }

    fn content_changed(&mut self) {
        self.dirty = true;
        self.autosave.note_change(Instant::now());
        self.rescan_placeholders();
        self.sync_view();
    }

    fn rescan_placeholders(&mut self) {
        let previous = std::mem::take(&mut self.placeholders);
        let mut current = placeholder::scan(&self.buffer.content());
        placeholder::carry_staged_values(&previous, &mut current);
        self.placeholders = current;
        if self.active_placeholder.is_some_and(|i| i >= self.placeholders.len()) {
            self.active_placeholder = None;
        }
    }

    fn clamp_cursor(&mut self) {
        let buffer = &self.buffer;
        self.cursor.clamp_to(buffer.line_count(), |l| buffer.line_len(l));
        let line = buffer.line(self.cursor.line).unwrap_or_default();
        self.cursor.col = grapheme::floor_boundary(&line, self.cursor.col);
    }

    fn sync_view(&mut self) {
        self.clamp_cursor();
        self.viewport.set_total_lines(self.buffer.line_count());
        self.viewport.ensure_visible(self.cursor.line);
    }
}

fn normalize_input(text: &str) -> String {
    if text.contains('\r') {
        normalize_line_endings(text).normalized
    } else {
        text.to_string()
    }
}
