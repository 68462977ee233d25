use core_patch::EditBatch;
use core_text::Position;
use tracing::trace;

/// Default number of actions retained in undo history.
pub const UNDO_HISTORY_MAX: usize = 100;

/// Cursor to restore when an action is undone (`before`) or redone (`after`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorRestore {
    pub before: Position,
    pub after: Position,
}

impl CursorRestore {
    pub fn new(before: Position, after: Position) -> Self {
        Self { before, after }
    }
}

/// One reversible mutation. Offsets are absolute char offsets into the buffer
/// as it was right before the mutation ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoAction {
    Insert {
        offset: usize,
        text: String,
        cursor: CursorRestore,
    },
    Delete {
        offset: usize,
        text: String,
        cursor: CursorRestore,
    },
    Newline {
        offset: usize,
        cursor: CursorRestore,
    },
    /// A placeholder token (`removed`) replaced by its filled value (`inserted`).
    PlaceholderFill {
        offset: usize,
        removed: String,
        inserted: String,
        cursor: CursorRestore,
    },
    /// A whole suggestion batch. Undo restores `snapshot`; redo re-runs `batch` on it.
    BatchEdit {
        snapshot: String,
        batch: EditBatch,
        cursor: CursorRestore,
    },
}

impl UndoAction {
    pub fn cursor(&self) -> CursorRestore {
        match self {
            UndoAction::Insert { cursor, .. }
            | UndoAction::Delete { cursor, .. }
            | UndoAction::Newline { cursor, .. }
            | UndoAction::PlaceholderFill { cursor, .. }
            | UndoAction::BatchEdit { cursor, .. } => *cursor,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            UndoAction::Insert { .. } => "insert",
            UndoAction::Delete { .. } => "delete",
            UndoAction::Newline { .. } => "newline",
            UndoAction::PlaceholderFill { .. } => "placeholder_fill",
            UndoAction::BatchEdit { .. } => "batch_edit",
        }
    }
}

/// Bounded undo/redo double stack. Pushing a new action discards the redo branch.
#[derive(Debug, Clone)]
pub struct UndoLog {
    undo_stack: Vec<UndoAction>,
    redo_stack: Vec<UndoAction>,
    capacity: usize,
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::new(UNDO_HISTORY_MAX)
    }
}

impl UndoLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn push(&mut self, action: UndoAction) {
        let kind = action.kind_name();
        self.undo_stack.push(action);
        trace!(target: "state.undo", kind, undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "push_action");
        if self.undo_stack.len() > self.capacity {
            let _ = self.undo_stack.remove(0);
            trace!(target: "state.undo", "undo_stack_trimmed");
        }
        if !self.redo_stack.is_empty() {
            self.redo_stack.clear();
            trace!(target: "state.undo", "redo_stack_cleared_on_new_edit");
        }
    }

    /// Move the newest action onto the redo stack and hand it back for inversion.
    pub fn undo(&mut self) -> Option<UndoAction> {
        let action = self.undo_stack.pop()?;
        trace!(target: "state.undo", kind = action.kind_name(), undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo_pop");
        self.redo_stack.push(action.clone());
        Some(action)
    }

    /// Move the newest undone action back onto the undo stack and hand it back for re-application.
    pub fn redo(&mut self) -> Option<UndoAction> {
        let action = self.redo_stack.pop()?;
        trace!(target: "state.undo", kind = action.kind_name(), undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "redo_pop");
        self.undo_stack.push(action.clone());
        Some(action)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        trace!(target: "state.undo", "history_cleared");
    }
}
