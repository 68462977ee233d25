//! Dispatcher applying `Action` to a `Workspace`.
//!
//! Sub-modules by concern:
//! * `motion` - cursor movement and placeholder navigation
//! * `edit`   - text mutation and placeholder fills
//! * `undo`   - undo / redo
//! * `review` - suggestion preview, accept and reject
//!
//! Mutations refused by the review lock surface as a clean result plus a status
//! message; the buffer is never touched.

use crate::{Action, Workspace};
use core_state::EditOutcome;

mod edit;
mod motion;
mod review;
mod undo;

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchResult {
    /// Something visible changed (content, cursor or status line).
    pub dirty: bool,
    /// Line structure changed, so per-line render caches are stale.
    pub buffer_replaced: bool,
    /// The buffer is read-only after this action (a suggestion is under review).
    pub locked: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }
    pub fn clean() -> Self {
        Self::default()
    }
    pub fn buffer_replaced() -> Self {
        Self {
            dirty: true,
            buffer_replaced: true,
            locked: false,
        }
    }
}

/// Apply an action to the workspace.
pub fn dispatch(action: Action, ws: &mut Workspace) -> DispatchResult {
    tracing::trace!(target: "actions.dispatch", action = action_name(&action), "dispatch");
    let mut result = match action {
        Action::Move(direction) => motion::handle_move(direction, ws),
        Action::NextPlaceholder => motion::handle_next_placeholder(ws),
        Action::PreviousPlaceholder => motion::handle_previous_placeholder(ws),
        Action::Undo => undo::handle_undo(ws),
        Action::Redo => undo::handle_redo(ws),
        Action::ProposeSuggestion(suggestion) => review::handle_propose(suggestion, ws),
        Action::AcceptSuggestion => review::handle_accept(ws),
        Action::RejectSuggestion => review::handle_reject(ws),
        edit_action => edit::handle_edit(edit_action, ws),
    };
    result.locked = ws.state.is_locked();
    result
}

/// Map an editing outcome onto a render hint. `lines_before` is the line count
/// prior to the edit; a change in line structure escalates to `buffer_replaced`.
pub(crate) fn outcome_result(
    outcome: EditOutcome,
    ws: &mut Workspace,
    lines_before: usize,
    op: &'static str,
) -> DispatchResult {
    match outcome {
        EditOutcome::Applied if ws.state.line_count() != lines_before => {
            DispatchResult::buffer_replaced()
        }
        EditOutcome::Applied | EditOutcome::Moved => DispatchResult::dirty(),
        EditOutcome::Unchanged => DispatchResult::clean(),
        EditOutcome::Rejected => {
            tracing::debug!(target: "actions.dispatch", op, "rejected_while_reviewing");
            ws.state.set_status_message("Read-only while a suggestion is under review");
            DispatchResult::dirty()
        }
    }
}

fn action_name(action: &Action) -> &'static str {
    match action {
        Action::InsertChar(_) => "insert_char",
        Action::InsertText(_) => "insert_text",
        Action::Newline => "newline",
        Action::Tab => "tab",
        Action::Backspace => "backspace",
        Action::DeleteForward => "delete_forward",
        Action::Move(_) => "move",
        Action::NextPlaceholder => "next_placeholder",
        Action::PreviousPlaceholder => "previous_placeholder",
        Action::FillPlaceholder { .. } => "fill_placeholder",
        Action::FillList { .. } => "fill_list",
        Action::StagePlaceholder { .. } => "stage_placeholder",
        Action::CommitPlaceholder(_) => "commit_placeholder",
        Action::Undo => "undo",
        Action::Redo => "redo",
        Action::ProposeSuggestion(_) => "propose_suggestion",
        Action::AcceptSuggestion => "accept_suggestion",
        Action::RejectSuggestion => "reject_suggestion",
    }
}
