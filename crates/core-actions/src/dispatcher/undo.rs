//! Undo / Redo handling.

use super::{DispatchResult, outcome_result};
use crate::Workspace;

pub(crate) fn handle_undo(ws: &mut Workspace) -> DispatchResult {
    let before = ws.state.line_count();
    let outcome = ws.state.undo();
    tracing::trace!(target: "actions.dispatch", op = "undo", ?outcome, buffer_changed = (before != ws.state.line_count()), "undo");
    outcome_result(outcome, ws, before, "undo")
}

pub(crate) fn handle_redo(ws: &mut Workspace) -> DispatchResult {
    let before = ws.state.line_count();
    let outcome = ws.state.redo();
    tracing::trace!(target: "actions.dispatch", op = "redo", ?outcome, buffer_changed = (before != ws.state.line_count()), "redo");
    outcome_result(outcome, ws, before, "redo")
}
