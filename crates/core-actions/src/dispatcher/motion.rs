//! Motion sub-dispatch: cursor movement and placeholder navigation.
//!
//! Movement is allowed while a suggestion is under review; nothing here mutates
//! the buffer.

use super::DispatchResult;
use crate::Workspace;
use core_state::Direction;

pub(crate) fn handle_move(direction: Direction, ws: &mut Workspace) -> DispatchResult {
    if ws.state.move_cursor(direction) {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}

pub(crate) fn handle_next_placeholder(ws: &mut Workspace) -> DispatchResult {
    focus_result(ws.state.next_placeholder(), ws, "next")
}

pub(crate) fn handle_previous_placeholder(ws: &mut Workspace) -> DispatchResult {
    focus_result(ws.state.previous_placeholder(), ws, "previous")
}

fn focus_result(index: Option<usize>, ws: &Workspace, dir: &'static str) -> DispatchResult {
    match index {
        Some(index) => {
            let name = ws
                .state
                .active_placeholder()
                .map(|p| p.name.as_str())
                .unwrap_or_default();
            tracing::trace!(target: "actions.dispatch", op = "placeholder_focus", dir, index, name, "motion");
            DispatchResult::dirty()
        }
        None => DispatchResult::clean(),
    }
}
