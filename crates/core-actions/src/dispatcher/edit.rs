//! Text edit action handling (insert/backspace/delete/newline/tab and
//! placeholder fills).
//!
//! All offsets and deletions run on grapheme boundaries inside `EditorState`;
//! this layer only picks the operation and reports render hints.

use super::{DispatchResult, outcome_result};
use crate::{Action, Workspace};
use core_state::PlaceholderValue;

pub(crate) fn handle_edit(action: Action, ws: &mut Workspace) -> DispatchResult {
    let lines_before = ws.state.line_count();
    let before = ws.state.cursor();
    let (op, outcome) = match action {
        Action::InsertChar(c) => ("insert_char", ws.state.insert_char(c)),
        Action::InsertText(text) => ("insert_text", ws.state.insert_text(&text)),
        Action::Newline => ("insert_newline", ws.state.insert_newline()),
        Action::Tab => ("tab", ws.state.insert_tab()),
        Action::Backspace => ("backspace", ws.state.backspace()),
        Action::DeleteForward => ("delete_forward", ws.state.delete_forward()),
        Action::FillPlaceholder { index, value } => (
            "fill_placeholder",
            ws.state.fill_placeholder(index, &PlaceholderValue::Text(value)),
        ),
        Action::FillList { index, items } => (
            "fill_list",
            ws.state.fill_list_placeholder(index, items),
        ),
        Action::StagePlaceholder { index, value } => (
            "stage_placeholder",
            ws.state.stage_placeholder_value(index, value),
        ),
        Action::CommitPlaceholder(index) => {
            ("commit_placeholder", ws.state.commit_placeholder(index))
        }
        other => {
            tracing::warn!(target: "actions.dispatch", action = ?other, "edit_handler_unexpected_action");
            return DispatchResult::clean();
        }
    };
    let after = ws.state.cursor();
    tracing::trace!(target: "actions.dispatch", op, ?outcome, line = before.line, col = before.col, to_line = after.line, to_col = after.col, "edit");
    outcome_result(outcome, ws, lines_before, op)
}

#[cfg(test)]
mod tests {
    use crate::{Action, DispatchResult, Workspace};

    #[test]
    fn tab_without_placeholders_indents() {
        let mut ws = Workspace::new("x");
        assert_eq!(ws.dispatch(Action::Tab), DispatchResult::dirty());
        assert_eq!(ws.state.content(), "    x");
    }

    #[test]
    fn fill_list_is_structural() {
        let mut ws = Workspace::new("Do:\n{{list:steps}}");
        let res = ws.dispatch(Action::FillList {
            index: 0,
            items: vec!["a".into(), "b".into()],
        });
        assert!(res.buffer_replaced);
        assert_eq!(ws.state.content(), "Do:\n- a\n- b");
    }

    #[test]
    fn stage_then_commit_fills_text() {
        let mut ws = Workspace::new("Hi {{text:who}}");
        ws.dispatch(Action::StagePlaceholder {
            index: 0,
            value: "team".into(),
        });
        assert_eq!(ws.state.content(), "Hi {{text:who}}");
        ws.dispatch(Action::CommitPlaceholder(0));
        assert_eq!(ws.state.content(), "Hi team");
    }

    #[test]
    fn fill_unknown_index_is_clean() {
        let mut ws = Workspace::new("plain");
        let res = ws.dispatch(Action::FillPlaceholder {
            index: 0,
            value: "x".into(),
        });
        assert_eq!(res, DispatchResult::clean());
    }
}
