//! Suggestion review actions. Failures never abort dispatch: they are logged,
//! shown on the status line, and reported as a redraw.

use super::DispatchResult;
use crate::Workspace;
use core_review::{ReviewError, ReviewOutcome, Suggestion};

pub(crate) fn handle_propose(suggestion: Suggestion, ws: &mut Workspace) -> DispatchResult {
    let id = suggestion.id.clone();
    match ws.review.begin(&mut ws.state, suggestion) {
        Ok(diff) => {
            tracing::debug!(target: "actions.dispatch", op = "propose_suggestion", id, hunks = diff.hunks.len(), "review");
            DispatchResult::dirty()
        }
        Err(err) => report(err, ws, "propose_suggestion"),
    }
}

pub(crate) fn handle_accept(ws: &mut Workspace) -> DispatchResult {
    match ws.review.accept(&mut ws.state) {
        Ok(ReviewOutcome::Committed) => DispatchResult::buffer_replaced(),
        Ok(ReviewOutcome::Discarded) => DispatchResult::dirty(),
        Err(err) => report(err, ws, "accept_suggestion"),
    }
}

pub(crate) fn handle_reject(ws: &mut Workspace) -> DispatchResult {
    match ws.review.reject(&mut ws.state) {
        Ok(_) => DispatchResult::dirty(),
        Err(err) => report(err, ws, "reject_suggestion"),
    }
}

fn report(err: ReviewError, ws: &mut Workspace, op: &'static str) -> DispatchResult {
    tracing::warn!(target: "actions.dispatch", op, error = %err, "review_action_failed");
    match err {
        // the review machine already explained the conflict on the status line
        ReviewError::Commit { .. } => {}
        other => ws.state.set_status_message(other.to_string()),
    }
    DispatchResult::dirty()
}

#[cfg(test)]
mod tests {
    use crate::{Action, Workspace};
    use core_patch::{Edit, EditBatch};
    use core_review::{ReviewOutcome, Suggestion, SuggestionKind};

    fn suggestion() -> Suggestion {
        Suggestion::new(
            "s-1",
            SuggestionKind::Formatting,
            "Add heading",
            "",
            EditBatch::new(vec![Edit::insert(1, 1, "# Task\n")]),
        )
    }

    #[test]
    fn propose_locks_and_accept_commits() {
        let mut ws = Workspace::new("Summarize this.");
        let res = ws.dispatch(Action::ProposeSuggestion(suggestion()));
        assert!(res.locked);
        let res = ws.dispatch(Action::InsertChar('x'));
        assert!(res.locked);
        assert_eq!(ws.state.content(), "Summarize this.");
        let res = ws.dispatch(Action::AcceptSuggestion);
        assert!(res.buffer_replaced);
        assert!(!res.locked);
        assert_eq!(ws.state.content(), "# Task\nSummarize this.");
        assert_eq!(ws.review.last_outcome(), Some(ReviewOutcome::Committed));
    }

    #[test]
    fn accept_without_review_sets_status() {
        let mut ws = Workspace::new("x");
        let res = ws.dispatch(Action::AcceptSuggestion);
        assert!(res.dirty && !res.locked);
        assert_eq!(ws.state.status_message(), Some("no suggestion is under review"));
    }
}
