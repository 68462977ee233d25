//! Suggestion review: preview a proposed batch as a diff, hold the editor
//! read-only while the user decides, then commit or discard.
//!
//! ```text
//! Idle --begin--> Reviewing(suggestion, diff) --accept--> Committed --> Idle
//!                                               \-reject/conflict--> Discarded --> Idle
//! ```
//!
//! A commit goes through `EditorState::apply_batch`, so an accepted suggestion is
//! exactly one undo step and a stale one never touches the buffer.

use core_diff::{DiffGenerator, DiffOptions, UnifiedDiff};
use core_patch::PatchError;
use core_state::{EditorState, StateError};
use thiserror::Error;
use tracing::{debug, info, warn};

mod suggestion;

pub use suggestion::{Suggestion, SuggestionKind, SuggestionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Committed,
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("suggestion {id} arrived while another suggestion is under review")]
    AlreadyReviewing { id: String },
    #[error("no suggestion is under review")]
    NotReviewing,
    #[error("suggestion {id} is not pending")]
    NotApplicable { id: String },
    #[error("suggestion {id} cannot be previewed: {source}")]
    Preview {
        id: String,
        #[source]
        source: PatchError,
    },
    #[error("suggestion {id} no longer applies: {source}")]
    Commit {
        id: String,
        #[source]
        source: StateError,
    },
}

/// A suggestion held for review together with its preview.
#[derive(Debug, Clone)]
pub struct PendingReview {
    pub suggestion: Suggestion,
    pub diff: UnifiedDiff,
}

#[derive(Debug, Default)]
pub struct SuggestionReview {
    /// `None` while idle.
    pending: Option<PendingReview>,
    generator: DiffGenerator,
    last_outcome: Option<ReviewOutcome>,
    /// Most recently concluded suggestion, with its final status.
    concluded: Option<Suggestion>,
}

impl SuggestionReview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diff_options(options: DiffOptions) -> Self {
        Self {
            generator: DiffGenerator::with_options(options),
            ..Self::default()
        }
    }

    pub fn pending(&self) -> Option<&PendingReview> {
        self.pending.as_ref()
    }

    pub fn is_reviewing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_diff(&self) -> Option<&UnifiedDiff> {
        self.pending.as_ref().map(|p| &p.diff)
    }

    pub fn pending_suggestion(&self) -> Option<&Suggestion> {
        self.pending.as_ref().map(|p| &p.suggestion)
    }

    pub fn last_outcome(&self) -> Option<ReviewOutcome> {
        self.last_outcome
    }

    pub fn last_suggestion(&self) -> Option<&Suggestion> {
        self.concluded.as_ref()
    }

    /// Preview `suggestion` against the editor's current content and lock the
    /// editor for review. A batch that does not apply is reported without
    /// locking anything.
    pub fn begin(
        &mut self,
        editor: &mut EditorState,
        mut suggestion: Suggestion,
    ) -> Result<&UnifiedDiff, ReviewError> {
        if let Some(current) = &self.pending {
            warn!(target: "review", incoming = %suggestion.id, current = %current.suggestion.id, "review_already_active");
            return Err(ReviewError::AlreadyReviewing { id: suggestion.id });
        }
        if suggestion.status != SuggestionStatus::Pending {
            return Err(ReviewError::NotApplicable { id: suggestion.id });
        }

        let diff = match self
            .generator
            .generate_from_edits(&editor.content(), &suggestion.proposed_changes)
        {
            Ok(diff) => diff,
            Err(source) => {
                warn!(target: "review", id = %suggestion.id, error = %source, "preview_failed");
                suggestion.mark_error(source.to_string());
                let id = suggestion.id.clone();
                self.concluded = Some(suggestion);
                return Err(ReviewError::Preview { id, source });
            }
        };

        let stats = diff.stats();
        info!(target: "review", id = %suggestion.id, edits = suggestion.proposed_changes.len(), additions = stats.additions, deletions = stats.deletions, "review_started");
        editor.lock_for_review(suggestion.proposed_changes.clone());
        editor.set_status_message(format!(
            "Reviewing {} (+{} -{})",
            suggestion.display_title(),
            stats.additions,
            stats.deletions
        ));
        let pending = self.pending.insert(PendingReview { suggestion, diff });
        Ok(&pending.diff)
    }

    /// Unlock and apply the reviewed batch as a single undoable edit. If the
    /// buffer drifted so the batch no longer matches, nothing is applied and the
    /// review ends as `Discarded`.
    pub fn accept(&mut self, editor: &mut EditorState) -> Result<ReviewOutcome, ReviewError> {
        let mut suggestion = self.take_reviewing()?;
        suggestion.mark_applying();
        editor.release_lock();
        match editor.apply_batch(&suggestion.proposed_changes) {
            Ok(()) => {
                info!(target: "review", id = %suggestion.id, "suggestion_committed");
                editor.set_status_message(format!("Applied {}", suggestion.display_title()));
                suggestion.mark_applied();
                Ok(self.conclude(suggestion, ReviewOutcome::Committed))
            }
            Err(source) => {
                warn!(target: "review", id = %suggestion.id, error = %source, "suggestion_conflict");
                editor.set_status_message(format!("Suggestion no longer applies: {source}"));
                suggestion.mark_error(source.to_string());
                let id = suggestion.id.clone();
                self.conclude(suggestion, ReviewOutcome::Discarded);
                Err(ReviewError::Commit { id, source })
            }
        }
    }

    /// Unlock without touching the buffer or its history.
    pub fn reject(&mut self, editor: &mut EditorState) -> Result<ReviewOutcome, ReviewError> {
        let mut suggestion = self.take_reviewing()?;
        editor.release_lock();
        info!(target: "review", id = %suggestion.id, "suggestion_rejected");
        editor.set_status_message(format!("Dismissed {}", suggestion.display_title()));
        suggestion.mark_dismissed();
        Ok(self.conclude(suggestion, ReviewOutcome::Discarded))
    }

    fn take_reviewing(&mut self) -> Result<Suggestion, ReviewError> {
        self.pending
            .take()
            .map(|p| p.suggestion)
            .ok_or(ReviewError::NotReviewing)
    }

    fn conclude(&mut self, suggestion: Suggestion, outcome: ReviewOutcome) -> ReviewOutcome {
        debug!(target: "review", id = %suggestion.id, ?outcome, status = ?suggestion.status, "review_concluded");
        self.concluded = Some(suggestion);
        self.last_outcome = Some(outcome);
        outcome
    }
}
