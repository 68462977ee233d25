//! Actions: the command surface over editor state and suggestion review.
//!
//! Front-ends translate their input into [`Action`] values and hand them to
//! [`Workspace::dispatch`]. Each action runs to completion before the next is
//! accepted; nothing here is shared across threads.

use core_config::Config;
use core_diff::DiffOptions;
use core_review::{Suggestion, SuggestionReview};
use core_state::{Direction, EditorOptions, EditorState, LineEnding};
use std::path::PathBuf;

mod dispatcher;
pub mod io_ops;

pub use dispatcher::{DispatchResult, dispatch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    InsertChar(char),
    InsertText(String),
    Newline,
    /// Next placeholder when any exist, otherwise indentation.
    Tab,
    Backspace,
    DeleteForward,
    Move(Direction),
    NextPlaceholder,
    PreviousPlaceholder,
    FillPlaceholder { index: usize, value: String },
    FillList { index: usize, items: Vec<String> },
    /// Stage text for a placeholder without writing it into the buffer.
    StagePlaceholder { index: usize, value: String },
    CommitPlaceholder(usize),
    Undo,
    Redo,
    ProposeSuggestion(Suggestion),
    AcceptSuggestion,
    RejectSuggestion,
}

/// Where the buffer came from and how to write it back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub path: Option<PathBuf>,
    pub line_ending: LineEnding,
}

/// One prompt being edited: its state, review machine and backing file.
pub struct Workspace {
    pub state: EditorState,
    pub review: SuggestionReview,
    pub document: Document,
}

impl Workspace {
    pub fn new(content: &str) -> Self {
        Self {
            state: EditorState::new(content),
            review: SuggestionReview::new(),
            document: Document::default(),
        }
    }

    pub fn from_config(content: &str, config: &Config) -> Self {
        let options = EditorOptions {
            tab_width: config.tab_width(),
            history_capacity: config.history_capacity(),
            viewport_height: config.viewport_height(),
            autosave_debounce: config.autosave_debounce(),
        };
        Self {
            state: EditorState::with_options(content, options),
            review: SuggestionReview::with_diff_options(DiffOptions {
                context_lines: config.diff_context_lines(),
            }),
            document: Document::default(),
        }
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.document = document;
        self
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        dispatch(action, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_carries_tunables() {
        let mut config = Config::default();
        config.file.editor.tab_width = 2;
        config.file.history.max_actions = 7;
        config.file.viewport.height = 10;
        config.file.diff.context_lines = Some(0);
        let ws = Workspace::from_config("", &config);
        let opts = ws.state.options();
        assert_eq!(opts.tab_width, 2);
        assert_eq!(opts.history_capacity, 7);
        assert_eq!(ws.state.viewport().height(), 10);
        assert_eq!(ws.state.undo_log().capacity(), 7);
    }

    #[test]
    fn workspace_starts_clean_and_unlocked() {
        let ws = Workspace::new("hello");
        assert!(!ws.state.is_dirty());
        assert!(!ws.state.is_locked());
        assert!(!ws.review.is_reviewing());
        assert_eq!(ws.document, Document::default());
    }
}
