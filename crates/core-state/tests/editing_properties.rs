//! Property-based tests for editor history: undo inverts, redo replays, and the
//! review lock freezes the buffer.

use core_patch::{Edit, EditBatch};
use core_state::{Direction, EditOutcome, EditorState, PlaceholderValue};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Type(String),
    Newline,
    Tab,
    Backspace,
    Delete,
    Move(Direction),
    Fill(String),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-zé😀 ]{1,3}".prop_map(Op::Type),
        Just(Op::Newline),
        Just(Op::Tab),
        Just(Op::Backspace),
        Just(Op::Delete),
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
            Just(Direction::LineStart),
            Just(Direction::LineEnd),
        ]
        .prop_map(Op::Move),
        "[a-z]{0,4}".prop_map(Op::Fill),
    ]
}

/// Apply `op`; returns true when it recorded a history entry.
fn run(state: &mut EditorState, op: &Op) -> bool {
    let outcome = match op {
        Op::Type(s) => state.insert_text(s),
        Op::Newline => state.insert_newline(),
        Op::Tab => state.insert_tab(),
        Op::Backspace => state.backspace(),
        Op::Delete => state.delete_forward(),
        Op::Move(d) => {
            state.move_cursor(*d);
            EditOutcome::Moved
        }
        Op::Fill(v) => state.fill_placeholder(0, &PlaceholderValue::Text(v.clone())),
    };
    outcome.changed_buffer()
}

fn seed() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ab\n]{0,12}",
        Just("Dear {{text:name}},\n{{list:points}}\nbye".to_string()),
    ]
}

proptest! {
    // Undoing every recorded mutation returns to the starting text and cursor,
    // and redoing them all returns to the final text and cursor.
    #[test]
    fn undo_then_redo_is_identity(initial in seed(), ops in prop::collection::vec(op_strategy(), 1..30)) {
        let mut state = EditorState::new(&initial);
        let start = (state.content(), state.cursor());
        let mut recorded = 0usize;
        let mut first_before = None;
        for op in &ops {
            let before = state.cursor();
            if run(&mut state, op) {
                recorded += 1;
                first_before.get_or_insert(before);
            }
        }
        prop_assume!(recorded > 0 && recorded <= state.undo_log().capacity());
        let end = (state.content(), state.cursor());

        for _ in 0..recorded {
            prop_assert_eq!(state.undo(), EditOutcome::Applied);
        }
        prop_assert_eq!(state.undo(), EditOutcome::Unchanged);
        prop_assert_eq!(state.content(), start.0);
        prop_assert_eq!(Some(state.cursor()), first_before);

        for _ in 0..recorded {
            prop_assert_eq!(state.redo(), EditOutcome::Applied);
        }
        prop_assert_eq!((state.content(), state.cursor()), end);
    }

    // While locked for review no mutation changes content or history.
    #[test]
    fn lock_freezes_buffer(initial in seed(), ops in prop::collection::vec(op_strategy(), 1..20)) {
        let mut state = EditorState::new(&initial);
        state.lock_for_review(EditBatch::new(vec![Edit::insert(1, 1, "x")]));
        let content = state.content();
        for op in &ops {
            prop_assert!(!run(&mut state, op));
        }
        prop_assert_eq!(state.content(), content);
        prop_assert!(!state.can_undo());
        prop_assert!(!state.is_dirty());
    }

    // Placeholders always describe the current text.
    #[test]
    fn placeholders_track_content(initial in seed(), ops in prop::collection::vec(op_strategy(), 0..20)) {
        let mut state = EditorState::new(&initial);
        for op in &ops {
            run(&mut state, op);
        }
        let chars: Vec<char> = state.content().chars().collect();
        for p in state.placeholders() {
            let token: String = chars[p.start..p.end].iter().collect();
            let expected = format!("{{{{{}:{}}}}}", p.raw_type, p.name);
            prop_assert_eq!(token, expected);
        }
        let cursor = state.cursor();
        prop_assert!(cursor.line < state.line_count());
        prop_assert!(cursor.col <= state.buffer().line_len(cursor.line));
    }
}
