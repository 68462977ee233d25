//! Property-based tests for batch application: inverse round-trip, atomicity,
//! and offset correctness.

use core_patch::{Edit, EditBatch, PatchError, apply, apply_with_inverse};
use core_text::Buffer;
use proptest::prelude::*;

/// Build non-overlapping edits over `original` from (gap, span, replacement) triples.
fn build_batch(original: &str, plan: &[(usize, usize, String)]) -> EditBatch {
    let buf = Buffer::new(original);
    let total = buf.char_count();
    let mut cursor = 0usize;
    let mut edits = Vec::new();
    for (gap, span, replacement) in plan {
        let start = (cursor + gap).min(total);
        let end = (start + span).min(total);
        let pos = buf.position_of(start);
        edits.push(Edit::replace(
            pos.line + 1,
            pos.col + 1,
            buf.slice(start, end),
            replacement.clone(),
        ));
        cursor = end;
    }
    EditBatch::new(edits)
}

fn plan_strategy() -> impl Strategy<Value = Vec<(usize, usize, String)>> {
    prop::collection::vec((0usize..5, 0usize..4, "[xyé\n]{0,4}"), 1..6)
}

proptest! {
    // Applying the inverse batch to the result reproduces the original exactly.
    #[test]
    fn inverse_round_trip(original in "[abc😀\n]{0,40}", plan in plan_strategy()) {
        let batch = build_batch(&original, &plan);
        let (new, inverse) = apply_with_inverse(&original, &batch).unwrap();
        prop_assert_eq!(apply(&new, &inverse).unwrap(), original);
    }

    // Reversing the supplied order never changes the result when positions are distinct.
    #[test]
    fn input_order_is_irrelevant_for_distinct_positions(original in "[abc\n]{1,40}", plan in plan_strategy()) {
        let batch = build_batch(&original, &plan);
        let mut keys: Vec<(usize, usize)> = batch.iter().map(|e| (e.line, e.column)).collect();
        keys.dedup();
        prop_assume!(keys.len() == batch.len());
        let reversed: EditBatch = batch.iter().rev().cloned().collect();
        prop_assert_eq!(apply(&original, &batch), apply(&original, &reversed));
    }

    // One stale edit rejects the whole batch.
    #[test]
    fn stale_edit_rejects_batch(original in "[abc\n]{1,40}", plan in plan_strategy(), pick in any::<prop::sample::Index>()) {
        let batch = build_batch(&original, &plan);
        prop_assume!(batch.len() >= 2);
        let victim = pick.index(batch.len());
        let mut edits = batch.edits().to_vec();
        // 'z' never occurs in the generated originals.
        edits[victim].old_content = "z".repeat(edits[victim].length.max(1));
        edits[victim].length = edits[victim].old_content.chars().count();
        let err = apply(&original, &EditBatch::new(edits)).unwrap_err();
        prop_assert!(!matches!(err, PatchError::EmptyBatch));
    }

    // A growing first edit never misplaces the second.
    #[test]
    fn growing_first_edit_keeps_second_in_place(prefix in "[ab]{1,6}", growth in "[xy]{0,12}", tail in "[ab]{1,6}") {
        let original = format!("{prefix} {tail}");
        let second_col = prefix.chars().count() + 2;
        let batch = EditBatch::new(vec![
            Edit::replace(1, 1, prefix.clone(), format!("{prefix}{growth}")),
            Edit::replace(1, second_col, tail.clone(), "T"),
        ]);
        prop_assert_eq!(apply(&original, &batch).unwrap(), format!("{prefix}{growth} T"));
    }
}
