//! Batch application with offset accumulation.
//!
//! Every edit is resolved against the ORIGINAL content, then shifted by the
//! running sum of `len(new) - length` of the edits already applied. Work happens
//! on a private rope; the caller only sees the result once every edit succeeded.

use crate::{Edit, EditBatch, PatchError};
use core_text::{Buffer, Position};
use tracing::{debug, trace};

/// Absolute char offset of a 1-based (line, column) inside `buffer`.
///
/// Column `len + 1` addresses the end of the line. Returns `None` for line or
/// column 0, lines past the end, and columns beyond `len + 1`.
pub fn position_to_offset(buffer: &Buffer, line: usize, column: usize) -> Option<usize> {
    if line == 0 || column == 0 {
        return None;
    }
    buffer.checked_char_index(Position::new(line - 1, column - 1))
}

struct Applied {
    content: Buffer,
    // (final char offset, text now there, text it replaced)
    spans: Vec<(usize, String, String)>,
}

fn run(original: &str, batch: &EditBatch) -> Result<Applied, PatchError> {
    if batch.is_empty() {
        return Err(PatchError::EmptyBatch);
    }
    let base = Buffer::new(original);
    let mut work = base.clone();
    let mut offset: isize = 0;
    let mut spans = Vec::with_capacity(batch.len());

    for (index, edit) in batch.ordered() {
        let actual = edit.old_content.chars().count();
        if actual != edit.length {
            return Err(PatchError::LengthMismatch {
                index,
                line: edit.line,
                column: edit.column,
                length: edit.length,
                actual,
            });
        }
        let out_of_bounds = || PatchError::OutOfBounds {
            index,
            line: edit.line,
            column: edit.column,
        };
        let anchor = position_to_offset(&base, edit.line, edit.column).ok_or_else(out_of_bounds)?;
        let shifted = anchor as isize + offset;
        let total = work.char_count();
        if shifted < 0 || shifted as usize > total {
            return Err(out_of_bounds());
        }
        let start = shifted as usize;
        let exceeds = || PatchError::LengthExceedsContent {
            index,
            line: edit.line,
            column: edit.column,
            length: edit.length,
            available: total - start,
        };
        let end = start.checked_add(edit.length).ok_or_else(exceeds)?;
        if end > total {
            return Err(exceeds());
        }
        let found = work.slice(start, end);
        if found != edit.old_content {
            return Err(PatchError::ContentMismatch {
                index,
                line: edit.line,
                column: edit.column,
                expected: edit.old_content.clone(),
                found,
            });
        }
        work.remove(start, end);
        work.insert(start, &edit.new_content);
        offset += edit.delta();
        trace!(target: "patch.engine", index, line = edit.line, column = edit.column, start, offset, "edit_applied");
        spans.push((start, edit.new_content.clone(), found));
    }

    Ok(Applied {
        content: work,
        spans,
    })
}

fn logged(original: &str, batch: &EditBatch) -> Result<Applied, PatchError> {
    match run(original, batch) {
        Ok(applied) => {
            debug!(target: "patch.engine", edits = batch.len(), chars = applied.content.char_count(), "batch_applied");
            Ok(applied)
        }
        Err(err) => {
            debug!(target: "patch.engine", edits = batch.len(), index = ?err.edit_index(), error = %err, "batch_rejected");
            Err(err)
        }
    }
}

/// Apply `batch` to `original`, returning the new content. On any failure the
/// whole batch is rejected and no partial result escapes.
pub fn apply(original: &str, batch: &EditBatch) -> Result<String, PatchError> {
    logged(original, batch).map(|applied| applied.content.content())
}

/// Apply `batch` and also build the inverse batch. Inverse positions are stated
/// against the new content, so `apply(new, inverse)` reproduces `original`.
pub fn apply_with_inverse(
    original: &str,
    batch: &EditBatch,
) -> Result<(String, EditBatch), PatchError> {
    let applied = logged(original, batch)?;
    let inverse = applied
        .spans
        .into_iter()
        .map(|(start, now, was)| {
            let pos = applied.content.position_of(start);
            Edit::replace(pos.line + 1, pos.col + 1, now, was)
        })
        .collect();
    Ok((applied.content.content(), inverse))
}

/// Dry run: every check `apply` performs, without producing output.
pub fn validate(original: &str, batch: &EditBatch) -> Result<(), PatchError> {
    run(original, batch).map(|_| ())
}
