//! Cursor motion helpers.
//!
//! These operate purely on a `Buffer` + `Position` pair and are free of global editor state.
//! Horizontal motions step whole grapheme clusters and wrap across line boundaries;
//! vertical motions keep the char column, clamped to the target line.

use crate::{Buffer, Position, grapheme};

/// Move left one grapheme. At column 0 wraps to the end of the previous line.
pub fn left(buf: &Buffer, pos: &mut Position) {
    if pos.col == 0 {
        if pos.line > 0 {
            pos.line -= 1;
            pos.col = buf.line_len(pos.line);
        }
        return;
    }
    let line = buf.line(pos.line).unwrap_or_default();
    pos.col = grapheme::prev_boundary(&line, pos.col);
}

/// Move right one grapheme. At line end wraps to the start of the next line.
pub fn right(buf: &Buffer, pos: &mut Position) {
    let len = buf.line_len(pos.line);
    if pos.col >= len {
        if pos.line + 1 < buf.line_count() {
            pos.line += 1;
            pos.col = 0;
        }
        return;
    }
    let line = buf.line(pos.line).unwrap_or_default();
    pos.col = grapheme::next_boundary(&line, pos.col);
}

/// Move to start of line.
pub fn line_start(_buf: &Buffer, pos: &mut Position) {
    pos.col = 0;
}

/// Move to end of line (after last grapheme).
pub fn line_end(buf: &Buffer, pos: &mut Position) {
    pos.col = buf.line_len(pos.line);
}

/// Move up one line, clamping the column to the target line.
pub fn up(buf: &Buffer, pos: &mut Position) {
    if pos.line == 0 {
        return;
    }
    pos.line -= 1;
    clamp_col(buf, pos);
}

/// Move down one line, clamping the column to the target line.
pub fn down(buf: &Buffer, pos: &mut Position) {
    if pos.line + 1 >= buf.line_count() {
        return;
    }
    pos.line += 1;
    clamp_col(buf, pos);
}

fn clamp_col(buf: &Buffer, pos: &mut Position) {
    let line = buf.line(pos.line).unwrap_or_default();
    let len = buf.line_len(pos.line);
    pos.col = grapheme::floor_boundary(&line, pos.col.min(len));
}
