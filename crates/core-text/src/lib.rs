//! Rope-based text buffer abstraction.
//!
//! Offsets exposed by this crate are always character (Unicode scalar value)
//! offsets, never bytes. Lines are separated by `\n` only; carriage returns
//! are stripped by line ending normalization before content reaches a buffer.

use ropey::Rope;

/// A text buffer backed by a `ropey::Rope`.
///
/// There is always at least one (possibly empty) line, and joining the lines
/// with `\n` reproduces `content()` exactly.
#[derive(Clone)]
pub struct Buffer {
    rope: Rope,
}

/// A position inside a buffer expressed as (line index, char column within that line),
/// both 0-based. Columns are kept on grapheme boundaries by higher-level navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
    pub fn origin() -> Self {
        Self { line: 0, col: 0 }
    }
    pub fn clamp_to<F>(&mut self, line_count: usize, mut line_len_fn: F)
    where
        F: FnMut(usize) -> usize,
    {
        if line_count == 0 {
            self.line = 0;
            self.col = 0;
            return;
        }
        if self.line >= line_count {
            self.line = line_count - 1;
        }
        let max_len = line_len_fn(self.line);
        if self.col > max_len {
            self.col = max_len;
        }
    }
}

pub mod motion;
pub mod width;

pub use width::egc_width;

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn new(content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
        }
    }

    /// Full canonical content.
    pub fn content(&self) -> String {
        self.rope.to_string()
    }

    /// Total number of lines in the buffer (never zero).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total number of chars, newlines included.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Return the requested line as an owned `String` without its trailing newline.
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx >= self.rope.len_lines() {
            return None;
        }
        let mut s = self.rope.line(idx).to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        Some(s)
    }

    /// Char length of a line (excluding any newline). Zero for lines past the end.
    pub fn line_len(&self, idx: usize) -> usize {
        if idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(idx);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    /// Absolute char offset of a position, or `None` when the line does not exist
    /// or the column lies past the end of the line.
    pub fn checked_char_index(&self, pos: Position) -> Option<usize> {
        if pos.line >= self.rope.len_lines() || pos.col > self.line_len(pos.line) {
            return None;
        }
        Some(self.rope.line_to_char(pos.line) + pos.col)
    }

    /// Absolute char offset of a position after clamping it into the buffer.
    pub fn char_index(&self, pos: Position) -> usize {
        let mut p = pos;
        p.clamp_to(self.line_count(), |l| self.line_len(l));
        self.rope.line_to_char(p.line) + p.col
    }

    /// Position of an absolute char offset (clamped to the end of the buffer).
    pub fn position_of(&self, char_idx: usize) -> Position {
        let idx = char_idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(idx);
        Position::new(line, idx - self.rope.line_to_char(line))
    }

    /// Text in the absolute char range `[start,end)` (clamped).
    pub fn slice(&self, start: usize, end: usize) -> String {
        let total = self.rope.len_chars();
        let s = start.min(total);
        let e = end.min(total);
        if s >= e {
            return String::new();
        }
        self.rope.slice(s..e).to_string()
    }

    /// Insert text at an absolute char offset (clamped to the end of the buffer).
    pub fn insert(&mut self, char_idx: usize, text: &str) {
        let at = char_idx.min(self.rope.len_chars());
        self.rope.insert(at, text);
    }

    /// Delete the absolute char range `[start,end)` (clamped).
    /// Returns the removed text for undo integration.
    pub fn remove(&mut self, start: usize, end: usize) -> String {
        let removed = self.slice(start, end);
        if !removed.is_empty() {
            let s = start.min(self.rope.len_chars());
            self.rope.remove(s..s + removed.chars().count());
        }
        removed
    }

    /// Replace the whole content.
    pub fn replace_all(&mut self, content: &str) {
        self.rope = Rope::from_str(content);
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new("")
    }
}

impl From<&str> for Buffer {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.line_count())
            .field("chars", &self.char_count())
            .finish()
    }
}

/// Grapheme and width utilities. These are pure helpers operating on a single line,
/// addressed by char column.
pub mod grapheme {
    use crate::egc_width;
    use unicode_segmentation::UnicodeSegmentation;

    /// Iterate grapheme clusters in a line.
    pub fn iter(line: &str) -> impl Iterator<Item = &str> {
        line.graphemes(true)
    }

    /// Char column of every cluster start, plus the line length as the final boundary.
    fn boundaries(line: &str) -> impl Iterator<Item = usize> + '_ {
        let total = line.chars().count();
        line.graphemes(true)
            .scan(0usize, |col, g| {
                let start = *col;
                *col += g.chars().count();
                Some(start)
            })
            .chain(std::iter::once(total))
    }

    /// Previous grapheme boundary (returns 0 if already at or below the first boundary).
    pub fn prev_boundary(line: &str, col: usize) -> usize {
        if col == 0 {
            return 0;
        }
        let mut last = 0;
        for b in boundaries(line) {
            if b >= col {
                break;
            }
            last = b;
        }
        last
    }

    /// Next grapheme boundary (returns the line length if at or beyond end).
    pub fn next_boundary(line: &str, col: usize) -> usize {
        let total = line.chars().count();
        if col >= total {
            return total;
        }
        boundaries(line).find(|b| *b > col).unwrap_or(total)
    }

    /// Snap a column down onto the nearest grapheme boundary at or before it.
    pub fn floor_boundary(line: &str, col: usize) -> usize {
        let mut last = 0;
        for b in boundaries(line) {
            if b > col {
                break;
            }
            last = b;
        }
        last
    }

    /// Compute visual column (terminal cells) up to (but not including) char column.
    pub fn visual_col(line: &str, col: usize) -> usize {
        let mut cells = 0;
        let mut at = 0;
        for g in line.graphemes(true) {
            if at >= col {
                break;
            }
            cells += egc_width(g) as usize;
            at += g.chars().count();
        }
        cells
    }

    /// Width in terminal cells of this grapheme cluster.
    pub fn cluster_width(g: &str) -> usize {
        egc_width(g) as usize
    }
}
