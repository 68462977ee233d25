//! Display-oriented unified diffs.
//!
//! The renderer walks both texts line by line with a greedy scan: equal lines
//! become context, the first mismatch becomes one deletion plus (when the new
//! side still has lines) one addition, and that closes a hunk. This does not
//! re-synchronize after shifted blocks the way an LCS diff would, so inserted
//! blocks are reported as a run of changed lines. Trailing context with no
//! change after it does not form a hunk.
//!
//! The textual form produced by [`format`] is for people to read; nothing
//! parses it back.

use core_patch::{EditBatch, PatchError};
use std::fmt::Write as _;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineKind {
    Context,
    Addition,
    Deletion,
}

impl DiffLineKind {
    pub fn prefix(self) -> char {
        match self {
            DiffLineKind::Context => ' ',
            DiffLineKind::Addition => '+',
            DiffLineKind::Deletion => '-',
        }
    }
}

/// One classified line. `line_number` is 1-based: the old-side number for
/// context and deletions, the new-side number for additions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub content: String,
    pub line_number: usize,
}

/// A contiguous region of the diff. `old_len` counts context plus deletions,
/// `new_len` counts context plus additions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
    pub lines: Vec<DiffLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnifiedDiff {
    pub header: String,
    pub hunks: Vec<Hunk>,
}

impl UnifiedDiff {
    /// True when the two texts had no line-level difference.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    pub fn stats(&self) -> DiffStats {
        let mut stats = DiffStats::default();
        for line in self.hunks.iter().flat_map(|h| h.lines.iter()) {
            match line.kind {
                DiffLineKind::Addition => stats.additions += 1,
                DiffLineKind::Deletion => stats.deletions += 1,
                DiffLineKind::Context => {}
            }
        }
        stats
    }
}

/// Added/removed line totals for a review summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffOptions {
    /// Keep at most this many context lines in front of each change.
    /// `None` keeps every unchanged line since the previous hunk.
    pub context_lines: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct DiffGenerator {
    options: DiffOptions,
}

impl DiffGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DiffOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> DiffOptions {
        self.options
    }

    /// Line-level diff of `before` against `after`.
    pub fn render(&self, before: &str, after: &str) -> UnifiedDiff {
        let old: Vec<&str> = before.split('\n').collect();
        let new: Vec<&str> = after.split('\n').collect();
        let mut hunks = Vec::new();
        let mut pending: Vec<DiffLine> = Vec::new();
        let (mut i, mut j) = (0usize, 0usize);
        let mut entry = (1usize, 1usize);

        while i < old.len() && j < new.len() {
            if pending.is_empty() {
                entry = (i + 1, j + 1);
            }
            if old[i] == new[j] {
                pending.push(line(DiffLineKind::Context, old[i], i + 1));
                i += 1;
                j += 1;
                continue;
            }
            pending.push(line(DiffLineKind::Deletion, old[i], i + 1));
            i += 1;
            pending.push(line(DiffLineKind::Addition, new[j], j + 1));
            j += 1;
            hunks.push(self.close(entry, std::mem::take(&mut pending)));
        }

        if i < old.len() || j < new.len() {
            if pending.is_empty() {
                entry = (i + 1, j + 1);
            }
            for (k, text) in old.iter().enumerate().skip(i) {
                pending.push(line(DiffLineKind::Deletion, text, k + 1));
            }
            for (k, text) in new.iter().enumerate().skip(j) {
                pending.push(line(DiffLineKind::Addition, text, k + 1));
            }
            hunks.push(self.close(entry, pending));
        }

        debug!(target: "diff.render", old_lines = old.len(), new_lines = new.len(), hunks = hunks.len(), "diff_rendered");
        UnifiedDiff {
            header: header(old.len(), new.len()),
            hunks,
        }
    }

    /// Apply `batch` to `original` through the patch engine, then diff the two.
    pub fn generate_from_edits(
        &self,
        original: &str,
        batch: &EditBatch,
    ) -> Result<UnifiedDiff, PatchError> {
        let updated = core_patch::apply(original, batch)?;
        Ok(self.render(original, &updated))
    }

    fn close(&self, (mut old_start, mut new_start): (usize, usize), mut lines: Vec<DiffLine>) -> Hunk {
        if let Some(keep) = self.options.context_lines {
            let leading = lines
                .iter()
                .take_while(|l| l.kind == DiffLineKind::Context)
                .count();
            if leading > keep {
                let drop = leading - keep;
                lines.drain(..drop);
                old_start += drop;
                new_start += drop;
            }
        }
        let mut old_len = 0;
        let mut new_len = 0;
        for l in &lines {
            match l.kind {
                DiffLineKind::Context => {
                    old_len += 1;
                    new_len += 1;
                }
                DiffLineKind::Deletion => old_len += 1,
                DiffLineKind::Addition => new_len += 1,
            }
        }
        Hunk {
            old_start,
            old_len,
            new_start,
            new_len,
            lines,
        }
    }
}

fn line(kind: DiffLineKind, content: &str, line_number: usize) -> DiffLine {
    DiffLine {
        kind,
        content: content.to_string(),
        line_number,
    }
}

fn header(old_lines: usize, new_lines: usize) -> String {
    format!("--- original ({old_lines} lines)\n+++ new ({new_lines} lines)")
}

/// Diff with default options (all context kept).
pub fn render(before: &str, after: &str) -> UnifiedDiff {
    DiffGenerator::new().render(before, after)
}

/// Apply then diff with default options.
pub fn generate_from_edits(original: &str, batch: &EditBatch) -> Result<UnifiedDiff, PatchError> {
    DiffGenerator::new().generate_from_edits(original, batch)
}

/// Human-readable unified form: header, blank line, then each hunk's
/// `@@ -o,l +n,l @@` line, its prefixed lines, and a blank separator.
pub fn format(diff: &UnifiedDiff) -> String {
    let mut out = String::new();
    out.push_str(&diff.header);
    out.push_str("\n\n");
    for hunk in &diff.hunks {
        let _ = writeln!(
            out,
            "@@ -{},{} +{},{} @@",
            hunk.old_start, hunk.old_len, hunk.new_start, hunk.new_len
        );
        for l in &hunk.lines {
            out.push(l.kind.prefix());
            out.push_str(&l.content);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_patch::Edit;
    use pretty_assertions::assert_eq;

    fn kinds(h: &Hunk) -> Vec<DiffLineKind> {
        h.lines.iter().map(|l| l.kind).collect()
    }

    #[test]
    fn single_line_change_is_one_hunk() {
        let diff = render("Hello world", "Hello there");
        assert_eq!(diff.hunks.len(), 1);
        let h = &diff.hunks[0];
        assert_eq!(kinds(h), vec![DiffLineKind::Deletion, DiffLineKind::Addition]);
        assert_eq!(h.lines[0].content, "Hello world");
        assert_eq!(h.lines[1].content, "Hello there");
        assert_eq!((h.old_start, h.old_len, h.new_start, h.new_len), (1, 1, 1, 1));
    }

    #[test]
    fn identical_texts_have_no_hunks() {
        let diff = render("a\nb\nc", "a\nb\nc");
        assert!(diff.is_empty());
        assert_eq!(diff.header, "--- original (3 lines)\n+++ new (3 lines)");
    }

    #[test]
    fn hunk_carries_leading_context_and_entry_positions() {
        let diff = render("a\nb\nc\nd", "a\nb\nX\nd");
        assert_eq!(diff.hunks.len(), 1);
        let h = &diff.hunks[0];
        assert_eq!(
            kinds(h),
            vec![
                DiffLineKind::Context,
                DiffLineKind::Context,
                DiffLineKind::Deletion,
                DiffLineKind::Addition
            ]
        );
        assert_eq!((h.old_start, h.old_len, h.new_start, h.new_len), (1, 3, 1, 3));
        let numbers: Vec<usize> = h.lines.iter().map(|l| l.line_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 3]);
    }

    #[test]
    fn second_hunk_starts_after_first() {
        let diff = render("a\nb\nc\nd", "A\nb\nc\nD");
        assert_eq!(diff.hunks.len(), 2);
        let second = &diff.hunks[1];
        assert_eq!((second.old_start, second.new_start), (2, 2));
        assert_eq!((second.old_len, second.new_len), (3, 3));
    }

    #[test]
    fn trailing_deletions_form_final_hunk() {
        let diff = render("a\nb\nc", "a");
        assert_eq!(diff.hunks.len(), 1);
        let h = &diff.hunks[0];
        assert_eq!(
            kinds(h),
            vec![DiffLineKind::Context, DiffLineKind::Deletion, DiffLineKind::Deletion]
        );
        assert_eq!((h.old_start, h.old_len, h.new_start, h.new_len), (1, 3, 1, 1));
    }

    #[test]
    fn trailing_additions_form_final_hunk() {
        let diff = render("a", "a\nb\nc");
        let h = &diff.hunks[0];
        assert_eq!(
            kinds(h),
            vec![DiffLineKind::Context, DiffLineKind::Addition, DiffLineKind::Addition]
        );
        let numbers: Vec<usize> = h.lines.iter().map(|l| l.line_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(diff.stats(), DiffStats { additions: 2, deletions: 0 });
    }

    #[test]
    fn shifted_insert_over_reports_changes() {
        let diff = render("a\nb", "new\na\nb");
        let stats = diff.stats();
        assert_eq!(stats.deletions, 2);
        assert_eq!(stats.additions, 3);
    }

    #[test]
    fn context_lines_option_trims_leading_context() {
        let g = DiffGenerator::with_options(DiffOptions {
            context_lines: Some(1),
        });
        let diff = g.render("1\n2\n3\n4\n5", "1\n2\n3\n4\nX");
        let h = &diff.hunks[0];
        assert_eq!(h.lines.len(), 3);
        assert_eq!(h.lines[0].content, "4");
        assert_eq!((h.old_start, h.old_len, h.new_start, h.new_len), (4, 2, 4, 2));
    }

    #[test]
    fn generate_from_edits_applies_then_renders() {
        let batch = EditBatch::new(vec![Edit::replace(1, 7, "world", "there")]);
        let diff = generate_from_edits("Hello world", &batch).unwrap();
        assert_eq!(diff.stats(), DiffStats { additions: 1, deletions: 1 });
    }

    #[test]
    fn generate_from_edits_propagates_patch_error() {
        let batch = EditBatch::new(vec![Edit::replace(1, 1, "nope", "x")]);
        assert!(matches!(
            generate_from_edits("Hello", &batch),
            Err(PatchError::ContentMismatch { .. })
        ));
    }

    #[test]
    fn format_writes_header_hunks_and_prefixes() {
        let diff = render("keep\nold", "keep\nnew");
        let text = format(&diff);
        assert_eq!(
            text,
            "--- original (2 lines)\n+++ new (2 lines)\n\n@@ -1,2 +1,2 @@\n keep\n-old\n+new\n\n"
        );
    }
}
