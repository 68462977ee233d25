//! File IO helpers kept outside the dispatcher.
//!
//! The editor core only ever holds `\n`. Files are normalized on the way in and
//! re-expanded to their dominant original line ending on the way out. Writes and
//! reloads go through `EditorState::mark_saved` / `set_content`, so history
//! survives a save but not a reload.

use crate::{Document, Workspace};
use core_config::Config;
use core_state::{LineEnding, normalize_line_endings, restore_line_endings};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Result of attempting to open a file.
#[derive(Debug)]
pub enum OpenFileResult {
    Success(OpenSuccess),
    Error, // already logged under the `io` target
}

#[derive(Debug)]
pub struct OpenSuccess {
    /// LF-only content.
    pub content: String,
    pub file_name: PathBuf,
    pub original_line_ending: LineEnding,
    pub mixed_line_endings: bool,
}

impl OpenSuccess {
    pub fn document(&self) -> Document {
        Document {
            path: Some(self.file_name.clone()),
            line_ending: self.original_line_ending,
        }
    }
}

/// Read a file and normalize its line endings.
pub fn open_file(path: &Path) -> OpenFileResult {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let norm = normalize_line_endings(&content);
            if norm.mixed {
                tracing::warn!(target: "io", path = %path.display(), dominant = ?norm.original, "mixed_line_endings");
            }
            OpenFileResult::Success(OpenSuccess {
                content: norm.normalized,
                file_name: path.to_path_buf(),
                original_line_ending: norm.original,
                mixed_line_endings: norm.mixed,
            })
        }
        Err(e) => {
            tracing::error!(target: "io", path = %path.display(), ?e, "file_open_error");
            OpenFileResult::Error
        }
    }
}

/// Open `path` into a workspace configured from `config`.
pub fn open_workspace(path: &Path, config: &Config) -> Option<Workspace> {
    match open_file(path) {
        OpenFileResult::Success(opened) => {
            let document = opened.document();
            Some(Workspace::from_config(&opened.content, config).with_document(document))
        }
        OpenFileResult::Error => None,
    }
}

/// Result of a write attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum WriteFileResult {
    Success,
    NoFilename,
    Error,
}

/// Write the buffer to `target` (or the document's own path) with the
/// document's line endings restored.
pub fn write_file(ws: &mut Workspace, target: Option<&Path>) -> WriteFileResult {
    let path = if let Some(p) = target {
        p.to_path_buf()
    } else if let Some(existing) = ws.document.path.clone() {
        existing
    } else {
        return WriteFileResult::NoFilename;
    };
    let content = restore_line_endings(&ws.state.content(), ws.document.line_ending);
    match std::fs::write(&path, content.as_bytes()) {
        Ok(_) => {
            ws.state.mark_saved();
            tracing::debug!(target: "io", path = %path.display(), bytes = content.len(), "file_written");
            WriteFileResult::Success
        }
        Err(e) => {
            tracing::error!(target: "io", path = %path.display(), ?e, "file_write_error");
            WriteFileResult::Error
        }
    }
}

/// Write the buffer if unsaved changes have settled past the debounce window.
/// Returns `None` when nothing was due.
pub fn autosave_if_due(ws: &mut Workspace, now: Instant) -> Option<WriteFileResult> {
    if ws.document.path.is_none() || !ws.state.autosave_due(now) {
        return None;
    }
    tracing::trace!(target: "io", "autosave_due");
    Some(write_file(ws, None))
}

/// Replace the buffer with the file's current contents. History is dropped.
pub fn reload_file(ws: &mut Workspace) -> bool {
    let Some(path) = ws.document.path.clone() else {
        return false;
    };
    match open_file(&path) {
        OpenFileResult::Success(opened) => {
            ws.document.line_ending = opened.original_line_ending;
            ws.state.set_content(&opened.content);
            true
        }
        OpenFileResult::Error => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn open_file_normalizes_and_sets_metadata() {
        use std::io::Write;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        {
            let mut f = std::fs::File::create(&path).unwrap();
            write!(f, "line1\r\nline2\nline3\r\n").unwrap();
        }
        match open_file(&path) {
            OpenFileResult::Success(s) => {
                assert_eq!(s.content, "line1\nline2\nline3\n");
                assert!(s.mixed_line_endings, "should detect mixed endings");
                assert_eq!(s.original_line_ending, LineEnding::Crlf);
            }
            _ => panic!("expected success"),
        }
    }

    #[test]
    fn open_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            open_file(&dir.path().join("absent.md")),
            OpenFileResult::Error
        ));
    }

    #[test]
    fn write_file_preserves_original_style() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut ws = Workspace::new("a\nb\n").with_document(Document {
            path: Some(path.clone()),
            line_ending: LineEnding::Crlf,
        });
        ws.state.insert_char('>');
        let res = write_file(&mut ws, None);
        assert_eq!(res, WriteFileResult::Success);
        assert!(!ws.state.is_dirty(), "dirty cleared after write");
        assert!(ws.state.can_undo(), "history survives a save");
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, ">a\r\nb\r\n");
    }

    #[test]
    fn write_file_no_filename() {
        let mut ws = Workspace::new("x");
        ws.state.insert_char('y');
        let res = write_file(&mut ws, None);
        assert_eq!(res, WriteFileResult::NoFilename);
        assert!(ws.state.is_dirty(), "dirty unchanged when no filename");
    }

    #[test]
    fn autosave_writes_only_after_debounce() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auto.md");
        let mut ws = Workspace::new("").with_document(Document {
            path: Some(path.clone()),
            line_ending: LineEnding::Lf,
        });
        assert_eq!(autosave_if_due(&mut ws, Instant::now()), None);
        ws.state.insert_text("draft");
        assert_eq!(autosave_if_due(&mut ws, Instant::now()), None);
        let later = Instant::now() + Duration::from_secs(2);
        assert_eq!(autosave_if_due(&mut ws, later), Some(WriteFileResult::Success));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "draft");
        assert_eq!(autosave_if_due(&mut ws, later), None);
    }

    #[test]
    fn reload_replaces_content_and_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.md");
        std::fs::write(&path, "one").unwrap();
        let mut ws = open_workspace(&path, &Config::default()).unwrap();
        ws.state.insert_text("x");
        std::fs::write(&path, "two\r\nlines").unwrap();
        assert!(reload_file(&mut ws));
        assert_eq!(ws.state.content(), "two\nlines");
        assert_eq!(ws.document.line_ending, LineEnding::Crlf);
        assert!(!ws.state.can_undo());
        assert!(!ws.state.is_dirty());
    }
}
