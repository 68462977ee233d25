//! Positional, content-verified edits and the batch patch engine.
//!
//! An [`Edit`] names a 1-based (line, column) position, the exact text expected
//! there, and its replacement. Positions inside an [`EditBatch`] are always
//! stated against the buffer the batch was computed from; the engine keeps a
//! running char offset so earlier edits that grow or shrink the text never
//! misplace later ones. Application is all-or-nothing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod engine;

pub use engine::{apply, apply_with_inverse, position_to_offset, validate};

/// Replace `length` chars at (`line`, `column`), which must currently read
/// `old_content`, with `new_content`.
///
/// Field names follow the JSON shape produced by suggestion providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    /// 1-based line.
    pub line: usize,
    /// 1-based char column.
    pub column: usize,
    #[serde(default)]
    pub old_content: String,
    #[serde(default)]
    pub new_content: String,
    /// Chars covered by the edit. Must equal the char length of `old_content`;
    /// the engine rejects the batch otherwise.
    #[serde(default)]
    pub length: usize,
}

impl Edit {
    /// Replacement whose `length` is derived from `old_content`.
    pub fn replace(
        line: usize,
        column: usize,
        old_content: impl Into<String>,
        new_content: impl Into<String>,
    ) -> Self {
        let old_content = old_content.into();
        let length = old_content.chars().count();
        Self {
            line,
            column,
            old_content,
            new_content: new_content.into(),
            length,
        }
    }

    /// Pure insertion at (`line`, `column`).
    pub fn insert(line: usize, column: usize, text: impl Into<String>) -> Self {
        Self::replace(line, column, String::new(), text)
    }

    /// Net change in char count once applied.
    pub fn delta(&self) -> isize {
        self.new_content.chars().count() as isize - self.length as isize
    }
}

/// A set of edits proposed together and applied atomically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditBatch {
    edits: Vec<Edit>,
}

impl EditBatch {
    pub fn new(edits: Vec<Edit>) -> Self {
        Self { edits }
    }

    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edit> {
        self.edits.iter()
    }

    /// Edits in application order: ascending (line, column), ties in input
    /// order. Each entry carries its index in the caller's batch.
    pub fn ordered(&self) -> Vec<(usize, &Edit)> {
        let mut ordered: Vec<(usize, &Edit)> = self.edits.iter().enumerate().collect();
        ordered.sort_by_key(|(_, e)| (e.line, e.column));
        ordered
    }
}

impl From<Vec<Edit>> for EditBatch {
    fn from(edits: Vec<Edit>) -> Self {
        Self::new(edits)
    }
}

impl FromIterator<Edit> for EditBatch {
    fn from_iter<I: IntoIterator<Item = Edit>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for EditBatch {
    type Item = Edit;
    type IntoIter = std::vec::IntoIter<Edit>;
    fn into_iter(self) -> Self::IntoIter {
        self.edits.into_iter()
    }
}

impl<'a> IntoIterator for &'a EditBatch {
    type Item = &'a Edit;
    type IntoIter = std::slice::Iter<'a, Edit>;
    fn into_iter(self) -> Self::IntoIter {
        self.edits.iter()
    }
}

/// Reasons a batch cannot be applied. `index` is the failing edit's position in
/// the batch as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("edit batch is empty")]
    EmptyBatch,
    #[error("edit {index} at {line}:{column} is out of bounds")]
    OutOfBounds {
        index: usize,
        line: usize,
        column: usize,
    },
    #[error(
        "edit {index} at {line}:{column} declares length {length} but old content has {actual} chars"
    )]
    LengthMismatch {
        index: usize,
        line: usize,
        column: usize,
        length: usize,
        actual: usize,
    },
    #[error(
        "edit {index} at {line}:{column} spans {length} chars but only {available} remain"
    )]
    LengthExceedsContent {
        index: usize,
        line: usize,
        column: usize,
        length: usize,
        available: usize,
    },
    #[error(
        "edit {index} at {line}:{column}: old content mismatch (expected {expected:?}, found {found:?})"
    )]
    ContentMismatch {
        index: usize,
        line: usize,
        column: usize,
        expected: String,
        found: String,
    },
}

impl PatchError {
    /// Index of the offending edit, if the error is tied to one.
    pub fn edit_index(&self) -> Option<usize> {
        match self {
            PatchError::EmptyBatch => None,
            PatchError::OutOfBounds { index, .. }
            | PatchError::LengthMismatch { index, .. }
            | PatchError::LengthExceedsContent { index, .. }
            | PatchError::ContentMismatch { index, .. } => Some(*index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_derives_length_in_chars() {
        let e = Edit::replace(1, 1, "héllo", "x");
        assert_eq!(e.length, 5);
        assert_eq!(e.delta(), -4);
    }

    #[test]
    fn ordered_sorts_by_position_and_keeps_ties_stable() {
        let batch = EditBatch::new(vec![
            Edit::insert(2, 1, "c"),
            Edit::insert(1, 3, "b"),
            Edit::insert(1, 3, "b2"),
            Edit::insert(1, 1, "a"),
        ]);
        let order: Vec<usize> = batch.ordered().into_iter().map(|(i, _)| i).collect();
        assert_eq!(order, vec![3, 1, 2, 0]);
    }

    #[test]
    fn batch_deserializes_from_provider_json() {
        let json = r#"[
            {"line": 1, "column": 7, "old_content": "world", "new_content": "there", "length": 5},
            {"line": 2, "column": 1, "new_content": "tail"}
        ]"#;
        let batch: EditBatch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.edits()[0], Edit::replace(1, 7, "world", "there"));
        assert_eq!(batch.edits()[1], Edit::insert(2, 1, "tail"));
    }

    #[test]
    fn error_exposes_edit_index() {
        let err = PatchError::ContentMismatch {
            index: 3,
            line: 1,
            column: 1,
            expected: "a".into(),
            found: "b".into(),
        };
        assert_eq!(err.edit_index(), Some(3));
        assert_eq!(PatchError::EmptyBatch.edit_index(), None);
        assert!(err.to_string().contains("old content mismatch"));
    }
}
