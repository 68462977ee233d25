use core_patch::EditBatch;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Recommendation,
    Gap,
    Formatting,
    Contradiction,
    Clarity,
    Reformatting,
}

impl SuggestionKind {
    pub fn label(self) -> &'static str {
        match self {
            SuggestionKind::Recommendation => "Recommendation",
            SuggestionKind::Gap => "Gap Analysis",
            SuggestionKind::Formatting => "Formatting",
            SuggestionKind::Contradiction => "Contradiction",
            SuggestionKind::Clarity => "Clarity",
            SuggestionKind::Reformatting => "Reformatting",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    #[default]
    Pending,
    Applying,
    Applied,
    Dismissed,
    Error,
}

/// A proposed change to the prompt, as delivered by a suggestion provider.
///
/// ```json
/// { "id": "s-1", "type": "clarity", "title": "Name the audience",
///   "description": "...", "status": "pending",
///   "proposed_changes": [ { "line": 1, "column": 7, "old_content": "world",
///                           "new_content": "there", "length": 5 } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub proposed_changes: EditBatch,
    #[serde(default)]
    pub status: SuggestionStatus,
    /// Set when `status` is `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Suggestion {
    pub fn new(
        id: impl Into<String>,
        kind: SuggestionKind,
        title: impl Into<String>,
        description: impl Into<String>,
        proposed_changes: EditBatch,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            description: description.into(),
            proposed_changes,
            status: SuggestionStatus::Pending,
            error: None,
        }
    }

    /// Pending with at least one edit.
    pub fn is_applicable(&self) -> bool {
        self.status == SuggestionStatus::Pending && !self.proposed_changes.is_empty()
    }

    pub fn display_title(&self) -> String {
        format!("[{}] {}", self.kind.label(), self.title)
    }

    pub(crate) fn mark_applying(&mut self) {
        self.status = SuggestionStatus::Applying;
    }
    pub(crate) fn mark_applied(&mut self) {
        self.status = SuggestionStatus::Applied;
        self.error = None;
    }
    pub(crate) fn mark_dismissed(&mut self) {
        self.status = SuggestionStatus::Dismissed;
    }
    pub(crate) fn mark_error(&mut self, message: String) {
        self.status = SuggestionStatus::Error;
        self.error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_patch::Edit;

    #[test]
    fn deserializes_provider_json() {
        let json = r#"{
            "id": "s-1",
            "type": "contradiction",
            "title": "Pick one tone",
            "proposed_changes": [
                {"line": 2, "column": 1, "old_content": "casual", "new_content": "formal", "length": 6}
            ]
        }"#;
        let s: Suggestion = serde_json::from_str(json).unwrap();
        assert_eq!(s.kind, SuggestionKind::Contradiction);
        assert_eq!(s.status, SuggestionStatus::Pending);
        assert_eq!(s.description, "");
        assert_eq!(s.proposed_changes.len(), 1);
        assert_eq!(s.proposed_changes.edits()[0].old_content, "casual");
        assert!(s.is_applicable());
    }

    #[test]
    fn error_field_only_serialized_when_set() {
        let mut s = Suggestion::new(
            "s-2",
            SuggestionKind::Gap,
            "Add context",
            "",
            EditBatch::new(vec![Edit::insert(1, 1, "Context: ")]),
        );
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains(r#""type":"gap""#));
        assert!(!json.contains("error"));
        s.mark_error("stale".into());
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains(r#""status":"error""#));
        assert!(json.contains(r#""error":"stale""#));
    }

    #[test]
    fn empty_or_settled_suggestions_are_not_applicable() {
        let mut s = Suggestion::new("s", SuggestionKind::Clarity, "t", "", EditBatch::default());
        assert!(!s.is_applicable());
        s.proposed_changes.push(Edit::insert(1, 1, "x"));
        s.mark_dismissed();
        assert!(!s.is_applicable());
        assert_eq!(s.display_title(), "[Clarity] t");
    }
}
