//! Template placeholders of the form `{{type:name}}`.
//!
//! Placeholders are never maintained incrementally: the editor re-scans the
//! whole buffer after every content change, so spans can never drift from the
//! text they describe. Offsets are char offsets into the buffer content.

use core_text::Buffer;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([^}:]+):([^}]+)\}\}").expect("valid placeholder regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Text,
    List,
}

impl PlaceholderKind {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "text" => Some(PlaceholderKind::Text),
            "list" => Some(PlaceholderKind::List),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    /// Type exactly as written between `{{` and `:`.
    pub raw_type: String,
    /// `None` when `raw_type` is neither `text` nor `list`.
    pub kind: Option<PlaceholderKind>,
    /// Char offset of the opening `{{`.
    pub start: usize,
    /// Char offset just past the closing `}}`.
    pub end: usize,
    /// Value staged for this placeholder but not yet written into the buffer.
    pub current_value: String,
    pub valid: bool,
}

impl Placeholder {
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset <= self.end
    }
}

/// Value written over a placeholder token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderValue {
    Text(String),
    List(Vec<String>),
}

impl PlaceholderValue {
    /// Text inserted into the buffer: verbatim for text, `- item` lines for lists.
    pub fn render(&self) -> String {
        match self {
            PlaceholderValue::Text(s) => s.clone(),
            PlaceholderValue::List(items) => items
                .iter()
                .map(|item| format!("- {item}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Find every placeholder token in `content`, in order of appearance.
pub fn scan(content: &str) -> Vec<Placeholder> {
    let mut out = Vec::new();
    // byte -> char translation, advanced monotonically across matches
    let mut last_byte = 0usize;
    let mut last_char = 0usize;
    for caps in PLACEHOLDER_RE.captures_iter(content) {
        let (Some(whole), Some(ty), Some(name)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let start = last_char + content[last_byte..whole.start()].chars().count();
        let end = start + whole.as_str().chars().count();
        last_byte = whole.end();
        last_char = end;
        let kind = PlaceholderKind::parse(ty.as_str());
        out.push(Placeholder {
            name: name.as_str().to_string(),
            raw_type: ty.as_str().to_string(),
            kind,
            start,
            end,
            current_value: String::new(),
            valid: kind.is_some() && is_valid_name(name.as_str()),
        });
    }
    out
}

/// Carry staged values from a previous scan onto placeholders with the same
/// name and type.
pub fn carry_staged_values(previous: &[Placeholder], current: &mut [Placeholder]) {
    let staged: HashMap<(&str, &str), &str> = previous
        .iter()
        .filter(|p| !p.current_value.is_empty())
        .map(|p| ((p.name.as_str(), p.raw_type.as_str()), p.current_value.as_str()))
        .collect();
    if staged.is_empty() {
        return;
    }
    for p in current.iter_mut() {
        if let Some(v) = staged.get(&(p.name.as_str(), p.raw_type.as_str())) {
            p.current_value = v.to_string();
        }
    }
}

/// First placeholder starting after `offset`, wrapping to the first one.
pub fn next_index(placeholders: &[Placeholder], offset: usize) -> Option<usize> {
    if placeholders.is_empty() {
        return None;
    }
    Some(placeholders.iter().position(|p| p.start > offset).unwrap_or(0))
}

/// Last placeholder ending before `offset`, wrapping to the last one.
pub fn previous_index(placeholders: &[Placeholder], offset: usize) -> Option<usize> {
    if placeholders.is_empty() {
        return None;
    }
    Some(
        placeholders
            .iter()
            .rposition(|p| p.end < offset)
            .unwrap_or(placeholders.len() - 1),
    )
}

/// Placeholder whose span (inclusive of both ends) covers `offset`.
pub fn find_at(placeholders: &[Placeholder], offset: usize) -> Option<usize> {
    placeholders.iter().position(|p| p.contains(offset))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    DuplicateName,
    InvalidType,
    InvalidName,
}

/// A diagnostic about a placeholder token. `line`/`column` are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderIssue {
    pub kind: IssueKind,
    pub index: usize,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Report duplicate names among valid placeholders and malformed tokens.
pub fn validate(placeholders: &[Placeholder], buffer: &Buffer) -> Vec<PlaceholderIssue> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for p in placeholders.iter().filter(|p| p.valid) {
        *counts.entry(p.name.as_str()).or_default() += 1;
    }
    let mut issues = Vec::new();
    let mut push = |kind, index: usize, p: &Placeholder, message: String| {
        let pos = buffer.position_of(p.start);
        issues.push(PlaceholderIssue {
            kind,
            index,
            line: pos.line + 1,
            column: pos.col + 1,
            message,
        });
    };
    for (i, p) in placeholders.iter().enumerate() {
        if p.valid {
            if counts.get(p.name.as_str()).copied().unwrap_or(0) > 1 {
                push(
                    IssueKind::DuplicateName,
                    i,
                    p,
                    format!("duplicate placeholder name: {}", p.name),
                );
            }
            continue;
        }
        if p.kind.is_none() {
            push(
                IssueKind::InvalidType,
                i,
                p,
                format!("invalid placeholder type: {} (must be 'text' or 'list')", p.raw_type),
            );
        }
        if !is_valid_name(&p.name) {
            push(
                IssueKind::InvalidName,
                i,
                p,
                format!(
                    "invalid placeholder name: {} (letters, digits and underscores only)",
                    p.name
                ),
            );
        }
    }
    issues
}
