use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Composite identity of a note, rendered as `"<storageKey>-<noteKey>"`.
///
/// Either key may contain `-`, so the rendered form is only ever compared,
/// never split back apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId {
    storage_key: String,
    note_key: String,
}

impl NoteId {
    pub fn new(storage_key: impl Into<String>, note_key: impl Into<String>) -> Self {
        Self {
            storage_key: storage_key.into(),
            note_key: note_key.into(),
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn note_key(&self) -> &str {
        &self.note_key
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.storage_key, self.note_key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoteKind {
    #[default]
    #[serde(rename = "MARKDOWN_NOTE")]
    Markdown,
    #[serde(rename = "SNIPPET_NOTE")]
    Snippet,
}

impl NoteKind {
    pub fn label(&self) -> &'static str {
        match self {
            NoteKind::Markdown => "note",
            NoteKind::Snippet => "snippet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub storage: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, rename = "type")]
    pub kind: NoteKind,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub starred: bool,
}

impl Note {
    pub fn id(&self) -> NoteId {
        NoteId::new(&self.storage, &self.key)
    }

    /// Title for display; `None` when blank.
    pub fn display_title(&self) -> Option<&str> {
        let trimmed = self.title.trim();
        if trimmed.is_empty() { None } else { Some(&self.title) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storage {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub folders: Vec<Folder>,
}

impl Storage {
    pub fn folder(&self, key: &str) -> Option<&Folder> {
        self.folders.iter().find(|folder| folder.key == key)
    }
}

// Anything that is not an array of strings reads as "no tags".
fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<toml::Value>::deserialize(deserializer)?;
    let Some(toml::Value::Array(items)) = value else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            toml::Value::String(tag) => Some(tag),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_id_displays_as_composite_key() {
        let id = NoteId::new("s1", "n5");
        assert_eq!(id.storage_key(), "s1");
        assert_eq!(id.note_key(), "n5");
        assert_eq!(id.to_string(), "s1-n5");
    }

    #[test]
    fn note_id_keeps_dashed_keys_intact() {
        let id = NoteId::new("my-store", "n-5");
        assert_eq!(id.storage_key(), "my-store");
        assert_eq!(id.note_key(), "n-5");
        assert_eq!(id.to_string(), "my-store-n-5");
    }

    #[test]
    fn whitespace_title_has_no_display_title() {
        let note: Note = toml::from_str(
            r#"
            storage = "s1"
            key = "n1"
            title = "   "
            updated_at = "2026-10-01T10:00:00Z"
            "#,
        )
        .unwrap();
        assert_eq!(note.display_title(), None);
        assert_eq!(note.kind, NoteKind::Markdown);
    }

    #[test]
    fn non_list_tags_read_as_empty() {
        let note: Note = toml::from_str(
            r#"
            storage = "s1"
            key = "n1"
            tags = "oops"
            updated_at = "2026-10-01T10:00:00Z"
            type = "SNIPPET_NOTE"
            "#,
        )
        .unwrap();
        assert!(note.tags.is_empty());
        assert_eq!(note.kind, NoteKind::Snippet);
    }
}
