use regex::Regex;
use std::sync::LazyLock;

use super::library::Library;
use super::note::{Note, NoteId};

static STORAGE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/storages/([^/]+)(?:/folders/([^/]+))?/?$").expect("valid storage path regex")
});

/// Semantic scope of the list, derived once from the route pathname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationContext {
    Home,
    Starred,
    Folder {
        storage_key: String,
        folder_key: String,
    },
    Storage {
        storage_key: String,
    },
}

impl NavigationContext {
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "/home" => return Some(Self::Home),
            "/starred" => return Some(Self::Starred),
            _ => {}
        }

        let caps = STORAGE_PATH_RE.captures(path)?;
        let storage_key = caps.get(1)?.as_str().to_string();
        Some(match caps.get(2) {
            Some(folder) => Self::Folder {
                storage_key,
                folder_key: folder.as_str().to_string(),
            },
            None => Self::Storage { storage_key },
        })
    }

    pub fn path(&self) -> String {
        match self {
            Self::Home => "/home".to_string(),
            Self::Starred => "/starred".to_string(),
            Self::Folder {
                storage_key,
                folder_key,
            } => format!("/storages/{storage_key}/folders/{folder_key}"),
            Self::Storage { storage_key } => format!("/storages/{storage_key}"),
        }
    }

    /// Candidate notes for this context, unsorted. Identities with no note
    /// behind them come back as `None` and are dropped by the caller.
    pub fn resolve<'a>(&self, library: &'a Library) -> Vec<Option<&'a Note>> {
        match self {
            Self::Home => library.note_map.values().map(Some).collect(),
            Self::Starred => deref(library, library.starred_set.iter()),
            Self::Folder {
                storage_key,
                folder_key,
            } => {
                let Some(storage) = library.storage(storage_key) else {
                    return Vec::new();
                };
                match storage.folder(folder_key) {
                    Some(folder) => {
                        deref(library, library.folder_notes(&storage.key, &folder.key).iter())
                    }
                    None => deref(library, library.storage_notes(&storage.key).iter()),
                }
            }
            Self::Storage { storage_key } => {
                if library.storage(storage_key).is_none() {
                    return Vec::new();
                }
                deref(library, library.storage_notes(storage_key).iter())
            }
        }
    }
}

fn deref<'a>(
    library: &'a Library,
    ids: impl Iterator<Item = &'a NoteId>,
) -> Vec<Option<&'a Note>> {
    ids.map(|id| library.note(id)).collect()
}

/// Resolve a raw pathname; unknown paths yield no candidates.
pub fn resolve_path<'a>(path: &str, library: &'a Library) -> Vec<Option<&'a Note>> {
    match NavigationContext::from_path(path) {
        Some(context) => context.resolve(library),
        None => {
            tracing::debug!("no navigation context for path {path}");
            Vec::new()
        }
    }
}
