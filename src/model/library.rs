use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

use super::note::{Note, NoteId, Storage};

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("cannot serialize library: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("note not found: {0}")]
    NoteNotFound(NoteId),
}

/// On-disk shape of the library file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryDocument {
    #[serde(default)]
    pub storages: Vec<Storage>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

/// Mutation requests applied by the owner of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreAction {
    DeleteNote {
        storage_key: String,
        note_key: String,
    },
}

/// Immutable-per-render snapshot of storages, folders and notes.
///
/// Lookups on absent keys yield empty results, never errors.
#[derive(Debug, Clone, Default)]
pub struct Library {
    pub storage_map: BTreeMap<String, Storage>,
    pub note_map: BTreeMap<NoteId, Note>,
    pub storage_note_map: HashMap<String, Vec<NoteId>>,
    pub folder_note_map: HashMap<String, Vec<NoteId>>,
    pub starred_set: BTreeSet<NoteId>,
    revision: u64,
}

impl Library {
    pub fn from_document(doc: LibraryDocument) -> Self {
        let mut library = Self::default();

        for storage in doc.storages {
            library.storage_map.insert(storage.key.clone(), storage);
        }

        for note in doc.notes {
            let id = note.id();
            if library.note_map.contains_key(&id) {
                tracing::warn!("duplicate note {id} in library, keeping the last one");
                library.unindex(&id);
            }

            match note.folder.as_deref() {
                Some(folder) => library
                    .folder_note_map
                    .entry(folder_map_key(&note.storage, folder))
                    .or_default()
                    .push(id.clone()),
                None => library
                    .storage_note_map
                    .entry(note.storage.clone())
                    .or_default()
                    .push(id.clone()),
            }

            if note.starred {
                library.starred_set.insert(id.clone());
            }
            library.note_map.insert(id, note);
        }

        library
    }

    /// Monotonic counter bumped on every change; used to cache derivations.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn note(&self, id: &NoteId) -> Option<&Note> {
        self.note_map.get(id)
    }

    pub fn storage(&self, key: &str) -> Option<&Storage> {
        self.storage_map.get(key)
    }

    pub fn storage_notes(&self, storage_key: &str) -> &[NoteId] {
        self.storage_note_map
            .get(storage_key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn folder_notes(&self, storage_key: &str, folder_key: &str) -> &[NoteId] {
        self.folder_note_map
            .get(&folder_map_key(storage_key, folder_key))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Swap in a freshly loaded snapshot, keeping the revision moving forward.
    pub fn replace_with(&mut self, next: Library) {
        let revision = self.revision + 1;
        *self = next;
        self.revision = revision;
    }

    pub fn apply(&mut self, action: StoreAction) {
        match action {
            StoreAction::DeleteNote {
                storage_key,
                note_key,
            } => {
                let id = NoteId::new(storage_key, note_key);
                if self.note_map.remove(&id).is_none() {
                    tracing::debug!("delete of {id} ignored, already gone");
                }
                self.unindex(&id);
            }
        }
        self.revision += 1;
    }

    fn unindex(&mut self, id: &NoteId) {
        for ids in self.storage_note_map.values_mut() {
            ids.retain(|other| other != id);
        }
        for ids in self.folder_note_map.values_mut() {
            ids.retain(|other| other != id);
        }
        self.starred_set.remove(id);
    }
}

pub fn folder_map_key(storage_key: &str, folder_key: &str) -> String {
    format!("{storage_key}-{folder_key}")
}

/// The data collaborator behind note deletion.
pub trait DataApi: Send + Sync {
    /// Remove the note and return the identity that was deleted.
    fn delete_note(&self, storage_key: &str, note_key: &str) -> Result<NoteId, LibraryError>;
}

/// Library stored as a single TOML file.
#[derive(Debug)]
pub struct LibraryFile {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl LibraryFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot. A missing file is an empty library.
    pub fn load(&self) -> Result<Library, LibraryError> {
        Ok(Library::from_document(self.read_document()?))
    }

    fn read_document(&self) -> Result<LibraryDocument, LibraryError> {
        if !self.path.exists() {
            return Ok(LibraryDocument::default());
        }

        let raw = fs::read_to_string(&self.path).map_err(|source| LibraryError::Io {
            path: self.path.clone(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| LibraryError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn write_document(&self, doc: &LibraryDocument) -> Result<(), LibraryError> {
        let text = toml::to_string_pretty(doc)?;
        let io_err = |source| LibraryError::Io {
            path: self.path.clone(),
            source,
        };

        let tmp = self.path.with_extension("tmp");
        let file = fs::File::create(&tmp).map_err(io_err)?;
        let mut writer = std::io::BufWriter::new(file);
        writer.write_all(text.as_bytes()).map_err(io_err)?;
        writer.flush().map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl DataApi for LibraryFile {
    fn delete_note(&self, storage_key: &str, note_key: &str) -> Result<NoteId, LibraryError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut doc = self.read_document()?;
        let before = doc.notes.len();
        doc.notes
            .retain(|note| !(note.storage == storage_key && note.key == note_key));

        let id = NoteId::new(storage_key, note_key);
        if doc.notes.len() == before {
            return Err(LibraryError::NoteNotFound(id));
        }

        self.write_document(&doc)?;
        tracing::info!("deleted note {id} from {}", self.path.display());
        Ok(id)
    }
}
