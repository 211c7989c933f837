use super::note::NoteId;
use super::window::OrderedNotes;

/// URL-like route state: a pathname plus the selected note key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub pathname: String,
    pub key: Option<String>,
}

impl Location {
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            key: None,
        }
    }

    pub fn with_key(&self, key: Option<String>) -> Self {
        Self {
            pathname: self.pathname.clone(),
            key,
        }
    }

    /// The selected note, if its key names one of `notes`.
    pub fn selected<'a>(&self, notes: &'a OrderedNotes) -> Option<&'a NoteId> {
        self.key.as_deref().and_then(|key| notes.find_key(key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Push(Location),
    Replace(Location),
}

/// In-memory history: `push` adds an entry, `replace` rewrites the current one.
#[derive(Debug, Clone)]
pub struct Router {
    entries: Vec<Location>,
}

impl Router {
    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![initial],
        }
    }

    pub fn location(&self) -> &Location {
        // entries is never empty
        &self.entries[self.entries.len() - 1]
    }

    pub fn push(&mut self, location: Location) {
        tracing::debug!("route push {} key={:?}", location.pathname, location.key);
        self.entries.push(location);
    }

    pub fn replace(&mut self, location: Location) {
        tracing::debug!("route replace {} key={:?}", location.pathname, location.key);
        let last = self.entries.len() - 1;
        self.entries[last] = location;
    }

    pub fn navigate(&mut self, navigation: Navigation) {
        match navigation {
            Navigation::Push(location) => self.push(location),
            Navigation::Replace(location) => self.replace(location),
        }
    }

    pub fn back(&mut self) -> bool {
        if self.entries.len() <= 1 {
            return false;
        }
        self.entries.pop();
        true
    }

    pub fn history_len(&self) -> usize {
        self.entries.len()
    }
}

/// Repair the selection after the ordered list was re-derived.
///
/// With notes present, a missing or stale key is replaced by the first note.
/// With no notes, a leftover key is cleared.
pub fn reconcile(notes: &OrderedNotes, location: &Location) -> Option<Navigation> {
    if notes.is_empty() {
        return location
            .key
            .is_some()
            .then(|| Navigation::Replace(location.with_key(None)));
    }

    if location.selected(notes).is_some() {
        return None;
    }

    let first = notes.first().map(NoteId::to_string);
    Some(Navigation::Replace(location.with_key(first)))
}

/// Direct selection of a note (pointer activation).
pub fn select(location: &Location, id: &NoteId) -> Navigation {
    Navigation::Push(location.with_key(Some(id.to_string())))
}

/// Tracks the last observed selection key to detect changes.
#[derive(Debug, Clone, Default)]
pub struct KeyWatch {
    last: Option<String>,
}

impl KeyWatch {
    /// Returns the new key when it differs from the last one seen.
    pub fn observe<'a>(&mut self, key: Option<&'a str>) -> Option<&'a str> {
        if self.last.as_deref() == key {
            return None;
        }
        self.last = key.map(str::to_string);
        key
    }
}
