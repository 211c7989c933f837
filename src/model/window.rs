use std::collections::HashMap;

use super::note::{Note, NoteId};

/// Items added to the render window per growth step.
pub const PAGE_SIZE: usize = 10;

/// The sorted list for one data snapshot and pathname. Rendering, selection
/// and auto-scroll all read this one instance.
#[derive(Debug, Clone, Default)]
pub struct OrderedNotes {
    ids: Vec<NoteId>,
    // keyed by the composite "<storage>-<note>" string the route carries
    index: HashMap<String, usize>,
}

impl OrderedNotes {
    /// Drop missing notes, then sort by `updated_at` descending. The sort is
    /// stable, so ties keep their candidate order.
    pub fn derive(candidates: Vec<Option<&Note>>) -> Self {
        let mut notes: Vec<&Note> = candidates.into_iter().flatten().collect();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let ids: Vec<NoteId> = notes.iter().map(|note| note.id()).collect();
        let index = ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.to_string(), idx))
            .collect();

        Self { ids, index }
    }

    pub fn ids(&self) -> &[NoteId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn first(&self) -> Option<&NoteId> {
        self.ids.first()
    }

    pub fn position(&self, id: &NoteId) -> Option<usize> {
        self.position_of_key(&id.to_string())
    }

    /// Index of the note whose composite key equals `key`.
    pub fn position_of_key(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn find_key(&self, key: &str) -> Option<&NoteId> {
        self.position_of_key(key).map(|idx| &self.ids[idx])
    }
}

/// Scroll geometry of the list surface, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMetrics {
    pub scroll_top: usize,
    pub viewport_height: usize,
    pub scroll_height: usize,
}

/// True when the viewport is within `threshold` of the bottom and notes
/// remain beyond the current window.
pub fn should_grow(metrics: ScrollMetrics, total: usize, range: usize, threshold: usize) -> bool {
    metrics.scroll_top + metrics.viewport_height > metrics.scroll_height.saturating_sub(threshold)
        && total > window_size(range)
}

pub fn window_size(range: usize) -> usize {
    PAGE_SIZE + PAGE_SIZE * range
}

/// New scroll offset that brings the item fully into view, if it is not already.
pub fn scroll_correction(
    item_top: usize,
    item_height: usize,
    viewport_height: usize,
    scroll_top: usize,
) -> Option<usize> {
    let mut next = scroll_top;

    let item_bottom = item_top + item_height;
    if item_bottom > next + viewport_height {
        next = item_bottom - viewport_height;
    }
    if next > item_top {
        next = item_top;
    }

    (next != scroll_top).then_some(next)
}

/// Incrementally growing render window for one pathname.
#[derive(Debug, Clone, Default)]
pub struct RenderWindow {
    range: usize,
    scroll_top: usize,
    pathname: Option<String>,
}

impl RenderWindow {
    pub fn range(&self) -> usize {
        self.range
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn size(&self) -> usize {
        window_size(self.range)
    }

    pub fn visible<'a>(&self, notes: &'a OrderedNotes) -> &'a [NoteId] {
        let end = self.size().min(notes.len());
        &notes.ids()[..end]
    }

    /// Reset when the pathname changes. Returns whether a reset happened.
    pub fn follow_path(&mut self, pathname: &str) -> bool {
        if self.pathname.as_deref() == Some(pathname) {
            return false;
        }
        self.pathname = Some(pathname.to_string());
        self.reset();
        true
    }

    pub fn reset(&mut self) {
        self.range = 0;
        self.scroll_top = 0;
    }

    pub fn set_scroll_top(&mut self, scroll_top: usize) {
        self.scroll_top = scroll_top;
    }

    /// Handle a scroll event; grows the window by one page when due.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics, total: usize, threshold: usize) -> bool {
        self.scroll_top = metrics.scroll_top;
        if should_grow(metrics, total, self.range, threshold) {
            self.range += 1;
            return true;
        }
        false
    }
}
