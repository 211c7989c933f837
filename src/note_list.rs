//! The note list surface: derives the ordered list for the current route,
//! owns the render window, moves the selection and coordinates deletes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::bus::{EventBus, Listener, SubscriptionId, Topic};
use crate::model::context;
use crate::model::cursor::{self, Step};
use crate::model::deletion::{DeleteError, DeletionCoordinator, DialogChoice};
use crate::model::library::{Library, StoreAction};
use crate::model::note::NoteId;
use crate::model::route::{self, KeyWatch, Location, Router};
use crate::model::window::{OrderedNotes, RenderWindow, ScrollMetrics, scroll_correction};
use crate::timer::RefreshTimer;

/// Row geometry of the list surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListGeometry {
    pub item_height: usize,
    pub viewport_height: usize,
    pub grow_threshold: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key was consumed; nothing else should act on it.
    Handled,
    Ignored,
}

pub struct NoteList {
    notes: OrderedNotes,
    derived_for: Option<(u64, String)>,
    window: RenderWindow,
    keys: KeyWatch,
    deletions: DeletionCoordinator,
    geometry: ListGeometry,
    subscriptions: Vec<SubscriptionId>,
    timer: Option<RefreshTimer>,
}

impl NoteList {
    pub fn mount(bus: &mut EventBus, geometry: ListGeometry, timer: Option<RefreshTimer>) -> Self {
        let subscriptions = vec![
            bus.on(Topic::ListNext, Listener::SelectNext),
            bus.on(Topic::ListPrior, Listener::SelectPrior),
            bus.on(Topic::LostFocus, Listener::RestoreFocus),
        ];

        Self {
            notes: OrderedNotes::default(),
            derived_for: None,
            window: RenderWindow::default(),
            keys: KeyWatch::default(),
            deletions: DeletionCoordinator::default(),
            geometry,
            subscriptions,
            timer,
        }
    }

    /// Release bus subscriptions, pending delete listeners and the refresh timer.
    pub fn unmount(&mut self, bus: &mut EventBus) {
        for id in self.subscriptions.drain(..) {
            bus.off(id);
        }
        self.deletions.release_all(bus);
        self.timer.take();
    }

    pub fn notes(&self) -> &OrderedNotes {
        &self.notes
    }

    pub fn window(&self) -> &RenderWindow {
        &self.window
    }

    pub fn visible(&self) -> &[NoteId] {
        self.window.visible(&self.notes)
    }

    pub fn geometry(&self) -> ListGeometry {
        self.geometry
    }

    /// Returns whether the height changed.
    pub fn set_viewport_height(&mut self, height: usize) -> bool {
        let changed = self.geometry.viewport_height != height;
        self.geometry.viewport_height = height;
        changed
    }

    /// The listed note the route currently selects.
    pub fn selected<'a>(&'a self, router: &Router) -> Option<&'a NoteId> {
        router.location().selected(&self.notes)
    }

    pub fn is_deleting(&self, id: &NoteId) -> bool {
        self.deletions.is_pending(id)
    }

    pub fn pending_deletes(&self) -> usize {
        self.deletions.pending_count()
    }

    pub fn scroll_metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: self.window.scroll_top(),
            viewport_height: self.geometry.viewport_height,
            scroll_height: self.visible().len() * self.geometry.item_height,
        }
    }

    /// Bring the list in line with the snapshot and the route: reset the
    /// window on a pathname change, re-derive, repair the selection and scroll
    /// a newly selected note into view.
    pub fn sync(&mut self, library: &Library, router: &mut Router) {
        let pathname = router.location().pathname.clone();
        if self.window.follow_path(&pathname) {
            tracing::debug!("list context is now {pathname}");
        }
        self.derive(library, &pathname);

        if let Some(navigation) = route::reconcile(&self.notes, router.location()) {
            router.navigate(navigation);
        }

        let metrics = self.scroll_metrics();
        let max_top = metrics
            .scroll_height
            .saturating_sub(metrics.viewport_height);
        if metrics.scroll_top > max_top {
            self.window.set_scroll_top(max_top);
        }

        // content shorter than the viewport cannot produce scroll events
        let metrics = self.scroll_metrics();
        if metrics.scroll_height <= metrics.viewport_height {
            self.window
                .on_scroll(metrics, self.notes.len(), self.geometry.grow_threshold);
        }

        self.follow_selection(router.location());
    }

    fn derive(&mut self, library: &Library, pathname: &str) {
        let stamp = (library.revision(), pathname.to_string());
        if self.derived_for.as_ref() == Some(&stamp) {
            return;
        }

        self.notes = OrderedNotes::derive(context::resolve_path(pathname, library));
        tracing::debug!(
            "derived {} notes for {pathname} at revision {}",
            self.notes.len(),
            library.revision()
        );
        self.derived_for = Some(stamp);
    }

    fn follow_selection(&mut self, location: &Location) {
        let Some(key) = self.keys.observe(location.key.as_deref()) else {
            return;
        };
        let Some(index) = self.notes.position_of_key(key) else {
            return;
        };
        // only rendered items can be scrolled to
        if index >= self.window.size() {
            return;
        }

        let height = self.geometry.item_height;
        if let Some(top) = scroll_correction(
            index * height,
            height,
            self.geometry.viewport_height,
            self.window.scroll_top(),
        ) {
            self.scroll_to(top);
        }
    }

    /// Wheel scroll by `delta` rows. Returns whether the window grew.
    pub fn scroll_by(&mut self, delta: isize) -> bool {
        let metrics = self.scroll_metrics();
        let max_top = metrics
            .scroll_height
            .saturating_sub(metrics.viewport_height);
        let top = self.window.scroll_top().saturating_add_signed(delta).min(max_top);
        self.scroll_to(top)
    }

    fn scroll_to(&mut self, scroll_top: usize) -> bool {
        let metrics = ScrollMetrics {
            scroll_top,
            ..self.scroll_metrics()
        };
        let grew = self
            .window
            .on_scroll(metrics, self.notes.len(), self.geometry.grow_threshold);
        if grew {
            tracing::debug!(
                "render window grew to {} (range {})",
                self.window.size(),
                self.window.range()
            );
        }
        grew
    }

    pub fn select_next(&mut self, router: &mut Router, bus: &mut EventBus) -> bool {
        self.move_selection(Step::Next, router, bus)
    }

    pub fn select_prior(&mut self, router: &mut Router, bus: &mut EventBus) -> bool {
        self.move_selection(Step::Prior, router, bus)
    }

    fn move_selection(&mut self, step: Step, router: &mut Router, bus: &mut EventBus) -> bool {
        let current = router.location().selected(&self.notes);
        let Some(target) = cursor::step(self.notes.ids(), current, step) else {
            return false;
        };

        router.navigate(route::select(router.location(), target));
        self.follow_selection(router.location());
        bus.emit(Topic::ListMoved);
        true
    }

    /// Pointer activation of a listed note.
    pub fn click(&mut self, id: &NoteId, router: &mut Router) {
        router.navigate(route::select(router.location(), id));
        self.follow_selection(router.location());
    }

    /// Note under a row of the list surface, counted from its top edge.
    pub fn item_at_row(&self, row: usize) -> Option<&NoteId> {
        let index = (self.window.scroll_top() + row) / self.geometry.item_height.max(1);
        self.visible().get(index)
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        router: &mut Router,
        bus: &mut EventBus,
    ) -> KeyOutcome {
        let platform = KeyModifiers::CONTROL | KeyModifiers::SUPER | KeyModifiers::META;
        if key.modifiers.intersects(platform) {
            return KeyOutcome::Ignored;
        }

        match key.code {
            KeyCode::Char('a') if !key.modifiers.contains(KeyModifiers::SHIFT) => {
                bus.emit(Topic::NewNote);
            }
            KeyCode::Char('d' | 'D') => bus.emit(Topic::DetailDelete),
            KeyCode::Char('e' | 'E') => bus.emit(Topic::DetailFocus),
            KeyCode::Up => {
                self.select_prior(router, bus);
            }
            KeyCode::Down => {
                self.select_next(router, bus);
            }
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Handled
    }

    /// Act on the delete confirmation for `id`. Returns the identity to hand
    /// to the data collaborator, if any.
    pub fn confirm_delete(
        &mut self,
        id: NoteId,
        choice: DialogChoice,
        router: &Router,
        bus: &mut EventBus,
    ) -> Result<Option<NoteId>, DeleteError> {
        let selected = router.location().selected(&self.notes);
        self.deletions.confirm(id, choice, selected, bus)
    }

    pub fn delete_finished(
        &mut self,
        id: &NoteId,
        result: Result<NoteId, String>,
        bus: &mut EventBus,
    ) -> Option<StoreAction> {
        match result {
            Ok(deleted) => self.deletions.resolved(id, deleted),
            Err(err) => {
                tracing::warn!("delete of {id} failed: {err}");
                self.deletions.rejected(id, bus);
                None
            }
        }
    }

    /// The one-shot `list:moved` listener registered for `id` fired.
    pub fn selection_moved(&mut self, id: &NoteId) -> Option<StoreAction> {
        self.deletions.selection_moved(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::library::LibraryDocument;
    use crate::model::note::Note;
    use chrono::{Duration, TimeZone, Utc};

    const GEOMETRY: ListGeometry = ListGeometry {
        item_height: 4,
        viewport_height: 12,
        grow_threshold: 8,
    };

    fn library(keys: &[&str]) -> Library {
        library_in("s1", keys)
    }

    fn library_in(storage: &str, keys: &[&str]) -> Library {
        let base = Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap();
        let notes = keys
            .iter()
            .enumerate()
            .map(|(idx, key)| Note {
                storage: storage.to_string(),
                key: key.to_string(),
                folder: None,
                title: key.to_string(),
                tags: Vec::new(),
                updated_at: base - Duration::minutes(idx as i64),
                kind: Default::default(),
                starred: false,
            })
            .collect();
        let storages = toml::from_str::<LibraryDocument>(&format!(
            r#"
            [[storages]]
            key = "{storage}"
            name = "One"
            "#
        ))
        .unwrap()
        .storages;
        Library::from_document(LibraryDocument { storages, notes })
    }

    fn numbered(count: usize) -> Vec<String> {
        (1..=count).map(|i| format!("n{i}")).collect()
    }

    struct Harness {
        library: Library,
        router: Router,
        bus: EventBus,
        list: NoteList,
        log: Vec<String>,
    }

    impl Harness {
        fn new(keys: &[&str], location: Location) -> Self {
            Self::with_library(library(keys), location)
        }

        fn with_library(library: Library, location: Location) -> Self {
            let mut bus = EventBus::default();
            let list = NoteList::mount(&mut bus, GEOMETRY, None);
            let mut harness = Self {
                library,
                router: Router::new(location),
                bus,
                list,
                log: Vec::new(),
            };
            harness.list.sync(&harness.library, &mut harness.router);
            harness
        }

        fn key(&self) -> Option<&str> {
            self.router.location().key.as_deref()
        }

        fn apply(&mut self, action: StoreAction) {
            self.log.push(format!("{action:?}"));
            self.library.apply(action);
            self.list.sync(&self.library, &mut self.router);
        }

        // What the application loop does with queued notifications.
        fn pump(&mut self) {
            while let Some((topic, listeners)) = self.bus.poll() {
                self.log.push(topic.name().to_string());
                for listener in listeners {
                    match listener {
                        Listener::SelectNext => {
                            self.list.select_next(&mut self.router, &mut self.bus);
                        }
                        Listener::SelectPrior => {
                            self.list.select_prior(&mut self.router, &mut self.bus);
                        }
                        Listener::CommitDeletion(id) => {
                            if let Some(action) = self.list.selection_moved(&id) {
                                self.apply(action);
                            }
                        }
                        _ => {}
                    }
                }
                self.list.sync(&self.library, &mut self.router);
            }
        }

        fn delete(&mut self, key: &str, choice: DialogChoice) -> Option<NoteId> {
            let id = self.list.notes().find_key(key).cloned().unwrap();
            let dispatched = self
                .list
                .confirm_delete(id, choice, &self.router, &mut self.bus)
                .unwrap();
            self.pump();
            dispatched
        }

        fn finish(&mut self, id: &NoteId, result: Result<NoteId, String>) {
            if let Some(action) = self.list.delete_finished(id, result, &mut self.bus) {
                self.apply(action);
            }
            self.pump();
        }

        fn count(&self, entry: &str) -> usize {
            self.log.iter().filter(|e| e.as_str() == entry).count()
        }
    }

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn route_without_key_selects_first_note_by_replace() {
        let h = Harness::new(&["n1", "n2"], Location::new("/storages/s1"));
        assert_eq!(h.key(), Some("s1-n1"));
        assert_eq!(h.router.history_len(), 1);
    }

    #[test]
    fn empty_context_leaves_no_selection() {
        let h = Harness::new(&[], Location::new("/home"));
        assert_eq!(h.key(), None);
        assert!(h.list.visible().is_empty());
    }

    #[test]
    fn down_and_up_push_new_keys() {
        let mut h = Harness::new(&["n1", "n2", "n3"], Location::new("/home"));

        let outcome = h.list.handle_key(
            press(KeyCode::Down, KeyModifiers::NONE),
            &mut h.router,
            &mut h.bus,
        );
        assert_eq!(outcome, KeyOutcome::Handled);
        assert_eq!(h.key(), Some("s1-n2"));
        assert_eq!(h.router.history_len(), 2);

        h.list.handle_key(
            press(KeyCode::Up, KeyModifiers::NONE),
            &mut h.router,
            &mut h.bus,
        );
        assert_eq!(h.key(), Some("s1-n1"));

        // prior at the first note does not navigate
        h.list.handle_key(
            press(KeyCode::Up, KeyModifiers::NONE),
            &mut h.router,
            &mut h.bus,
        );
        assert_eq!(h.router.history_len(), 3);
        h.pump();
        assert_eq!(h.count("list:moved"), 2);
    }

    #[test]
    fn platform_modifiers_are_ignored() {
        let mut h = Harness::new(&["n1", "n2"], Location::new("/home"));
        for modifiers in [KeyModifiers::CONTROL, KeyModifiers::SUPER, KeyModifiers::META] {
            let outcome =
                h.list
                    .handle_key(press(KeyCode::Down, modifiers), &mut h.router, &mut h.bus);
            assert_eq!(outcome, KeyOutcome::Ignored);
        }
        assert_eq!(h.key(), Some("s1-n1"));
        assert!(h.bus.is_idle());
    }

    #[test]
    fn letter_keys_emit_bus_topics() {
        let mut h = Harness::new(&["n1"], Location::new("/home"));
        let keys = [
            (KeyCode::Char('a'), KeyModifiers::NONE),
            (KeyCode::Char('A'), KeyModifiers::SHIFT),
            (KeyCode::Char('d'), KeyModifiers::NONE),
            (KeyCode::Char('e'), KeyModifiers::NONE),
            (KeyCode::Char('x'), KeyModifiers::NONE),
        ];
        let outcomes: Vec<KeyOutcome> = keys
            .into_iter()
            .map(|(code, modifiers)| {
                h.list
                    .handle_key(press(code, modifiers), &mut h.router, &mut h.bus)
            })
            .collect();
        assert_eq!(
            outcomes,
            vec![
                KeyOutcome::Handled,
                KeyOutcome::Ignored,
                KeyOutcome::Handled,
                KeyOutcome::Handled,
                KeyOutcome::Ignored,
            ]
        );

        h.pump();
        assert_eq!(h.log, vec!["top:new-note", "detail:delete", "detail:focus"]);
    }

    #[test]
    fn bus_next_from_last_wraps_to_first() {
        let mut h = Harness::new(&["n1", "n2"], Location::new("/home"));
        h.list.click(&NoteId::new("s1", "n2"), &mut h.router);
        h.bus.emit(Topic::ListNext);
        h.pump();
        assert_eq!(h.key(), Some("s1-n1"));
    }

    #[test]
    fn click_pushes_selected_key() {
        let mut h = Harness::new(&["n1", "n2"], Location::new("/home"));
        h.list.click(&NoteId::new("s1", "n2"), &mut h.router);
        assert_eq!(h.key(), Some("s1-n2"));
        assert_eq!(h.router.history_len(), 2);
    }

    #[test]
    fn moving_selection_scrolls_item_into_view() {
        let mut h = Harness::new(&["n1", "n2", "n3", "n4", "n5"], Location::new("/home"));
        for _ in 0..3 {
            h.list.select_next(&mut h.router, &mut h.bus);
        }
        // item 3 spans rows 12..16 in a 12-row viewport
        assert_eq!(h.list.window().scroll_top(), 4);

        h.list.click(&NoteId::new("s1", "n1"), &mut h.router);
        assert_eq!(h.list.window().scroll_top(), 0);
    }

    #[test]
    fn wheel_near_bottom_grows_window() {
        let keys = numbered(25);
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        let mut h = Harness::new(&keys, Location::new("/home"));
        assert_eq!(h.list.visible().len(), 10);

        // 40 rows of content in a 12-row viewport; growth starts past row 20
        assert!(!h.list.scroll_by(10));
        assert!(h.list.scroll_by(12));
        assert_eq!(h.list.window().range(), 1);
        assert_eq!(h.list.visible().len(), 20);
    }

    #[test]
    fn pathname_change_resets_window() {
        let keys = numbered(25);
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        let mut h = Harness::new(&keys, Location::new("/home"));
        h.list.scroll_by(40);
        assert_eq!(h.list.window().range(), 1);

        h.router.push(Location::new("/storages/s1"));
        h.list.sync(&h.library, &mut h.router);
        assert_eq!(h.list.window().range(), 0);
        assert_eq!(h.list.window().scroll_top(), 0);
    }

    #[test]
    fn query_only_change_keeps_window() {
        let keys = numbered(25);
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        let mut h = Harness::new(&keys, Location::new("/home"));
        h.list.scroll_by(40);

        h.list.click(&NoteId::new("s1", "n2"), &mut h.router);
        h.list.sync(&h.library, &mut h.router);
        assert_eq!(h.list.window().range(), 1);
    }

    #[test]
    fn refresh_tick_keeps_window_scroll_and_selection() {
        let keys = numbered(25);
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        let mut h = Harness::new(&keys, Location::new("/home"));
        h.list.click(&NoteId::new("s1", "n2"), &mut h.router);
        h.list.sync(&h.library, &mut h.router);
        assert!(h.list.scroll_by(24));

        let range = h.list.window().range();
        let scroll_top = h.list.window().scroll_top();
        assert_eq!((range, scroll_top), (1, 24));

        // what the app loop runs for each refresh tick
        for _ in 0..3 {
            h.pump();
            h.list.sync(&h.library, &mut h.router);
        }
        assert_eq!(h.list.window().range(), range);
        assert_eq!(h.list.window().scroll_top(), scroll_top);
        assert_eq!(h.key(), Some("s1-n2"));
        assert_eq!(h.router.history_len(), 2);
    }

    #[test]
    fn dashed_storage_key_selects_and_moves() {
        let library = library_in("my-store", &["n1", "n2", "n3"]);
        let mut h = Harness::with_library(library, Location::new("/storages/my-store"));
        assert_eq!(h.key(), Some("my-store-n1"));

        let second = NoteId::new("my-store", "n2");
        h.list.click(&second, &mut h.router);
        h.list.sync(&h.library, &mut h.router);
        assert_eq!(h.key(), Some("my-store-n2"));
        assert_eq!(h.list.selected(&h.router), Some(&second));

        assert!(h.list.select_next(&mut h.router, &mut h.bus));
        h.pump();
        assert_eq!(h.key(), Some("my-store-n3"));

        let id = h.delete("my-store-n3", DialogChoice::Confirm).unwrap();
        assert_eq!(id, NoteId::new("my-store", "n3"));
        assert_eq!(h.key(), Some("my-store-n1"));
        h.finish(&id, Ok(id.clone()));
        assert!(h.library.note(&id).is_none());
        assert_eq!(h.list.notes().len(), 2);
    }

    #[test]
    fn short_list_fills_tall_viewport() {
        let keys = numbered(25);
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        let mut bus = EventBus::default();
        let tall = ListGeometry {
            viewport_height: 100,
            ..GEOMETRY
        };
        let mut list = NoteList::mount(&mut bus, tall, None);
        let mut router = Router::new(Location::new("/home"));
        let library = library(&keys);

        list.sync(&library, &mut router);
        list.sync(&library, &mut router);
        assert_eq!(list.visible().len(), 25);
        list.sync(&library, &mut router);
        assert_eq!(list.window().range(), 2);
    }

    #[test]
    fn item_at_row_accounts_for_scroll() {
        let mut h = Harness::new(&["n1", "n2", "n3", "n4", "n5"], Location::new("/home"));
        assert_eq!(h.list.item_at_row(0), Some(&NoteId::new("s1", "n1")));
        assert_eq!(h.list.item_at_row(5), Some(&NoteId::new("s1", "n2")));
        h.list.scroll_by(4);
        assert_eq!(h.list.item_at_row(0), Some(&NoteId::new("s1", "n2")));
        assert_eq!(h.list.item_at_row(40), None);
    }

    #[test]
    fn deleting_selected_note_moves_before_removal() {
        let mut h = Harness::new(&["n4", "n5", "n6"], Location::new("/home"));
        h.list.click(&NoteId::new("s1", "n5"), &mut h.router);

        let id = h.delete("s1-n5", DialogChoice::Confirm).unwrap();
        assert_eq!(h.key(), Some("s1-n6"));
        assert_eq!(h.library.note_map.len(), 3);

        h.finish(&id, Ok(id.clone()));
        assert_eq!(h.library.note_map.len(), 2);
        assert_eq!(h.key(), Some("s1-n6"));

        let moved = h.log.iter().position(|e| e == "list:moved").unwrap();
        let removed = h
            .log
            .iter()
            .position(|e| e.starts_with("DeleteNote"))
            .unwrap();
        assert!(moved < removed);
        assert_eq!(h.count("list:moved"), 1);
        assert_eq!(h.log.iter().filter(|e| e.starts_with("DeleteNote")).count(), 1);
        assert_eq!(h.bus.subscription_count(), 3);
    }

    #[test]
    fn deleting_selected_last_note_wraps_to_first() {
        let mut h = Harness::new(&["n1", "n2", "n5"], Location::new("/home"));
        h.list.click(&NoteId::new("s1", "n5"), &mut h.router);

        let id = h.delete("s1-n5", DialogChoice::Confirm).unwrap();
        assert_eq!(h.key(), Some("s1-n1"));
        h.finish(&id, Ok(id.clone()));
        assert_eq!(h.key(), Some("s1-n1"));
        assert!(h.library.note(&id).is_none());
    }

    #[test]
    fn deleting_only_note_clears_selection() {
        let mut h = Harness::new(&["n1"], Location::new("/home"));
        let id = h.delete("s1-n1", DialogChoice::Confirm).unwrap();
        h.finish(&id, Ok(id.clone()));
        assert_eq!(h.key(), None);
        assert!(h.list.visible().is_empty());
    }

    #[test]
    fn deleting_unselected_note_does_not_move_selection() {
        let mut h = Harness::new(&["n1", "n2", "n3"], Location::new("/home"));
        let id = h.delete("s1-n3", DialogChoice::Confirm).unwrap();
        h.finish(&id, Ok(id.clone()));

        assert_eq!(h.key(), Some("s1-n1"));
        assert_eq!(h.count("list:moved"), 0);
        assert_eq!(h.log.iter().filter(|e| e.starts_with("DeleteNote")).count(), 1);
    }

    #[test]
    fn declined_delete_changes_nothing() {
        let mut h = Harness::new(&["n1", "n2"], Location::new("/home"));
        assert_eq!(h.delete("s1-n1", DialogChoice::Cancel), None);
        assert_eq!(h.key(), Some("s1-n1"));
        assert!(h.log.is_empty());
        assert_eq!(h.library.note_map.len(), 2);
    }

    #[test]
    fn rejected_delete_keeps_note_and_releases_listener() {
        let mut h = Harness::new(&["n1", "n2"], Location::new("/home"));
        let id = h.delete("s1-n1", DialogChoice::Confirm).unwrap();
        assert_eq!(h.key(), Some("s1-n2"));

        h.finish(&id, Err("disk full".to_string()));
        assert_eq!(h.library.note_map.len(), 2);
        assert!(!h.list.is_deleting(&id));
        assert_eq!(h.bus.subscription_count(), 3);

        // a later unrelated move must not remove anything
        h.bus.emit(Topic::ListNext);
        h.pump();
        assert_eq!(h.log.iter().filter(|e| e.starts_with("DeleteNote")).count(), 0);
    }

    #[test]
    fn pending_delete_refuses_second_dispatch() {
        let mut h = Harness::new(&["n1", "n2"], Location::new("/home"));
        h.delete("s1-n2", DialogChoice::Confirm).unwrap();
        let again = h.list.confirm_delete(
            NoteId::new("s1", "n2"),
            DialogChoice::Confirm,
            &h.router,
            &mut h.bus,
        );
        assert!(again.is_err());
    }

    #[test]
    fn external_removal_of_selected_note_falls_back_to_first() {
        let mut h = Harness::new(&["n1", "n2", "n3"], Location::new("/home"));
        h.list.click(&NoteId::new("s1", "n3"), &mut h.router);
        h.apply(StoreAction::DeleteNote {
            storage_key: "s1".to_string(),
            note_key: "n3".to_string(),
        });
        assert_eq!(h.key(), Some("s1-n1"));
    }

    #[test]
    fn unmount_releases_every_subscription() {
        let mut h = Harness::new(&["n1", "n2"], Location::new("/home"));
        h.delete("s1-n1", DialogChoice::Confirm).unwrap();
        let mut bus = std::mem::take(&mut h.bus);
        // the pending delete's one-shot already fired; add one more still waiting
        h.list.click(&NoteId::new("s1", "n2"), &mut h.router);
        h.list
            .confirm_delete(NoteId::new("s1", "n2"), DialogChoice::Confirm, &h.router, &mut bus)
            .unwrap();
        assert_eq!(bus.subscription_count(), 4);

        h.list.unmount(&mut bus);
        assert_eq!(bus.subscription_count(), 0);
    }
}
