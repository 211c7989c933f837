use std::collections::HashMap;
use thiserror::Error;

use crate::bus::{EventBus, Listener, SubscriptionId, Topic};

use super::library::StoreAction;
use super::note::NoteId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeleteError {
    #[error("delete already in progress for {0}")]
    AlreadyPending(NoteId),
}

/// Answer from the confirmation dialog, by button index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogChoice {
    Confirm,
    Cancel,
}

impl DialogChoice {
    pub const BUTTONS: [&'static str; 2] = ["Confirm", "Cancel"];

    pub fn from_index(index: usize) -> Self {
        if index == 0 { Self::Confirm } else { Self::Cancel }
    }
}

#[derive(Debug, Default)]
struct PendingDelete {
    // one-shot `list:moved` subscription, present until the move is seen
    listener: Option<SubscriptionId>,
    resolved: Option<NoteId>,
}

/// Sequences "move the selection away" before "remove the note" when the
/// note being deleted is the selected one.
#[derive(Debug, Default)]
pub struct DeletionCoordinator {
    pending: HashMap<NoteId, PendingDelete>,
}

impl DeletionCoordinator {
    /// Act on the dialog answer. Returns the identity whose delete should be
    /// dispatched now, or `None` when the user declined.
    ///
    /// For the selected note a one-shot `list:moved` listener is registered and
    /// `list:next` is emitted before this returns.
    pub fn confirm(
        &mut self,
        id: NoteId,
        choice: DialogChoice,
        selected: Option<&NoteId>,
        bus: &mut EventBus,
    ) -> Result<Option<NoteId>, DeleteError> {
        if choice == DialogChoice::Cancel {
            return Ok(None);
        }
        if self.pending.contains_key(&id) {
            return Err(DeleteError::AlreadyPending(id));
        }

        let mut pending = PendingDelete::default();
        if selected == Some(&id) {
            pending.listener = Some(bus.once(Topic::ListMoved, Listener::CommitDeletion(id.clone())));
            bus.emit(Topic::ListNext);
        }

        tracing::info!("deleting note {id}");
        self.pending.insert(id.clone(), pending);
        Ok(Some(id))
    }

    pub fn is_pending(&self, id: &NoteId) -> bool {
        self.pending.contains_key(id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// The one-shot `list:moved` listener for `id` fired.
    pub fn selection_moved(&mut self, id: &NoteId) -> Option<StoreAction> {
        let pending = self.pending.get_mut(id)?;
        pending.listener = None;

        let deleted = pending.resolved.take()?;
        self.pending.remove(id);
        Some(removal(deleted))
    }

    /// The delete operation for `id` succeeded with identity `deleted`.
    pub fn resolved(&mut self, id: &NoteId, deleted: NoteId) -> Option<StoreAction> {
        let pending = self.pending.get_mut(id)?;
        if pending.listener.is_some() {
            // removal waits for the selection move
            pending.resolved = Some(deleted);
            return None;
        }

        self.pending.remove(id);
        Some(removal(deleted))
    }

    /// The delete operation for `id` was rejected; drop its listener.
    pub fn rejected(&mut self, id: &NoteId, bus: &mut EventBus) {
        let Some(pending) = self.pending.remove(id) else {
            return;
        };
        if let Some(listener) = pending.listener {
            bus.off(listener);
        }
    }

    /// Release every outstanding listener.
    pub fn release_all(&mut self, bus: &mut EventBus) {
        for (_, pending) in self.pending.drain() {
            if let Some(listener) = pending.listener {
                bus.off(listener);
            }
        }
    }
}

fn removal(deleted: NoteId) -> StoreAction {
    StoreAction::DeleteNote {
        storage_key: deleted.storage_key().to_string(),
        note_key: deleted.note_key().to_string(),
    }
}
