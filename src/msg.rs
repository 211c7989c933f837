use crossterm::event::{KeyEvent, MouseEvent};

use crate::model::note::NoteId;

/// All possible messages that drive state transitions.
#[derive(Debug)]
pub enum Msg {
    // -- Input events (raw)
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),

    // -- Library
    LibraryChanged,
    /// Completion of a dispatched delete; `Ok` carries the deleted identity.
    NoteDeleted {
        id: NoteId,
        result: Result<NoteId, String>,
    },

    // -- System
    /// Periodic redraw so relative times stay current.
    Refresh,
}
