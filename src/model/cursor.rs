use super::note::NoteId;

/// Direction of a keyboard-driven selection move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Prior,
}

/// Identity the selection moves to, or `None` when the move is a no-op.
///
/// A current identity that is absent from the list (or no selection at all)
/// lands on the first note in either direction.
pub fn step<'a>(list: &'a [NoteId], current: Option<&NoteId>, step: Step) -> Option<&'a NoteId> {
    match step {
        Step::Next => next(list, current),
        Step::Prior => prior(list, current),
    }
}

/// Advance one note; moving past the last note wraps to the first.
pub fn next<'a>(list: &'a [NoteId], current: Option<&NoteId>) -> Option<&'a NoteId> {
    if list.is_empty() {
        return None;
    }

    let target = match position(list, current) {
        Some(idx) if idx == list.len() - 1 => 0,
        Some(idx) => idx + 1,
        None => 0,
    };
    list.get(target)
}

/// Go back one note; at the first note this is a no-op.
pub fn prior<'a>(list: &'a [NoteId], current: Option<&NoteId>) -> Option<&'a NoteId> {
    if list.is_empty() {
        return None;
    }

    let target = match position(list, current) {
        Some(0) => return None,
        Some(idx) => idx - 1,
        None => 0,
    };
    list.get(target)
}

fn position(list: &[NoteId], current: Option<&NoteId>) -> Option<usize> {
    let current = current?;
    list.iter().position(|id| id == current)
}
