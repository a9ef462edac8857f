//! Transient editing session.
//!
//! # Invariants
//! - `dirty` is only ever `true` while `active_note_id` is set.
//! - A fresh session has no active note, an empty phrase and a clean flag.

use super::note::NoteId;

/// Coarse state of the editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoActiveNote,
    ActiveClean(NoteId),
    ActiveDirty(NoteId),
}

/// Per-process session state. Recreated on every start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub active_note_id: Option<NoteId>,
    pub search_phrase: String,
    pub dirty: bool,
}

impl Session {
    /// Returns the state-machine position of this session.
    pub fn state(&self) -> SessionState {
        match (self.active_note_id, self.dirty) {
            (None, _) => SessionState::NoActiveNote,
            (Some(id), false) => SessionState::ActiveClean(id),
            (Some(id), true) => SessionState::ActiveDirty(id),
        }
    }

    pub(crate) fn activate(&mut self, id: NoteId) {
        self.active_note_id = Some(id);
        self.dirty = false;
    }

    pub(crate) fn deactivate(&mut self) {
        self.active_note_id = None;
        self.dirty = false;
    }
}
