//! Note store and session controller.
//!
//! # Responsibility
//! - Own the note list, the active note, the search phrase and the dirty flag.
//! - Persist the whole list after every create, save and delete.
//! - Expose presentation-facing intents and read-only snapshots.
//!
//! # Invariants
//! - Note ids are unique; new ids come from a monotonic counter seeded with
//!   `max(existing ids) + 1`. Once the counter hits the top of the id range,
//!   the smallest unused positive id is handed out instead.
//! - `active_note_id`, when set, references a note in the list.
//! - `dirty` is `false` right after create, select and save.
//! - A failed persistence write leaves list and session exactly as before the
//!   call, so storage never lags behind an in-memory mutation silently.
//! - Usage errors (`NotFound`, `NoActiveNote`, `UnsavedChanges`) never mutate
//!   state.

use crate::model::note::{Note, NoteId};
use crate::model::session::{Session, SessionState};
use crate::repo::{PersistenceGateway, StoreError};
use crate::search::filter::{is_filter_phrase, search_notes, SearchOutcome};
use crate::service::config::{ControllerConfig, DiscardPolicy, LoadPolicy};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SessionResult<T> = Result<T, SessionError>;

/// Error for session intents.
#[derive(Debug)]
pub enum SessionError {
    /// Requested note does not exist.
    NotFound(NoteId),
    /// Intent requires an active note but none is selected.
    NoActiveNote,
    /// Active note has unsaved edits and the discard policy refuses to drop them.
    UnsavedChanges(NoteId),
    /// Every positive integer id is taken.
    IdSpaceExhausted,
    /// Storage read or write failed.
    PersistenceUnavailable(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::NoActiveNote => write!(f, "no active note"),
            Self::UnsavedChanges(id) => write!(f, "note {id} has unsaved changes"),
            Self::IdSpaceExhausted => write!(f, "note id space exhausted"),
            Self::PersistenceUnavailable(err) => write!(f, "persistence unavailable: {err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PersistenceUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::PersistenceUnavailable(value)
    }
}

/// Owned read model handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub notes: Vec<Note>,
    pub active_note_id: Option<NoteId>,
    pub search_phrase: String,
    pub dirty: bool,
    /// Ids to list, in note-list order, after applying the search phrase.
    pub visible_note_ids: Vec<NoteId>,
    /// `false` when the phrase is blank and the full list is shown.
    pub filter_active: bool,
}

/// Controller for one editing session over one persisted note list.
///
/// Construct once per process or UI session and hand it to the presentation
/// layer by reference.
pub struct NoteController<G: PersistenceGateway> {
    gateway: G,
    config: ControllerConfig,
    notes: Vec<Note>,
    session: Session,
    next_id: NoteId,
}

impl<G: PersistenceGateway> NoteController<G> {
    /// Loads the note list and starts a fresh session with default config.
    pub fn new(gateway: G) -> SessionResult<Self> {
        Self::open(gateway, ControllerConfig::default())
    }

    /// Loads the note list and starts a fresh session.
    ///
    /// # Errors
    /// - `PersistenceUnavailable` when loading fails under `LoadPolicy::Strict`.
    pub fn open(gateway: G, config: ControllerConfig) -> SessionResult<Self> {
        let notes = match gateway.load() {
            Ok(Some(notes)) => notes,
            Ok(None) => Vec::new(),
            Err(err) => match config.load_policy {
                LoadPolicy::Lenient => {
                    warn!(
                        "event=session_open module=session status=degraded fallback=empty_list error={}",
                        err
                    );
                    Vec::new()
                }
                LoadPolicy::Strict => {
                    warn!(
                        "event=session_open module=session status=error error_code=load_failed error={}",
                        err
                    );
                    return Err(err.into());
                }
            },
        };

        let next_id = seed_next_id(&notes);
        info!(
            "event=session_open module=session status=ok count={} next_id={}",
            notes.len(),
            next_id
        );

        Ok(Self {
            gateway,
            config,
            notes,
            session: Session::default(),
            next_id,
        })
    }

    /// Appends an empty note, persists the list and makes the note active.
    ///
    /// # Errors
    /// - `UnsavedChanges` when dirty under `DiscardPolicy::Refuse`.
    /// - `IdSpaceExhausted` when no positive id is left unused.
    /// - `PersistenceUnavailable` when the save fails; the note is not kept.
    pub fn create_note(&mut self) -> SessionResult<NoteId> {
        self.ensure_can_leave_active()?;

        let id = self.allocate_id()?;

        self.notes.push(Note::new(id));
        if let Err(err) = self.gateway.save(&self.notes) {
            self.notes.pop();
            warn!(
                "event=note_create module=session status=error note_id={} error={}",
                id, err
            );
            return Err(err.into());
        }

        self.next_id = id.checked_add(1).unwrap_or(id);
        self.session.activate(id);
        info!(
            "event=note_create module=session status=ok note_id={} count={}",
            id,
            self.notes.len()
        );
        Ok(id)
    }

    /// Makes `id` the active note, discarding unsaved edits of the previous one.
    ///
    /// # Errors
    /// - `NotFound` when `id` is not in the list.
    /// - `UnsavedChanges` when dirty under `DiscardPolicy::Refuse`.
    pub fn select_note(&mut self, id: NoteId) -> SessionResult<()> {
        if self.index_of(id).is_none() {
            return Err(SessionError::NotFound(id));
        }
        self.ensure_can_leave_active()?;
        self.activate_existing(id);
        Ok(())
    }

    /// Like [`Self::select_note`] but always drops unsaved edits.
    ///
    /// Used after the presentation layer confirmed the discard with the user.
    pub fn select_note_discarding(&mut self, id: NoteId) -> SessionResult<()> {
        if self.index_of(id).is_none() {
            return Err(SessionError::NotFound(id));
        }
        self.activate_existing(id);
        Ok(())
    }

    /// Records that the presentation layer holds unsaved edits.
    pub fn mark_changed(&mut self) -> SessionResult<()> {
        if self.session.active_note_id.is_none() {
            return Err(SessionError::NoActiveNote);
        }
        self.session.dirty = true;
        Ok(())
    }

    /// Writes `title` and `body` into the active note and persists the list.
    ///
    /// # Errors
    /// - `NoActiveNote` when nothing is selected.
    /// - `PersistenceUnavailable` when the save fails; the previous content
    ///   and dirty flag are kept.
    pub fn save_active_note(
        &mut self,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> SessionResult<()> {
        let (id, index) = self.active_position()?;

        let note = &mut self.notes[index];
        let previous_title = std::mem::replace(&mut note.title, title.into());
        let previous_body = std::mem::replace(&mut note.body, body.into());

        if let Err(err) = self.gateway.save(&self.notes) {
            let note = &mut self.notes[index];
            note.title = previous_title;
            note.body = previous_body;
            warn!(
                "event=note_save module=session status=error note_id={} error={}",
                id, err
            );
            return Err(err.into());
        }

        self.session.dirty = false;
        info!("event=note_save module=session status=ok note_id={}", id);
        Ok(())
    }

    /// Removes the active note, persists the list and clears the selection.
    ///
    /// Returns the removed id.
    ///
    /// # Errors
    /// - `NoActiveNote` when nothing is selected.
    /// - `PersistenceUnavailable` when the save fails; the note is restored at
    ///   its original position and stays active.
    pub fn delete_active_note(&mut self) -> SessionResult<NoteId> {
        let (id, index) = self.active_position()?;

        let removed = self.notes.remove(index);
        if let Err(err) = self.gateway.save(&self.notes) {
            self.notes.insert(index, removed);
            warn!(
                "event=note_delete module=session status=error note_id={} error={}",
                id, err
            );
            return Err(err.into());
        }

        self.session.deactivate();
        info!(
            "event=note_delete module=session status=ok note_id={} count={}",
            id,
            self.notes.len()
        );
        Ok(id)
    }

    /// Records `phrase` as the current search and returns its outcome.
    pub fn search(&mut self, phrase: impl Into<String>) -> SearchOutcome {
        self.session.search_phrase = phrase.into();
        let outcome = search_notes(&self.notes, self.session.search_phrase.as_str());
        debug!(
            "event=note_search module=session status=ok filtered={} hits={}",
            outcome.is_filtered(),
            match &outcome {
                SearchOutcome::Unfiltered => self.notes.len(),
                SearchOutcome::Matches(ids) => ids.len(),
            }
        );
        outcome
    }

    /// Resets the search phrase; the full list becomes visible.
    pub fn clear_search(&mut self) {
        self.session.search_phrase.clear();
    }

    /// Evaluates the current phrase against the current list.
    pub fn search_outcome(&self) -> SearchOutcome {
        search_notes(&self.notes, self.session.search_phrase.as_str())
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn active_note(&self) -> Option<&Note> {
        self.session.active_note_id.and_then(|id| self.note(id))
    }

    pub fn is_dirty(&self) -> bool {
        self.session.dirty
    }

    pub fn config(&self) -> ControllerConfig {
        self.config
    }

    /// Notes listed under the current search phrase, in list order.
    pub fn visible_notes(&self) -> Vec<&Note> {
        let outcome = self.search_outcome();
        self.notes
            .iter()
            .filter(|note| outcome.includes(note.id))
            .collect()
    }

    /// Clones current state for rendering.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            notes: self.notes.clone(),
            active_note_id: self.session.active_note_id,
            search_phrase: self.session.search_phrase.clone(),
            dirty: self.session.dirty,
            visible_note_ids: self.visible_notes().iter().map(|note| note.id).collect(),
            filter_active: is_filter_phrase(self.session.search_phrase.as_str()),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    pub fn into_gateway(self) -> G {
        self.gateway
    }

    fn allocate_id(&self) -> SessionResult<NoteId> {
        if self.index_of(self.next_id).is_none() {
            return Ok(self.next_id);
        }

        let id = first_unused_id(&self.notes, 1..=NoteId::MAX)
            .ok_or(SessionError::IdSpaceExhausted)?;
        debug!(
            "event=note_id_allocate module=session status=ok mode=gap_scan note_id={}",
            id
        );
        Ok(id)
    }

    fn index_of(&self, id: NoteId) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }

    fn active_position(&self) -> SessionResult<(NoteId, usize)> {
        let id = self
            .session
            .active_note_id
            .ok_or(SessionError::NoActiveNote)?;
        let index = self.index_of(id).ok_or(SessionError::NoActiveNote)?;
        Ok((id, index))
    }

    fn ensure_can_leave_active(&self) -> SessionResult<()> {
        match (self.config.discard_policy, self.session.state()) {
            (DiscardPolicy::Refuse, SessionState::ActiveDirty(id)) => {
                Err(SessionError::UnsavedChanges(id))
            }
            _ => Ok(()),
        }
    }

    fn activate_existing(&mut self, id: NoteId) {
        if let SessionState::ActiveDirty(previous) = self.session.state() {
            debug!(
                "event=note_select module=session status=ok discarded_edits_of={}",
                previous
            );
        }
        self.session.activate(id);
        debug!("event=note_select module=session status=ok note_id={}", id);
    }
}

fn seed_next_id(notes: &[Note]) -> NoteId {
    notes
        .iter()
        .map(|note| note.id)
        .max()
        .map_or(1, |max| max.saturating_add(1).max(1))
}

/// Smallest id in `candidates` not used by any note.
///
/// Stops after at most `notes.len() + 1` candidates.
fn first_unused_id(
    notes: &[Note],
    candidates: std::ops::RangeInclusive<NoteId>,
) -> Option<NoteId> {
    let used: HashSet<NoteId> = notes.iter().map(|note| note.id).collect();
    candidates
        .take(notes.len().saturating_add(1))
        .find(|id| !used.contains(id))
}
