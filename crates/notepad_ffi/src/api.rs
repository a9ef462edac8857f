//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the note session intents to Dart via FRB.
//! - Translate core errors into simple response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Session state lives in an explicit `NotepadSession` handle owned by the
//!   caller; there is no process-wide note state.

use flutter_rust_bridge::frb;
use log::warn;
use notepad_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    open_sqlite_controller, ping as ping_inner, ControllerConfig, DiscardPolicy, LoadPolicy,
    Note, NoteId, SearchOutcome, SessionError, SqliteNoteController,
};
use std::sync::{Mutex, MutexGuard};

/// Minimal health-check API for FRB smoke integration.
#[frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One note row for list and editor rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: i64,
    pub title: String,
    pub body: String,
    /// Title or `Untitled Note` placeholder.
    pub display_title: String,
}

/// Full view model rendered after every intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    /// All notes in list order.
    pub items: Vec<NoteItem>,
    /// Ids to show in the list under the current search phrase.
    pub visible_ids: Vec<i64>,
    pub active_note_id: Option<i64>,
    pub search_phrase: String,
    /// `true` while the active note has unsaved edits (enables Save).
    pub dirty: bool,
    pub filter_active: bool,
}

/// Result envelope for mutating intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    pub ok: bool,
    /// Note affected by the intent, when there is one.
    pub note_id: Option<i64>,
    /// Stable machine-readable code (`ok`, `not_found`, `no_active_note`, ...).
    pub code: String,
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, note_id: Option<NoteId>) -> Self {
        Self {
            ok: true,
            note_id,
            code: "ok".to_string(),
            message: message.into(),
        }
    }

    fn failure(context: &str, err: &SessionError) -> Self {
        Self {
            ok: false,
            note_id: None,
            code: error_code(err).to_string(),
            message: format!("{context} failed: {err}"),
        }
    }
}

/// Search response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    /// `false` when the phrase is blank and the full list should be shown.
    pub filtered: bool,
    pub matched_ids: Vec<i64>,
    pub message: String,
}

/// Explicit session handle. Dart owns it and passes it to every call.
#[frb(opaque)]
pub struct NotepadSession {
    controller: Mutex<SqliteNoteController>,
}

impl NotepadSession {
    /// Opens the note database at `db_path` and loads its notes.
    ///
    /// `strict = true` reports unreadable data and refuses to drop unsaved
    /// edits on navigation; `false` keeps the lenient defaults.
    #[frb(sync)]
    pub fn open(db_path: String, strict: bool) -> Result<NotepadSession, String> {
        let config = if strict {
            ControllerConfig::default()
                .with_load_policy(LoadPolicy::Strict)
                .with_discard_policy(DiscardPolicy::Refuse)
        } else {
            ControllerConfig::default()
        };
        let controller = open_sqlite_controller(db_path.trim(), config)
            .map_err(|err| format!("open_session failed: {err}"))?;
        Ok(Self {
            controller: Mutex::new(controller),
        })
    }

    #[frb(sync)]
    pub fn create_note(&self) -> NoteActionResponse {
        self.run("create_note", |controller| {
            let id = controller.create_note()?;
            Ok(NoteActionResponse::success("Note created.", Some(id)))
        })
    }

    #[frb(sync)]
    pub fn select_note(&self, note_id: i64) -> NoteActionResponse {
        self.run("select_note", |controller| {
            controller.select_note(note_id)?;
            Ok(NoteActionResponse::success("Note opened.", Some(note_id)))
        })
    }

    /// Selects `note_id` after the user confirmed discarding unsaved edits.
    #[frb(sync)]
    pub fn select_note_discarding(&self, note_id: i64) -> NoteActionResponse {
        self.run("select_note_discarding", |controller| {
            controller.select_note_discarding(note_id)?;
            Ok(NoteActionResponse::success("Note opened.", Some(note_id)))
        })
    }

    #[frb(sync)]
    pub fn mark_changed(&self) -> NoteActionResponse {
        self.run("mark_changed", |controller| {
            controller.mark_changed()?;
            let active = controller.session().active_note_id;
            Ok(NoteActionResponse::success("Unsaved changes.", active))
        })
    }

    #[frb(sync)]
    pub fn save_active_note(&self, title: String, body: String) -> NoteActionResponse {
        self.run("save_active_note", |controller| {
            controller.save_active_note(title, body)?;
            let active = controller.session().active_note_id;
            Ok(NoteActionResponse::success("Note saved.", active))
        })
    }

    #[frb(sync)]
    pub fn delete_active_note(&self) -> NoteActionResponse {
        self.run("delete_active_note", |controller| {
            let id = controller.delete_active_note()?;
            Ok(NoteActionResponse::success("Note deleted.", Some(id)))
        })
    }

    /// Applies `phrase` and reports which notes match.
    ///
    /// Fails with a message when the handle is unusable; `filtered: false`
    /// always means a blank phrase.
    #[frb(sync)]
    pub fn search(&self, phrase: String) -> Result<SearchResponse, String> {
        let mut controller = self.lock()?;
        let response = match controller.search(phrase) {
            SearchOutcome::Unfiltered => SearchResponse {
                filtered: false,
                matched_ids: Vec::new(),
                message: "Showing all notes.".to_string(),
            },
            SearchOutcome::Matches(ids) => {
                let message = if ids.is_empty() {
                    "No results.".to_string()
                } else {
                    format!("Found {} result(s).", ids.len())
                };
                SearchResponse {
                    filtered: true,
                    matched_ids: ids,
                    message,
                }
            }
        };
        Ok(response)
    }

    #[frb(sync)]
    pub fn clear_search(&self) -> NoteActionResponse {
        self.run("clear_search", |controller| {
            controller.clear_search();
            Ok(NoteActionResponse::success("Search cleared.", None))
        })
    }

    /// Returns the current view model, or an error message if the handle is
    /// unusable.
    #[frb(sync)]
    pub fn view(&self) -> Result<SessionView, String> {
        let controller = self.lock()?;
        let snapshot = controller.snapshot();
        Ok(SessionView {
            items: snapshot.notes.iter().map(to_note_item).collect(),
            visible_ids: snapshot.visible_note_ids,
            active_note_id: snapshot.active_note_id,
            search_phrase: snapshot.search_phrase,
            dirty: snapshot.dirty,
            filter_active: snapshot.filter_active,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, SqliteNoteController>, String> {
        self.controller.lock().map_err(|_| {
            warn!("event=ffi_lock module=ffi status=error error_code=poisoned");
            "notepad session is unusable after an earlier panic".to_string()
        })
    }

    fn run(
        &self,
        context: &str,
        f: impl FnOnce(&mut SqliteNoteController) -> Result<NoteActionResponse, SessionError>,
    ) -> NoteActionResponse {
        let mut controller = match self.lock() {
            Ok(controller) => controller,
            Err(message) => {
                return NoteActionResponse {
                    ok: false,
                    note_id: None,
                    code: "unavailable".to_string(),
                    message,
                }
            }
        };
        match f(&mut controller) {
            Ok(response) => response,
            Err(err) => NoteActionResponse::failure(context, &err),
        }
    }
}

fn error_code(err: &SessionError) -> &'static str {
    match err {
        SessionError::NotFound(_) => "not_found",
        SessionError::NoActiveNote => "no_active_note",
        SessionError::UnsavedChanges(_) => "unsaved_changes",
        SessionError::IdSpaceExhausted => "id_space_exhausted",
        SessionError::PersistenceUnavailable(_) => "persistence_unavailable",
    }
}

fn to_note_item(note: &Note) -> NoteItem {
    NoteItem {
        id: note.id,
        title: note.title.clone(),
        body: note.body.clone(),
        display_title: note.display_title().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{core_version, init_logging, ping, NotepadSession};

    fn open_temp_session(strict: bool) -> (tempfile::TempDir, NotepadSession) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("notepad.db");
        let session = NotepadSession::open(
            path.to_str().expect("utf-8 path").to_string(),
            strict,
        )
        .expect("session should open");
        (dir, session)
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn create_edit_save_flow_updates_view() {
        let (_dir, session) = open_temp_session(false);

        let created = session.create_note();
        assert!(created.ok, "{}", created.message);
        let id = created.note_id.expect("created note id");

        let view = session.view().expect("view");
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].display_title, "Untitled Note");
        assert_eq!(view.active_note_id, Some(id));

        assert!(session.mark_changed().ok);
        assert!(session.view().expect("view").dirty);

        let saved = session.save_active_note("Groceries".to_string(), "milk".to_string());
        assert!(saved.ok, "{}", saved.message);
        let view = session.view().expect("view");
        assert_eq!(view.items[0].title, "Groceries");
        assert_eq!(view.items[0].body, "milk");
        assert!(!view.dirty);
    }

    #[test]
    fn search_and_clear_search_toggle_filter() {
        let (_dir, session) = open_temp_session(false);
        session.create_note();
        session.save_active_note("Alpha".to_string(), String::new());
        let beta = session.create_note().note_id.expect("beta id");
        session.save_active_note("Beta Gamma".to_string(), String::new());

        let response = session.search("gamma".to_string()).expect("search");
        assert!(response.filtered);
        assert_eq!(response.matched_ids, vec![beta]);
        assert_eq!(session.view().expect("view").visible_ids, vec![beta]);

        assert!(session.clear_search().ok);
        let view = session.view().expect("view");
        assert!(!view.filter_active);
        assert_eq!(view.visible_ids.len(), 2);
    }

    #[test]
    fn search_reports_error_when_session_is_poisoned() {
        let (_dir, session) = open_temp_session(false);
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = session.controller.lock().expect("fresh lock");
            panic!("poison the session lock");
        }));

        let err = session
            .search("anything".to_string())
            .expect_err("poisoned session must not look unfiltered");
        assert!(err.contains("unusable"));
        assert!(session.view().is_err());
        assert_eq!(session.create_note().code, "unavailable");
    }

    #[test]
    fn usage_errors_report_stable_codes() {
        let (_dir, session) = open_temp_session(false);

        let deleted = session.delete_active_note();
        assert!(!deleted.ok);
        assert_eq!(deleted.code, "no_active_note");

        let selected = session.select_note(404);
        assert!(!selected.ok);
        assert_eq!(selected.code, "not_found");
    }

    #[test]
    fn strict_session_refuses_to_drop_unsaved_edits() {
        let (_dir, session) = open_temp_session(true);
        let first = session.create_note().note_id.expect("first id");
        let second = session.create_note().note_id.expect("second id");
        assert!(session.mark_changed().ok);

        let refused = session.select_note(first);
        assert!(!refused.ok);
        assert_eq!(refused.code, "unsaved_changes");
        assert_eq!(session.view().expect("view").active_note_id, Some(second));

        assert!(session.select_note_discarding(first).ok);
        assert_eq!(session.view().expect("view").active_note_id, Some(first));
    }
}
