//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record shared by storage and session layers.
//! - Provide display helpers used by list projections.
//!
//! # Invariants
//! - `id` is assigned once at creation and never changes.
//! - `title` and `body` default to empty strings, including for legacy
//!   records that omit them.

use serde::{Deserialize, Serialize};

/// Integer identifier of a note within one note list.
pub type NoteId = i64;

/// Label shown for notes whose title is blank.
pub const UNTITLED_NOTE_LABEL: &str = "Untitled Note";

/// One short text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl Note {
    /// Creates an empty note with the given id.
    pub fn new(id: NoteId) -> Self {
        Self::with_content(id, String::new(), String::new())
    }

    /// Creates a note with caller-provided content.
    ///
    /// Used by import paths and test fixtures where content already exists.
    pub fn with_content(id: NoteId, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Returns the title, or [`UNTITLED_NOTE_LABEL`] when it is blank.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            UNTITLED_NOTE_LABEL
        } else {
            self.title.as_str()
        }
    }

    /// Returns whether both title and body are blank.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.body.trim().is_empty()
    }

    /// Text searched by the phrase filter: title immediately followed by body.
    pub fn searchable_text(&self) -> String {
        format!("{}{}", self.title, self.body)
    }
}
