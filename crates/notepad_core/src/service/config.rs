//! Session controller configuration.
//!
//! Defaults reproduce the classic single-page behavior: unreadable storage
//! starts an empty list and navigation silently discards unsaved edits.

/// How `NoteController::open` reacts to an unreadable notes blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Log a warning and start with an empty list.
    #[default]
    Lenient,
    /// Fail with `SessionError::PersistenceUnavailable`.
    Strict,
}

/// How navigation treats unsaved edits of the active note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscardPolicy {
    /// Switch notes and drop the buffered edits.
    #[default]
    Silent,
    /// Reject create/select with `SessionError::UnsavedChanges` while dirty.
    Refuse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerConfig {
    pub load_policy: LoadPolicy,
    pub discard_policy: DiscardPolicy,
}

impl ControllerConfig {
    pub fn strict() -> Self {
        Self {
            load_policy: LoadPolicy::Strict,
            discard_policy: DiscardPolicy::Refuse,
        }
    }

    pub fn with_load_policy(mut self, load_policy: LoadPolicy) -> Self {
        self.load_policy = load_policy;
        self
    }

    pub fn with_discard_policy(mut self, discard_policy: DiscardPolicy) -> Self {
        self.discard_policy = discard_policy;
        self
    }
}
