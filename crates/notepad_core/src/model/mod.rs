//! Domain model for the note list and its editing session.
//!
//! # Responsibility
//! - Define the persisted `Note` record and the transient `Session` state.
//! - Keep presentation-agnostic helpers next to the data they describe.
//!
//! # Invariants
//! - Every note is identified by a `NoteId` that is unique within the list.
//! - Session state is never persisted.

pub mod note;
pub mod session;
