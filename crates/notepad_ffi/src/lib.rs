//! Flutter-facing bindings for Notepad.
//!
//! # Responsibility
//! - Host FRB-exported APIs over `notepad_core`.
//! - Keep the binding a thin skin: no business rules live here.

pub mod api;
