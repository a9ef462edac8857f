//! Note session use-cases.
//!
//! # Responsibility
//! - Orchestrate note-list mutations, session state and persistence calls.
//! - Keep presentation layers decoupled from storage details.

pub mod config;
pub mod note_controller;
