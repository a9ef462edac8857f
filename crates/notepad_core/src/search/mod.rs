//! Phrase search over the in-memory note list.
//!
//! # Responsibility
//! - Filter notes by case-insensitive substring match.
//! - Distinguish "no filter" from "filter that matches everything".

pub mod filter;
