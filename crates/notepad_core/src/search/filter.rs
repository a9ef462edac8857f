//! Case-insensitive substring filter.
//!
//! # Invariants
//! - Matching runs against `title + body` with no separator.
//! - A blank phrase yields [`SearchOutcome::Unfiltered`], never `Matches`.
//! - Matched ids keep note-list order.

use crate::model::note::{Note, NoteId};

/// Result of applying a search phrase to a note list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// No filter is active; the presentation shows the full list.
    Unfiltered,
    /// Ids of notes matching a non-blank phrase, possibly empty.
    Matches(Vec<NoteId>),
}

impl SearchOutcome {
    pub fn is_filtered(&self) -> bool {
        matches!(self, Self::Matches(_))
    }

    /// Returns whether the note with `id` should be listed.
    pub fn includes(&self, id: NoteId) -> bool {
        match self {
            Self::Unfiltered => true,
            Self::Matches(ids) => ids.contains(&id),
        }
    }
}

/// Returns whether `phrase` activates filtering.
///
/// Whitespace-only input is treated like an empty search box.
pub fn is_filter_phrase(phrase: &str) -> bool {
    !phrase.trim().is_empty()
}

/// Applies `phrase` to `notes` without mutating them.
///
/// A non-blank phrase is matched as typed; surrounding whitespace is
/// significant.
pub fn search_notes(notes: &[Note], phrase: &str) -> SearchOutcome {
    if !is_filter_phrase(phrase) {
        return SearchOutcome::Unfiltered;
    }

    let needle = phrase.to_lowercase();
    let ids = notes
        .iter()
        .filter(|note| note.searchable_text().to_lowercase().contains(needle.as_str()))
        .map(|note| note.id)
        .collect();
    SearchOutcome::Matches(ids)
}

#[cfg(test)]
mod tests {
    use super::{search_notes, SearchOutcome};
    use crate::model::note::Note;

    fn fixture() -> Vec<Note> {
        vec![
            Note::with_content(1, "Alpha", "first"),
            Note::with_content(2, "Beta Gamma", "second"),
            Note::with_content(3, "", "GAMMA ray"),
        ]
    }

    #[test]
    fn empty_and_blank_phrases_are_unfiltered() {
        let notes = fixture();
        assert_eq!(search_notes(&notes, ""), SearchOutcome::Unfiltered);
        assert_eq!(search_notes(&notes, "   "), SearchOutcome::Unfiltered);
    }

    #[test]
    fn match_is_case_insensitive_and_keeps_list_order() {
        let notes = fixture();
        assert_eq!(
            search_notes(&notes, "gAmMa"),
            SearchOutcome::Matches(vec![2, 3])
        );
    }

    #[test]
    fn phrase_matching_every_note_is_still_filtered() {
        let notes = fixture();
        let outcome = search_notes(&notes, "s");
        assert_eq!(outcome, SearchOutcome::Matches(vec![1, 2, 3]));
        assert!(outcome.is_filtered());
        assert_ne!(outcome, SearchOutcome::Unfiltered);
    }

    #[test]
    fn match_spans_title_body_boundary() {
        let notes = vec![Note::with_content(1, "Alp", "ha")];
        assert_eq!(search_notes(&notes, "alpha"), SearchOutcome::Matches(vec![1]));
        assert_eq!(search_notes(&notes, "alp ha"), SearchOutcome::Matches(Vec::new()));
    }

    #[test]
    fn no_hits_yields_empty_matches() {
        let notes = fixture();
        let outcome = search_notes(&notes, "zeta");
        assert_eq!(outcome, SearchOutcome::Matches(Vec::new()));
        assert!(!outcome.includes(1));
        assert!(SearchOutcome::Unfiltered.includes(1));
    }
}
