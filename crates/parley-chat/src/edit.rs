//! Per-row rename state machine.
//!
//! A session row is Viewing by default (no `SessionEdit` exists for it),
//! moves to Editing when the user starts a rename, and to Saving while the
//! rename call is outstanding. Begin, local edits and cancel never touch
//! the network.

use parley_core::types::DEFAULT_SESSION_TITLE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    /// Draft is being edited locally.
    Editing,
    /// The rename call is outstanding.
    Saving,
}

/// Rename-in-progress for one session row.
#[derive(Debug, Clone)]
pub struct SessionEdit {
    pub session_id: String,
    pub draft_title: String,
    pub phase: EditPhase,
    /// Failure text from the last save attempt, shown while retrying.
    pub error: Option<String>,
}

impl SessionEdit {
    /// Starts editing, capturing the row's current title as the draft.
    /// Untitled rows start from the default placeholder.
    pub fn begin(session_id: String, current_title: Option<String>) -> Self {
        Self {
            session_id,
            draft_title: current_title.unwrap_or_else(|| DEFAULT_SESSION_TITLE.to_string()),
            phase: EditPhase::Editing,
            error: None,
        }
    }

    /// Replaces the draft. Ignored while a save is outstanding.
    pub fn set_draft(&mut self, text: String) {
        if self.phase == EditPhase::Editing {
            self.draft_title = text;
            self.error = None;
        }
    }

    pub fn is_saving(&self) -> bool {
        self.phase == EditPhase::Saving
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_captures_current_title() {
        let edit = SessionEdit::begin("s1".to_string(), Some("Trip notes".to_string()));
        assert_eq!(edit.draft_title, "Trip notes");
        assert_eq!(edit.phase, EditPhase::Editing);
        assert!(edit.error.is_none());
    }

    #[test]
    fn test_begin_defaults_untitled_rows() {
        let edit = SessionEdit::begin("s1".to_string(), None);
        assert_eq!(edit.draft_title, DEFAULT_SESSION_TITLE);
    }

    #[test]
    fn test_draft_edits_are_local() {
        let mut edit = SessionEdit::begin("s1".to_string(), None);
        edit.set_draft("Renamed".to_string());
        assert_eq!(edit.draft_title, "Renamed");
    }

    #[test]
    fn test_draft_frozen_while_saving() {
        let mut edit = SessionEdit::begin("s1".to_string(), None);
        edit.set_draft("Renamed".to_string());
        edit.phase = EditPhase::Saving;
        edit.set_draft("Too late".to_string());
        assert_eq!(edit.draft_title, "Renamed");
    }
}
