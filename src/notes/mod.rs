//! Session-scoped notes.
//!
//! Each session owns an append-only list of notes. Titles are assigned at
//! append time from the note's 1-based position, so numbering has no gaps
//! and never repeats within a session.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::observability::metrics;
use crate::session::{SessionId, SessionStore};

/// A titled note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub title: String,
    pub body: String,
}

impl Note {
    fn numbered(position: usize, body: String) -> Self {
        Self {
            title: format!("Note {position}"),
            body,
        }
    }
}

/// Note operations over an injected session store.
#[derive(Clone)]
pub struct NoteStore {
    sessions: Arc<dyn SessionStore>,
}

impl NoteStore {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    /// Append `text` as a new note, creating the session's collection on
    /// first use. Every call adds a note.
    pub fn append(&self, session: &SessionId, text: String) -> Note {
        let mut position = 0;
        self.sessions.modify(session, &mut |record| {
            let note = Note::numbered(record.notes.len() + 1, text.clone());
            record.notes.push(note);
            position = record.notes.len();
        });

        metrics::record_note_appended();
        tracing::debug!(session = %session, position, "Note appended");
        Note::numbered(position, text)
    }

    /// Notes of `session` in insertion order; empty when nothing was saved.
    pub fn list(&self, session: &SessionId) -> Vec<Note> {
        self.sessions
            .read(session)
            .map(|record| record.notes)
            .unwrap_or_default()
    }
}
