use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::autosave::AutoSave;
use crate::storage::{LocalStore, Note, StorageError};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Note not found: {0}")]
    NoteNotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// The active note and the note index.
///
/// Edits land in an in-memory working copy; nothing is written until
/// [`NoteSession::save`] runs, usually from an [`super::AutoSaver`].
pub struct NoteSession {
    store: Arc<LocalStore>,
    notes: Vec<Note>,
    active: Note,
    dirty: bool,
    last_saved: Option<DateTime<Utc>>,
}

impl NoteSession {
    /// Open the session on the previously active note.
    ///
    /// Falls back to the most recently updated note when the recorded id is
    /// missing or dangling, and creates a blank note when there are none.
    pub fn load(store: Arc<LocalStore>) -> Result<Self> {
        let mut notes = store.list_notes();

        let active = match store
            .current_note_id()
            .and_then(|id| notes.iter().find(|n| n.id == id).cloned())
        {
            Some(note) => note,
            None => match most_recent(&notes) {
                Some(note) => {
                    log::info!("No valid current note, falling back to '{}'", note.title);
                    note.clone()
                }
                None => {
                    let note = Note::blank();
                    store.put_note(&note)?;
                    log::info!("Created first note {}", note.id);
                    notes.push(note.clone());
                    note
                }
            },
        };

        store.set_current_note_id(active.id)?;

        Ok(Self {
            store,
            notes,
            active,
            dirty: false,
            last_saved: None,
        })
    }

    /// The working copy of the active note
    pub fn active(&self) -> &Note {
        &self.active
    }

    /// All notes, with the active note's unsaved edits applied
    pub fn notes(&self) -> Vec<Note> {
        self.notes
            .iter()
            .map(|n| {
                if n.id == self.active.id {
                    self.active.clone()
                } else {
                    n.clone()
                }
            })
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    pub fn update_content(&mut self, content: String) {
        self.active.set_content(content);
        self.dirty = true;
    }

    pub fn update_title(&mut self, title: String) {
        self.active.set_title(title);
        self.dirty = true;
    }

    /// Persist the working copy
    pub fn save(&mut self) -> Result<()> {
        self.store.put_note(&self.active)?;
        self.replace_in_index(self.active.clone());
        self.dirty = false;
        self.last_saved = Some(Utc::now());
        log::debug!("Saved note {}", self.active.id);
        Ok(())
    }

    /// Make another note active.
    ///
    /// Unsaved edits to the current working copy are discarded; call
    /// [`NoteSession::save`] first to keep them.
    pub fn switch_to(&mut self, id: Uuid) -> Result<()> {
        let note = self.store.get_note(id).ok_or(SessionError::NoteNotFound(id))?;
        if self.dirty {
            log::warn!("Switching away from note {} with unsaved changes", self.active.id);
        }

        self.store.set_current_note_id(note.id)?;
        self.replace_in_index(note.clone());
        self.active = note;
        self.dirty = false;
        Ok(())
    }

    /// Create a blank note and make it active
    pub fn create(&mut self) -> Result<&Note> {
        let note = Note::blank();
        self.store.put_note(&note)?;
        self.store.set_current_note_id(note.id)?;
        log::info!("Created note {}", note.id);

        self.notes.push(note.clone());
        self.active = note;
        self.dirty = false;
        Ok(&self.active)
    }

    /// Store a note built elsewhere (an import) and make it active
    pub fn adopt(&mut self, note: Note) -> Result<&Note> {
        self.store.put_note(&note)?;
        self.store.set_current_note_id(note.id)?;
        log::info!("Added note '{}' ({})", note.title, note.id);

        self.replace_in_index(note.clone());
        self.active = note;
        self.dirty = false;
        Ok(&self.active)
    }

    /// Delete a note. Deleting the active note activates the most recently
    /// updated remaining note, or a new blank one.
    pub fn delete(&mut self, id: Uuid) -> Result<()> {
        self.store.delete_note(id)?;
        self.notes.retain(|n| n.id != id);
        log::info!("Deleted note {}", id);

        if self.active.id != id {
            return Ok(());
        }

        match most_recent(&self.notes).cloned() {
            Some(next) => {
                self.store.set_current_note_id(next.id)?;
                self.active = next;
                self.dirty = false;
            }
            None => {
                self.create()?;
            }
        }
        Ok(())
    }

    fn replace_in_index(&mut self, note: Note) {
        match self.notes.iter().position(|n| n.id == note.id) {
            Some(pos) => self.notes[pos] = note,
            None => self.notes.push(note),
        }
    }
}

impl AutoSave for NoteSession {
    type Error = SessionError;

    fn flush(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }
}

fn most_recent(notes: &[Note]) -> Option<&Note> {
    notes.iter().max_by_key(|n| n.updated_at)
}
