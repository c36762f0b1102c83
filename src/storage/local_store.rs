use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use super::backend::{Result, StoreBackend};
use super::models::{Flashcard, Note};

const NOTES_KEY: &str = "notes-list";
const CURRENT_NOTE_ID_KEY: &str = "current-note-id";
const FLASHCARDS_KEY_PREFIX: &str = "flashcards-";

fn deck_key(note_id: Uuid) -> String {
    format!("{}{}", FLASHCARDS_KEY_PREFIX, note_id)
}

/// Typed note and flashcard persistence over a [`StoreBackend`].
///
/// Reads never fail: a missing slot is empty, and a slot that cannot be read
/// or parsed is logged and treated as empty. Writes report backend failures.
pub struct LocalStore {
    backend: Box<dyn StoreBackend>,
}

impl LocalStore {
    pub fn new(backend: impl StoreBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    fn read_slot<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read '{}', treating as empty: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Corrupted data in '{}', treating as empty: {}", key, e);
                None
            }
        }
    }

    fn write_slot<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let content = serde_json::to_string(value)?;
        self.backend.write(key, &content)
    }

    // ===== Note Operations =====

    pub fn list_notes(&self) -> Vec<Note> {
        self.read_slot(NOTES_KEY).unwrap_or_default()
    }

    pub fn get_note(&self, id: Uuid) -> Option<Note> {
        self.list_notes().into_iter().find(|n| n.id == id)
    }

    /// Insert or replace a note by id
    pub fn put_note(&self, note: &Note) -> Result<()> {
        let mut notes = self.list_notes();
        match notes.iter().position(|n| n.id == note.id) {
            Some(pos) => notes[pos] = note.clone(),
            None => notes.push(note.clone()),
        }
        self.write_slot(NOTES_KEY, &notes)
    }

    /// Remove a note. Its flashcard deck is left in place.
    pub fn delete_note(&self, id: Uuid) -> Result<()> {
        let mut notes = self.list_notes();
        let before = notes.len();
        notes.retain(|n| n.id != id);
        if notes.len() == before {
            return Ok(());
        }
        self.write_slot(NOTES_KEY, &notes)
    }

    pub fn current_note_id(&self) -> Option<Uuid> {
        self.read_slot(CURRENT_NOTE_ID_KEY)
    }

    pub fn set_current_note_id(&self, id: Uuid) -> Result<()> {
        self.write_slot(CURRENT_NOTE_ID_KEY, &id)
    }

    // ===== Deck Operations =====

    pub fn get_deck(&self, note_id: Uuid) -> Vec<Flashcard> {
        self.read_slot(&deck_key(note_id)).unwrap_or_default()
    }

    /// Replace the whole deck for a note
    pub fn put_deck(&self, note_id: Uuid, cards: &[Flashcard]) -> Result<()> {
        self.write_slot(&deck_key(note_id), cards)
    }

    /// Append cards after the existing deck and return the merged deck
    pub fn append_to_deck(&self, note_id: Uuid, cards: &[Flashcard]) -> Result<Vec<Flashcard>> {
        let mut deck = self.get_deck(note_id);
        deck.extend_from_slice(cards);
        self.put_deck(note_id, &deck)?;
        Ok(deck)
    }
}
