use std::sync::Arc;

use uuid::Uuid;

use crate::storage::{Flashcard, LocalStore, StorageError};

pub type Result<T> = std::result::Result<T, StorageError>;

/// The flashcard deck of one note.
///
/// Unlike note edits, every deck mutation is written through to the store
/// immediately.
pub struct FlashcardSession {
    store: Arc<LocalStore>,
    note_id: Uuid,
    cards: Vec<Flashcard>,
}

impl FlashcardSession {
    /// Bind to a note and load its deck
    pub fn bind(store: Arc<LocalStore>, note_id: Uuid) -> Self {
        let cards = store.get_deck(note_id);
        Self {
            store,
            note_id,
            cards,
        }
    }

    /// Follow the active note to a different id
    pub fn rebind(&mut self, note_id: Uuid) {
        self.note_id = note_id;
        self.load();
    }

    pub fn note_id(&self) -> Uuid {
        self.note_id
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    /// Re-read the deck from the store
    pub fn load(&mut self) -> &[Flashcard] {
        self.cards = self.store.get_deck(self.note_id);
        &self.cards
    }

    /// Overwrite the deck with `cards`
    pub fn replace(&mut self, cards: Vec<Flashcard>) -> Result<()> {
        self.cards = self.stamp(cards);
        self.persist()
    }

    /// Append `cards` to the deck
    pub fn merge(&mut self, cards: Vec<Flashcard>) -> Result<()> {
        let stamped = self.stamp(cards);
        self.cards.extend(stamped);
        self.persist()
    }

    /// Change one card's text. Unknown ids are ignored.
    pub fn update(&mut self, id: Uuid, question: String, answer: String) -> Result<()> {
        let Some(card) = self.cards.iter_mut().find(|c| c.id == id) else {
            return Ok(());
        };
        card.question = question;
        card.answer = answer;
        self.persist()
    }

    pub fn remove(&mut self, id: Uuid) -> Result<()> {
        self.cards.retain(|c| c.id != id);
        self.persist()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.cards.clear();
        self.persist()
    }

    fn stamp(&self, cards: Vec<Flashcard>) -> Vec<Flashcard> {
        cards
            .into_iter()
            .map(|card| card.stamped(self.note_id))
            .collect()
    }

    fn persist(&self) -> Result<()> {
        self.store.put_deck(self.note_id, &self.cards)
    }
}
