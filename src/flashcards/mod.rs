//! Flashcard decks
//!
//! Each note owns at most one deck. The deck of the active note is held by a
//! [`FlashcardSession`], which writes every change straight to the store.

pub mod session;

pub use session::FlashcardSession;
