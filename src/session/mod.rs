//! Active-note state and its debounced persistence

pub mod autosave;
pub mod note_session;

pub use autosave::{AutoSave, AutoSaver, DEFAULT_AUTOSAVE_DELAY};
pub use note_session::{NoteSession, SessionError};
