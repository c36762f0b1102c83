//! Moving notes and flashcards in and out of plain files
//!
//! Notes export as `.txt` or `.md`, flashcard decks as JSON. Imports read
//! the same formats back.

pub mod export;
pub mod import;

pub use export::{
    export_flashcards_as_json, export_note, export_note_as_markdown, export_note_as_text,
    sanitize_filename, ExportFile, NoteFormat,
};
pub use import::{
    import_flashcard_collection, import_note, read_import_file, FlashcardImport, ImportError,
};
