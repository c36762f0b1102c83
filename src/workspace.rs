//! The notes and flashcards of one data directory.
//!
//! A [`Workspace`] owns the only [`NoteSession`] and the only
//! [`FlashcardSession`] over a store, and keeps the deck bound to whichever
//! note is active. Every mutation goes through it. It also holds the
//! latest AI results, so overlapping requests cannot clobber newer ones.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use uuid::Uuid;

use crate::ai::{AiError, AiGateway, AiOperation, AiResults, CompletionClient, ResultSlot, SlotValue};
use crate::flashcards::FlashcardSession;
use crate::session::{AutoSave, NoteSession, SessionError};
use crate::storage::{FileBackend, Flashcard, LocalStore, Note, StorageError};
use crate::transfer::{self, ExportFile, ImportError, NoteFormat};

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error("Failed to serialize export: {0}")]
    Export(#[from] serde_json::Error),

    #[error("Workspace lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, WorkspaceError>;

/// Where an imported flashcard file ended up
#[derive(Debug, Clone, PartialEq)]
pub struct FlashcardImportSummary {
    pub note_id: Uuid,
    pub note_title: String,
    pub imported: usize,
}

pub struct Workspace {
    store: Arc<LocalStore>,
    notes: NoteSession,
    cards: FlashcardSession,
    ai_results: AiResults,
}

impl Workspace {
    /// Open a workspace over an existing store
    pub fn open(store: Arc<LocalStore>) -> Result<Self> {
        let notes = NoteSession::load(Arc::clone(&store))?;
        let cards = FlashcardSession::bind(Arc::clone(&store), notes.active().id);
        Ok(Self {
            store,
            notes,
            cards,
            ai_results: AiResults::new(),
        })
    }

    /// Open a file-backed workspace rooted at `dir`
    pub fn open_dir(dir: &Path) -> Result<Self> {
        let backend = FileBackend::new(dir.to_path_buf());
        backend.init()?;
        log::info!("Opening workspace at {}", dir.display());
        Self::open(Arc::new(LocalStore::new(backend)))
    }

    pub fn active_note(&self) -> &Note {
        self.notes.active()
    }

    pub fn notes(&self) -> Vec<Note> {
        self.notes.notes()
    }

    pub fn is_dirty(&self) -> bool {
        self.notes.is_dirty()
    }

    pub fn update_title(&mut self, title: String) {
        self.notes.update_title(title);
    }

    pub fn update_content(&mut self, content: String) {
        self.notes.update_content(content);
    }

    pub fn save(&mut self) -> Result<()> {
        self.notes.save()?;
        Ok(())
    }

    /// Save pending edits, then make `id` active along with its deck
    pub fn switch_to(&mut self, id: Uuid) -> Result<()> {
        if id == self.notes.active().id {
            return Ok(());
        }
        self.flush()?;
        self.notes.switch_to(id)?;
        self.cards.rebind(id);
        Ok(())
    }

    /// Save pending edits and start a new blank note
    pub fn create_note(&mut self) -> Result<&Note> {
        self.flush()?;
        let id = self.notes.create()?.id;
        self.cards.rebind(id);
        Ok(self.notes.active())
    }

    /// Delete a note. Its flashcard deck stays in the store.
    pub fn delete_note(&mut self, id: Uuid) -> Result<()> {
        self.notes.delete(id)?;
        let active = self.notes.active().id;
        if active != self.cards.note_id() {
            self.cards.rebind(active);
        }
        Ok(())
    }

    pub fn ai_results(&self) -> &AiResults {
        &self.ai_results
    }

    /// The active note's deck
    pub fn flashcards(&self) -> &[Flashcard] {
        self.cards.cards()
    }

    pub fn replace_flashcards(&mut self, cards: Vec<Flashcard>) -> Result<()> {
        self.cards.replace(cards)?;
        Ok(())
    }

    /// Replace the deck of a specific note, which need not be active
    pub fn replace_flashcards_for(&mut self, note_id: Uuid, cards: Vec<Flashcard>) -> Result<()> {
        if note_id == self.cards.note_id() {
            return self.replace_flashcards(cards);
        }
        let stamped: Vec<_> = cards.into_iter().map(|c| c.stamped(note_id)).collect();
        self.store.put_deck(note_id, &stamped)?;
        Ok(())
    }

    pub fn update_flashcard(&mut self, id: Uuid, question: String, answer: String) -> Result<()> {
        self.cards.update(id, question, answer)?;
        Ok(())
    }

    pub fn remove_flashcard(&mut self, id: Uuid) -> Result<()> {
        self.cards.remove(id)?;
        Ok(())
    }

    pub fn clear_flashcards(&mut self) -> Result<()> {
        self.cards.clear()?;
        Ok(())
    }

    /// Import a `.txt` or `.md` file as a new note and make it active
    pub fn import_note(&mut self, file_name: &str, contents: &str) -> Result<&Note> {
        let note = transfer::import_note(file_name, contents)?;
        self.flush()?;
        let id = self.notes.adopt(note)?.id;
        self.cards.rebind(id);
        Ok(self.notes.active())
    }

    pub fn import_note_file(&mut self, path: &Path) -> Result<&Note> {
        let (file_name, contents) = transfer::read_import_file(path)?;
        self.import_note(&file_name, &contents)
    }

    /// Merge an exported flashcard file into the deck of the note it came
    /// from, matched by title ignoring case, or into the active note's deck
    /// when no note has that title.
    pub fn import_flashcards(&mut self, contents: &str) -> Result<FlashcardImportSummary> {
        let import = transfer::import_flashcard_collection(contents)?;
        let wanted = import.note_title.to_lowercase();

        let target = self
            .notes
            .notes()
            .into_iter()
            .find(|n| n.title.to_lowercase() == wanted)
            .unwrap_or_else(|| self.notes.active().clone());

        let imported = import.flashcards.len();
        if target.id == self.cards.note_id() {
            self.cards.merge(import.flashcards)?;
        } else {
            let stamped: Vec<_> = import
                .flashcards
                .into_iter()
                .map(|c| c.stamped(target.id))
                .collect();
            self.store.append_to_deck(target.id, &stamped)?;
        }

        log::info!("Imported {} flashcards into '{}'", imported, target.title);
        Ok(FlashcardImportSummary {
            note_id: target.id,
            note_title: target.title,
            imported,
        })
    }

    pub fn import_flashcards_file(&mut self, path: &Path) -> Result<FlashcardImportSummary> {
        let (_, contents) = transfer::read_import_file(path)?;
        self.import_flashcards(&contents)
    }

    /// Render the active note, including unsaved edits
    pub fn export_note(&self, format: NoteFormat) -> ExportFile {
        transfer::export_note(self.notes.active(), format)
    }

    pub fn export_flashcards(&self) -> Result<ExportFile> {
        let file = transfer::export_flashcards_as_json(self.cards.cards(), &self.notes.active().title)?;
        Ok(file)
    }
}

impl AutoSave for Workspace {
    type Error = WorkspaceError;

    fn flush(&mut self) -> Result<bool> {
        Ok(self.notes.flush()?)
    }
}

/// Run an explain/expand/summarize request and keep its reply as the
/// latest result for that operation.
///
/// Returns `None` when a newer request for the same operation started while
/// this one was waiting on the model; its reply is then discarded.
pub async fn run_operation<C: CompletionClient>(
    workspace: &Mutex<Workspace>,
    gateway: &AiGateway<C>,
    operation: AiOperation,
    text: &str,
) -> Result<Option<String>> {
    let ticket = lock(workspace)?.ai_results.begin(ResultSlot::from(operation));

    let reply = match gateway.execute(operation, text).await {
        Ok(reply) => reply,
        Err(e) => {
            lock(workspace)?.ai_results.fail(ticket);
            return Err(e.into());
        }
    };

    let mut ws = lock(workspace)?;
    if !ws.ai_results.complete(ticket, SlotValue::Text(reply.clone())) {
        return Ok(None);
    }
    Ok(Some(reply))
}

/// Replace the active note's deck with cards generated from its content.
///
/// The lock is released while the model runs. If generation fails the deck
/// is left as it was; if another note became active meanwhile the cards
/// still go to the note they were generated from. Returns `None`, leaving
/// every deck untouched, when a newer generation started in the meantime.
pub async fn generate_flashcards<C: CompletionClient>(
    workspace: &Mutex<Workspace>,
    gateway: &AiGateway<C>,
) -> Result<Option<usize>> {
    let (ticket, note_id, content) = {
        let mut ws = lock(workspace)?;
        let ticket = ws.ai_results.begin(ResultSlot::Flashcards);
        let note = ws.active_note();
        (ticket, note.id, note.content.clone())
    };

    let cards = match gateway.generate_flashcards(&content).await {
        Ok(cards) => cards,
        Err(e) => {
            lock(workspace)?.ai_results.fail(ticket);
            return Err(e.into());
        }
    };
    let count = cards.len();

    let mut ws = lock(workspace)?;
    if !ws.ai_results.complete(ticket, SlotValue::Flashcards(cards.clone())) {
        log::info!("Discarding flashcards for note {}: a newer request replaced it", note_id);
        return Ok(None);
    }
    ws.replace_flashcards_for(note_id, cards)?;
    log::info!("Generated {} flashcards for note {}", count, note_id);
    Ok(Some(count))
}

fn lock(workspace: &Mutex<Workspace>) -> Result<MutexGuard<'_, Workspace>> {
    workspace.lock().map_err(|_| WorkspaceError::Poisoned)
}
