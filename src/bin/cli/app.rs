use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, bail, Context, Result};
use uuid::Uuid;

use marginalia_lib::ai::AiGateway;
use marginalia_lib::session::AutoSaver;
use marginalia_lib::storage::{Flashcard, Note};
use marginalia_lib::{AppConfig, Workspace};

/// Shared application state for CLI commands
pub struct App {
    pub config: AppConfig,
    pub workspace: Arc<Mutex<Workspace>>,
}

impl App {
    /// Load the config and open the workspace in the data directory
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let config = AppConfig::from_env(data_dir).context("Failed to load configuration")?;
        let store_dir = config.store_dir().context("Failed to get data directory")?;
        let workspace = Workspace::open_dir(&store_dir)
            .with_context(|| format!("Failed to open notes in {}", store_dir.display()))?;

        Ok(Self {
            config,
            workspace: Arc::new(Mutex::new(workspace)),
        })
    }

    pub fn workspace(&self) -> Result<MutexGuard<'_, Workspace>> {
        self.workspace
            .lock()
            .map_err(|_| anyhow!("Workspace lock poisoned"))
    }

    pub fn gateway(&self) -> Result<AiGateway> {
        AiGateway::from_config(&self.config.ai).context("Failed to create AI client")
    }

    pub fn autosaver(&self) -> AutoSaver {
        AutoSaver::spawn(Arc::clone(&self.workspace), self.config.autosave_delay())
    }

    /// Find a note by id prefix or title (case-insensitive prefix match)
    pub fn find_note(&self, query: &str) -> Result<Note> {
        let notes = self.workspace()?.notes();

        if let Ok(id) = Uuid::parse_str(query) {
            return notes
                .into_iter()
                .find(|n| n.id == id)
                .context(format!("No note with id {}", id));
        }

        let query_lower = query.to_lowercase();

        // Exact title match first
        if let Some(note) = notes.iter().find(|n| n.title.to_lowercase() == query_lower) {
            return Ok(note.clone());
        }

        let matches: Vec<&Note> = notes
            .iter()
            .filter(|n| {
                n.title.to_lowercase().starts_with(&query_lower)
                    || n.id.to_string().starts_with(&query_lower)
            })
            .collect();

        match matches.len() {
            0 => bail!(
                "No note matching '{}'. Available notes:\n{}",
                query,
                list_titles(notes.iter())
            ),
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous note '{}'. Matches:\n{}",
                query,
                list_titles(matches.into_iter())
            ),
        }
    }

    /// Find a card of the active note by id prefix
    pub fn find_card(&self, id_prefix: &str) -> Result<Flashcard> {
        let workspace = self.workspace()?;
        let prefix = id_prefix.to_lowercase();
        let matches: Vec<&Flashcard> = workspace
            .flashcards()
            .iter()
            .filter(|c| c.id.to_string().starts_with(&prefix))
            .collect();

        match matches.len() {
            0 => bail!("No flashcard with id starting '{}'", id_prefix),
            1 => Ok(matches[0].clone()),
            _ => bail!("Ambiguous flashcard id '{}' ({} matches)", id_prefix, matches.len()),
        }
    }
}

fn list_titles<'a>(notes: impl Iterator<Item = &'a Note>) -> String {
    notes
        .map(|n| format!("  - {} ({})", n.title, short_id(n.id)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// First block of a uuid, enough to pick a note or card by prefix
pub fn short_id(id: Uuid) -> String {
    id.to_string().chars().take(8).collect()
}
