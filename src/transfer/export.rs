use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::Serialize;

use crate::storage::{Flashcard, Note};

/// Note export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteFormat {
    Text,
    Markdown,
}

/// A rendered file ready to be handed to the user
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

impl ExportFile {
    /// Write the file into `dir`, returning its path
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.contents)?;
        log::info!("Exported {}", path.display());
        Ok(path)
    }
}

/// Flashcard export document
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FlashcardExport<'a> {
    note: &'a str,
    exported_at: String,
    flashcards: Vec<ExportedCard<'a>>,
}

#[derive(Debug, Serialize)]
struct ExportedCard<'a> {
    question: &'a str,
    answer: &'a str,
}

pub fn export_note(note: &Note, format: NoteFormat) -> ExportFile {
    match format {
        NoteFormat::Text => export_note_as_text(note),
        NoteFormat::Markdown => export_note_as_markdown(note),
    }
}

/// Title, a `=` underline of the same length, a blank line, then the body
pub fn export_note_as_text(note: &Note) -> ExportFile {
    let underline = "=".repeat(note.title.chars().count());
    ExportFile {
        file_name: format!("{}.txt", sanitize_filename(&note.title)),
        mime_type: "text/plain",
        contents: format!("{}\n{}\n\n{}", note.title, underline, note.content),
    }
}

/// `# Title`, a blank line, then the body
pub fn export_note_as_markdown(note: &Note) -> ExportFile {
    ExportFile {
        file_name: format!("{}.md", sanitize_filename(&note.title)),
        mime_type: "text/markdown",
        contents: format!("# {}\n\n{}", note.title, note.content),
    }
}

/// Question/answer pairs with the note title and export time. Card ids and
/// note ids are not exported.
pub fn export_flashcards_as_json(cards: &[Flashcard], note_title: &str) -> serde_json::Result<ExportFile> {
    export_flashcards_at(cards, note_title, Utc::now())
}

fn export_flashcards_at(
    cards: &[Flashcard],
    note_title: &str,
    exported_at: DateTime<Utc>,
) -> serde_json::Result<ExportFile> {
    let document = FlashcardExport {
        note: note_title,
        exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        flashcards: cards
            .iter()
            .map(|card| ExportedCard {
                question: &card.question,
                answer: &card.answer,
            })
            .collect(),
    };

    Ok(ExportFile {
        file_name: format!("{}-flashcards.json", sanitize_filename(note_title)),
        mime_type: "application/json",
        contents: serde_json::to_string_pretty(&document)?,
    })
}

/// Lowercased file stem with every run of non-alphanumeric characters
/// replaced by a single `_`
pub fn sanitize_filename(title: &str) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());

    let replaced = re.replace_all(title, "_").to_lowercase();
    let trimmed = replaced.trim_matches('_');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn note(title: &str, content: &str) -> Note {
        Note::new(title.to_string(), content.to_string())
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("CS 101!!"), "cs_101");
        assert_eq!(sanitize_filename("Data Structures & Algorithms"), "data_structures_algorithms");
        assert_eq!(sanitize_filename("already_clean"), "already_clean");
        assert_eq!(sanitize_filename("Über Notes"), "ber_notes");
        assert_eq!(sanitize_filename("!!!"), "untitled");
    }

    #[test]
    fn test_export_text() {
        let file = export_note_as_text(&note("CS 101!!", "Intro lecture"));
        assert_eq!(file.file_name, "cs_101.txt");
        assert_eq!(file.mime_type, "text/plain");
        assert_eq!(file.contents, "CS 101!!\n========\n\nIntro lecture");
    }

    #[test]
    fn test_export_markdown() {
        let file = export_note(&note("Graphs", "- BFS\n- DFS"), NoteFormat::Markdown);
        assert_eq!(file.file_name, "graphs.md");
        assert_eq!(file.contents, "# Graphs\n\n- BFS\n- DFS");
    }

    #[test]
    fn test_export_flashcards_document() {
        let mut card = Flashcard::new("Q1".to_string(), "A1".to_string());
        card.note_id = Some(uuid::Uuid::new_v4());
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let file = export_flashcards_at(&[card], "Algo", at).unwrap();
        assert_eq!(file.file_name, "algo-flashcards.json");

        let json: serde_json::Value = serde_json::from_str(&file.contents).unwrap();
        assert_eq!(json["note"], "Algo");
        assert_eq!(json["exportedAt"], "2024-03-01T12:00:00.000Z");
        assert_eq!(json["flashcards"][0], serde_json::json!({"question": "Q1", "answer": "A1"}));
    }

    #[test]
    fn test_write_to_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = export_note_as_markdown(&note("Saved", "body"));

        let path = file.write_to(&temp_dir.path().join("out")).unwrap();
        assert_eq!(path.file_name().unwrap(), "saved.md");
        assert_eq!(fs::read_to_string(path).unwrap(), "# Saved\n\nbody");
    }
}
