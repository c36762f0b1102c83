use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::storage::{Flashcard, Note};

/// Title given to imported notes when neither the file nor its name has one
pub const IMPORTED_NOTE_TITLE: &str = "Imported Note";

/// Note title recorded for flashcard files without a `note` field
pub const UNKNOWN_NOTE_TITLE: &str = "Unknown";

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid flashcard file: {0}")]
    InvalidFormat(String),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ImportError>;

/// Flashcards read from an export file, with fresh ids and no note yet
#[derive(Debug, Clone, PartialEq)]
pub struct FlashcardImport {
    pub note_title: String,
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NoteFileKind {
    Text,
    Markdown,
}

impl NoteFileKind {
    fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "txt" => Some(Self::Text),
            "md" => Some(Self::Markdown),
            _ => None,
        }
    }
}

/// Build a new note from the contents of a `.txt` or `.md` file.
///
/// Markdown files may carry their title as a leading `# Title` line, text
/// files as a first line underlined with `=`. When a title line is found
/// it is removed along with the single blank line the exporters put after
/// it, and the rest of the body is kept byte for byte. Otherwise the file
/// stem becomes the title and the contents are kept verbatim.
pub fn import_note(file_name: &str, contents: &str) -> Result<Note> {
    let kind = NoteFileKind::from_file_name(file_name)
        .ok_or_else(|| ImportError::UnsupportedFormat(file_name.to_string()))?;

    let header = match kind {
        NoteFileKind::Markdown => {
            let (first, rest) = split_first_line(contents);
            first.strip_prefix("# ").map(|title| (title.trim().to_string(), rest))
        }
        NoteFileKind::Text => {
            let (first, rest) = split_first_line(contents);
            let (second, rest) = split_first_line(rest);
            is_underline(second).then(|| (first.trim().to_string(), rest))
        }
    };

    let (title, content) = match header {
        Some((title, rest)) => (title, strip_separator(rest).to_string()),
        None => (file_stem(file_name).to_string(), contents.to_string()),
    };

    let title = if title.is_empty() {
        IMPORTED_NOTE_TITLE.to_string()
    } else {
        title
    };

    log::info!("Imported note '{}' from {}", title, file_name);
    Ok(Note::new(title, content))
}

/// First line without its terminator, and everything after it
fn split_first_line(text: &str) -> (&str, &str) {
    match text.split_once('\n') {
        Some((line, rest)) => (line.trim_end_matches('\r'), rest),
        None => (text, ""),
    }
}

fn strip_separator(body: &str) -> &str {
    body.strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body)
}

fn is_underline(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c == '=')
}

fn file_stem(file_name: &str) -> &str {
    file_name.rsplit_once('.').map_or(file_name, |(stem, _)| stem)
}

/// Parse a flashcard export document.
///
/// Missing questions or answers become empty strings. Every card gets a
/// new id; associating them with a note is up to the caller.
pub fn import_flashcard_collection(contents: &str) -> Result<FlashcardImport> {
    let document: Value = serde_json::from_str(contents)?;

    let cards = document
        .get("flashcards")
        .and_then(Value::as_array)
        .ok_or_else(|| ImportError::InvalidFormat("missing flashcards array".to_string()))?;

    let note_title = document
        .get("note")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_NOTE_TITLE)
        .to_string();

    let flashcards = cards
        .iter()
        .map(|card| {
            let field = |name: &str| card.get(name).and_then(Value::as_str).unwrap_or("").to_string();
            Flashcard::new(field("question"), field("answer"))
        })
        .collect::<Vec<_>>();

    log::info!("Read {} flashcards exported from '{}'", flashcards.len(), note_title);
    Ok(FlashcardImport {
        note_title,
        flashcards,
    })
}

/// Read a file for import, returning its name and contents
pub fn read_import_file(path: &Path) -> Result<(String, String)> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ImportError::UnsupportedFormat(path.display().to_string()))?;
    let contents = fs::read_to_string(path)?;
    Ok((file_name, contents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::export::{export_flashcards_as_json, export_note_as_markdown, export_note_as_text};
    use tempfile::TempDir;

    #[test]
    fn test_import_markdown_with_heading() {
        let note = import_note("graphs.md", "# Graphs\n\n- BFS\n- DFS\n").unwrap();
        assert_eq!(note.title, "Graphs");
        assert_eq!(note.content, "- BFS\n- DFS\n");
    }

    #[test]
    fn test_import_text_with_underline() {
        let note = import_note("lecture.TXT", "Lecture 3\n=========\n\n  Pointers  \n").unwrap();
        assert_eq!(note.title, "Lecture 3");
        assert_eq!(note.content, "  Pointers  \n");
    }

    #[test]
    fn test_import_without_title_line_uses_file_stem() {
        let contents = "  just some text\nover two lines\n";
        let note = import_note("scratch.md", contents).unwrap();
        assert_eq!(note.title, "scratch");
        assert_eq!(note.content, contents);

        // A markdown heading means nothing in a text file
        let note = import_note("raw.txt", "# Not a title\nbody").unwrap();
        assert_eq!(note.title, "raw");
    }

    #[test]
    fn test_import_empty_stem() {
        let note = import_note(".md", "content").unwrap();
        assert_eq!(note.title, IMPORTED_NOTE_TITLE);
    }

    #[test]
    fn test_import_crlf_text() {
        let note = import_note("win.txt", "Title\r\n=====\r\n\r\nBody\r\n").unwrap();
        assert_eq!(note.title, "Title");
        assert_eq!(note.content, "Body\r\n");
    }

    #[test]
    fn test_import_title_only_file_has_empty_body() {
        let note = import_note("empty.md", "# Empty\n\n").unwrap();
        assert_eq!(note.title, "Empty");
        assert_eq!(note.content, "");

        let note = import_note("bare.md", "# Bare").unwrap();
        assert_eq!(note.title, "Bare");
        assert_eq!(note.content, "");

        let note = import_note("only.txt", "Only\n====").unwrap();
        assert_eq!(note.title, "Only");
        assert_eq!(note.content, "");
    }

    #[test]
    fn test_import_keeps_blank_lines_after_separator() {
        let note = import_note("gap.md", "# Gap\n\n\nafter a blank line").unwrap();
        assert_eq!(note.content, "\nafter a blank line");
    }

    #[test]
    fn test_import_rejects_other_extensions() {
        let err = import_note("notes.pdf", "binary").unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(_)));
        let err = import_note("README", "text").unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_markdown_export_reimports() {
        let original = Note::new("Sorting".to_string(), "Quicksort is O(n log n) on average.".to_string());
        let file = export_note_as_markdown(&original);

        let imported = import_note(&file.file_name, &file.contents).unwrap();
        assert_eq!(imported.title, original.title);
        assert_eq!(imported.content, original.content);
        assert_ne!(imported.id, original.id);
    }

    #[test]
    fn test_text_export_reimports() {
        let original = Note::new("CS 101!!".to_string(), "Intro".to_string());
        let file = export_note_as_text(&original);

        let imported = import_note(&file.file_name, &file.contents).unwrap();
        assert_eq!(imported.title, "CS 101!!");
        assert_eq!(imported.content, "Intro");
    }

    #[test]
    fn test_export_reimport_preserves_surrounding_whitespace() {
        for body in ["line one\n", "    code\n", "\n\nlead and trail\n\n", "\tindented\r\n"] {
            let original = Note::new("Whitespace".to_string(), body.to_string());

            for file in [export_note_as_markdown(&original), export_note_as_text(&original)] {
                let imported = import_note(&file.file_name, &file.contents).unwrap();
                assert_eq!(imported.title, "Whitespace", "title from {}", file.file_name);
                assert_eq!(imported.content, body, "body from {}", file.file_name);
            }
        }
    }

    #[test]
    fn test_import_flashcard_collection() {
        let contents = r#"{"note": "Algo", "flashcards": [{"question": "Q1", "answer": "A1"}, {"question": "Q2"}]}"#;

        let import = import_flashcard_collection(contents).unwrap();
        assert_eq!(import.note_title, "Algo");
        assert_eq!(import.flashcards.len(), 2);
        assert_eq!(import.flashcards[0].question, "Q1");
        assert_eq!(import.flashcards[1].answer, "");
        assert_ne!(import.flashcards[0].id, import.flashcards[1].id);
        assert!(import.flashcards.iter().all(|c| c.note_id.is_none()));
    }

    #[test]
    fn test_import_flashcards_without_note_field() {
        let import = import_flashcard_collection(r#"{"flashcards": []}"#).unwrap();
        assert_eq!(import.note_title, UNKNOWN_NOTE_TITLE);
        assert!(import.flashcards.is_empty());
    }

    #[test]
    fn test_import_flashcards_invalid_documents() {
        let err = import_flashcard_collection("not json").unwrap_err();
        assert!(matches!(err, ImportError::Json(_)));

        let err = import_flashcard_collection(r#"{"note": "Algo"}"#).unwrap_err();
        assert!(matches!(err, ImportError::InvalidFormat(_)));

        let err = import_flashcard_collection(r#"{"flashcards": {"question": "Q"}}"#).unwrap_err();
        assert!(matches!(err, ImportError::InvalidFormat(_)));
    }

    #[test]
    fn test_flashcard_export_reimports() {
        let cards = vec![
            Flashcard::new("What is a heap?".to_string(), "A tree-based priority queue".to_string()),
            Flashcard::new("Heap insert cost?".to_string(), "O(log n)".to_string()),
        ];
        let file = export_flashcards_as_json(&cards, "Heaps").unwrap();

        let import = import_flashcard_collection(&file.contents).unwrap();
        assert_eq!(import.note_title, "Heaps");
        let pairs: Vec<_> = import
            .flashcards
            .iter()
            .map(|c| (c.question.as_str(), c.answer.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("What is a heap?", "A tree-based priority queue"),
                ("Heap insert cost?", "O(log n)"),
            ]
        );
    }

    #[test]
    fn test_read_import_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("week1.md");
        fs::write(&path, "# Week 1\n\nIntro").unwrap();

        let (name, contents) = read_import_file(&path).unwrap();
        assert_eq!(name, "week1.md");
        assert_eq!(contents, "# Week 1\n\nIntro");

        let err = read_import_file(&temp_dir.path().join("missing.md")).unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
    }
}
