use std::path::Path;

use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run_note(app: &App, path: &Path, format: &OutputFormat) -> Result<()> {
    let mut workspace = app.workspace()?;
    let note = workspace
        .import_note_file(path)
        .with_context(|| format!("Failed to import {}", path.display()))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": note.id.to_string(),
                "title": note.title,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Imported note \"{}\"", note.title);
            println!("  ID: {}", note.id);
        }
    }
    Ok(())
}

pub fn run_cards(app: &App, path: &Path, format: &OutputFormat) -> Result<()> {
    let summary = app
        .workspace()?
        .import_flashcards_file(path)
        .with_context(|| format!("Failed to import {}", path.display()))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "noteId": summary.note_id.to_string(),
                "noteTitle": summary.note_title,
                "imported": summary.imported,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "Imported {} flashcards into \"{}\"",
                summary.imported, summary.note_title
            );
        }
    }
    Ok(())
}
