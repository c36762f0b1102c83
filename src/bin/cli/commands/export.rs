use std::path::PathBuf;

use anyhow::{Context, Result};

use marginalia_lib::transfer::{ExportFile, NoteFormat};

use crate::app::App;
use crate::OutputFormat;

pub fn run_note(app: &App, note_format: NoteFormat, out: Option<PathBuf>, format: &OutputFormat) -> Result<()> {
    let file = app.workspace()?.export_note(note_format);
    write(file, out, format)
}

pub fn run_cards(app: &App, out: Option<PathBuf>, format: &OutputFormat) -> Result<()> {
    let file = app
        .workspace()?
        .export_flashcards()
        .context("Failed to export flashcards")?;
    write(file, out, format)
}

fn write(file: ExportFile, out: Option<PathBuf>, format: &OutputFormat) -> Result<()> {
    let dir = out.unwrap_or_else(|| PathBuf::from("."));
    let path = file
        .write_to(&dir)
        .with_context(|| format!("Failed to write {} to {}", file.file_name, dir.display()))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "path": path.to_string_lossy(),
                "mimeType": file.mime_type,
                "bytes": file.contents.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Exported {}", path.display());
        }
    }
    Ok(())
}
