use anyhow::{Context, Result};

use marginalia_lib::storage::Note;

use crate::app::App;
use crate::OutputFormat;

pub fn run_switch(app: &App, query: &str, format: &OutputFormat) -> Result<()> {
    let target = app.find_note(query)?;
    let mut workspace = app.workspace()?;
    workspace
        .switch_to(target.id)
        .with_context(|| format!("Failed to switch to '{}'", target.title))?;

    print_note("Switched to", workspace.active_note(), format)
}

pub fn run_delete(app: &App, query: &str, format: &OutputFormat) -> Result<()> {
    let target = app.find_note(query)?;
    let mut workspace = app.workspace()?;
    workspace
        .delete_note(target.id)
        .with_context(|| format!("Failed to delete '{}'", target.title))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "deleted": target.id.to_string(),
                "active": workspace.active_note().id.to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Deleted note \"{}\"", target.title);
            println!("  Active: {}", workspace.active_note().title);
        }
    }
    Ok(())
}

pub fn run_title(app: &App, title: String, format: &OutputFormat) -> Result<()> {
    let mut workspace = app.workspace()?;
    workspace.update_title(title);
    workspace.save().context("Failed to save note")?;

    print_note("Renamed to", workspace.active_note(), format)
}

fn print_note(label: &str, note: &Note, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": note.id.to_string(),
                "title": note.title,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{} \"{}\"", label, note.title);
        }
    }
    Ok(())
}
