use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    title: Option<String>,
    content: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let mut workspace = app.workspace()?;
    workspace.create_note().context("Failed to create note")?;

    let edited = title.is_some() || content.is_some();
    if let Some(title) = title {
        workspace.update_title(title);
    }
    if let Some(content) = content {
        workspace.update_content(content);
    }
    if edited {
        workspace.save().context("Failed to save note")?;
    }

    let note = workspace.active_note();
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": note.id.to_string(),
                "title": note.title,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Created note \"{}\"", note.title);
            println!("  ID: {}", note.id);
        }
    }

    Ok(())
}
