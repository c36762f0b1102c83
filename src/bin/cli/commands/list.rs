use anyhow::Result;

use crate::app::{short_id, App};
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let workspace = app.workspace()?;
    let active_id = workspace.active_note().id;
    let mut notes = workspace.notes();

    // Most recently updated first
    notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = notes
                .iter()
                .map(|n| {
                    serde_json::json!({
                        "id": n.id.to_string(),
                        "title": n.title,
                        "active": n.id == active_id,
                        "updatedAt": n.updated_at.to_rfc3339(),
                        "createdAt": n.created_at.to_rfc3339(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            let title_width = notes
                .iter()
                .map(|n| n.title.chars().count())
                .max()
                .unwrap_or(5)
                .clamp(5, 40);

            println!(
                "  {:<8} {:<title_w$} {}",
                "ID",
                "Title",
                "Updated",
                title_w = title_width
            );
            println!(
                "  {} {} {}",
                "\u{2500}".repeat(8),
                "\u{2500}".repeat(title_width),
                "\u{2500}".repeat(16)
            );

            for note in &notes {
                let marker = if note.id == active_id { "* " } else { "  " };
                let title = if note.title.chars().count() > title_width {
                    let cut: String = note.title.chars().take(title_width - 3).collect();
                    format!("{}...", cut)
                } else {
                    note.title.clone()
                };
                let updated = note.updated_at.format("%Y-%m-%d %H:%M").to_string();
                let line = format!(
                    "{}{:<8} {:<title_w$} {}",
                    marker,
                    short_id(note.id),
                    title,
                    updated,
                    title_w = title_width
                );
                if note.id == active_id {
                    println!("{}", terminal::bold(&line, use_color));
                } else {
                    println!("{}", line);
                }
            }

            println!("\n{} notes total", notes.len());
        }
    }

    Ok(())
}
