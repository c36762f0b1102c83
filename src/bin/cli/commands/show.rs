use anyhow::Result;

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(app: &App, query: Option<&str>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let note = match query {
        Some(query) => app.find_note(query)?,
        None => app.workspace()?.active_note().clone(),
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&note)?);
        }
        OutputFormat::Plain => {
            println!("{}", terminal::bold(&note.title, use_color));
            println!(
                "{}",
                terminal::dim(
                    &format!("Updated {}", note.updated_at.format("%Y-%m-%d %H:%M")),
                    use_color
                )
            );
            if !note.content.is_empty() {
                println!();
                println!("{}", terminal::render_markdown(&note.content, use_color));
            }
        }
    }

    Ok(())
}
