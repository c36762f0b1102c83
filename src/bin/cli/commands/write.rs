use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::App;
use crate::OutputFormat;

/// Feed stdin into the active note line by line.
///
/// Each line is an edit that restarts the auto-save timer, so a slow writer
/// (someone typing into a pipe) gets saved in bursts during pauses.
pub async fn run(app: &App, append: bool, format: &OutputFormat) -> Result<()> {
    let mut content = if append {
        app.workspace()?.active_note().content.clone()
    } else {
        String::new()
    };

    let saver = app.autosaver();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut received = 0usize;

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        append_line(&mut content, &line, received == 0);
        received += 1;

        app.workspace()?.update_content(content.clone());
        saver.touch();
    }

    // Flushes whatever the timer has not saved yet
    saver.shutdown().await;

    let workspace = app.workspace()?;
    let note = workspace.active_note();
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": note.id.to_string(),
                "title": note.title,
                "lines": received,
                "saved": !workspace.is_dirty(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Wrote {} lines to \"{}\"", received, note.title);
        }
    }

    Ok(())
}

/// Add one stdin line to the buffer. Every line after the first is
/// separated by a newline, as is the first when it extends existing text,
/// so blank lines survive even at the start.
fn append_line(content: &mut String, line: &str, first: bool) {
    if !first || !content.is_empty() {
        content.push('\n');
    }
    content.push_str(line);
}
