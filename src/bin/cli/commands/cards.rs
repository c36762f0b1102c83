use anyhow::{bail, Context, Result};

use marginalia_lib::storage::Flashcard;
use marginalia_lib::workspace;

use crate::app::{short_id, App};
use crate::render::terminal;
use crate::OutputFormat;

pub fn run_list(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let workspace = app.workspace()?;
    let cards = workspace.flashcards();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(cards)?);
        }
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("No flashcards for \"{}\".", workspace.active_note().title);
                return Ok(());
            }
            for (i, card) in cards.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print_card(card, use_color);
            }
            println!("\n{} flashcards", cards.len());
        }
    }

    Ok(())
}

pub async fn run_generate(app: &App, format: &OutputFormat) -> Result<()> {
    let gateway = app.gateway()?;
    let Some(count) = workspace::generate_flashcards(&app.workspace, &gateway)
        .await
        .context("Failed to generate flashcards")?
    else {
        bail!("Flashcard generation was superseded by a newer request");
    };

    match format {
        OutputFormat::Json => {
            let workspace = app.workspace()?;
            println!("{}", serde_json::to_string_pretty(workspace.flashcards())?);
        }
        OutputFormat::Plain => {
            println!("Generated {} flashcards", count);
        }
    }
    Ok(())
}

pub fn run_edit(
    app: &App,
    id: &str,
    question: Option<String>,
    answer: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    if question.is_none() && answer.is_none() {
        bail!("Nothing to change: pass --question and/or --answer");
    }
    let card = app.find_card(id)?;
    let question = question.unwrap_or(card.question);
    let answer = answer.unwrap_or(card.answer);

    let mut workspace = app.workspace()?;
    workspace
        .update_flashcard(card.id, question, answer)
        .context("Failed to update flashcard")?;

    report(
        format,
        serde_json::json!({ "updated": card.id.to_string() }),
        format!("Updated flashcard {}", short_id(card.id)),
    )
}

pub fn run_remove(app: &App, id: &str, format: &OutputFormat) -> Result<()> {
    let card = app.find_card(id)?;
    app.workspace()?
        .remove_flashcard(card.id)
        .context("Failed to remove flashcard")?;

    report(
        format,
        serde_json::json!({ "removed": card.id.to_string() }),
        format!("Removed flashcard {}", short_id(card.id)),
    )
}

pub fn run_clear(app: &App, format: &OutputFormat) -> Result<()> {
    let mut workspace = app.workspace()?;
    let count = workspace.flashcards().len();
    workspace.clear_flashcards().context("Failed to clear flashcards")?;

    report(
        format,
        serde_json::json!({ "cleared": count }),
        format!("Cleared {} flashcards", count),
    )
}

fn print_card(card: &Flashcard, use_color: bool) {
    println!("{} {}", terminal::dim(&short_id(card.id), use_color), terminal::bold(&card.question, use_color));
    println!("         {}", terminal::green(&card.answer, use_color));
}

fn report(format: &OutputFormat, json: serde_json::Value, message: String) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json)?),
        OutputFormat::Plain => println!("{}", message),
    }
    Ok(())
}
