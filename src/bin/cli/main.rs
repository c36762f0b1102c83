mod app;
mod commands;
mod render;

use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use marginalia_lib::ai::AiOperation;
use marginalia_lib::transfer::NoteFormat;

#[derive(Parser)]
#[command(name = "marginalia-cli", about = "Marginalia study notebook CLI", version)]
struct Cli {
    /// Data directory (default: $MARGINALIA_DATA_DIR or the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List all notes
    List,

    /// Show a note (default: the active note)
    Show {
        /// Note id or title (case-insensitive prefix match)
        note: Option<String>,
    },

    /// Create a new note and make it active
    New {
        #[arg(long)]
        title: Option<String>,
        /// Initial content (use "-" to read from stdin)
        #[arg(long)]
        content: Option<String>,
    },

    /// Make another note active
    Switch {
        /// Note id or title (case-insensitive prefix match)
        note: String,
    },

    /// Delete a note
    Delete {
        /// Note id or title (case-insensitive prefix match)
        note: String,
    },

    /// Rename the active note
    Title { title: String },

    /// Stream stdin into the active note, auto-saving as it arrives
    Write {
        /// Keep the existing content and add to the end of it
        #[arg(long)]
        append: bool,
    },

    /// Explain text in simpler terms (use "-" to read from stdin)
    Explain { text: String },

    /// Expand text with more detail (use "-" to read from stdin)
    Expand { text: String },

    /// Summarize text into key points (use "-" to read from stdin)
    Summarize { text: String },

    /// Flashcards of the active note
    #[command(subcommand)]
    Cards(CardsCommand),

    /// Export the active note or its flashcards
    #[command(subcommand)]
    Export(ExportCommand),

    /// Import a note or a flashcard file
    #[command(subcommand)]
    Import(ImportCommand),
}

#[derive(Subcommand)]
enum CardsCommand {
    /// List flashcards
    List,

    /// Replace the deck with cards generated from the note
    Generate,

    /// Change a card's question or answer
    Edit {
        /// Card id (prefix match)
        id: String,
        #[arg(long)]
        question: Option<String>,
        #[arg(long)]
        answer: Option<String>,
    },

    /// Remove a card
    Remove {
        /// Card id (prefix match)
        id: String,
    },

    /// Remove every card
    Clear,
}

#[derive(Subcommand)]
enum ExportCommand {
    /// Export the active note as plain text
    Text {
        /// Output directory (default: current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Export the active note as markdown
    Markdown {
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Export the active note's flashcards as JSON
    Cards {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ImportCommand {
    /// Import a .txt or .md file as a new note
    Note { path: PathBuf },

    /// Import a flashcard JSON export
    Cards { path: PathBuf },
}

/// Resolve "-" as stdin
fn resolve_text(text: String) -> Result<String> {
    if text != "-" {
        return Ok(text);
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read stdin")?;
    Ok(buf)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.data_dir)?;

    match cli.command {
        Command::List => commands::list::run(&app, &cli.format, use_color)?,
        Command::Show { note } => commands::show::run(&app, note.as_deref(), &cli.format, use_color)?,
        Command::New { title, content } => {
            let content = content.map(resolve_text).transpose()?;
            commands::new::run(&app, title, content, &cli.format)?;
        }
        Command::Switch { note } => commands::note::run_switch(&app, &note, &cli.format)?,
        Command::Delete { note } => commands::note::run_delete(&app, &note, &cli.format)?,
        Command::Title { title } => commands::note::run_title(&app, title, &cli.format)?,
        Command::Write { append } => commands::write::run(&app, append, &cli.format).await?,
        Command::Explain { text } => {
            commands::ai::run(&app, AiOperation::Explain, &resolve_text(text)?, &cli.format).await?
        }
        Command::Expand { text } => {
            commands::ai::run(&app, AiOperation::Expand, &resolve_text(text)?, &cli.format).await?
        }
        Command::Summarize { text } => {
            commands::ai::run(&app, AiOperation::Summarize, &resolve_text(text)?, &cli.format).await?
        }
        Command::Cards(subcmd) => match subcmd {
            CardsCommand::List => commands::cards::run_list(&app, &cli.format, use_color)?,
            CardsCommand::Generate => commands::cards::run_generate(&app, &cli.format).await?,
            CardsCommand::Edit { id, question, answer } => {
                commands::cards::run_edit(&app, &id, question, answer, &cli.format)?
            }
            CardsCommand::Remove { id } => commands::cards::run_remove(&app, &id, &cli.format)?,
            CardsCommand::Clear => commands::cards::run_clear(&app, &cli.format)?,
        },
        Command::Export(subcmd) => match subcmd {
            ExportCommand::Text { out } => {
                commands::export::run_note(&app, NoteFormat::Text, out, &cli.format)?
            }
            ExportCommand::Markdown { out } => {
                commands::export::run_note(&app, NoteFormat::Markdown, out, &cli.format)?
            }
            ExportCommand::Cards { out } => commands::export::run_cards(&app, out, &cli.format)?,
        },
        Command::Import(subcmd) => match subcmd {
            ImportCommand::Note { path } => commands::import::run_note(&app, &path, &cli.format)?,
            ImportCommand::Cards { path } => commands::import::run_cards(&app, &path, &cli.format)?,
        },
    }

    Ok(())
}
