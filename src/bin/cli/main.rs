mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use recall_lib::flashcards::Rating;

#[derive(Parser)]
#[command(name = "recall-cli", about = "Spaced repetition flashcards", version)]
struct Cli {
    /// API key identifying the card owner
    #[arg(long, global = true, env = "RECALL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Config file (default: <config dir>/recall/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

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
    /// Issue an API key for an owner
    Register {
        /// Owner id the key resolves to
        owner: String,
    },

    /// Create a flashcard
    Add {
        /// Question side
        #[arg(long)]
        front: String,
        /// Answer side
        #[arg(long)]
        back: String,
        /// Optional category label
        #[arg(long)]
        category: Option<String>,
    },

    /// List cards due for review
    Due {
        /// Maximum number of cards (default from config)
        #[arg(long)]
        limit: Option<usize>,
        /// Point in time to evaluate, RFC 3339 (default: now)
        #[arg(long)]
        as_of: Option<chrono::DateTime<chrono::Utc>>,
    },

    /// Record a review of a card
    Review {
        /// Card id
        id: Uuid,
        /// SM-2 quality, 0 (blackout) to 5 (perfect)
        #[arg(required_unless_present = "rating", allow_negative_numbers = true)]
        quality: Option<i64>,
        /// Review button instead of a raw quality
        #[arg(long, conflicts_with = "quality")]
        rating: Option<Rating>,
    },

    /// Show the interval each review button would give a card
    Preview {
        /// Card id
        id: Uuid,
    },

    /// Card counts for the current owner
    Stats,

    /// Create all cards of an uploaded session (JSON file, "-" for stdin)
    Import {
        path: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let app = app::App::new(cli.config.as_deref())?;

    match cli.command {
        Command::Register { owner } => {
            commands::register::run(&app, &owner, &cli.format)?;
        }
        Command::Add { front, back, category } => {
            let owner = app.owner(cli.api_key.as_deref())?;
            commands::add::run(&app, &owner, front, back, category, &cli.format)?;
        }
        Command::Due { limit, as_of } => {
            let owner = app.owner(cli.api_key.as_deref())?;
            commands::due::run(&app, &owner, as_of, limit, &cli.format, use_color)?;
        }
        Command::Review { id, quality, rating } => {
            let owner = app.owner(cli.api_key.as_deref())?;
            commands::review::run(&app, &owner, id, quality, rating, &cli.format, use_color)?;
        }
        Command::Preview { id } => {
            let owner = app.owner(cli.api_key.as_deref())?;
            commands::preview::run(&app, &owner, id, &cli.format)?;
        }
        Command::Stats => {
            let owner = app.owner(cli.api_key.as_deref())?;
            commands::stats::run(&app, &owner, &cli.format)?;
        }
        Command::Import { path } => {
            let owner = app.owner(cli.api_key.as_deref())?;
            commands::import::run(&app, &owner, &path, &cli.format)?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
