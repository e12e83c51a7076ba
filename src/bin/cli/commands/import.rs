use std::fs;
use std::io::Read;

use anyhow::{Context, Result};

use recall_lib::flashcards::SessionUpload;
use recall_lib::identity::OwnerId;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, owner: &OwnerId, path: &str, format: &OutputFormat) -> Result<()> {
    let content = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read session from stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?
    };

    let upload: SessionUpload =
        serde_json::from_str(&content).context("Session file is not valid JSON")?;
    let cards = app.import_session(owner, upload)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cards)?),
        OutputFormat::Plain => {
            println!("Imported {} flashcard(s).", cards.len());
            for card in &cards {
                println!("  {}  {}", card.id, card.front);
            }
        }
    }

    Ok(())
}
