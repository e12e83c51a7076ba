use anyhow::Result;

use recall_lib::flashcards::NewFlashcard;
use recall_lib::identity::OwnerId;

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    owner: &OwnerId,
    front: String,
    back: String,
    category: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let request = NewFlashcard {
        front,
        back,
        category,
        session_id: None,
    };
    let card = app.create_card(owner, request)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Plain => {
            println!("Created flashcard: \"{}\"", card.front);
            if let Some(category) = &card.category {
                println!("  Category: {}", category);
            }
            println!("  ID: {}", card.id);
        }
    }

    Ok(())
}
