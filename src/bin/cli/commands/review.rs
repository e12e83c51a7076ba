use anyhow::Result;
use uuid::Uuid;

use recall_lib::flashcards::{Quality, Rating};
use recall_lib::identity::OwnerId;

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    owner: &OwnerId,
    card_id: Uuid,
    quality: Option<i64>,
    rating: Option<Rating>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let card = match (quality, rating) {
        (_, Some(rating)) => app.review_quality(owner, card_id, Quality::from(rating))?,
        (Some(quality), None) => app.review(owner, card_id, quality)?,
        (None, None) => anyhow::bail!("Either a quality or --rating is required"),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Plain => {
            println!(
                "{}",
                terminal::paint(&format!("Reviewed \"{}\"", card.front), Color::BOLD, use_color)
            );
            println!("  {}", terminal::schedule_line(&card, use_color));
        }
    }

    Ok(())
}
