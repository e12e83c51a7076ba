use anyhow::Result;
use chrono::{DateTime, Utc};

use recall_lib::identity::OwnerId;

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    owner: &OwnerId,
    as_of: Option<DateTime<Utc>>,
    limit: Option<usize>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let as_of = as_of.unwrap_or_else(Utc::now);
    let cards = app.due_cards(owner, Some(as_of), limit)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cards)?),
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("No cards due. Come back later.");
                return Ok(());
            }

            let front_width = cards
                .iter()
                .map(|c| c.front.chars().count())
                .max()
                .unwrap_or(5)
                .clamp(5, 40);

            println!("{:<36}  {:<fw$}  {}", "ID", "Front", "Due", fw = front_width);
            println!(
                "{}  {}  {}",
                "\u{2500}".repeat(36),
                "\u{2500}".repeat(front_width),
                "\u{2500}".repeat(12)
            );

            for card in &cards {
                let label = terminal::overdue_label(card, as_of);
                let color = if card.last_review.is_none() { Color::GREEN } else { Color::YELLOW };
                println!(
                    "{}  {:<fw$}  {}",
                    card.id,
                    terminal::truncate(&card.front, front_width),
                    terminal::paint(&label, color, use_color),
                    fw = front_width
                );
            }

            println!("\n{} card(s) due", cards.len());
        }
    }

    Ok(())
}
