use anyhow::Result;
use uuid::Uuid;

use recall_lib::flashcards::algorithm::{format_interval, preview_intervals};
use recall_lib::identity::OwnerId;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, owner: &OwnerId, card_id: Uuid, format: &OutputFormat) -> Result<()> {
    let state = app.schedule_of(owner, card_id)?;
    let preview = preview_intervals(state);

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = preview
                .iter()
                .map(|(rating, days)| {
                    serde_json::json!({
                        "rating": rating,
                        "quality": rating.quality(),
                        "interval": days,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            for (rating, days) in &preview {
                println!("{:<6} (q{})  {}", rating.label(), rating.quality(), format_interval(*days));
            }
        }
    }

    Ok(())
}
