use anyhow::Result;

use recall_lib::identity::OwnerId;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, owner: &OwnerId, format: &OutputFormat) -> Result<()> {
    let stats = app.stats(owner)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Plain => {
            println!("Total     {}", stats.total_cards);
            println!("Due       {}", stats.due_cards);
            println!("New       {}", stats.new_cards);
            println!("Learning  {}", stats.learning_cards);
            println!("Mature    {}", stats.mature_cards);
        }
    }

    Ok(())
}
