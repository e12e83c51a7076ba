use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, owner: &str, format: &OutputFormat) -> Result<()> {
    let key = app.register(owner)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "owner": owner,
                "apiKey": key,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("API key for {}: {}", owner, key);
            println!("  Export it as RECALL_API_KEY or pass --api-key.");
        }
    }

    Ok(())
}
