//! Register command implementation

use crate::cli::{load_config_with_overrides, start_client, RegisterArgs};
use serde_json::json;

/// Format a freshly issued key for the terminal or as JSON
pub fn format_registration(api_key: &str, as_json: bool) -> Result<String, serde_json::Error> {
    if as_json {
        serde_json::to_string_pretty(&json!({ "api_key": api_key }))
    } else {
        Ok(format!(
            "✓ Registered new API key: {}\n  Pass it with --api-key or GATEWATCH_API_KEY.",
            api_key
        ))
    }
}

/// Handle `gatewatch register` command
pub async fn run_register(args: RegisterArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args.connection)?;
    let client = start_client(&config)?;

    let api_key = client.register().await?;
    println!("{}", format_registration(&api_key, args.json)?);

    Ok(())
}
