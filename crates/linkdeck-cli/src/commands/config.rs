//! Config command handlers

use anyhow::{Context, Result};

use linkdeck_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let token = config.token.as_deref().map(mask_token);

    match output.format {
        OutputFormat::Json => {
            output.json(&serde_json::json!({
                "api_url": config.api_url,
                "token": token,
                "user_id": config.user_id,
                "request_timeout_secs": config.request_timeout_secs,
                "sync_debounce_ms": config.sync_debounce_ms,
                "push_timeout_secs": config.push_timeout_secs
            }));
        }
        OutputFormat::Quiet => {
            println!("{}", config.api_url);
        }
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  api_url:              {}", config.api_url);
            println!(
                "  token:                {}",
                token.as_deref().unwrap_or("(not set)")
            );
            println!(
                "  user_id:              {}",
                config.user_id.as_deref().unwrap_or("(not set)")
            );
            println!("  request_timeout_secs: {}", config.request_timeout_secs);
            println!("  sync_debounce_ms:     {}", config.sync_debounce_ms);
            println!("  push_timeout_secs:    {}", config.push_timeout_secs);
            println!();
            println!("Config file: {}", Config::config_file_path().display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;
    config.set(&key, &value)?;
    config.save().context("Failed to save configuration")?;

    let shown = if key == "token" {
        mask_token(&value)
    } else {
        value
    };
    output.success(&format!("Set {} = {}", key, shown));

    Ok(())
}

/// Keep only the last four characters of a secret
fn mask_token(token: &str) -> String {
    let count = token.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = token.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}
