//! Status command handler

use anyhow::Result;
use chrono::Utc;

use linkdeck_core::remote::CredentialSource;
use linkdeck_core::{LinkCollection, Settings};

use crate::dashboard::Dashboard;
use crate::output::{Output, OutputFormat};

/// Show connection and content summary
pub async fn show(dashboard: &Dashboard, output: &Output) -> Result<()> {
    let config = dashboard.config();
    let session = config.session();
    let (settings, links) = tokio::try_join!(
        dashboard.load::<Settings>(),
        dashboard.load::<LinkCollection>()
    )?;

    let settings = settings.data();
    let links = links.data();
    let now = Utc::now();
    let live = links
        .regular_links
        .iter()
        .filter(|link| link.is_live_at(now))
        .count();
    let scheduled = links
        .regular_links
        .iter()
        .filter(|link| link.is_scheduled())
        .count();

    if !session.is_signed_in() {
        output.warn("No token configured; requests are anonymous. Set one with: linkdeck config set token <TOKEN>");
    }

    match output.format {
        OutputFormat::Json => {
            output.json(&serde_json::json!({
                "api_url": config.api_url,
                "signed_in": session.is_signed_in(),
                "user_id": session.user_id(),
                "username": settings.username,
                "counts": {
                    "links": links.regular_links.len(),
                    "live": live,
                    "scheduled": scheduled,
                    "social": links.social_links.len()
                }
            }));
        }
        OutputFormat::Quiet => {
            println!("{}", settings.username);
        }
        OutputFormat::Human => {
            println!("linkdeck Status");
            println!("===============");
            println!();
            println!("API:");
            println!("  URL:       {}", config.api_url);
            println!(
                "  Session:   {}",
                if session.is_signed_in() {
                    "signed in"
                } else {
                    "anonymous"
                }
            );
            if let Some(user_id) = session.user_id() {
                println!("  User:      {}", user_id);
            }
            println!();
            println!("Profile:");
            println!("  Name:      {}", settings.display_name);
            println!("  Username:  {}", settings.username);
            println!();
            println!("Contents:");
            println!(
                "  Links:     {} ({} live, {} scheduled)",
                links.regular_links.len(),
                live,
                scheduled
            );
            println!("  Social:    {}", links.social_links.len());
        }
    }

    Ok(())
}
