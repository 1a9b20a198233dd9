//! Social link command handlers

use anyhow::{bail, Result};

use linkdeck_core::{LinkCollection, SocialLink};

use super::link::normalize_url;
use crate::dashboard::Dashboard;
use crate::output::Output;

/// List social links
pub async fn list(dashboard: &Dashboard, output: &Output) -> Result<()> {
    let store = dashboard.load::<LinkCollection>().await?;
    let links = store.read(|c| c.social_links.clone());
    output.print_social_links(&links);
    Ok(())
}

/// Add a social link, replacing one with the same name
pub async fn add(dashboard: &Dashboard, name: String, url: String, output: &Output) -> Result<()> {
    let link = parse_social_link(&name, &url)?;
    let name = link.name.clone();

    let editor = dashboard.edit::<LinkCollection>().await?;
    let replaced = editor.store().read(|c| c.social_link(&name).is_some());
    editor.store().add_social_link(link);

    let message = if replaced {
        format!("Replaced social link: {}", name)
    } else {
        format!("Added social link: {}", name)
    };
    editor.save(output, &message).await
}

/// Remove a social link by name
pub async fn remove(dashboard: &Dashboard, name: String, output: &Output) -> Result<()> {
    let editor = dashboard.edit::<LinkCollection>().await?;
    if editor.store().read(|c| c.social_link(&name).is_none()) {
        bail!("Social link not found: {}", name);
    }
    editor.store().remove_social_link(name.clone());
    editor
        .save(output, &format!("Removed social link: {}", name))
        .await
}

/// Validate a name and URL before anything touches the network
fn parse_social_link(name: &str, url: &str) -> Result<SocialLink> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Social link name must not be empty");
    }
    Ok(SocialLink::new(name, normalize_url(url)?))
}
