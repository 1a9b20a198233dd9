//! Link command handlers

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use linkdeck_core::{LinkCollection, LinkId, RegularLink, Store};

use crate::dashboard::Dashboard;
use crate::output::Output;

/// List regular links
pub async fn list(dashboard: &Dashboard, output: &Output) -> Result<()> {
    let store = dashboard.load::<LinkCollection>().await?;
    let links = store.read(|c| c.regular_links.clone());
    output.print_links(&links, Utc::now());
    Ok(())
}

/// Show a single link
pub async fn show(dashboard: &Dashboard, id: LinkId, output: &Output) -> Result<()> {
    let store = dashboard.load::<LinkCollection>().await?;
    let link = store
        .read(|c| c.regular_link(id).cloned())
        .ok_or_else(|| anyhow::anyhow!("Link not found: {}", id))?;
    output.print_link(&link);
    Ok(())
}

/// Create a new link
pub async fn add(dashboard: &Dashboard, title: String, url: String, output: &Output) -> Result<()> {
    let url = normalize_url(&url)?;
    let editor = dashboard.edit::<LinkCollection>().await?;
    let id = editor.store().create_regular_link(title, url);
    editor.save(output, &format!("Created link: {}", id)).await
}

/// Change a link's title and/or URL
pub async fn edit(
    dashboard: &Dashboard,
    id: LinkId,
    title: Option<String>,
    url: Option<String>,
    output: &Output,
) -> Result<()> {
    if title.is_none() && url.is_none() {
        bail!("Nothing to change. Pass --title and/or --url.");
    }
    let url = url.as_deref().map(normalize_url).transpose()?;

    let editor = dashboard.edit::<LinkCollection>().await?;
    let mut link = find(editor.store(), id)?;
    if let Some(title) = title {
        link.title = title;
    }
    if let Some(url) = url {
        link.url = url;
    }
    editor.store().update_regular_link(link);
    editor.save(output, &format!("Updated link: {}", id)).await
}

/// Delete a link
pub async fn delete(dashboard: &Dashboard, id: LinkId, output: &Output) -> Result<()> {
    let editor = dashboard.edit::<LinkCollection>().await?;
    find(editor.store(), id)?;
    editor.store().delete_link(id);
    editor.save(output, &format!("Deleted link: {}", id)).await
}

/// Flip a link between shown and hidden
pub async fn toggle(dashboard: &Dashboard, id: LinkId, output: &Output) -> Result<()> {
    let editor = dashboard.edit::<LinkCollection>().await?;
    find(editor.store(), id)?;
    editor.store().toggle_active(id);
    let state = if find(editor.store(), id)?.active {
        "active"
    } else {
        "hidden"
    };
    editor.save(output, &format!("Link {} is now {}", id, state)).await
}

/// Flip a link's favorite flag
pub async fn favorite(dashboard: &Dashboard, id: LinkId, output: &Output) -> Result<()> {
    let editor = dashboard.edit::<LinkCollection>().await?;
    find(editor.store(), id)?;
    editor.store().toggle_favorite(id);
    let verb = if find(editor.store(), id)?.favorite {
        "Favorited"
    } else {
        "Unfavorited"
    };
    editor.save(output, &format!("{} link: {}", verb, id)).await
}

/// Move a link to a 1-based position
pub async fn move_to(
    dashboard: &Dashboard,
    id: LinkId,
    position: usize,
    output: &Output,
) -> Result<()> {
    if position == 0 {
        bail!("Positions start at 1");
    }
    let editor = dashboard.edit::<LinkCollection>().await?;
    find(editor.store(), id)?;
    editor.store().move_link(id, position - 1);
    editor
        .save(output, &format!("Moved link {} to position {}", id, position))
        .await
}

/// Set or clear a link's visibility window
pub async fn schedule(
    dashboard: &Dashboard,
    id: LinkId,
    start: Option<String>,
    end: Option<String>,
    timezone: Option<String>,
    output: &Output,
) -> Result<()> {
    let start = start.as_deref().map(parse_time).transpose()?;
    let end = end.as_deref().map(parse_time).transpose()?;
    if let (Some(start), Some(end)) = (start, end) {
        if end <= start {
            bail!("Schedule end must be after its start");
        }
    }

    let editor = dashboard.edit::<LinkCollection>().await?;
    find(editor.store(), id)?;
    editor.store().set_schedule(id, start, end, timezone);

    let message = if start.is_none() && end.is_none() {
        format!("Cleared schedule for link {}", id)
    } else {
        format!("Scheduled link {}", id)
    };
    editor.save(output, &message).await
}

/// Count a click on a link
pub async fn click(dashboard: &Dashboard, id: LinkId, output: &Output) -> Result<()> {
    let editor = dashboard.edit::<LinkCollection>().await?;
    find(editor.store(), id)?;
    editor.store().record_click(id);
    editor.save(output, &format!("Recorded click on link {}", id)).await
}

fn find(store: &Store<LinkCollection>, id: LinkId) -> Result<RegularLink> {
    store
        .read(|c| c.regular_link(id).cloned())
        .ok_or_else(|| anyhow::anyhow!("Link not found: {}", id))
}

/// Require an http(s) URL, adding `https://` to bare hosts
pub(crate) fn normalize_url(url: &str) -> Result<String> {
    let url = url.trim();
    if url.is_empty() {
        bail!("URL must not be empty");
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return Ok(url.to_string());
    }
    if url.contains("://") {
        bail!("Only http and https links are supported: {}", url);
    }
    Ok(format!("https://{}", url))
}

/// Parse RFC 3339, `YYYY-MM-DD HH:MM` (UTC) or `YYYY-MM-DD` (midnight UTC)
fn parse_time(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Ok(time.with_timezone(&Utc));
    }
    if let Ok(time) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M") {
        return Ok(time.and_utc());
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").with_context(|| {
        format!(
            "Invalid time '{}'. Use RFC 3339, 'YYYY-MM-DD HH:MM' or 'YYYY-MM-DD'.",
            value
        )
    })?;
    date.and_hms_opt(0, 0, 0)
        .map(|time| time.and_utc())
        .ok_or_else(|| anyhow::anyhow!("Invalid time '{}'", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("https://a.com").unwrap(), "https://a.com");
        assert_eq!(normalize_url(" http://a.com ").unwrap(), "http://a.com");
        assert_eq!(normalize_url("a.com/shop").unwrap(), "https://a.com/shop");
        assert!(normalize_url("").is_err());
        assert!(normalize_url("ftp://a.com").is_err());
    }

    #[test]
    fn test_parse_time_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(parse_time("2026-05-01T09:30:00Z").unwrap(), expected);
        assert_eq!(parse_time("2026-05-01T11:30:00+02:00").unwrap(), expected);
        assert_eq!(parse_time("2026-05-01 09:30").unwrap(), expected);
        assert_eq!(
            parse_time("2026-05-01").unwrap(),
            Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_time_rejects_garbage() {
        assert!(parse_time("next tuesday").is_err());
        assert!(parse_time("2026-13-01").is_err());
    }

    #[test]
    fn test_find_missing_link() {
        let store = Store::<LinkCollection>::default();
        assert!(find(&store, 7).is_err());
    }
}
