//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use chrono::{DateTime, Utc};
use serde::Serialize;

use linkdeck_core::{RegularLink, Settings, SocialLink};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print any serializable value as pretty JSON
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Failed to encode output: {}", e),
        }
    }

    /// Print profile settings
    pub fn print_settings(&self, settings: &Settings) {
        match self.format {
            OutputFormat::Human => {
                println!("Display name:  {}", or_unset(&settings.display_name));
                println!("Username:      {}", or_unset(&settings.username));
                println!("Bio:           {}", truncate_line(&settings.bio, 60));
                println!("Website:       {}", or_unset(&settings.website));
                println!(
                    "Profile image: {}",
                    settings
                        .profile_image
                        .as_deref()
                        .map(|image| truncate(image, 48))
                        .unwrap_or_else(|| "(none)".to_string())
                );
                println!("Two-factor:    {}", on_off(settings.two_factor_enabled));
                println!();

                let theme = &settings.theme_settings;
                println!("── Theme ──");
                println!("Preset:        {}", or_unset(&settings.theme));
                println!("Background:    {}", theme.background_color);
                println!("Text:          {}", theme.text_color);
                println!(
                    "Buttons:       {} on {} ({:?})",
                    theme.button_text_color, theme.button_color, theme.button_style
                );
                println!("Font:          {}", theme.font_family);
                println!("Layout:        {:?}", theme.layout);
                println!();

                let appearance = &settings.appearance_preferences;
                let notifications = &settings.notification_preferences;
                println!("── Preferences ──");
                println!("Compact mode:  {}", on_off(appearance.compact_mode));
                println!("Show avatar:   {}", on_off(appearance.show_avatar));
                println!("Social icons:  {}", on_off(appearance.show_social_icons));
                println!("Email:         {}", on_off(notifications.email));
                println!("Push:          {}", on_off(notifications.push));
                println!("Weekly digest: {}", on_off(notifications.weekly_digest));
            }
            OutputFormat::Json => self.json(settings),
            OutputFormat::Quiet => println!("{}", settings.username),
        }
    }

    /// Print the regular links in display order
    pub fn print_links(&self, links: &[RegularLink], now: DateTime<Utc>) {
        match self.format {
            OutputFormat::Human => {
                if links.is_empty() {
                    println!("No links found.");
                    return;
                }
                for link in links {
                    println!(
                        "{:>4} | {} | {} | {} | {} clicks",
                        link.id,
                        link_badges(link, now),
                        truncate(&link.title, 30),
                        truncate(&link.url, 40),
                        link.clicks
                    );
                }
                println!("\n{} link(s)", links.len());
            }
            OutputFormat::Json => self.json(links),
            OutputFormat::Quiet => {
                for link in links {
                    println!("{}", link.id);
                }
            }
        }
    }

    /// Print a single regular link
    pub fn print_link(&self, link: &RegularLink) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:        {}", link.id);
                println!("Title:     {}", link.title);
                println!("URL:       {}", link.url);
                println!("Active:    {}", on_off(link.active));
                println!("Favorite:  {}", on_off(link.favorite));
                println!("Clicks:    {}", link.clicks);
                if let Some(start) = link.schedule_start {
                    println!("Starts:    {}", start.format("%Y-%m-%d %H:%M UTC"));
                }
                if let Some(end) = link.schedule_end {
                    println!("Ends:      {}", end.format("%Y-%m-%d %H:%M UTC"));
                }
                if let Some(ref tz) = link.timezone {
                    println!("Timezone:  {}", tz);
                }
            }
            OutputFormat::Json => self.json(link),
            OutputFormat::Quiet => println!("{}", link.id),
        }
    }

    /// Print the social links
    pub fn print_social_links(&self, links: &[SocialLink]) {
        match self.format {
            OutputFormat::Human => {
                if links.is_empty() {
                    println!("No social links found.");
                    return;
                }
                for link in links {
                    println!("{:<16} {}", truncate(&link.name, 16), link.url);
                }
                println!("\n{} social link(s)", links.len());
            }
            OutputFormat::Json => self.json(links),
            OutputFormat::Quiet => {
                for link in links {
                    println!("{}", link.name);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr (suppressed in quiet mode)
    pub fn warn(&self, message: &str) {
        if !self.is_quiet() {
            eprintln!("⚠ {}", message);
        }
    }
}

/// Short state column: active/off, favorite star, schedule marker
fn link_badges(link: &RegularLink, now: DateTime<Utc>) -> String {
    let state = if !link.active {
        "off "
    } else if link.is_live_at(now) {
        "live"
    } else {
        "wait"
    };
    let favorite = if link.favorite { '★' } else { ' ' };
    let scheduled = if link.is_scheduled() { '⏱' } else { ' ' };
    format!("{}{}{}", state, favorite, scheduled)
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}
