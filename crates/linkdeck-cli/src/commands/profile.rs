//! Profile command handlers

use anyhow::{bail, Context, Result};

use linkdeck_core::models::{ButtonStyle, Layout};
use linkdeck_core::{Settings, Store};

use crate::dashboard::Dashboard;
use crate::output::Output;

/// Keys accepted by `profile set`
pub const FIELDS: &[&str] = &[
    "display_name",
    "username",
    "bio",
    "website",
    "profile_image",
    "two_factor",
    "theme",
    "background_color",
    "text_color",
    "button_color",
    "button_text_color",
    "button_style",
    "font",
    "layout",
    "compact_mode",
    "show_avatar",
    "show_social_icons",
    "email_notifications",
    "push_notifications",
    "weekly_digest",
];

/// A single parsed `profile set` edit
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileEdit {
    DisplayName(String),
    Username(String),
    Bio(String),
    Website(String),
    ProfileImage(Option<String>),
    TwoFactor(bool),
    Theme(String),
    Color(ColorSlot, String),
    ButtonStyle(ButtonStyle),
    Font(String),
    Layout(Layout),
    CompactMode(bool),
    ShowAvatar(bool),
    ShowSocialIcons(bool),
    EmailNotifications(bool),
    PushNotifications(bool),
    WeeklyDigest(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSlot {
    Background,
    Text,
    Button,
    ButtonText,
}

impl ProfileEdit {
    /// Parse a `field value` pair
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        let edit = match field {
            "display_name" => ProfileEdit::DisplayName(value.to_string()),
            "username" => ProfileEdit::Username(value.trim().to_string()),
            "bio" => ProfileEdit::Bio(value.to_string()),
            "website" => ProfileEdit::Website(value.trim().to_string()),
            "profile_image" => ProfileEdit::ProfileImage(match value {
                "" | "none" => None,
                image => Some(image.to_string()),
            }),
            "two_factor" => ProfileEdit::TwoFactor(parse_bool(field, value)?),
            "theme" => ProfileEdit::Theme(value.to_string()),
            "background_color" => ProfileEdit::Color(ColorSlot::Background, parse_color(value)?),
            "text_color" => ProfileEdit::Color(ColorSlot::Text, parse_color(value)?),
            "button_color" => ProfileEdit::Color(ColorSlot::Button, parse_color(value)?),
            "button_text_color" => {
                ProfileEdit::Color(ColorSlot::ButtonText, parse_color(value)?)
            }
            "button_style" => ProfileEdit::ButtonStyle(match value {
                "rounded" => ButtonStyle::Rounded,
                "square" => ButtonStyle::Square,
                "pill" => ButtonStyle::Pill,
                "outline" => ButtonStyle::Outline,
                _ => bail!("Invalid button_style '{}'. Use rounded, square, pill or outline.", value),
            }),
            "font" => ProfileEdit::Font(value.to_string()),
            "layout" => ProfileEdit::Layout(match value {
                "stack" => Layout::Stack,
                "grid" => Layout::Grid,
                _ => bail!("Invalid layout '{}'. Use stack or grid.", value),
            }),
            "compact_mode" => ProfileEdit::CompactMode(parse_bool(field, value)?),
            "show_avatar" => ProfileEdit::ShowAvatar(parse_bool(field, value)?),
            "show_social_icons" => ProfileEdit::ShowSocialIcons(parse_bool(field, value)?),
            "email_notifications" => ProfileEdit::EmailNotifications(parse_bool(field, value)?),
            "push_notifications" => ProfileEdit::PushNotifications(parse_bool(field, value)?),
            "weekly_digest" => ProfileEdit::WeeklyDigest(parse_bool(field, value)?),
            _ => bail!(
                "Unknown profile field: '{}'\nValid fields: {}",
                field,
                FIELDS.join(", ")
            ),
        };
        Ok(edit)
    }

    /// Apply through the store's mutation API
    pub fn apply(self, store: &Store<Settings>) {
        match self {
            ProfileEdit::DisplayName(v) => store.set_display_name(v),
            ProfileEdit::Username(v) => store.set_username(v),
            ProfileEdit::Bio(v) => store.set_bio(v),
            ProfileEdit::Website(v) => store.set_website(v),
            ProfileEdit::ProfileImage(v) => store.set_profile_image(v),
            ProfileEdit::TwoFactor(v) => store.set_two_factor_enabled(v),
            ProfileEdit::Theme(v) => store.set_theme(v),
            ProfileEdit::Color(slot, color) => store.update_theme_settings(move |t| {
                let target = match slot {
                    ColorSlot::Background => &mut t.background_color,
                    ColorSlot::Text => &mut t.text_color,
                    ColorSlot::Button => &mut t.button_color,
                    ColorSlot::ButtonText => &mut t.button_text_color,
                };
                *target = color.clone();
            }),
            ProfileEdit::ButtonStyle(style) => {
                store.update_theme_settings(move |t| t.button_style = style)
            }
            ProfileEdit::Font(font) => {
                store.update_theme_settings(move |t| t.font_family = font.clone())
            }
            ProfileEdit::Layout(layout) => store.update_theme_settings(move |t| t.layout = layout),
            ProfileEdit::CompactMode(v) => {
                store.update_appearance_preferences(move |a| a.compact_mode = v)
            }
            ProfileEdit::ShowAvatar(v) => {
                store.update_appearance_preferences(move |a| a.show_avatar = v)
            }
            ProfileEdit::ShowSocialIcons(v) => {
                store.update_appearance_preferences(move |a| a.show_social_icons = v)
            }
            ProfileEdit::EmailNotifications(v) => {
                store.update_notification_preferences(move |n| n.email = v)
            }
            ProfileEdit::PushNotifications(v) => {
                store.update_notification_preferences(move |n| n.push = v)
            }
            ProfileEdit::WeeklyDigest(v) => {
                store.update_notification_preferences(move |n| n.weekly_digest = v)
            }
        }
    }
}

/// Show profile settings
pub async fn show(dashboard: &Dashboard, output: &Output) -> Result<()> {
    let store = dashboard.load::<Settings>().await?;
    output.print_settings(&store.data());
    Ok(())
}

/// Set one profile field and save
pub async fn set(dashboard: &Dashboard, field: String, value: String, output: &Output) -> Result<()> {
    let edit = ProfileEdit::parse(&field, &value)?;
    let editor = dashboard.edit::<Settings>().await?;
    edit.apply(editor.store());
    editor.save(output, &format!("Set {}", field)).await
}

fn parse_bool(field: &str, value: &str) -> Result<bool> {
    match value {
        "on" | "yes" => Ok(true),
        "off" | "no" => Ok(false),
        _ => value
            .parse()
            .with_context(|| format!("Invalid value for {}. Use 'true' or 'false'.", field)),
    }
}

/// Accept `#rgb` or `#rrggbb`
fn parse_color(value: &str) -> Result<String> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if !matches!(hex.len(), 3 | 6) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("Invalid color '{}'. Use a hex color such as #1f2937.", value);
    }
    Ok(format!("#{}", hex.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Store<Settings> {
        let store = Store::<Settings>::default();
        store.replace_all(Settings::default());
        store
    }

    #[test]
    fn test_parse_text_fields() {
        assert_eq!(
            ProfileEdit::parse("username", "  jane ").unwrap(),
            ProfileEdit::Username("jane".to_string())
        );
        assert_eq!(
            ProfileEdit::parse("bio", " hi ").unwrap(),
            ProfileEdit::Bio(" hi ".to_string())
        );
    }

    #[test]
    fn test_parse_profile_image_none_clears() {
        assert_eq!(
            ProfileEdit::parse("profile_image", "none").unwrap(),
            ProfileEdit::ProfileImage(None)
        );
        assert_eq!(
            ProfileEdit::parse("profile_image", "https://cdn.example/me.png").unwrap(),
            ProfileEdit::ProfileImage(Some("https://cdn.example/me.png".to_string()))
        );
    }

    #[test]
    fn test_parse_bool_values() {
        assert_eq!(
            ProfileEdit::parse("two_factor", "on").unwrap(),
            ProfileEdit::TwoFactor(true)
        );
        assert_eq!(
            ProfileEdit::parse("weekly_digest", "false").unwrap(),
            ProfileEdit::WeeklyDigest(false)
        );
        assert!(ProfileEdit::parse("show_avatar", "maybe").is_err());
    }

    #[test]
    fn test_parse_colors() {
        assert_eq!(
            ProfileEdit::parse("button_color", "#ABCDEF").unwrap(),
            ProfileEdit::Color(ColorSlot::Button, "#abcdef".to_string())
        );
        assert_eq!(
            ProfileEdit::parse("text_color", "fff").unwrap(),
            ProfileEdit::Color(ColorSlot::Text, "#fff".to_string())
        );
        assert!(ProfileEdit::parse("text_color", "#12345").is_err());
        assert!(ProfileEdit::parse("text_color", "#gggggg").is_err());
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!(
            ProfileEdit::parse("button_style", "pill").unwrap(),
            ProfileEdit::ButtonStyle(ButtonStyle::Pill)
        );
        assert_eq!(
            ProfileEdit::parse("layout", "grid").unwrap(),
            ProfileEdit::Layout(Layout::Grid)
        );
        assert!(ProfileEdit::parse("layout", "masonry").is_err());
    }

    #[test]
    fn test_unknown_field_lists_valid_fields() {
        let err = ProfileEdit::parse("favorite_color", "blue").unwrap_err();
        assert!(err.to_string().contains("display_name"));
    }

    #[test]
    fn test_every_listed_field_parses() {
        for field in FIELDS {
            let value = match *field {
                f if f.ends_with("_color") => "#000000",
                "button_style" => "square",
                "layout" => "stack",
                "two_factor" | "compact_mode" | "show_avatar" | "show_social_icons"
                | "email_notifications" | "push_notifications" | "weekly_digest" => "true",
                _ => "value",
            };
            assert!(ProfileEdit::parse(field, value).is_ok(), "{}", field);
        }
    }

    #[test]
    fn test_apply_marks_store_dirty() {
        let store = seeded();
        ProfileEdit::parse("background_color", "#000000")
            .unwrap()
            .apply(&store);

        assert_eq!(store.data().theme_settings.background_color, "#000000");
        assert!(store.status().has_changes);
    }

    #[test]
    fn test_apply_preferences() {
        let store = seeded();
        ProfileEdit::CompactMode(true).apply(&store);
        ProfileEdit::PushNotifications(true).apply(&store);

        let settings = store.data();
        assert!(settings.appearance_preferences.compact_mode);
        assert!(settings.notification_preferences.push);
    }
}
