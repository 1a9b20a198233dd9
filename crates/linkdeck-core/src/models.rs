//! Data models for linkdeck
//!
//! Defines the two entities the dashboard keeps in sync with the API:
//! profile `Settings` and the user's `LinkCollection`.
//! Field names are camelCase on the wire to match the backend documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a regular link
pub type LinkId = u64;

/// Profile, theme and preference settings for one user
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Owning user (assigned by the backend)
    pub user_id: Option<String>,
    /// Name shown on the public page
    #[serde(deserialize_with = "null_as_default")]
    pub display_name: String,
    /// Handle used in the public URL
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub bio: String,
    #[serde(deserialize_with = "null_as_default")]
    pub website: String,
    /// `None` or a data/remote URL
    pub profile_image: Option<String>,
    pub two_factor_enabled: bool,
    /// Named preset theme
    #[serde(deserialize_with = "null_as_default")]
    pub theme: String,
    pub theme_settings: ThemeSettings,
    pub appearance_preferences: AppearancePreferences,
    pub notification_preferences: NotificationPreferences,
}

/// Colour, font and layout choices for the public page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeSettings {
    pub background_color: String,
    pub text_color: String,
    pub button_color: String,
    pub button_text_color: String,
    pub button_style: ButtonStyle,
    pub font_family: String,
    pub layout: Layout,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
            text_color: "#111827".to_string(),
            button_color: "#111827".to_string(),
            button_text_color: "#ffffff".to_string(),
            button_style: ButtonStyle::default(),
            font_family: "Inter".to_string(),
            layout: Layout::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    #[default]
    Rounded,
    Square,
    Pill,
    Outline,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Stack,
    Grid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppearancePreferences {
    pub compact_mode: bool,
    pub show_avatar: bool,
    pub show_social_icons: bool,
}

impl Default for AppearancePreferences {
    fn default() -> Self {
        Self {
            compact_mode: false,
            show_avatar: true,
            show_social_icons: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationPreferences {
    pub email: bool,
    pub push: bool,
    pub weekly_digest: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            push: false,
            weekly_digest: true,
        }
    }
}

/// A partial settings document
///
/// Only fields that are `Some` are serialized, so the backend can apply it
/// as a field-level update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Outer `Some(None)` clears the image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two_factor_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_settings: Option<ThemeSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appearance_preferences: Option<AppearancePreferences>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_preferences: Option<NotificationPreferences>,
}

impl SettingsPatch {
    /// True if the patch carries no fields
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write the fields this patch carries into `settings`
    pub fn apply_to(&self, settings: &mut Settings) {
        fn set<T: Clone>(field: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *field = value.clone();
            }
        }

        set(&mut settings.display_name, &self.display_name);
        set(&mut settings.username, &self.username);
        set(&mut settings.bio, &self.bio);
        set(&mut settings.website, &self.website);
        set(&mut settings.profile_image, &self.profile_image);
        set(&mut settings.two_factor_enabled, &self.two_factor_enabled);
        set(&mut settings.theme, &self.theme);
        set(&mut settings.theme_settings, &self.theme_settings);
        set(&mut settings.appearance_preferences, &self.appearance_preferences);
        set(&mut settings.notification_preferences, &self.notification_preferences);
    }
}

impl From<&Settings> for SettingsPatch {
    fn from(settings: &Settings) -> Self {
        Self {
            display_name: Some(settings.display_name.clone()),
            username: Some(settings.username.clone()),
            bio: Some(settings.bio.clone()),
            website: Some(settings.website.clone()),
            profile_image: Some(settings.profile_image.clone()),
            two_factor_enabled: Some(settings.two_factor_enabled),
            theme: Some(settings.theme.clone()),
            theme_settings: Some(settings.theme_settings.clone()),
            appearance_preferences: Some(settings.appearance_preferences.clone()),
            notification_preferences: Some(settings.notification_preferences.clone()),
        }
    }
}

impl Settings {
    /// Build a patch containing only the fields that differ from `base`
    pub fn diff(&self, base: &Settings) -> SettingsPatch {
        fn changed<T: PartialEq + Clone>(new: &T, old: &T) -> Option<T> {
            (new != old).then(|| new.clone())
        }

        SettingsPatch {
            display_name: changed(&self.display_name, &base.display_name),
            username: changed(&self.username, &base.username),
            bio: changed(&self.bio, &base.bio),
            website: changed(&self.website, &base.website),
            profile_image: changed(&self.profile_image, &base.profile_image),
            two_factor_enabled: changed(&self.two_factor_enabled, &base.two_factor_enabled),
            theme: changed(&self.theme, &base.theme),
            theme_settings: changed(&self.theme_settings, &base.theme_settings),
            appearance_preferences: changed(
                &self.appearance_preferences,
                &base.appearance_preferences,
            ),
            notification_preferences: changed(
                &self.notification_preferences,
                &base.notification_preferences,
            ),
        }
    }
}

/// A clickable call-to-action link on the public page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegularLink {
    pub id: LinkId,
    pub title: String,
    pub url: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Link becomes visible at this instant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_start: Option<DateTime<Utc>>,
    /// Link stops being visible at this instant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_end: Option<DateTime<Utc>>,
    /// IANA zone the schedule was entered in (display only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl RegularLink {
    /// Create an active link with no clicks
    pub fn new(id: LinkId, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            url: url.into(),
            active: true,
            clicks: 0,
            favorite: false,
            thumbnail: None,
            schedule_start: None,
            schedule_end: None,
            timezone: None,
        }
    }

    /// Whether the link is shown at `now`
    ///
    /// A missing bound leaves that side of the window open.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        if !self.active {
            return false;
        }
        if self.schedule_start.is_some_and(|start| now < start) {
            return false;
        }
        if self.schedule_end.is_some_and(|end| now >= end) {
            return false;
        }
        true
    }

    pub fn is_scheduled(&self) -> bool {
        self.schedule_start.is_some() || self.schedule_end.is_some()
    }
}

/// A profile link to a social platform
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    #[serde(default)]
    pub platform: String,
    /// Unique within a collection
    pub name: String,
    pub url: String,
}

impl SocialLink {
    /// Create a social link whose platform is derived from its name
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            platform: name.to_lowercase(),
            name,
            url: url.into(),
        }
    }
}

/// Both link lists for one user
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkCollection {
    pub regular_links: Vec<RegularLink>,
    pub social_links: Vec<SocialLink>,
}

impl LinkCollection {
    pub fn regular_link(&self, id: LinkId) -> Option<&RegularLink> {
        self.regular_links.iter().find(|link| link.id == id)
    }

    pub fn social_link(&self, name: &str) -> Option<&SocialLink> {
        self.social_links.iter().find(|link| link.name == name)
    }
}

/// Next free link id: one past the largest existing id
///
/// Falls back to the lowest unused id when the largest is `LinkId::MAX`.
pub fn next_link_id(links: &[RegularLink]) -> LinkId {
    let Some(max) = links.iter().map(|link| link.id).max() else {
        return 1;
    };
    max.checked_add(1).unwrap_or_else(|| lowest_free_id(links))
}

fn lowest_free_id(links: &[RegularLink]) -> LinkId {
    let mut used: Vec<LinkId> = links.iter().map(|link| link.id).collect();
    used.sort_unstable();
    used.dedup();

    let mut candidate = 1;
    for id in used {
        if id > candidate {
            break;
        }
        if id == candidate {
            candidate += 1;
        }
    }
    candidate
}

fn default_true() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
