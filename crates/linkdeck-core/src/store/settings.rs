//! Profile and theme mutations

use super::Store;
use crate::models::{AppearancePreferences, NotificationPreferences, Settings, ThemeSettings};

impl Store<Settings> {
    pub fn set_display_name(&self, display_name: impl Into<String>) {
        let display_name = display_name.into();
        self.update(move |s| s.display_name = display_name.clone());
    }

    pub fn set_username(&self, username: impl Into<String>) {
        let username = username.into();
        self.update(move |s| s.username = username.clone());
    }

    pub fn set_bio(&self, bio: impl Into<String>) {
        let bio = bio.into();
        self.update(move |s| s.bio = bio.clone());
    }

    pub fn set_website(&self, website: impl Into<String>) {
        let website = website.into();
        self.update(move |s| s.website = website.clone());
    }

    /// Set or clear the profile image (data or remote URL)
    pub fn set_profile_image(&self, image: Option<String>) {
        self.update(move |s| s.profile_image = image.clone());
    }

    pub fn set_two_factor_enabled(&self, enabled: bool) {
        self.update(move |s| s.two_factor_enabled = enabled);
    }

    /// Switch preset theme
    pub fn set_theme(&self, theme: impl Into<String>) {
        let theme = theme.into();
        self.update(move |s| s.theme = theme.clone());
    }

    /// Edit the theme settings in place
    pub fn update_theme_settings<F>(&self, edit: F)
    where
        F: Fn(&mut ThemeSettings) + Send + Sync + 'static,
    {
        self.update(move |s| edit(&mut s.theme_settings));
    }

    pub fn update_appearance_preferences<F>(&self, edit: F)
    where
        F: Fn(&mut AppearancePreferences) + Send + Sync + 'static,
    {
        self.update(move |s| edit(&mut s.appearance_preferences));
    }

    pub fn update_notification_preferences<F>(&self, edit: F)
    where
        F: Fn(&mut NotificationPreferences) + Send + Sync + 'static,
    {
        self.update(move |s| edit(&mut s.notification_preferences));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ButtonStyle, Layout};

    fn clean_store() -> Store<Settings> {
        let store = Store::default();
        store.replace_all(Settings {
            display_name: "Jane".to_string(),
            username: "jane".to_string(),
            ..Default::default()
        });
        store
    }

    fn assert_marks_dirty(op: impl FnOnce(&Store<Settings>)) {
        let store = clean_store();
        assert!(!store.status().has_changes);
        op(&store);
        assert!(store.status().has_changes);
    }

    #[test]
    fn test_every_settings_mutation_marks_dirty() {
        assert_marks_dirty(|s| s.set_display_name("J"));
        assert_marks_dirty(|s| s.set_username("j"));
        assert_marks_dirty(|s| s.set_bio("bio"));
        assert_marks_dirty(|s| s.set_website("https://jane.dev"));
        assert_marks_dirty(|s| s.set_profile_image(Some("data:image/png;base64,AA".into())));
        assert_marks_dirty(|s| s.set_two_factor_enabled(true));
        assert_marks_dirty(|s| s.set_theme("midnight"));
        assert_marks_dirty(|s| s.update_theme_settings(|t| t.layout = Layout::Grid));
        assert_marks_dirty(|s| s.update_appearance_preferences(|a| a.compact_mode = true));
        assert_marks_dirty(|s| s.update_notification_preferences(|n| n.push = true));
    }

    #[test]
    fn test_set_username_reads_back_immediately() {
        let store = clean_store();
        store.set_username("newname");
        assert_eq!(store.data().username, "newname");
    }

    #[test]
    fn test_profile_image_set_and_clear() {
        let store = clean_store();
        store.set_profile_image(Some("https://cdn.example/me.png".to_string()));
        assert_eq!(
            store.data().profile_image.as_deref(),
            Some("https://cdn.example/me.png")
        );

        store.set_profile_image(None);
        assert!(store.data().profile_image.is_none());
    }

    #[test]
    fn test_theme_settings_edit_keeps_other_fields() {
        let store = clean_store();
        store.update_theme_settings(|t| t.button_style = ButtonStyle::Pill);

        let theme = store.data().theme_settings;
        assert_eq!(theme.button_style, ButtonStyle::Pill);
        assert_eq!(theme.font_family, ThemeSettings::default().font_family);
    }

    #[test]
    fn test_no_validation_in_store() {
        let store = clean_store();
        store.set_website("not a url");
        assert_eq!(store.data().website, "not a url");
    }
}
