//! Regular and social link mutations
//!
//! Operations that name a missing link still count as an edit: the store
//! does not validate, so they leave the data alone but mark it dirty.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::Store;
use crate::models::{next_link_id, LinkCollection, LinkId, RegularLink, SocialLink};

impl Store<LinkCollection> {
    // ==================== Regular Links ====================

    /// Append a regular link
    pub fn add_regular_link(&self, link: RegularLink) {
        self.update(move |c| c.regular_links.push(link.clone()));
    }

    /// Append a new active link with the next free id, returning that id
    ///
    /// The id is picked when the edit is applied. Before initialization it
    /// is provisional: replaying onto the fetched list picks it again, so
    /// the link never collides with a server link.
    pub fn create_regular_link(&self, title: impl Into<String>, url: impl Into<String>) -> LinkId {
        let (title, url) = (title.into(), url.into());
        let assigned = Arc::new(AtomicU64::new(0));
        let slot = Arc::clone(&assigned);
        self.update(move |c| {
            let id = next_link_id(&c.regular_links);
            c.regular_links
                .push(RegularLink::new(id, title.clone(), url.clone()));
            slot.store(id, Ordering::SeqCst);
        });
        assigned.load(Ordering::SeqCst)
    }

    /// Replace the link with the same id
    pub fn update_regular_link(&self, link: RegularLink) {
        self.update(move |c| {
            if let Some(existing) = c.regular_links.iter_mut().find(|l| l.id == link.id) {
                *existing = link.clone();
            }
        });
    }

    pub fn delete_link(&self, id: LinkId) {
        self.update(move |c| c.regular_links.retain(|l| l.id != id));
    }

    pub fn toggle_active(&self, id: LinkId) {
        self.edit_regular_link(id, |l| l.active = !l.active);
    }

    pub fn toggle_favorite(&self, id: LinkId) {
        self.edit_regular_link(id, |l| l.favorite = !l.favorite);
    }

    pub fn record_click(&self, id: LinkId) {
        self.edit_regular_link(id, |l| l.clicks += 1);
    }

    /// Move a link to `index`, clamped to the end of the list
    pub fn move_link(&self, id: LinkId, index: usize) {
        self.update(move |c| {
            if let Some(from) = c.regular_links.iter().position(|l| l.id == id) {
                let link = c.regular_links.remove(from);
                let to = index.min(c.regular_links.len());
                c.regular_links.insert(to, link);
            }
        });
    }

    /// Set the visibility window; `None` bounds are open
    pub fn set_schedule(
        &self,
        id: LinkId,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        timezone: Option<String>,
    ) {
        self.edit_regular_link(id, move |l| {
            l.schedule_start = start;
            l.schedule_end = end;
            l.timezone = timezone.clone();
        });
    }

    /// Replace the whole regular link list (e.g. after a drag-and-drop reorder)
    pub fn set_regular_links(&self, links: Vec<RegularLink>) {
        self.update(move |c| c.regular_links = links.clone());
    }

    fn edit_regular_link<F>(&self, id: LinkId, edit: F)
    where
        F: Fn(&mut RegularLink) + Send + Sync + 'static,
    {
        self.update(move |c| {
            if let Some(link) = c.regular_links.iter_mut().find(|l| l.id == id) {
                edit(link);
            }
        });
    }

    // ==================== Social Links ====================

    /// Add a social link, replacing any existing link with the same name
    pub fn add_social_link(&self, link: SocialLink) {
        self.update(move |c| {
            match c.social_links.iter_mut().find(|l| l.name == link.name) {
                Some(existing) => *existing = link.clone(),
                None => c.social_links.push(link.clone()),
            }
        });
    }

    pub fn update_social_link(&self, name: impl Into<String>, url: impl Into<String>) {
        let (name, url) = (name.into(), url.into());
        self.update(move |c| {
            if let Some(link) = c.social_links.iter_mut().find(|l| l.name == name) {
                link.url = url.clone();
            }
        });
    }

    pub fn remove_social_link(&self, name: impl Into<String>) {
        let name = name.into();
        self.update(move |c| c.social_links.retain(|l| l.name != name));
    }
}
