//! Entities that can be synchronized
//!
//! Binds each stored entity type to the `Backend` calls that read and
//! write it, so the initializer and synchronizer stay generic.

use futures_util::future::BoxFuture;

use crate::models::{LinkCollection, Settings, SettingsPatch};
use crate::remote::{Backend, RemoteResult};

/// An entity with a fetch and a full-snapshot push
pub trait Resource: Clone + Default + Send + Sync + 'static {
    /// Short name used in logs
    const KIND: &'static str;

    /// Read the authoritative copy
    fn fetch(backend: &dyn Backend) -> BoxFuture<'_, RemoteResult<Self>>;

    /// Write this snapshot
    fn push<'a>(&'a self, backend: &'a dyn Backend) -> BoxFuture<'a, RemoteResult<()>>;
}

impl Resource for Settings {
    const KIND: &'static str = "settings";

    fn fetch(backend: &dyn Backend) -> BoxFuture<'_, RemoteResult<Self>> {
        backend.fetch_settings()
    }

    fn push<'a>(&'a self, backend: &'a dyn Backend) -> BoxFuture<'a, RemoteResult<()>> {
        Box::pin(async move {
            let patch = SettingsPatch::from(self);
            backend.push_settings(&patch).await
        })
    }
}

impl Resource for LinkCollection {
    const KIND: &'static str = "links";

    fn fetch(backend: &dyn Backend) -> BoxFuture<'_, RemoteResult<Self>> {
        backend.fetch_links()
    }

    fn push<'a>(&'a self, backend: &'a dyn Backend) -> BoxFuture<'a, RemoteResult<()>> {
        backend.push_links(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RegularLink, SocialLink};
    use crate::remote::mock::MockBackend;

    #[tokio::test]
    async fn test_settings_push_sends_full_patch() {
        let backend = MockBackend::new();
        let settings = Settings {
            display_name: "Jane".to_string(),
            ..Default::default()
        };

        settings.push(&*backend).await.unwrap();

        let pushed = backend.pushed_settings.lock();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0], SettingsPatch::from(&settings));
    }

    #[tokio::test]
    async fn test_links_round_trip_through_backend() {
        let backend = MockBackend::new();
        let links = LinkCollection {
            regular_links: vec![RegularLink::new(1, "A", "https://a.com")],
            social_links: vec![SocialLink::new("GitHub", "https://github.com/jane")],
        };

        links.push(&*backend).await.unwrap();
        let fetched = LinkCollection::fetch(&*backend).await.unwrap();

        assert_eq!(fetched, links);
        assert_eq!(backend.pushes(), 1);
        assert_eq!(backend.fetches(), 1);
    }
}
