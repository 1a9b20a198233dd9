//! Wiring between commands and the core sync layer
//!
//! Read commands `load` a store through an `Initializer`. Write commands
//! `edit` a store, which also starts a `Synchronizer`; `Editor::save`
//! flushes the pending edits and reports what happened.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::debug;

use linkdeck_core::sync::Resource;
use linkdeck_core::{
    Backend, Config, HttpBackend, InitState, Initializer, Store, SyncOptions, SyncOutcome,
    Synchronizer,
};

use crate::output::Output;

/// Connection to the dashboard API for one CLI invocation
pub struct Dashboard {
    config: Config,
    backend: Arc<dyn Backend>,
}

impl Dashboard {
    /// Build the HTTP backend described by `config`
    pub fn connect(config: Config) -> Result<Self> {
        let backend = HttpBackend::new(
            &config.api_url,
            Arc::new(config.session()),
            config.request_timeout(),
        )
        .context("Failed to set up API client")?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    pub fn with_backend(config: Config, backend: Arc<dyn Backend>) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch an entity into a fresh store
    ///
    /// Fails if the initial fetch fails, so a command never shows or edits
    /// placeholder defaults as if they were the user's data.
    pub async fn load<R: Resource>(&self) -> Result<Store<R>> {
        let store = Store::<R>::default();
        let initializer = Initializer::new(store.clone(), Arc::clone(&self.backend));
        match initializer.run().await {
            InitState::FetchFailed(message) => {
                bail!("Failed to load {} from {}: {}", R::KIND, self.config.api_url, message)
            }
            state => debug!(kind = R::KIND, ?state, "Loaded"),
        }
        Ok(store)
    }

    /// Load an entity and start pushing edits made to it
    pub async fn edit<R: Resource>(&self) -> Result<Editor<R>> {
        let store = self.load::<R>().await?;
        let sync = Synchronizer::spawn(
            store.clone(),
            Arc::clone(&self.backend),
            SyncOptions::from(&self.config),
        );
        Ok(Editor { store, sync })
    }
}

/// A loaded store with a running synchronizer
pub struct Editor<R: Resource> {
    store: Store<R>,
    sync: Synchronizer<R>,
}

impl<R: Resource> Editor<R> {
    pub fn store(&self) -> &Store<R> {
        &self.store
    }

    /// Push pending edits now and stop synchronizing
    ///
    /// Prints `message` on success. A rejected or failed push is an error
    /// carrying the store's recorded `last_error`.
    pub async fn save(self, output: &Output, message: &str) -> Result<()> {
        let Editor { store, sync } = self;
        let status = store.status();
        let edited = status.has_changes || status.is_saving;
        let outcome = sync.flush().await;
        sync.shutdown().await;

        match outcome {
            // Clean after an edit means a debounced push already landed it
            SyncOutcome::Synced | SyncOutcome::Clean if edited => {
                output.success(message);
                Ok(())
            }
            SyncOutcome::Synced | SyncOutcome::Clean => {
                output.success(&format!("{} (no changes)", message));
                Ok(())
            }
            SyncOutcome::Failed(error) => {
                let error = store.status().last_error.unwrap_or(error);
                bail!("Changes to {} were not saved: {}", R::KIND, error)
            }
            other => bail!("Changes to {} were not saved: {:?}", R::KIND, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use linkdeck_core::remote::RemoteResult;
    use linkdeck_core::{
        LinkCollection, RegularLink, RemoteError, Settings, SettingsPatch, SocialLink,
    };
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use crate::output::OutputFormat;

    /// In-memory API
    #[derive(Default)]
    struct MemoryApi {
        settings: Mutex<Settings>,
        links: Mutex<LinkCollection>,
        offline: AtomicBool,
        reject_pushes: AtomicBool,
    }

    impl MemoryApi {
        fn check(&self, path: &str) -> RemoteResult<()> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(RemoteError::from_status(path, 503, "maintenance"));
            }
            Ok(())
        }

        fn check_push(&self, path: &str) -> RemoteResult<()> {
            self.check(path)?;
            if self.reject_pushes.load(Ordering::SeqCst) {
                return Err(RemoteError::from_status(path, 422, "username is taken"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Backend for MemoryApi {
        async fn fetch_settings(&self) -> RemoteResult<Settings> {
            self.check("/settings")?;
            Ok(self.settings.lock().unwrap().clone())
        }

        async fn push_settings(&self, patch: &SettingsPatch) -> RemoteResult<()> {
            self.check_push("/settings")?;
            patch.apply_to(&mut self.settings.lock().unwrap());
            Ok(())
        }

        async fn fetch_regular_links(&self) -> RemoteResult<Vec<RegularLink>> {
            self.check("/regular-links")?;
            Ok(self.links.lock().unwrap().regular_links.clone())
        }

        async fn fetch_social_links(&self) -> RemoteResult<Vec<SocialLink>> {
            self.check("/social-links")?;
            Ok(self.links.lock().unwrap().social_links.clone())
        }

        async fn push_regular_links(&self, links: &[RegularLink]) -> RemoteResult<()> {
            self.check_push("/regular-links")?;
            self.links.lock().unwrap().regular_links = links.to_vec();
            Ok(())
        }

        async fn push_social_links(&self, links: &[SocialLink]) -> RemoteResult<()> {
            self.check_push("/social-links")?;
            self.links.lock().unwrap().social_links = links.to_vec();
            Ok(())
        }
    }

    fn dashboard(api: &Arc<MemoryApi>) -> Dashboard {
        Dashboard::with_backend(Config::default(), Arc::clone(api) as Arc<dyn Backend>)
    }

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    #[tokio::test]
    async fn test_load_seeds_clean_store() {
        let api = Arc::new(MemoryApi::default());
        api.settings.lock().unwrap().username = "jane".to_string();

        let store = dashboard(&api).load::<Settings>().await.unwrap();

        assert_eq!(store.data().username, "jane");
        assert!(store.status().initialized);
        assert!(!store.status().has_changes);
    }

    #[tokio::test]
    async fn test_load_fails_when_api_is_down() {
        let api = Arc::new(MemoryApi::default());
        api.offline.store(true, Ordering::SeqCst);

        let err = dashboard(&api).load::<LinkCollection>().await.unwrap_err();
        assert!(err.to_string().contains("links"));
    }

    #[tokio::test]
    async fn test_save_pushes_edits() {
        let api = Arc::new(MemoryApi::default());
        let editor = dashboard(&api).edit::<LinkCollection>().await.unwrap();

        editor.store().create_regular_link("Shop", "https://shop.example");
        editor
            .store()
            .add_social_link(SocialLink::new("GitHub", "https://github.com/jane"));
        editor.save(&quiet(), "saved").await.unwrap();

        let links = api.links.lock().unwrap().clone();
        assert_eq!(links.regular_links.len(), 1);
        assert_eq!(links.regular_links[0].title, "Shop");
        assert_eq!(links.social_links[0].platform, "github");
    }

    #[tokio::test]
    async fn test_save_without_edits_is_ok() {
        let api = Arc::new(MemoryApi::default());
        let editor = dashboard(&api).edit::<Settings>().await.unwrap();
        editor.save(&quiet(), "saved").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_save_reports_error() {
        let api = Arc::new(MemoryApi::default());
        api.reject_pushes.store(true, Ordering::SeqCst);
        let editor = dashboard(&api).edit::<Settings>().await.unwrap();
        let store = editor.store().clone();

        store.set_username("taken");
        let err = editor.save(&quiet(), "saved").await.unwrap_err();

        assert!(err.to_string().contains("username is taken"));
        assert!(store.status().has_changes);
        assert!(!store.status().is_saving);
        assert_eq!(api.settings.lock().unwrap().username, "");
    }
}
