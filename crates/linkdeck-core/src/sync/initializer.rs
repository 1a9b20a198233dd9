//! One-shot store seeding
//!
//! An `Initializer` belongs to one mount of a view. Its first `run` fetches
//! the authoritative entity and hands it to `Store::replace_all`; later
//! calls return the recorded outcome without touching the network.
//!
//! ```text
//! Idle -> Fetching -> Populated
//!                  -> FetchFailed -> (retry) -> Fetching
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use super::resource::Resource;
use crate::remote::Backend;
use crate::store::Store;

/// Initializer progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitState {
    Idle,
    Fetching,
    Populated,
    /// The store keeps its previous contents
    FetchFailed(String),
}

/// Seeds a store from the backend exactly once
pub struct Initializer<R: Resource> {
    store: Store<R>,
    backend: Arc<dyn Backend>,
    state: Mutex<InitState>,
}

impl<R: Resource> Initializer<R> {
    pub fn new(store: Store<R>, backend: Arc<dyn Backend>) -> Self {
        Self {
            store,
            backend,
            state: Mutex::new(InitState::Idle),
        }
    }

    /// Current state
    pub fn state(&self) -> InitState {
        self.state.lock().clone()
    }

    /// Fetch and seed the store, once
    ///
    /// Never fails: a fetch error is logged and reported as `FetchFailed`.
    pub async fn run(&self) -> InitState {
        {
            let mut state = self.state.lock();
            if *state != InitState::Idle {
                return state.clone();
            }
            *state = InitState::Fetching;
        }

        let outcome = match R::fetch(self.backend.as_ref()).await {
            Ok(entity) => {
                self.store.replace_all(entity);
                info!(kind = R::KIND, "Store initialized from server");
                InitState::Populated
            }
            Err(e) => {
                warn!(kind = R::KIND, "Initial fetch failed, keeping defaults: {}", e);
                InitState::FetchFailed(e.describe())
            }
        };

        *self.state.lock() = outcome.clone();
        outcome
    }

    /// Run again after a failed fetch; any other state is returned as is
    pub async fn retry(&self) -> InitState {
        {
            let mut state = self.state.lock();
            if !matches!(*state, InitState::FetchFailed(_)) {
                return state.clone();
            }
            *state = InitState::Idle;
        }
        self.run().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LinkCollection, RegularLink, Settings};
    use crate::remote::mock::MockBackend;
    use std::sync::atomic::Ordering;

    fn jane() -> Settings {
        Settings {
            display_name: "Jane".to_string(),
            username: "jane".to_string(),
            bio: String::new(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_seeds_without_marking_dirty() {
        let backend = MockBackend::with_settings(jane());
        let store = Store::<Settings>::default();
        let init = Initializer::new(store.clone(), backend);

        assert_eq!(init.state(), InitState::Idle);
        assert_eq!(init.run().await, InitState::Populated);

        assert_eq!(store.data().display_name, "Jane");
        assert!(!store.status().has_changes);
        assert!(store.status().initialized);
    }

    #[tokio::test]
    async fn test_runs_once_per_instance() {
        let backend = MockBackend::with_settings(jane());
        let store = Store::<Settings>::default();
        let init = Initializer::new(store.clone(), backend.clone());

        init.run().await;
        store.set_bio("edited");
        assert_eq!(init.run().await, InitState::Populated);

        assert_eq!(backend.fetches(), 1);
        assert_eq!(store.data().bio, "edited");
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_defaults() {
        let backend = MockBackend::with_settings(jane());
        backend.fail_fetch.store(true, Ordering::SeqCst);
        let store = Store::<Settings>::default();
        let init = Initializer::new(store.clone(), backend.clone());

        let state = init.run().await;

        assert!(matches!(state, InitState::FetchFailed(_)));
        assert_eq!(store.data(), Settings::default());
        assert!(!store.status().initialized);

        // Not retried implicitly
        init.run().await;
        assert_eq!(backend.fetches(), 1);
    }

    #[tokio::test]
    async fn test_unauthorized_fetch_carries_hint() {
        let backend = MockBackend::with_settings(jane());
        backend.fail_fetch.store(true, Ordering::SeqCst);
        backend.failure_status.store(401, Ordering::SeqCst);
        let init = Initializer::new(Store::<Settings>::default(), backend);

        match init.run().await {
            InitState::FetchFailed(message) => {
                assert!(message.contains("401"));
                assert!(message.contains("linkdeck config set token"));
            }
            other => panic!("expected FetchFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_retry_after_failure() {
        let backend = MockBackend::with_settings(jane());
        backend.fail_fetch.store(true, Ordering::SeqCst);
        let store = Store::<Settings>::default();
        let init = Initializer::new(store.clone(), backend.clone());

        init.run().await;
        backend.fail_fetch.store(false, Ordering::SeqCst);

        assert_eq!(init.retry().await, InitState::Populated);
        assert_eq!(store.data().username, "jane");
        assert_eq!(backend.fetches(), 2);

        // Retry after success is a no-op
        assert_eq!(init.retry().await, InitState::Populated);
        assert_eq!(backend.fetches(), 2);
    }

    #[tokio::test]
    async fn test_edit_during_fetch_survives() {
        let backend = MockBackend::with_links(LinkCollection {
            regular_links: vec![RegularLink::new(1, "Server", "https://server.example")],
            social_links: Vec::new(),
        });
        let gate = backend.hold_fetches();
        let store = Store::<LinkCollection>::default();
        let init = Arc::new(Initializer::new(store.clone(), backend.clone()));

        let running = {
            let init = Arc::clone(&init);
            tokio::spawn(async move { init.run().await })
        };
        tokio::task::yield_now().await;
        assert_eq!(init.state(), InitState::Fetching);

        store.add_regular_link(RegularLink::new(2, "Mine", "https://mine.example"));
        gate.add_permits(1);
        assert_eq!(running.await.unwrap(), InitState::Populated);

        let ids: Vec<_> = store.read(|c| c.regular_links.iter().map(|l| l.id).collect());
        assert_eq!(ids, vec![1, 2]);
        assert!(store.status().has_changes);
    }
}
