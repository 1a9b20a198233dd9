//! In-memory `Backend` for tests
//!
//! Counts calls, can be told to fail, and can hold requests at a gate so a
//! test can observe the store while a fetch or push is in flight.

use std::sync::atomic::{AtomicBool, AtomicU16, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use super::{Backend, RemoteError, RemoteResult};
use crate::models::{LinkCollection, RegularLink, Settings, SettingsPatch, SocialLink};

#[derive(Default)]
pub(crate) struct MockBackend {
    pub settings: Mutex<Settings>,
    pub links: Mutex<LinkCollection>,
    pub pushed_settings: Mutex<Vec<SettingsPatch>>,
    pub pushed_links: Mutex<Vec<LinkCollection>>,
    pub fetch_calls: AtomicUsize,
    pub push_calls: AtomicUsize,
    pub fail_fetch: AtomicBool,
    pub fail_push: AtomicBool,
    /// Status returned by failing calls; 0 means 503
    pub failure_status: AtomicU16,
    fetch_gate: Mutex<Option<Arc<Semaphore>>>,
    push_gate: Mutex<Option<Arc<Semaphore>>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_settings(settings: Settings) -> Arc<Self> {
        let backend = Self::default();
        *backend.settings.lock() = settings;
        Arc::new(backend)
    }

    pub fn with_links(links: LinkCollection) -> Arc<Self> {
        let backend = Self::default();
        *backend.links.lock() = links;
        Arc::new(backend)
    }

    /// Block fetches until permits are added to the returned semaphore
    pub fn hold_fetches(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.fetch_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    /// Block pushes until permits are added to the returned semaphore
    pub fn hold_pushes(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.push_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn pushes(&self) -> usize {
        self.push_calls.load(Ordering::SeqCst)
    }

    async fn pass(gate: &Mutex<Option<Arc<Semaphore>>>) {
        let gate = gate.lock().clone();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
    }

    fn failure(&self, url: &str) -> RemoteError {
        match self.failure_status.load(Ordering::SeqCst) {
            0 => RemoteError::from_status(url, 503, "unavailable"),
            status => RemoteError::from_status(url, status, "refused"),
        }
    }

    async fn begin_fetch(&self) -> RemoteResult<()> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Self::pass(&self.fetch_gate).await;
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(self.failure("mock://fetch"));
        }
        Ok(())
    }

    async fn begin_push(&self) -> RemoteResult<()> {
        self.push_calls.fetch_add(1, Ordering::SeqCst);
        Self::pass(&self.push_gate).await;
        if self.fail_push.load(Ordering::SeqCst) {
            return Err(self.failure("mock://push"));
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn fetch_settings(&self) -> RemoteResult<Settings> {
        self.begin_fetch().await?;
        Ok(self.settings.lock().clone())
    }

    async fn push_settings(&self, patch: &SettingsPatch) -> RemoteResult<()> {
        self.begin_push().await?;
        patch.apply_to(&mut self.settings.lock());
        self.pushed_settings.lock().push(patch.clone());
        Ok(())
    }

    async fn fetch_regular_links(&self) -> RemoteResult<Vec<RegularLink>> {
        Ok(self.links.lock().regular_links.clone())
    }

    async fn fetch_social_links(&self) -> RemoteResult<Vec<SocialLink>> {
        Ok(self.links.lock().social_links.clone())
    }

    async fn push_regular_links(&self, links: &[RegularLink]) -> RemoteResult<()> {
        self.links.lock().regular_links = links.to_vec();
        Ok(())
    }

    async fn push_social_links(&self, links: &[SocialLink]) -> RemoteResult<()> {
        self.links.lock().social_links = links.to_vec();
        Ok(())
    }

    // Whole-collection calls are the ones the sync layer makes; count them once.
    async fn fetch_links(&self) -> RemoteResult<LinkCollection> {
        self.begin_fetch().await?;
        Ok(self.links.lock().clone())
    }

    async fn push_links(&self, links: &LinkCollection) -> RemoteResult<()> {
        self.begin_push().await?;
        *self.links.lock() = links.clone();
        self.pushed_links.lock().push(links.clone());
        Ok(())
    }
}
