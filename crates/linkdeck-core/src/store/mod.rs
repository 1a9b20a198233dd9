//! Local state stores
//!
//! A `Store<T>` holds the current, possibly locally modified, copy of one
//! entity together with its `SyncStatus`. It never performs I/O: the
//! `Initializer` seeds it and the `Synchronizer` drains it.
//!
//! ## Atomicity
//!
//! The whole `Snapshot` lives in a `tokio::sync::watch` channel and every
//! operation is a single `send_modify`, so a reader sees either the state
//! before an operation or the state after it.
//!
//! ## Edits before initialization
//!
//! Mutations applied before the first `replace_all` are journaled. When the
//! authoritative entity arrives the journal is replayed on top of it, so an
//! early edit survives initialization and is still marked for sync.
//!
//! ## Usage
//!
//! ```ignore
//! let store = Store::<Settings>::default();
//! let _sub = store.on_change(|snapshot| println!("{:?}", snapshot.status));
//!
//! store.replace_all(fetched);      // clean
//! store.set_display_name("Jane");  // dirty
//! ```

mod links;
mod settings;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::debug;

type Mutation<T> = Arc<dyn Fn(&mut T) + Send + Sync>;
type Listener<T> = Arc<dyn Fn(&Snapshot<T>) + Send + Sync>;

/// Synchronization flags embedded in every store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStatus {
    /// Local state differs from the last state known to be on the server
    pub has_changes: bool,
    /// A push is in flight
    pub is_saving: bool,
    /// The store has been seeded from the server at least once
    pub initialized: bool,
    /// Message of the last failed push, cleared by a successful one
    pub last_error: Option<String>,
    /// When the last push succeeded
    pub last_synced_at: Option<DateTime<Utc>>,
}

/// Point-in-time view of a store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot<T> {
    pub data: T,
    pub status: SyncStatus,
    /// Incremented on every data change (local edit or seed)
    pub revision: u64,
}

/// Shared state container for one entity
///
/// Cloning a `Store` yields another handle to the same state.
pub struct Store<T> {
    shared: Arc<Shared<T>>,
}

struct Shared<T> {
    state: watch::Sender<Snapshot<T>>,
    journal: Mutex<Vec<Mutation<T>>>,
    listeners: Mutex<Listeners<T>>,
}

struct Listeners<T> {
    next_id: u64,
    entries: Vec<(u64, Listener<T>)>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> std::fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl<T: Clone + Default + Send + Sync + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + Send + Sync + 'static> Store<T> {
    /// Create an uninitialized store holding `initial`
    pub fn new(initial: T) -> Self {
        let (state, _) = watch::channel(Snapshot {
            data: initial,
            status: SyncStatus::default(),
            revision: 0,
        });

        Self {
            shared: Arc::new(Shared {
                state,
                journal: Mutex::new(Vec::new()),
                listeners: Mutex::new(Listeners {
                    next_id: 0,
                    entries: Vec::new(),
                }),
            }),
        }
    }

    /// Get a copy of the full current state
    pub fn snapshot(&self) -> Snapshot<T> {
        self.shared.state.borrow().clone()
    }

    /// Get a copy of the entity
    pub fn data(&self) -> T {
        self.shared.state.borrow().data.clone()
    }

    /// Get the sync flags
    pub fn status(&self) -> SyncStatus {
        self.shared.state.borrow().status.clone()
    }

    /// Read the entity without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.state.borrow().data)
    }

    /// Subscribe to state changes as an async stream of snapshots
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.shared.state.subscribe()
    }

    /// Register a callback invoked after every state change
    ///
    /// The callback runs on the thread that performed the change. It stays
    /// registered until the returned `Subscription` is dropped.
    pub fn on_change<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Snapshot<T>) + Send + Sync + 'static,
    {
        let id = {
            let mut listeners = self.shared.listeners.lock();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, Arc::new(listener)));
            id
        };

        let shared = Arc::downgrade(&self.shared);
        Subscription::new(move || {
            if let Some(shared) = shared.upgrade() {
                shared.listeners.lock().entries.retain(|(entry, _)| *entry != id);
            }
        })
    }

    /// Number of registered change listeners
    pub fn listener_count(&self) -> usize {
        self.shared.listeners.lock().entries.len()
    }

    /// Apply a local edit and mark the store dirty
    ///
    /// Every named mutation goes through here. The edit may run a second
    /// time if the store is seeded afterwards, hence `Fn`.
    pub fn update<F>(&self, op: F)
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        let op: Mutation<T> = Arc::new(op);
        self.shared.state.send_modify(|snapshot| {
            op(&mut snapshot.data);
            snapshot.revision += 1;
            snapshot.status.has_changes = true;
            if !snapshot.status.initialized {
                self.shared.journal.lock().push(Arc::clone(&op));
            }
        });
        self.notify();
    }

    /// Replace the entity with the authoritative copy from the server
    ///
    /// Does not mark the store dirty. Edits journaled before the first seed
    /// are replayed on top of `entity`; only then is the store left dirty.
    pub fn replace_all(&self, entity: T) {
        self.shared.state.send_modify(move |snapshot| {
            let mut data = entity;
            let journal: Vec<_> = self.shared.journal.lock().drain(..).collect();
            for op in &journal {
                op(&mut data);
            }
            if !journal.is_empty() {
                debug!(replayed = journal.len(), "replayed edits made before initialization");
            }

            snapshot.data = data;
            snapshot.revision += 1;
            snapshot.status.has_changes = !journal.is_empty();
            snapshot.status.initialized = true;
        });
        self.notify();
    }

    /// Claim the store for a push
    ///
    /// Checks the guards and sets `is_saving` in one step, so two pushers
    /// can never both get `Ready`. The caller must `mark_saving(false)`
    /// when done.
    pub fn begin_save(&self) -> SaveCheck<T> {
        let mut check = SaveCheck::Clean;
        self.shared.state.send_if_modified(|snapshot| {
            let status = &mut snapshot.status;
            check = if status.is_saving {
                SaveCheck::Busy
            } else if !status.has_changes {
                SaveCheck::Clean
            } else if !status.initialized {
                SaveCheck::Uninitialized
            } else {
                status.is_saving = true;
                SaveCheck::Ready(snapshot.clone())
            };
            matches!(check, SaveCheck::Ready(_))
        });
        if matches!(check, SaveCheck::Ready(_)) {
            self.notify();
        }
        check
    }

    /// Set or clear the in-flight flag
    pub fn mark_saving(&self, saving: bool) {
        self.modify_status(|status| status.is_saving = saving);
    }

    /// Clear the dirty flag after a successful push
    pub fn mark_synced(&self) {
        self.modify_status(|status| {
            status.has_changes = false;
            status.last_error = None;
            status.last_synced_at = Some(Utc::now());
        });
    }

    /// Clear the dirty flag only if the data is still at `revision`
    ///
    /// Returns false when an edit landed after the pushed snapshot was
    /// taken; the store then stays dirty so that edit is pushed too.
    pub fn mark_synced_at(&self, revision: u64) -> bool {
        let mut synced = false;
        self.shared.state.send_modify(|snapshot| {
            snapshot.status.last_error = None;
            if snapshot.revision == revision {
                snapshot.status.has_changes = false;
                snapshot.status.last_synced_at = Some(Utc::now());
                synced = true;
            }
        });
        self.notify();
        synced
    }

    /// Record a failed push; the store stays dirty
    pub fn mark_failed(&self, error: impl Into<String>) {
        let error = error.into();
        self.modify_status(move |status| status.last_error = Some(error));
    }

    fn modify_status(&self, f: impl FnOnce(&mut SyncStatus)) {
        self.shared.state.send_modify(|snapshot| f(&mut snapshot.status));
        self.notify();
    }

    fn notify(&self) {
        let listeners: Vec<Listener<T>> = self
            .shared
            .listeners
            .lock()
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        if listeners.is_empty() {
            return;
        }

        let snapshot = self.snapshot();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

/// Result of `Store::begin_save`
#[derive(Debug, Clone, PartialEq)]
pub enum SaveCheck<T> {
    /// Claimed; push this snapshot
    Ready(Snapshot<T>),
    /// Another push is in flight
    Busy,
    /// Nothing to push
    Clean,
    /// Dirty, but not yet seeded from the server
    Uninitialized,
}

/// Registration handle returned by `Store::on_change`
///
/// The listener is removed when this is dropped or `unsubscribe` is called.
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Remove the listener now
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
