//! Background push of local edits
//!
//! A `Synchronizer` watches one store through `Store::on_change` and runs a
//! tokio task that pushes the latest full snapshot whenever the store is
//! dirty. At most one push per synchronizer is in flight, and
//! `Store::begin_save` refuses a second pusher on the same store.
//!
//! Rapid edits coalesce: the change listener only wakes the task, and the
//! task always reads the newest snapshot. An edit that lands while a push is
//! in flight keeps the store dirty and is pushed right after.
//!
//! Failed pushes are not retried on their own. The store keeps
//! `has_changes` and records `last_error`; the next edit or an explicit
//! `flush` tries again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::resource::Resource;
use crate::config::Config;
use crate::remote::Backend;
use crate::store::{SaveCheck, Store, Subscription};

/// Tuning for a synchronizer
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Quiet period after an edit before pushing; zero pushes immediately
    pub debounce: Duration,
    /// An in-flight push is abandoned after this long
    pub push_timeout: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            push_timeout: Duration::from_secs(30),
        }
    }
}

impl From<&Config> for SyncOptions {
    fn from(config: &Config) -> Self {
        Self {
            debounce: Duration::from_millis(config.sync_debounce_ms),
            push_timeout: Duration::from_secs(config.push_timeout_secs),
        }
    }
}

/// Result of one push attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Snapshot pushed
    Synced,
    /// Nothing to push
    Clean,
    /// Another push holds the store
    Busy,
    /// Store has edits but was never seeded; pushing would overwrite the
    /// server copy with defaults
    Uninitialized,
    /// Push failed or timed out; the store stays dirty
    Failed(String),
    /// Synchronizer shut down
    Cancelled,
}

type FlushRequest = oneshot::Sender<SyncOutcome>;

/// Handle to a running synchronizer
///
/// Dropping it stops the task; an in-flight push is cancelled and the
/// store's `is_saving` flag is cleared.
pub struct Synchronizer<R: Resource> {
    store: Store<R>,
    flush_tx: mpsc::Sender<FlushRequest>,
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
    subscription: Option<Subscription>,
}

impl<R: Resource> Synchronizer<R> {
    /// Start synchronizing `store` to `backend`
    ///
    /// Must be called within a tokio runtime. Edits already pending in the
    /// store are picked up immediately.
    pub fn spawn(store: Store<R>, backend: Arc<dyn Backend>, options: SyncOptions) -> Self {
        let wake = Arc::new(Notify::new());
        let (flush_tx, flush_rx) = mpsc::channel(8);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let subscription = {
            let wake = Arc::clone(&wake);
            store.on_change(move |_| wake.notify_one())
        };
        wake.notify_one();

        let task = tokio::spawn(sync_loop(
            store.clone(),
            backend,
            options,
            wake,
            flush_rx,
            shutdown_rx,
        ));

        Self {
            store,
            flush_tx,
            shutdown_tx,
            task: Some(task),
            subscription: Some(subscription),
        }
    }

    /// The store being synchronized
    pub fn store(&self) -> &Store<R> {
        &self.store
    }

    /// Attempt a push now, skipping the debounce, and report the outcome
    pub async fn flush(&self) -> SyncOutcome {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.flush_tx.send(reply_tx).await.is_err() {
            return SyncOutcome::Cancelled;
        }
        reply_rx.await.unwrap_or(SyncOutcome::Cancelled)
    }

    /// Stop the task, cancelling any in-flight push, and unregister
    pub async fn shutdown(mut self) {
        self.subscription.take();
        let _ = self.shutdown_tx.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(kind = R::KIND, "Sync task ended abnormally: {}", e);
            }
        }
    }
}

impl<R: Resource> Drop for Synchronizer<R> {
    fn drop(&mut self) {
        // The task observes this on its next poll and cleans up after itself
        let _ = self.shutdown_tx.send(true);
    }
}

async fn sync_loop<R: Resource>(
    store: Store<R>,
    backend: Arc<dyn Backend>,
    options: SyncOptions,
    wake: Arc<Notify>,
    mut flush_rx: mpsc::Receiver<FlushRequest>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    debug!(kind = R::KIND, "Sync task started");

    // Revision whose push last failed; not retried until it changes
    let mut failed_revision: Option<u64> = None;

    loop {
        let reply = tokio::select! {
            biased;
            _ = shutdown_rx.changed() => break,
            request = flush_rx.recv() => match request {
                Some(reply) => Some(reply),
                None => break,
            },
            _ = wake.notified() => {
                let settled = if options.debounce.is_zero() {
                    Settled::Quiet
                } else {
                    settle(&wake, options.debounce, &mut flush_rx, &mut shutdown_rx).await
                };
                match settled {
                    Settled::Quiet => {
                        if failed_revision == Some(store.snapshot().revision) {
                            continue;
                        }
                        None
                    }
                    Settled::Flush(reply) => Some(reply),
                    Settled::Stopped => break,
                }
            }
        };

        let outcome = push_once(&store, backend.as_ref(), &options, &mut shutdown_rx).await;
        failed_revision = match &outcome {
            SyncOutcome::Failed(_) => Some(store.snapshot().revision),
            _ => None,
        };

        if let Some(reply) = reply {
            let _ = reply.send(outcome.clone());
        }
        if outcome == SyncOutcome::Cancelled {
            break;
        }
    }

    debug!(kind = R::KIND, "Sync task stopped");
}

/// How a debounce wait ended
enum Settled {
    /// No wake-up for the whole quiet period
    Quiet,
    /// A flush arrived; push now and answer it
    Flush(FlushRequest),
    /// Shut down, or every handle is gone
    Stopped,
}

/// Wait until no wake-up arrives for `quiet`, cut short by a flush
async fn settle(
    wake: &Notify,
    quiet: Duration,
    flush_rx: &mut mpsc::Receiver<FlushRequest>,
    shutdown_rx: &mut watch::Receiver<bool>,
) -> Settled {
    loop {
        tokio::select! {
            biased;
            _ = shutdown_rx.changed() => return Settled::Stopped,
            request = flush_rx.recv() => {
                return match request {
                    Some(reply) => Settled::Flush(reply),
                    None => Settled::Stopped,
                };
            }
            _ = wake.notified() => continue,
            _ = tokio::time::sleep(quiet) => return Settled::Quiet,
        }
    }
}

/// Push the current snapshot if the store allows it
async fn push_once<R: Resource>(
    store: &Store<R>,
    backend: &dyn Backend,
    options: &SyncOptions,
    shutdown_rx: &mut watch::Receiver<bool>,
) -> SyncOutcome {
    let snapshot = match store.begin_save() {
        SaveCheck::Ready(snapshot) => snapshot,
        SaveCheck::Busy => {
            debug!(kind = R::KIND, "Push already in flight, skipping");
            return SyncOutcome::Busy;
        }
        SaveCheck::Clean => return SyncOutcome::Clean,
        SaveCheck::Uninitialized => {
            debug!(kind = R::KIND, "Holding edits until the store is initialized");
            return SyncOutcome::Uninitialized;
        }
    };

    debug!(kind = R::KIND, revision = snapshot.revision, "Pushing snapshot");
    let push = tokio::time::timeout(options.push_timeout, snapshot.data.push(backend));

    let outcome = tokio::select! {
        result = push => match result {
            Ok(Ok(())) => {
                if store.mark_synced_at(snapshot.revision) {
                    info!(kind = R::KIND, revision = snapshot.revision, "Synced");
                } else {
                    debug!(kind = R::KIND, "Store changed during push, pushing again");
                }
                SyncOutcome::Synced
            }
            Ok(Err(e)) => {
                warn!(kind = R::KIND, "Push failed: {}", e);
                let message = e.describe();
                store.mark_failed(message.clone());
                SyncOutcome::Failed(message)
            }
            Err(_) => {
                let message = format!("Push timed out after {:?}", options.push_timeout);
                warn!(kind = R::KIND, "{}", message);
                store.mark_failed(message.clone());
                SyncOutcome::Failed(message)
            }
        },
        _ = shutdown_rx.changed() => {
            debug!(kind = R::KIND, "Push cancelled by shutdown");
            store.mark_failed("Push cancelled");
            SyncOutcome::Cancelled
        }
    };

    store.mark_saving(false);
    outcome
}
