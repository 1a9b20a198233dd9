//! Keeping local stores and the API in step
//!
//! Data flows one way through each store:
//!
//! 1. `Initializer` fetches the entity and seeds the store (clean)
//! 2. UI code edits the store (dirty)
//! 3. `Synchronizer` notices and pushes the newest snapshot (clean again)
//!
//! Settings and links are independent streams; there is no ordering
//! between a settings push and a links push.
//!
//! ## Usage
//!
//! ```ignore
//! let store = Store::<Settings>::default();
//! Initializer::new(store.clone(), backend.clone()).run().await;
//! let sync = Synchronizer::spawn(store.clone(), backend, SyncOptions::default());
//!
//! store.set_bio("Hello");
//! sync.flush().await;
//! sync.shutdown().await;
//! ```

mod initializer;
mod resource;
mod synchronizer;

pub use initializer::{InitState, Initializer};
pub use resource::Resource;
pub use synchronizer::{SyncOptions, SyncOutcome, Synchronizer};
