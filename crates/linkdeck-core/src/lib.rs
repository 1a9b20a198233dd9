//! linkdeck Core Library
//!
//! This crate provides the client-side state layer for linkdeck, a
//! link-in-bio dashboard: profile settings and link lists held in local
//! stores and kept in sync with the dashboard API.
//!
//! # Architecture
//!
//! - **Store**: in-memory state plus `has_changes`/`is_saving` flags
//! - **Remote**: single-attempt HTTP calls against the API
//! - **Initializer**: seeds a store from the API once per mount
//! - **Synchronizer**: pushes dirty stores in the background
//!
//! All writes go through a store's mutation API first; nothing else talks
//! to the API directly.
//!
//! # Quick Start
//!
//! ```text
//! let session = Session::with_token(None, token);
//! let backend = Arc::new(HttpBackend::new(&config.api_url, Arc::new(session), timeout)?);
//!
//! let links = Store::<LinkCollection>::default();
//! Initializer::new(links.clone(), backend.clone()).run().await;
//! let sync = Synchronizer::spawn(links.clone(), backend, SyncOptions::from(&config));
//!
//! links.add_social_link(SocialLink::new("Instagram", "https://instagram.com/me"));
//! ```
//!
//! # Modules
//!
//! - `store`: State containers and their mutation operations
//! - `models`: Settings and link data structures
//! - `remote`: Backend trait, HTTP client, session credentials
//! - `sync`: Initializer and Synchronizer
//! - `config`: Application configuration

pub mod config;
pub mod models;
pub mod remote;
pub mod store;
pub mod sync;

pub use config::Config;
pub use models::{LinkCollection, LinkId, RegularLink, Settings, SettingsPatch, SocialLink};
pub use remote::{Backend, HttpBackend, RemoteError, Session};
pub use store::{Snapshot, Store, SyncStatus};
pub use sync::{InitState, Initializer, SyncOptions, SyncOutcome, Synchronizer};
