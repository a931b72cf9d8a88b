//! Transient Cache - namespaced cache pools over a transient store
//!
//! Each pool maps its keys into a shared transient store, validates them
//! against the store's naming rules, and tells a stored `false` apart from a
//! missing key by consulting the options table behind the transients.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{CachePool, CachePoolFactory, SilentPool, SimpleCache, Ttl};
pub use config::Config;
pub use error::{CacheError, StoreError};
pub use store::MemoryBackend;
pub use tasks::spawn_purge_task;
