//! Astra Client - caching client for a multi-shaped row/document store
//!
//! Executes REST calls against the store, caches successful reads with a TTL,
//! and normalizes the store's inconsistent response shapes into plain rows.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod tasks;

pub use cache::CacheStore;
pub use client::{HttpMethod, RemoteClient, NO_BODY};
pub use config::Config;
pub use error::{ClientError, Result};
pub use tasks::spawn_cleanup_task;
