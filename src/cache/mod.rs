//! Cache Module
//!
//! In-memory response cache with per-entry TTL and explicit invalidation.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::CacheStore;
