//! Cache Module
//!
//! Provides the shared lookup cache with lazy TTL expiration.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, CachedResult};
pub use stats::{CacheStats, StatsRecorder};
pub use store::LookupCache;
