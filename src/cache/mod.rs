//! Cache Module
//!
//! The two cache tiers and their orchestration: the bounded in-process
//! tier with TTL expiration and LRU eviction, the optional networked tier,
//! and the unified read-through/write-through facade.

mod entry;
mod local;
mod lru;
mod remote;
mod stats;
mod unified;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use local::{LocalCache, LocalStore};
pub use lru::LruTracker;
pub use remote::RemoteCache;
pub use stats::CacheStats;
pub use unified::{CacheStatsReport, UnifiedCache};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
