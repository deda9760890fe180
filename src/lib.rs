//! tiercache - a two-tier key/value cache
//!
//! In-process tier with TTL expiry and bounded-size LRU eviction, optional
//! networked tier with graceful degradation, pattern-based invalidation
//! fan-out, and proactive warm-population.
//!
//! Construct one [`UnifiedCache`] at process start from [`CacheConfig`] and
//! hand it to collaborators; there is no ambient global instance.
//!
//! ```ignore
//! let config = CacheConfig::from_env();
//! let cache = UnifiedCache::connect(&config).await;
//! let cleanup = spawn_cleanup_task(cache.local().clone(), config.cleanup_interval);
//!
//! let user: Option<UserRecord> = cache
//!     .get_or_set(&keys::user("42"), keys::ttl_for(keys::Entity::User), || {
//!         db.load_user("42")
//!     })
//!     .await
//!     .ok();
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod invalidation;
pub mod keys;
pub mod tasks;
pub mod warmer;

pub use cache::{CacheStats, CacheStatsReport, LocalCache, RemoteCache, UnifiedCache};
pub use config::{CacheConfig, RemoteConfig};
pub use error::{CacheError, Result};
pub use invalidation::InvalidationEngine;
pub use tasks::spawn_cleanup_task;
pub use warmer::CacheWarmer;
