//! Unified Cache Module
//!
//! Orchestrates the local and remote tiers: read-through gets with local
//! backfill, write-through sets, delete fan-out, and the cache-aside
//! `get_or_set` helper wrapping expensive factory calls.
//!
//! Values cross this boundary as typed data; serialization happens here,
//! once, and the tiers below only ever see opaque strings. The local tier
//! is the resilience backstop: every write lands there regardless of the
//! remote outcome, so the subsystem stays correct with the remote tier
//! fully down.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{CacheStats, LocalCache, RemoteCache};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Unified Cache ==
/// Two-tier cache handle. Constructed once at process start and passed to
/// collaborators explicitly.
pub struct UnifiedCache {
    local: Arc<LocalCache>,
    remote: RemoteCache,
    default_ttl: u64,
}

impl UnifiedCache {
    // == Constructors ==
    /// Builds both tiers from configuration.
    ///
    /// With the subsystem disabled, the local tier is a no-op and the
    /// remote backend is null, so every operation degrades to the direct
    /// factory path.
    pub async fn connect(config: &CacheConfig) -> Arc<Self> {
        if !config.enabled {
            warn!("cache subsystem disabled by configuration");
            return Arc::new(Self {
                local: LocalCache::disabled(),
                remote: RemoteCache::null(),
                default_ttl: config.default_ttl,
            });
        }

        Arc::new(Self {
            local: LocalCache::new(config.max_entries),
            remote: RemoteCache::connect(&config.remote).await,
            default_ttl: config.default_ttl,
        })
    }

    /// Assembles a cache from pre-built tiers.
    pub fn new(local: Arc<LocalCache>, remote: RemoteCache, default_ttl: u64) -> Arc<Self> {
        Arc::new(Self {
            local,
            remote,
            default_ttl,
        })
    }

    /// The in-process tier.
    pub fn local(&self) -> &Arc<LocalCache> {
        &self.local
    }

    /// The networked tier.
    pub fn remote(&self) -> &RemoteCache {
        &self.remote
    }

    // == Get ==
    /// Retrieves a typed value for a key.
    ///
    /// The remote tier is consulted first; a remote hit is backfilled into
    /// the local tier using the remaining remote TTL when one is reported.
    /// On remote miss (or with the remote tier disabled) the local tier
    /// answers. A payload that no longer deserializes as `T` is treated as
    /// a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if let Some(raw) = self.remote.get(key).await {
            match decode::<T>(key, &raw) {
                Ok(value) => {
                    let remaining = self.remote.ttl(key).await;
                    let ttl = if remaining > 0 {
                        remaining
                    } else {
                        self.default_ttl
                    };
                    if let Err(e) = self.local.set(key, raw, ttl).await {
                        warn!(key = %key, error = %e, "local backfill failed");
                    }
                    debug!(key = %key, "cache hit (remote)");
                    return Some(value);
                }
                Err(e) => {
                    warn!(error = %e, "remote payload dropped");
                }
            }
        }

        let raw = self.local.get(key).await?;
        match decode::<T>(key, &raw) {
            Ok(value) => {
                debug!(key = %key, "cache hit (local)");
                Some(value)
            }
            Err(e) => {
                warn!(error = %e, "local payload dropped");
                None
            }
        }
    }

    // == Set ==
    /// Writes a typed value through both tiers with the given TTL.
    ///
    /// The remote write is best-effort; the local write always happens so
    /// the entry survives a remote outage.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl_seconds: u64) {
        let raw = match encode(key, value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "value not cached");
                return;
            }
        };

        self.remote.set(key, &raw, ttl_seconds).await;

        if let Err(e) = self.local.set(key, raw, ttl_seconds).await {
            warn!(key = %key, error = %e, "local set failed");
        }
    }

    // == Delete ==
    /// Removes a key from both tiers.
    pub async fn del(&self, key: &str) {
        self.remote.del(key).await;
        self.local.del(key).await;
    }

    // == Get Or Set ==
    /// Cache-aside read: returns the cached value when either tier has it,
    /// otherwise invokes `factory`, writes its result through both tiers,
    /// and returns it.
    ///
    /// A factory failure propagates unchanged and nothing is cached; only
    /// the factory's success defines a cacheable value.
    pub async fn get_or_set<T, F, Fut>(
        &self,
        key: &str,
        ttl_seconds: u64,
        factory: F,
    ) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        if let Some(value) = self.get::<T>(key).await {
            return Ok(value);
        }

        let value = factory().await?;
        self.set(key, &value, ttl_seconds).await;
        Ok(value)
    }

    // == Invalidate ==
    /// Removes every local entry equal to `pattern` or prefixed by it,
    /// returning the count removed.
    ///
    /// The remote tier is deliberately left out of this generic path: a
    /// remote pattern delete means a full keyspace scan. Invalidation
    /// functions that need it opt in explicitly through
    /// [`RemoteCache::del_pattern`].
    pub async fn invalidate(&self, pattern: &str) -> usize {
        self.local.invalidate(pattern).await
    }

    // == Stats ==
    /// Snapshot of cache health for operational visibility.
    pub async fn stats(&self) -> CacheStatsReport {
        let local = self.local.get_stats().await;
        let local_hit_rate = local.hit_rate();

        CacheStatsReport {
            local,
            local_hit_rate,
            remote_enabled: self.remote.is_enabled(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    // == Reset Stats ==
    /// Resets the local tier's hit, miss and eviction counters.
    pub async fn reset_stats(&self) {
        self.local.reset_stats().await;
    }
}

// == Value Boundary ==
/// Serializes a typed value into the opaque payload the tiers store.
fn encode<T: Serialize>(key: &str, value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|source| CacheError::Serialization {
        key: key.to_string(),
        source,
    })
}

/// Deserializes a stored payload back into a typed value.
fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|source| CacheError::Serialization {
        key: key.to_string(),
        source,
    })
}

// == Stats Report ==
/// Combined statistics snapshot across tiers.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsReport {
    /// Local tier counters
    pub local: CacheStats,
    /// Local hit rate percentage, rounded to 2 decimals
    pub local_hit_rate: f64,
    /// Whether the remote tier is live
    pub remote_enabled: bool,
    /// Snapshot timestamp (RFC 3339)
    pub generated_at: String,
}
