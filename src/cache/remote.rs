//! Remote Cache Module
//!
//! Client wrapper around the optional networked key/value store.
//!
//! The backend is selected once at construction: a Redis connection
//! manager when the tier is configured and reachable, or a null backend
//! that always misses and no-ops. Disablement is permanent for the process
//! lifetime; there is no retry-on-next-call once the null backend is
//! chosen. Every operation contains its own errors and resolves to the
//! operation's safe default, never surfacing a failure to the caller.

use std::time::Duration;

use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use tracing::{debug, info, warn};

use crate::config::RemoteConfig;
use crate::error::Result;

/// Bound on how long a single remote call may wait for a response.
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(2);

/// Bound on the initial connection attempt at startup.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Page size for cursor scans in [`RemoteCache::del_pattern`].
const SCAN_BATCH: usize = 100;

// == Remote Cache ==
/// Remote tier handle. Cheap to clone; all clones share one connection
/// manager.
#[derive(Clone)]
pub struct RemoteCache {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    /// Live connection to the remote store
    Redis(ConnectionManager),
    /// Permanent degraded mode: always miss, always no-op
    Null,
}

impl RemoteCache {
    // == Constructor ==
    /// Connects to the remote store described by `config`.
    ///
    /// Falls back to the null backend, permanently for this process, when
    /// the tier is disabled by flag, no endpoint URL is configured, or the
    /// initial connection attempt fails.
    pub async fn connect(config: &RemoteConfig) -> Self {
        if !config.enabled {
            info!("remote cache disabled by configuration, running local-only");
            return Self::null();
        }

        let Some(url) = connection_url(config) else {
            info!("remote cache endpoint not configured, running local-only");
            return Self::null();
        };

        match Self::open(&url).await {
            Ok(conn) => {
                info!("remote cache connected");
                Self {
                    backend: Backend::Redis(conn),
                }
            }
            Err(e) => {
                warn!(error = %e, "remote cache connection failed, running local-only");
                Self::null()
            }
        }
    }

    /// Creates a handle with the null backend.
    pub fn null() -> Self {
        Self {
            backend: Backend::Null,
        }
    }

    async fn open(url: &str) -> Result<ConnectionManager> {
        let client = redis::Client::open(url)?;
        let config = ConnectionManagerConfig::new()
            .set_connection_timeout(CONNECT_TIMEOUT)
            .set_response_timeout(RESPONSE_TIMEOUT)
            .set_number_of_retries(2);
        let conn = ConnectionManager::new_with_config(client, config).await?;
        Ok(conn)
    }

    /// Returns whether the live backend is in use.
    pub fn is_enabled(&self) -> bool {
        matches!(self.backend, Backend::Redis(_))
    }

    // == Get ==
    /// Retrieves the serialized payload for a key, or None when absent,
    /// the tier is disabled, or the call fails.
    pub async fn get(&self, key: &str) -> Option<String> {
        let Backend::Redis(conn) = &self.backend else {
            return None;
        };
        let mut conn = conn.clone();

        let result: redis::RedisResult<Option<String>> = conn.get(key).await;
        match result {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "remote GET failed");
                None
            }
        }
    }

    // == Set ==
    /// Stores a serialized payload with the given TTL. Returns whether the
    /// write was acknowledged.
    pub async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> bool {
        let Backend::Redis(conn) = &self.backend else {
            return false;
        };
        let mut conn = conn.clone();

        let result: redis::RedisResult<()> = conn.set_ex(key, value, ttl_seconds.max(1)).await;
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %key, error = %e, "remote SET failed");
                false
            }
        }
    }

    // == Delete ==
    /// Removes a single key. Returns whether a key was actually removed.
    pub async fn del(&self, key: &str) -> bool {
        let Backend::Redis(conn) = &self.backend else {
            return false;
        };
        let mut conn = conn.clone();

        let result: redis::RedisResult<u64> = conn.del(key).await;
        match result {
            Ok(count) => count > 0,
            Err(e) => {
                warn!(key = %key, error = %e, "remote DEL failed");
                false
            }
        }
    }

    // == Delete By Pattern ==
    /// Removes every key matching a glob pattern, returning the count
    /// deleted.
    ///
    /// The store has no full key listing, so this drains a SCAN cursor
    /// over the entire keyspace and deletes matches in batches. That makes
    /// it far more expensive than local prefix invalidation; reserve it
    /// for fan-out cases whose derived key set cannot be enumerated.
    pub async fn del_pattern(&self, pattern: &str) -> u64 {
        let Backend::Redis(conn) = &self.backend else {
            return 0;
        };
        let mut conn = conn.clone();

        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;

        loop {
            let page: redis::RedisResult<(u64, Vec<String>)> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await;

            let (next, keys) = match page {
                Ok(page) => page,
                Err(e) => {
                    warn!(pattern = %pattern, error = %e, "remote SCAN failed");
                    return deleted;
                }
            };

            if !keys.is_empty() {
                let result: redis::RedisResult<u64> = conn.del(&keys).await;
                match result {
                    Ok(count) => deleted += count,
                    Err(e) => {
                        warn!(pattern = %pattern, error = %e, "remote batch DEL failed");
                    }
                }
            }

            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        debug!(pattern = %pattern, deleted, "remote pattern delete complete");
        deleted
    }

    // == Exists ==
    /// Checks whether a key is present.
    pub async fn exists(&self, key: &str) -> bool {
        let Backend::Redis(conn) = &self.backend else {
            return false;
        };
        let mut conn = conn.clone();

        let result: redis::RedisResult<bool> = conn.exists(key).await;
        match result {
            Ok(present) => present,
            Err(e) => {
                warn!(key = %key, error = %e, "remote EXISTS failed");
                false
            }
        }
    }

    // == TTL ==
    /// Returns the remaining TTL of a key in seconds, or 0 when the key is
    /// absent, has no expiry, or the call fails.
    pub async fn ttl(&self, key: &str) -> u64 {
        let Backend::Redis(conn) = &self.backend else {
            return 0;
        };
        let mut conn = conn.clone();

        let result: redis::RedisResult<i64> = conn.ttl(key).await;
        match result {
            // Negative replies mean "missing" or "no expiry"
            Ok(secs) if secs > 0 => secs as u64,
            Ok(_) => 0,
            Err(e) => {
                warn!(key = %key, error = %e, "remote TTL failed");
                0
            }
        }
    }

    // == Increment ==
    /// Atomically increments a numeric key by `delta`, returning the new
    /// value, or 0 when the tier is disabled or the call fails.
    pub async fn incr(&self, key: &str, delta: i64) -> i64 {
        let Backend::Redis(conn) = &self.backend else {
            return 0;
        };
        let mut conn = conn.clone();

        let result: redis::RedisResult<i64> = conn.incr(key, delta).await;
        match result {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "remote INCR failed");
                0
            }
        }
    }

    // == Ping ==
    /// Health probe. Returns false when the tier is disabled or unreachable.
    pub async fn ping(&self) -> bool {
        let Backend::Redis(conn) = &self.backend else {
            return false;
        };
        let mut conn = conn.clone();

        let result: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        match result {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "remote PING failed");
                false
            }
        }
    }
}

// == Connection URL ==
/// Builds the connection URL, splicing the access token in as the password
/// component when the configured URL carries no credentials of its own.
fn connection_url(config: &RemoteConfig) -> Option<String> {
    let url = config.url.clone()?;

    match &config.token {
        Some(token) if !url.contains('@') => {
            let (scheme, rest) = url.split_once("://")?;
            Some(format!("{}://:{}@{}", scheme, token, rest))
        }
        _ => Some(url),
    }
}
