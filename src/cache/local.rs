//! Local Cache Module
//!
//! The in-process tier: a bounded map with TTL expiration, LRU eviction
//! and hit/miss accounting.
//!
//! `LocalStore` is the single-threaded core; `LocalCache` wraps it in a
//! single RwLock so map mutation, LRU-order updates and eviction stay
//! atomic relative to each other, and adds the disable flag that turns
//! every operation into a no-op.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::{CacheError, Result};

// == Local Store ==
/// Core local storage combining HashMap entries with LRU tracking and TTL
/// expiration. Not concurrency-safe on its own; see [`LocalCache`].
#[derive(Debug)]
pub struct LocalStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
}

impl LocalStore {
    // == Constructor ==
    /// Creates a new LocalStore with the specified capacity.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries the store can hold
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(max_entries),
            max_entries,
        }
    }

    // == Get ==
    /// Retrieves the serialized payload for a key.
    ///
    /// Returns None on absence. An expired entry is deleted on read (lazy
    /// expiry) and also reported as None. Presence updates the LRU order
    /// and the entry's access timestamp and counts as a hit; absence or
    /// expiry counts as a miss.
    ///
    /// # Arguments
    /// * `key` - The key to retrieve
    pub fn get(&mut self, key: &str) -> Option<String> {
        let Some(entry) = self.entries.get_mut(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired() {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.set_size(self.entries.len());
            self.stats.record_miss();
            return None;
        }

        entry.touch();
        let value = entry.value.clone();
        self.stats.record_hit();
        self.lru.touch(key);
        Some(value)
    }

    // == Set ==
    /// Stores a serialized payload under a key with the given TTL.
    ///
    /// If the key already exists, the value is overwritten and the TTL is
    /// reset. If the store is at capacity and the key is new, exactly one
    /// entry is evicted before inserting: the least recently used one, or,
    /// when the access order is empty or stale, the entry with the soonest
    /// expiration.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The serialized payload to store
    /// * `ttl_seconds` - TTL in seconds
    pub fn set(&mut self, key: String, value: String, ttl_seconds: u64) -> Result<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::KeyTooLong {
                key,
                limit: MAX_KEY_LENGTH,
            });
        }

        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::ValueTooLarge {
                key,
                limit: MAX_VALUE_SIZE,
            });
        }

        let is_overwrite = self.entries.contains_key(&key);

        // Evict exactly one entry before inserting a new key at capacity
        if !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some(victim) = self.pick_eviction_victim() {
                self.entries.remove(&victim);
                self.lru.remove(&victim);
                self.stats.record_eviction();
            }
        }

        let entry = CacheEntry::new(value, ttl_seconds);
        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);
        self.stats.set_size(self.entries.len());

        Ok(())
    }

    // == Eviction Victim ==
    /// Picks the key to evict: LRU order first, falling back to the entry
    /// with the soonest expiration when the order yields nothing usable.
    fn pick_eviction_victim(&mut self) -> Option<String> {
        loop {
            match self.lru.evict_oldest() {
                Some(key) if self.entries.contains_key(&key) => return Some(key),
                // Order referenced a key no longer resident, keep draining
                Some(_) => continue,
                None => break,
            }
        }

        self.entries
            .iter()
            .min_by_key(|(_, entry)| entry.expires_at)
            .map(|(key, _)| key.clone())
    }

    // == Delete ==
    /// Removes one exact key, returning whether it was resident.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.lru.remove(key);
            self.stats.set_size(self.entries.len());
        }
        removed
    }

    // == Invalidate ==
    /// Removes every resident key equal to `pattern` or prefixed by it.
    ///
    /// Prefix-only semantics; this is not a general pattern matcher.
    ///
    /// # Arguments
    /// * `pattern` - The exact key or key prefix to purge
    ///
    /// # Returns
    /// The number of entries removed.
    pub fn invalidate(&mut self, pattern: &str) -> usize {
        let matched: Vec<String> = self
            .entries
            .keys()
            .filter(|key| key.starts_with(pattern))
            .cloned()
            .collect();

        for key in &matched {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.set_size(self.entries.len());
        matched.len()
    }

    // == Clear ==
    /// Drops all entries unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru = LruTracker::new();
        self.stats.set_size(0);
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Independent of reads; intended to run on a fixed interval so idle
    /// expired data does not occupy memory indefinitely.
    ///
    /// # Returns
    /// The number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
            self.lru.remove(&key);
        }

        self.stats.set_size(self.entries.len());
        count
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_size(self.entries.len());
        stats
    }

    // == Reset Stats ==
    /// Resets hit, miss and eviction counters to zero.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    // == Length ==
    /// Returns the current number of entries in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Local Cache ==
/// Concurrency-safe facade over [`LocalStore`].
///
/// A single lock guards the map, the LRU order and the stats together.
/// The disable flag makes every operation a no-op (`get` always misses,
/// mutations do nothing), for debugging or rollback without touching call
/// sites.
#[derive(Debug)]
pub struct LocalCache {
    store: RwLock<LocalStore>,
    enabled: bool,
}

impl LocalCache {
    // == Constructor ==
    /// Creates an enabled local cache with the given capacity.
    pub fn new(max_entries: usize) -> Arc<Self> {
        Arc::new(Self {
            store: RwLock::new(LocalStore::new(max_entries)),
            enabled: true,
        })
    }

    /// Creates a permanently disabled local cache; every operation is a no-op.
    pub fn disabled() -> Arc<Self> {
        Arc::new(Self {
            store: RwLock::new(LocalStore::new(0)),
            enabled: false,
        })
    }

    /// Returns whether this tier is active.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // == Get ==
    /// Retrieves the serialized payload for a key, or None when absent,
    /// expired, or the tier is disabled.
    pub async fn get(&self, key: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }
        self.store.write().await.get(key)
    }

    // == Set ==
    /// Stores a serialized payload with the given TTL.
    pub async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        self.store.write().await.set(key.to_string(), value, ttl_seconds)
    }

    // == Delete ==
    /// Removes a single key. Absent keys are ignored.
    pub async fn del(&self, key: &str) {
        if !self.enabled {
            return;
        }
        let removed = self.store.write().await.delete(key);
        if removed {
            debug!(key = %key, "local cache entry deleted");
        }
    }

    // == Invalidate ==
    /// Removes every resident key equal to `pattern` or prefixed by it,
    /// returning the number of entries removed.
    pub async fn invalidate(&self, pattern: &str) -> usize {
        if !self.enabled {
            return 0;
        }
        let removed = self.store.write().await.invalidate(pattern);
        if removed > 0 {
            debug!(pattern = %pattern, removed, "local cache invalidated");
        }
        removed
    }

    // == Clear ==
    /// Drops all entries unconditionally.
    pub async fn clear(&self) {
        if !self.enabled {
            return;
        }
        self.store.write().await.clear();
    }

    // == Cleanup ==
    /// Removes all expired entries, returning the number removed.
    pub async fn cleanup(&self) -> usize {
        if !self.enabled {
            return 0;
        }
        self.store.write().await.cleanup_expired()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn get_stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    // == Reset Stats ==
    /// Resets hit, miss and eviction counters to zero.
    pub async fn reset_stats(&self) {
        self.store.write().await.reset_stats();
    }

    // == Length ==
    /// Returns the current number of resident entries.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}
