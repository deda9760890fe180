//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics for one tier.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of entries evicted due to LRU policy
    pub evictions: u64,
    /// Current number of resident entries
    pub size: usize,
    /// Maximum number of entries the tier can hold
    pub max_size: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            ..Self::default()
        }
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate as a percentage.
    ///
    /// Returns hits / (hits + misses) * 100 rounded to 2 decimals,
    /// or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            let rate = self.hits as f64 / total as f64 * 100.0;
            (rate * 100.0).round() / 100.0
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Update Entry Count ==
    /// Updates the resident entry count.
    pub fn set_size(&mut self, count: usize) {
        self.size = count;
    }

    // == Reset ==
    /// Resets hit, miss and eviction counters to zero.
    ///
    /// Size and capacity reflect current residency and are left untouched.
    pub fn reset(&mut self) {
        self.hits = 0;
        self.misses = 0;
        self.evictions = 0;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new(100);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.size, 0);
        assert_eq!(stats.max_size, 100);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::new(100);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let mut stats = CacheStats::new(100);
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        assert_eq!(stats.hit_rate(), 100.0);
    }

    #[test]
    fn test_hit_rate_all_misses() {
        let mut stats = CacheStats::new(100);
        stats.record_miss();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_rounding() {
        let mut stats = CacheStats::new(100);
        stats.record_hit();
        stats.record_miss();
        stats.record_miss();
        // 1/3 = 33.333...% -> 33.33
        assert_eq!(stats.hit_rate(), 33.33);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new(100);
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 50.0);
    }

    #[test]
    fn test_record_eviction() {
        let mut stats = CacheStats::new(100);
        stats.record_eviction();
        stats.record_eviction();
        assert_eq!(stats.evictions, 2);
    }

    #[test]
    fn test_set_size() {
        let mut stats = CacheStats::new(100);
        stats.set_size(42);
        assert_eq!(stats.size, 42);
    }

    #[test]
    fn test_reset() {
        let mut stats = CacheStats::new(100);
        stats.record_hit();
        stats.record_miss();
        stats.record_eviction();
        stats.set_size(7);

        stats.reset();

        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        // Residency survives a counter reset
        assert_eq!(stats.size, 7);
        assert_eq!(stats.max_size, 100);
    }
}
