//! Cache Statistics Module
//!
//! Tracks lookup outcomes and reports a diagnostic snapshot of the store.

use serde::Serialize;

use crate::cache::TtlConfig;

// == Cache Stats ==
/// Diagnostic snapshot of a cache store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Current number of entries in the memory tier
    pub size: usize,
    /// Current number of entries in the persistent tier
    pub persistent_size: usize,
    /// Number of lookups served from the store
    pub hits: u64,
    /// Number of lookups that found nothing or an expired entry
    pub misses: u64,
    /// hits / (hits + misses)
    pub hit_rate: f64,
    /// Active TTL configuration
    pub config: TtlConfig,
}

// == Lookup Counters ==
/// Running hit/miss counters kept by the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupCounters {
    pub hits: u64,
    pub misses: u64,
}

impl LookupCounters {
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_new() {
        let counters = LookupCounters::default();
        assert_eq!(counters.hits, 0);
        assert_eq!(counters.misses, 0);
        assert_eq!(counters.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut counters = LookupCounters::default();
        counters.record_hit();
        counters.record_hit();
        counters.record_hit();
        counters.record_miss();
        assert_eq!(counters.hit_rate(), 0.75);
    }

    #[test]
    fn test_stats_serialize() {
        let stats = CacheStats {
            size: 2,
            persistent_size: 3,
            hits: 1,
            misses: 1,
            hit_rate: 0.5,
            config: TtlConfig::default(),
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["size"], 2);
        assert_eq!(json["persistent_size"], 3);
        assert_eq!(json["config"]["use_persistent"], false);
        assert_eq!(json["config"]["default_ttl_ms"], 300_000);
        assert_eq!(json["config"]["endpoints"]["/api/firm"], 600_000);
    }
}
