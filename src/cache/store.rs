//! Cache Store Module
//!
//! Response store keyed by request signature with per-endpoint TTL. Entries
//! live in memory and, when enabled, in a persistent JSON file tier.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::persistent::PersistentTier;
use crate::cache::stats::LookupCounters;
use crate::cache::{cache_key, CacheEntry, CacheStats, TtlConfig, TtlConfigUpdate};
use crate::request::RequestOptions;

// == Cache Store ==
/// Response cache with TTL expiry and substring invalidation.
///
/// Every operation is infallible: a missing or expired entry is a miss.
/// Removals always apply to both tiers, whatever the tier switches say, so
/// re-enabling a tier never resurrects an invalidated entry.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key to entry
    entries: HashMap<String, CacheEntry>,
    /// File-backed tier, if the store was given a file
    persistent: Option<PersistentTier>,
    /// Active TTL policy and tier switches
    config: TtlConfig,
    /// Lookup outcomes
    counters: LookupCounters,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty in-memory store with the given TTL policy.
    pub fn new(config: TtlConfig) -> Self {
        Self {
            entries: HashMap::new(),
            persistent: None,
            config,
            counters: LookupCounters::default(),
        }
    }

    /// Creates a store whose persistent tier lives in `path`.
    ///
    /// Entries already in the file are served once `use_persistent` is on.
    pub fn with_file(config: TtlConfig, path: impl Into<PathBuf>) -> Self {
        Self {
            persistent: Some(PersistentTier::open(path)),
            ..Self::new(config)
        }
    }

    fn persistent_enabled(&mut self) -> Option<&mut PersistentTier> {
        if self.config.use_persistent {
            self.persistent.as_mut()
        } else {
            None
        }
    }

    // == Get ==
    /// Returns the stored payload for a request, if present and unexpired.
    ///
    /// The memory tier is consulted first. A persistent hit is copied into
    /// memory when the memory tier is on. Expired entries are removed on
    /// the spot.
    pub fn get(&mut self, endpoint: &str, options: &RequestOptions) -> Option<Arc<Value>> {
        let key = cache_key(endpoint, options);

        if self.config.use_memory {
            let expired = match self.entries.get(&key) {
                Some(entry) if !entry.is_expired() => {
                    self.counters.record_hit();
                    debug!(endpoint, "cache hit");
                    return Some(Arc::clone(&entry.payload));
                }
                Some(_) => true,
                None => false,
            };
            if expired {
                self.entries.remove(&key);
                debug!(endpoint, "cache entry expired");
            }
        }

        let use_memory = self.config.use_memory;
        if let Some(entry) = self.persistent_enabled().and_then(|tier| tier.get(&key)) {
            let payload = Arc::clone(&entry.payload);
            if use_memory {
                self.entries.insert(key, entry);
            }
            self.counters.record_hit();
            debug!(endpoint, "cache hit (persistent)");
            return Some(payload);
        }

        self.counters.record_miss();
        debug!(endpoint, "cache miss");
        None
    }

    // == Save ==
    /// Stores a payload for a request in every enabled tier, replacing any
    /// previous entry.
    pub fn save(&mut self, endpoint: &str, options: &RequestOptions, payload: Arc<Value>) {
        let key = cache_key(endpoint, options);
        let ttl_ms = self.config.ttl_for(endpoint);
        let entry = CacheEntry::new(payload, ttl_ms);

        if let Some(tier) = self.persistent_enabled() {
            tier.insert(key.clone(), entry.clone());
        }
        if self.config.use_memory {
            self.entries.insert(key, entry);
        }
        debug!(endpoint, ttl_ms, "cache save");
    }

    // == Invalidate ==
    /// Removes the entry for exactly this endpoint and options.
    ///
    /// Returns true if an entry was removed from either tier.
    pub fn invalidate(&mut self, endpoint: &str, options: &RequestOptions) -> bool {
        let key = cache_key(endpoint, options);
        let in_memory = self.entries.remove(&key).is_some();
        let on_disk = self
            .persistent
            .as_mut()
            .is_some_and(|tier| tier.remove(&key));
        let removed = in_memory || on_disk;
        if removed {
            debug!(endpoint, "cache invalidate");
        }
        removed
    }

    // == Invalidate Pattern ==
    /// Removes every entry whose key contains `pattern`.
    ///
    /// Returns the number of entries removed across both tiers.
    pub fn invalidate_pattern(&mut self, pattern: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.contains(pattern));
        let mut removed = before - self.entries.len();
        if let Some(tier) = self.persistent.as_mut() {
            removed += tier.remove_matching(pattern);
        }
        debug!(pattern, removed, "cache invalidate pattern");
        removed
    }

    // == Clear Expired ==
    /// Removes all expired entries from both tiers.
    ///
    /// Returns the number of entries removed.
    pub fn clear_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - self.entries.len();
        removed + self.persistent.as_mut().map_or(0, PersistentTier::remove_expired)
    }

    // == Clear All ==
    /// Empties both tiers, returning the number of entries dropped.
    pub fn clear_all(&mut self) -> usize {
        let mut removed = self.entries.len();
        self.entries.clear();
        if let Some(tier) = self.persistent.as_mut() {
            removed += tier.clear();
        }
        debug!(removed, "cache cleared");
        removed
    }

    // == Stats ==
    /// Returns a snapshot of tier sizes, lookup counters and configuration.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            persistent_size: self.persistent.as_ref().map_or(0, PersistentTier::len),
            hits: self.counters.hits,
            misses: self.counters.misses,
            hit_rate: self.counters.hit_rate(),
            config: self.config.clone(),
        }
    }

    // == Update Config ==
    /// Merges TTL overrides and tier switches into the active configuration.
    ///
    /// Existing entries keep the expiry they were stored with. Turning the
    /// memory tier off drops its entries.
    pub fn update_config(&mut self, update: TtlConfigUpdate) {
        self.config.merge(update);
        if !self.config.use_memory {
            self.entries.clear();
        }
        debug!(config = ?self.config, "cache config updated");
    }

    /// Returns the active TTL configuration.
    pub fn config(&self) -> &TtlConfig {
        &self.config
    }

    /// Returns true if a key is currently held in memory, expired or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Length ==
    /// Returns the current number of in-memory entries, including
    /// not-yet-swept expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
