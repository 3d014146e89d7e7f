//! Cache Module
//!
//! Store for decoded API responses with per-endpoint TTL expiry and
//! substring invalidation, held in memory and optionally in a JSON file.

mod entry;
mod key;
mod persistent;
mod policy;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use key::{cache_key, normalize_endpoint, strip_api_prefix, KEY_PREFIX};
pub use persistent::PersistentTier;
pub use policy::{TtlConfig, TtlConfigUpdate, DEFAULT_TTL_MS};
pub use stats::{CacheStats, LookupCounters};
pub use store::CacheStore;

use std::sync::Arc;
use tokio::sync::RwLock;

/// Store handle shared between the cached client, the sweep task and the
/// admin endpoints.
pub type SharedStore = Arc<RwLock<CacheStore>>;
