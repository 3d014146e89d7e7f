//! TTL Policy Module
//!
//! Per-endpoint time-to-live configuration with longest-prefix resolution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cache::key::normalize_endpoint;

const MINUTE_MS: u64 = 60 * 1000;

/// Default TTL applied when no endpoint prefix matches: 5 minutes.
pub const DEFAULT_TTL_MS: u64 = 5 * MINUTE_MS;

// == TTL Config ==
/// Active configuration of a cache store: TTL table and storage tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtlConfig {
    /// TTL for endpoints matching no configured prefix
    pub default_ttl_ms: u64,
    /// Endpoint prefix (in `/api/...` form) to TTL
    pub endpoints: BTreeMap<String, u64>,
    /// Keep entries in the in-memory tier
    #[serde(default = "enabled")]
    pub use_memory: bool,
    /// Mirror entries to the persistent tier
    #[serde(default)]
    pub use_persistent: bool,
}

fn enabled() -> bool {
    true
}

impl Default for TtlConfig {
    fn default() -> Self {
        let endpoints = [
            ("/api/firm", 10 * MINUTE_MS),
            ("/api/vehicle", 5 * MINUTE_MS),
            ("/api/pricing", 10 * MINUTE_MS),
            ("/api/transaction/all", 2 * MINUTE_MS),
            ("/api/dashboard", MINUTE_MS),
        ]
        .into_iter()
        .map(|(prefix, ttl)| (prefix.to_string(), ttl))
        .collect();

        Self {
            default_ttl_ms: DEFAULT_TTL_MS,
            endpoints,
            use_memory: true,
            use_persistent: false,
        }
    }
}

impl TtlConfig {
    /// Default endpoint table with a custom fallback TTL.
    pub fn with_default_ttl(default_ttl_ms: u64) -> Self {
        Self {
            default_ttl_ms,
            ..Self::default()
        }
    }

    // == Resolve ==
    /// Resolves the TTL for an endpoint.
    ///
    /// The endpoint is normalized to its `/api` form and the longest
    /// configured prefix it starts with wins.
    pub fn ttl_for(&self, endpoint: &str) -> u64 {
        let normalized = normalize_endpoint(endpoint);
        self.endpoints
            .iter()
            .filter(|(prefix, _)| normalized.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, ttl)| *ttl)
            .unwrap_or(self.default_ttl_ms)
    }

    // == Merge ==
    /// Applies an update: replaces the default and tier switches when given
    /// and inserts or overrides individual prefixes.
    pub fn merge(&mut self, update: TtlConfigUpdate) {
        if let Some(default_ttl_ms) = update.default_ttl_ms {
            self.default_ttl_ms = default_ttl_ms;
        }
        if let Some(use_memory) = update.use_memory {
            self.use_memory = use_memory;
        }
        if let Some(use_persistent) = update.use_persistent {
            self.use_persistent = use_persistent;
        }
        for (prefix, ttl) in update.endpoints {
            self.endpoints.insert(normalize_endpoint(&prefix), ttl);
        }
    }
}

// == TTL Config Update ==
/// Partial override for a [`TtlConfig`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TtlConfigUpdate {
    #[serde(default)]
    pub default_ttl_ms: Option<u64>,
    #[serde(default)]
    pub endpoints: BTreeMap<String, u64>,
    #[serde(default)]
    pub use_memory: Option<bool>,
    #[serde(default)]
    pub use_persistent: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let config = TtlConfig::default();
        assert_eq!(config.default_ttl_ms, 300_000);
        assert_eq!(config.ttl_for("/api/firm"), 600_000);
        assert_eq!(config.ttl_for("/api/vehicle/byFirm/3"), 300_000);
        assert_eq!(config.ttl_for("/api/dashboard"), 60_000);
    }

    #[test]
    fn test_unprefixed_endpoint_resolves() {
        let config = TtlConfig::default();
        assert_eq!(config.ttl_for("/firm"), 600_000);
        assert_eq!(config.ttl_for("pricing/4"), 600_000);
    }

    #[test]
    fn test_longest_prefix_wins() {
        let config = TtlConfig::default();
        assert_eq!(config.ttl_for("/api/transaction/all"), 120_000);
        // no `/api/transaction` prefix is configured
        assert_eq!(config.ttl_for("/api/transaction/today/total"), 300_000);

        let mut config = TtlConfig::default();
        config.endpoints.insert("/api/firm/count".into(), 1_000);
        assert_eq!(config.ttl_for("/api/firm/count/total"), 1_000);
        assert_eq!(config.ttl_for("/api/firm/7"), 600_000);
    }

    #[test]
    fn test_unknown_endpoint_uses_default() {
        let config = TtlConfig::with_default_ttl(42);
        assert_eq!(config.ttl_for("/note"), 42);
    }

    #[test]
    fn test_merge_keeps_untouched_prefixes() {
        let mut config = TtlConfig::default();
        let mut endpoints = BTreeMap::new();
        endpoints.insert("/note".to_string(), 5_000);
        endpoints.insert("/api/firm".to_string(), 1_000);

        config.merge(TtlConfigUpdate {
            default_ttl_ms: Some(9_000),
            endpoints,
            ..TtlConfigUpdate::default()
        });

        assert_eq!(config.default_ttl_ms, 9_000);
        assert_eq!(config.ttl_for("/note/1"), 5_000);
        assert_eq!(config.ttl_for("/firm"), 1_000);
        assert_eq!(config.ttl_for("/pricing"), 600_000);
        assert!(config.endpoints.contains_key("/api/note"));
    }

    #[test]
    fn test_update_deserialize_partial() {
        let update: TtlConfigUpdate = serde_json::from_str(r#"{"default_ttl_ms": 10}"#).unwrap();
        assert_eq!(update.default_ttl_ms, Some(10));
        assert!(update.endpoints.is_empty());
    }

    #[test]
    fn test_merge_toggles_tiers() {
        let mut config = TtlConfig::default();
        assert!(config.use_memory);
        assert!(!config.use_persistent);

        let update: TtlConfigUpdate =
            serde_json::from_str(r#"{"use_persistent": true}"#).unwrap();
        config.merge(update);
        assert!(config.use_memory);
        assert!(config.use_persistent);

        config.merge(TtlConfigUpdate {
            use_memory: Some(false),
            ..TtlConfigUpdate::default()
        });
        assert!(!config.use_memory);
        assert!(config.use_persistent);
        assert_eq!(config.default_ttl_ms, DEFAULT_TTL_MS);
    }
}
