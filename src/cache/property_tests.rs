//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check invalidation and expiry behavior over arbitrary
//! sets of endpoints.

use proptest::prelude::*;
use serde_json::json;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use crate::cache::{cache_key, CacheStore, TtlConfig, TtlConfigUpdate};
use crate::request::RequestOptions;

// == Strategies ==
/// Generates endpoints drawn from the dashboard's resource families
fn endpoint_strategy() -> impl Strategy<Value = String> {
    (
        prop_oneof![
            Just("firm"),
            Just("vehicle"),
            Just("pricing"),
            Just("transaction"),
            Just("note"),
            Just("dashboard"),
        ],
        proptest::option::of(0u32..50),
        any::<bool>(),
    )
        .prop_map(|(resource, id, api_prefix)| {
            let prefix = if api_prefix { "/api" } else { "" };
            match id {
                Some(id) => format!("{}/{}/{}", prefix, resource, id),
                None => format!("{}/{}", prefix, resource),
            }
        })
}

fn pattern_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("/firm".to_string()),
        Just("/vehicle".to_string()),
        Just("/pricing".to_string()),
        Just("/transaction".to_string()),
        Just("/dashboard".to_string()),
        Just("/1".to_string()),
    ]
}

fn store_with_default_ttl(ttl_ms: u64) -> CacheStore {
    CacheStore::new(TtlConfig {
        default_ttl_ms: ttl_ms,
        endpoints: BTreeMap::new(),
        ..TtlConfig::default()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Pattern invalidation removes exactly the entries whose key contains the
    // pattern and leaves every other entry in place.
    #[test]
    fn prop_invalidate_pattern_is_exact(
        endpoints in prop::collection::vec(endpoint_strategy(), 1..30),
        pattern in pattern_strategy()
    ) {
        let mut store = CacheStore::default();
        let unique: HashSet<String> = endpoints.into_iter().collect();
        for endpoint in &unique {
            store.save(endpoint, &RequestOptions::get(), Arc::new(json!(endpoint)));
        }

        let expected_removed = unique
            .iter()
            .filter(|e| cache_key(e, &RequestOptions::get()).contains(&pattern))
            .count();

        let removed = store.invalidate_pattern(&pattern);
        prop_assert_eq!(removed, expected_removed);
        prop_assert_eq!(store.len(), unique.len() - expected_removed);

        for endpoint in &unique {
            let key = cache_key(endpoint, &RequestOptions::get());
            if key.contains(&pattern) {
                prop_assert!(!store.contains_key(&key), "{} should be gone", key);
            } else {
                let payload = store.get(endpoint, &RequestOptions::get());
                prop_assert_eq!(payload.as_deref(), Some(&json!(endpoint)));
            }
        }
    }

    // A hit always returns the payload most recently saved for that request.
    #[test]
    fn prop_last_save_wins(
        writes in prop::collection::vec((endpoint_strategy(), 0i64..1000), 1..40)
    ) {
        let mut store = CacheStore::default();
        let mut expected = std::collections::HashMap::new();

        for (endpoint, value) in writes {
            store.save(&endpoint, &RequestOptions::get(), Arc::new(json!(value)));
            expected.insert(endpoint, value);
        }

        prop_assert_eq!(store.len(), expected.len());
        for (endpoint, value) in expected {
            let payload = store.get(&endpoint, &RequestOptions::get());
            prop_assert_eq!(payload.as_deref(), Some(&json!(value)));
        }
    }
}

// Fewer cases for tests that sleep
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // Sweeping removes only expired entries and leaves live payloads intact.
    #[test]
    fn prop_clear_expired_only_removes_expired(
        short_lived in prop::collection::hash_set(endpoint_strategy(), 1..10),
        long_lived in prop::collection::hash_set(0u32..1000, 1..10)
    ) {
        let mut store = store_with_default_ttl(20);
        for endpoint in &short_lived {
            store.save(endpoint, &RequestOptions::get(), Arc::new(json!("stale")));
        }

        sleep(Duration::from_millis(40));

        store.update_config(TtlConfigUpdate {
            default_ttl_ms: Some(60_000),
            endpoints: BTreeMap::new(),
            ..TtlConfigUpdate::default()
        });
        for id in &long_lived {
            let endpoint = format!("/report/{}", id);
            store.save(&endpoint, &RequestOptions::get(), Arc::new(json!(id)));
        }

        let removed = store.clear_expired();
        prop_assert_eq!(removed, short_lived.len());
        prop_assert_eq!(store.len(), long_lived.len());

        for id in &long_lived {
            let payload = store.get(&format!("/report/{}", id), &RequestOptions::get());
            prop_assert_eq!(payload.as_deref(), Some(&json!(id)));
        }
    }
}
