//! Cached Client
//!
//! Interposes the response cache in front of an [`ApiClient`]. Reads are
//! served from the store when possible; successful writes invalidate the
//! resource families that depend on them and publish a mutation event.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{cache_key, CacheStore, SharedStore};
use crate::client::{ApiClient, Resource};
use crate::error::Result;
use crate::events::{EventBus, EventKind};
use crate::request::{CacheOptions, CallResult, RequestOptions};

// == Prefetch Request ==
/// One endpoint to warm in a batch prefetch.
#[derive(Debug, Clone, Default)]
pub struct PrefetchRequest {
    pub endpoint: String,
    pub options: RequestOptions,
}

impl PrefetchRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            options: RequestOptions::get(),
        }
    }
}

// == Cached Client ==
/// Shared cache context: the network collaborator, the store and the event
/// bus. Cloning shares all three.
#[derive(Clone)]
pub struct CachedClient {
    api: Arc<dyn ApiClient>,
    store: SharedStore,
    events: EventBus,
}

impl CachedClient {
    /// Creates a client around an existing store and bus.
    pub fn new(api: Arc<dyn ApiClient>, store: SharedStore, events: EventBus) -> Self {
        Self { api, store, events }
    }

    /// Creates a client with a fresh store and bus.
    pub fn with_store(api: Arc<dyn ApiClient>, store: CacheStore) -> Self {
        Self::new(api, Arc::new(RwLock::new(store)), EventBus::new())
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // == Cached Call ==
    /// Performs a request through the cache.
    ///
    /// Network errors and non-2xx responses are returned unchanged; the
    /// cache only ever adds hits, stored payloads and invalidations.
    pub async fn cached_call(
        &self,
        endpoint: &str,
        options: RequestOptions,
        cache_options: CacheOptions,
    ) -> Result<CallResult> {
        let is_read = options.is_read();
        let use_cache = cache_options.caching_enabled(&options);

        if use_cache && !cache_options.force_refresh {
            let hit = self.store.write().await.get(endpoint, &options);
            if let Some(payload) = hit {
                return Ok(CallResult::Cached { payload });
            }
        }

        let response = self.api.call(endpoint, &options).await?;

        if is_read && use_cache && response.is_success() {
            match response.json() {
                Ok(payload) => {
                    self.store
                        .write()
                        .await
                        .save(endpoint, &options, Arc::new(payload));
                }
                Err(err) => warn!(endpoint, error = %err, "failed to cache response"),
            }
        }

        if !is_read && response.is_success() {
            self.invalidate_related(endpoint, &options).await;
        }

        Ok(CallResult::Live { response })
    }

    // == Invalidate Related ==
    /// Clears cached reads affected by a successful write and announces it.
    async fn invalidate_related(&self, endpoint: &str, options: &RequestOptions) {
        let method = &options.method;
        debug!(%method, endpoint, "invalidating after write");

        match Resource::from_endpoint(endpoint) {
            Some(resource) => {
                {
                    let mut store = self.store.write().await;
                    for pattern in resource.invalidation_patterns() {
                        store.invalidate_pattern(pattern);
                    }
                }

                let data = json!({ "endpoint": endpoint, "resource": resource.as_str() });
                match EventKind::for_write(resource, method) {
                    Some(kind) => self.events.publish(kind, Some(data)),
                    None => self.events.publish(EventKind::CacheInvalidated, Some(data)),
                }
            }
            None => {
                // Every GET of this exact endpoint, whatever body it carried.
                let pattern = cache_key(endpoint, &RequestOptions::get());
                self.store.write().await.invalidate_pattern(&pattern);
                self.events.publish(
                    EventKind::CacheInvalidated,
                    Some(json!({ "endpoint": endpoint, "method": method.as_str() })),
                );
            }
        }
    }

    // == Prefetch ==
    /// Refreshes the cached entry for an endpoint, logging any failure.
    pub async fn prefetch(&self, endpoint: &str, options: RequestOptions) {
        debug!(endpoint, "prefetch");
        let outcome = self
            .cached_call(endpoint, options, CacheOptions::refresh())
            .await;
        match outcome {
            Ok(result) if !result.is_success() => {
                warn!(endpoint, status = result.status(), "prefetch returned error status")
            }
            Ok(_) => {}
            Err(err) => warn!(endpoint, error = %err, "prefetch failed"),
        }
    }

    /// Prefetches several endpoints concurrently.
    ///
    /// Individual failures are logged and never fail the batch. Returns the
    /// number of endpoints attempted.
    pub async fn prefetch_batch(&self, requests: Vec<PrefetchRequest>) -> usize {
        let count = requests.len();
        let prefetches = requests
            .into_iter()
            .map(|request| async move { self.prefetch(&request.endpoint, request.options).await });
        join_all(prefetches).await;
        info!(count, "prefetch batch completed");
        count
    }
}

impl std::fmt::Debug for CachedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedClient")
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
