//! API Handlers
//!
//! HTTP request handlers for the caching proxy and its admin endpoints.

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{
        header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE},
        HeaderMap, HeaderName, Method, StatusCode, Uri,
    },
    response::Response,
    Json,
};
use tracing::debug;

use crate::cache::{CacheStats, CacheStore, TtlConfig, TtlConfigUpdate};
use crate::client::{ApiClient, CachedClient, HttpApiClient};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{
    HealthResponse, InvalidateRequest, PrefetchBatchRequest, PrefetchResponse, RemovedResponse,
};
use crate::request::{CacheOptions, CallResult, RequestOptions};

/// Response header reporting whether the body came from the cache.
pub const X_CACHE: &str = "x-cache";

/// How the proxy treats a caller's `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialMode {
    /// Forward the caller's credentials. Credentialed requests bypass the
    /// shared cache, so only anonymous reads are cached.
    Forward,
    /// Every backend call uses the configured service token. Caller
    /// credentials are dropped and all callers share one cache.
    ServiceToken,
}

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Cached client sharing the store and event bus
    pub client: CachedClient,
    /// Caller credential handling
    pub credentials: CredentialMode,
}

impl AppState {
    /// Creates a new AppState around a cached client, forwarding caller
    /// credentials.
    pub fn new(client: CachedClient) -> Self {
        Self {
            client,
            credentials: CredentialMode::Forward,
        }
    }

    pub fn with_credentials(mut self, credentials: CredentialMode) -> Self {
        self.credentials = credentials;
        self
    }

    /// Creates a new AppState from configuration.
    ///
    /// Talks to the configured backend with a fresh store and event bus.
    /// A configured `API_TOKEN` switches to [`CredentialMode::ServiceToken`].
    pub fn from_config(config: &Config) -> Self {
        let api: Arc<dyn ApiClient> = Arc::new(HttpApiClient::new(
            &config.api_base_url,
            config.api_token.clone(),
        ));
        let store = CacheStore::with_file(config.ttl_config(), config.cache_file.clone());
        let credentials = if config.api_token.is_some() {
            CredentialMode::ServiceToken
        } else {
            CredentialMode::Forward
        };
        Self::new(CachedClient::with_store(api, store)).with_credentials(credentials)
    }
}

/// Handler for any method on /api/*path
///
/// Forwards the request through the cache. `Cache-Control: no-cache` forces
/// a refresh; `no-store` disables caching for the call. Credentialed calls
/// skip the cache unless the proxy runs with a service token; their writes
/// still invalidate it.
pub async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let endpoint = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    let mut options = RequestOptions::with_method(method);
    if !body.is_empty() {
        let body = String::from_utf8(body.to_vec())
            .map_err(|_| Error::InvalidRequest("Request body must be UTF-8".to_string()))?;
        options.body = Some(body);
    }

    let mut cache_options = cache_options_from(&headers);
    let caller_auth = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    match (state.credentials, caller_auth) {
        (CredentialMode::Forward, Some(auth)) => {
            // Responses for one credential must never be served to another.
            options = options.header(AUTHORIZATION.as_str(), auth);
            cache_options = CacheOptions::no_cache();
        }
        (CredentialMode::ServiceToken, Some(_)) => {
            debug!(endpoint, "dropping caller credentials in service token mode");
        }
        (_, None) => {}
    }

    let result = state
        .client
        .cached_call(endpoint, options, cache_options)
        .await?;

    into_http_response(result)
}

/// Maps Cache-Control directives to per-call cache options.
pub fn cache_options_from(headers: &HeaderMap) -> CacheOptions {
    let directives: Vec<String> = headers
        .get_all(CACHE_CONTROL)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|d| d.trim().to_ascii_lowercase())
        .collect();

    if directives.iter().any(|d| d == "no-store") {
        CacheOptions::no_cache()
    } else if directives.iter().any(|d| d == "no-cache") {
        CacheOptions::refresh()
    } else {
        CacheOptions::default()
    }
}

fn into_http_response(result: CallResult) -> Result<Response> {
    let builder = Response::builder();
    let response = match result {
        CallResult::Cached { payload } => builder
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "application/json")
            .header(X_CACHE, "HIT")
            .body(Body::from(payload.to_string())),
        CallResult::Live { response } => {
            let status = StatusCode::from_u16(response.status)
                .map_err(|e| Error::Internal(format!("upstream status: {}", e)))?;
            let mut builder = builder.status(status);
            if let Some(headers) = builder.headers_mut() {
                for (name, value) in response.headers.iter() {
                    if !is_hop_by_hop(name) && name.as_str() != X_CACHE {
                        headers.append(name.clone(), value.clone());
                    }
                }
            }
            builder.header(X_CACHE, "MISS").body(Body::from(response.body))
        }
    };

    response.map_err(|e| Error::Internal(e.to_string()))
}

/// Connection-level headers that must not be relayed to the caller.
fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
            | "content-length"
    )
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.client.store().read().await.stats())
}

/// Handler for DELETE /cache
pub async fn clear_all_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let removed = state.client.store().write().await.clear_all();
    Json(RemovedResponse::new(removed))
}

/// Handler for DELETE /cache/expired
pub async fn clear_expired_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let removed = state.client.store().write().await.clear_expired();
    Json(RemovedResponse::new(removed))
}

/// Handler for POST /cache/invalidate
///
/// Removes entries by substring pattern or a single entry by exact key.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<RemovedResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(Error::InvalidRequest(error_msg));
    }

    let mut store = state.client.store().write().await;
    let removed = match (&req.pattern, req.target()) {
        (Some(pattern), _) => store.invalidate_pattern(pattern),
        (None, Some(target)) => {
            let options = target.options().map_err(Error::InvalidRequest)?;
            usize::from(store.invalidate(&target.endpoint, &options))
        }
        (None, None) => 0,
    };

    Ok(Json(RemovedResponse::new(removed)))
}

/// Handler for PATCH /cache/config
pub async fn update_config_handler(
    State(state): State<AppState>,
    Json(update): Json<TtlConfigUpdate>,
) -> Json<TtlConfig> {
    let mut store = state.client.store().write().await;
    store.update_config(update);
    Json(store.config().clone())
}

/// Handler for POST /cache/prefetch
pub async fn prefetch_handler(
    State(state): State<AppState>,
    Json(req): Json<PrefetchBatchRequest>,
) -> Result<Json<PrefetchResponse>> {
    let requests = req.into_requests().map_err(Error::InvalidRequest)?;
    let requested = state.client.prefetch_batch(requests).await;
    Ok(Json(PrefetchResponse { requested }))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
