//! API Routes
//!
//! Configures the Axum router with the proxy and cache admin endpoints.

use axum::{
    routing::{any, delete, get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_all_handler, clear_expired_handler, health_handler, invalidate_handler,
    prefetch_handler, proxy_handler, stats_handler, update_config_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `ANY /api/*path` - Forward to the backend through the cache
/// - `GET /cache/stats` - Cache size, hit rate and TTL configuration
/// - `DELETE /cache` - Drop every entry
/// - `DELETE /cache/expired` - Sweep expired entries now
/// - `POST /cache/invalidate` - Invalidate by pattern or exact endpoint
/// - `PATCH /cache/config` - Merge TTL overrides
/// - `POST /cache/prefetch` - Warm a batch of endpoints
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin so the dashboard can call the proxy directly
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/*path", any(proxy_handler))
        .route("/cache", delete(clear_all_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache/expired", delete(clear_expired_handler))
        .route("/cache/invalidate", post(invalidate_handler))
        .route("/cache/config", patch(update_config_handler))
        .route("/cache/prefetch", post(prefetch_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
