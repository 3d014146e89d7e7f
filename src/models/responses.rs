//! Response DTOs for the cache admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

/// Response body for operations that delete entries
#[derive(Debug, Clone, Serialize)]
pub struct RemovedResponse {
    /// Success message
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl RemovedResponse {
    /// Creates a new RemovedResponse
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Removed {} cache entries", removed),
            removed,
        }
    }
}

/// Response body for POST /cache/prefetch
#[derive(Debug, Clone, Serialize)]
pub struct PrefetchResponse {
    /// Number of endpoints prefetched
    pub requested: usize,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
