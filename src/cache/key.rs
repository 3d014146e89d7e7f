//! Cache Key Module
//!
//! Derives cache keys and canonical endpoint paths.

use crate::request::RequestOptions;

/// Prefix shared by every cache key.
pub const KEY_PREFIX: &str = "cache_";

/// Builds the cache key for a request.
///
/// The key embeds method, endpoint and body verbatim so that substring
/// invalidation on a path fragment such as `/vehicle` reaches every request
/// against that resource.
pub fn cache_key(endpoint: &str, options: &RequestOptions) -> String {
    format!(
        "{}{}_{}_{}",
        KEY_PREFIX,
        options.method.as_str(),
        endpoint,
        options.body.as_deref().unwrap_or("")
    )
}

/// Returns the remainder of `endpoint` after a leading `/api` path segment.
///
/// `/api` must be a whole segment: `/apiary/1` has no such prefix.
pub fn strip_api_prefix(endpoint: &str) -> Option<&str> {
    endpoint
        .strip_prefix("/api")
        .filter(|rest| rest.is_empty() || rest.starts_with(['/', '?', '#']))
}

/// Returns the endpoint with a leading `/api` segment, adding one if missing.
///
/// `firm`, `/firm` and `/api/firm` all normalize to `/api/firm`.
pub fn normalize_endpoint(endpoint: &str) -> String {
    if strip_api_prefix(endpoint).is_some() {
        endpoint.to_string()
    } else if endpoint.starts_with('/') {
        format!("/api{}", endpoint)
    } else {
        format!("/api/{}", endpoint)
    }
}
