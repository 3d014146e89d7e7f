//! Request and Response Model
//!
//! Types shared by the cache store and the HTTP client: the options a caller
//! passes with a request, the caching overrides, and the two shapes a cached
//! call can resolve to.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;

use crate::error::Result;

// == Request Options ==
/// Options for a single API request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method, GET unless set
    pub method: Method,
    /// Extra headers, applied after the default content type
    pub headers: Vec<(String, String)>,
    /// Serialized request body
    pub body: Option<String>,
}

impl RequestOptions {
    /// Options for a plain GET request.
    pub fn get() -> Self {
        Self::default()
    }

    /// Options for the given method with no body.
    pub fn with_method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Options for a request carrying a JSON body.
    pub fn json(method: Method, body: &Value) -> Self {
        Self {
            method,
            headers: Vec::new(),
            body: Some(body.to_string()),
        }
    }

    /// Adds a header, keeping any previously added ones.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns true for GET requests, the only ones eligible for caching.
    pub fn is_read(&self) -> bool {
        self.method == Method::GET
    }
}

// == Cache Options ==
/// Per-call caching overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheOptions {
    /// Explicit cache switch; None means "cache reads only"
    pub use_cache: Option<bool>,
    /// Skip the lookup but still store the fresh result
    pub force_refresh: bool,
}

impl CacheOptions {
    /// Options that bypass the lookup and refresh the stored entry.
    pub fn refresh() -> Self {
        Self {
            use_cache: None,
            force_refresh: true,
        }
    }

    /// Options that disable caching entirely for this call.
    pub fn no_cache() -> Self {
        Self {
            use_cache: Some(false),
            force_refresh: false,
        }
    }

    /// Resolves whether caching applies to a request with the given options.
    pub fn caching_enabled(&self, request: &RequestOptions) -> bool {
        self.use_cache.unwrap_or_else(|| request.is_read())
    }
}

// == Api Response ==
/// A response received from the backend.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers as sent by the backend
    pub headers: HeaderMap,
    /// Raw response body
    pub body: Bytes,
}

impl ApiResponse {
    /// Creates a response with the given status and body and no headers.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Creates a JSON response.
    pub fn json_body(status: u16, value: &Value) -> Self {
        Self::new(status, value.to_string())
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }

    /// Adds or replaces a header.
    pub fn with_header(mut self, name: reqwest::header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Value of the Content-Type header, if present and readable.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body as JSON.
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

// == Call Result ==
/// Outcome of a cached call: either a stored payload or a live response.
#[derive(Debug, Clone)]
pub enum CallResult {
    /// Served from the cache without touching the network
    Cached { payload: Arc<Value> },
    /// Returned by the backend
    Live { response: ApiResponse },
}

impl CallResult {
    /// Cached results always count as successful.
    pub fn is_success(&self) -> bool {
        match self {
            CallResult::Cached { .. } => true,
            CallResult::Live { response } => response.is_success(),
        }
    }

    /// HTTP status; 200 for cached results.
    pub fn status(&self) -> u16 {
        match self {
            CallResult::Cached { .. } => 200,
            CallResult::Live { response } => response.status,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, CallResult::Cached { .. })
    }

    /// Decodes the payload as JSON.
    pub fn json(&self) -> Result<Value> {
        match self {
            CallResult::Cached { payload } => Ok(payload.as_ref().clone()),
            CallResult::Live { response } => response.json(),
        }
    }

    /// Returns the payload as text.
    pub fn text(&self) -> String {
        match self {
            CallResult::Cached { payload } => payload.to_string(),
            CallResult::Live { response } => response.text(),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_options_are_get() {
        let options = RequestOptions::default();
        assert_eq!(options.method, Method::GET);
        assert!(options.is_read());
        assert!(options.body.is_none());
    }

    #[test]
    fn test_json_options_serialize_body() {
        let options = RequestOptions::json(Method::POST, &json!({"FirmName": "Acme"}));
        assert!(!options.is_read());
        assert_eq!(options.body.as_deref(), Some(r#"{"FirmName":"Acme"}"#));
    }

    #[test]
    fn test_caching_defaults_follow_method() {
        let options = CacheOptions::default();
        assert!(options.caching_enabled(&RequestOptions::get()));
        assert!(!options.caching_enabled(&RequestOptions::with_method(Method::POST)));
    }

    #[test]
    fn test_caching_explicit_override() {
        let forced_on = CacheOptions {
            use_cache: Some(true),
            force_refresh: false,
        };
        assert!(forced_on.caching_enabled(&RequestOptions::with_method(Method::DELETE)));
        assert!(!CacheOptions::no_cache().caching_enabled(&RequestOptions::get()));
    }

    #[test]
    fn test_response_success_range() {
        assert!(ApiResponse::new(200, "").is_success());
        assert!(ApiResponse::new(204, "").is_success());
        assert!(!ApiResponse::new(199, "").is_success());
        assert!(!ApiResponse::new(404, "").is_success());
    }

    #[test]
    fn test_response_json_decode_failure() {
        let response = ApiResponse::new(200, "not json");
        assert!(response.json().is_err());
        assert_eq!(response.text(), "not json");
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let response = ApiResponse::json_body(201, &json!({"id": 1}));
        assert_eq!(response.content_type(), Some("application/json"));
        assert!(ApiResponse::new(200, "x").content_type().is_none());
    }

    #[test]
    fn test_cached_result_looks_successful() {
        let result = CallResult::Cached {
            payload: Arc::new(json!([{"FirmID": 1}])),
        };
        assert!(result.is_success());
        assert!(result.is_cached());
        assert_eq!(result.status(), 200);
        assert_eq!(result.json().unwrap(), json!([{"FirmID": 1}]));
        assert_eq!(result.text(), r#"[{"FirmID":1}]"#);
    }

    #[test]
    fn test_live_result_reports_status() {
        let result = CallResult::Live {
            response: ApiResponse::new(500, "boom"),
        };
        assert!(!result.is_success());
        assert!(!result.is_cached());
        assert_eq!(result.status(), 500);
    }
}
