//! Request DTOs for the cache admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use reqwest::Method;
use serde::Deserialize;

use crate::client::PrefetchRequest;
use crate::request::RequestOptions;

/// An endpoint plus the request options that identify its cache entry.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointTarget {
    /// API endpoint, with or without the `/api` prefix
    pub endpoint: String,
    /// HTTP method (default: GET)
    #[serde(default)]
    pub method: Option<String>,
    /// Serialized request body
    #[serde(default)]
    pub body: Option<String>,
}

impl EndpointTarget {
    /// Converts to request options, rejecting malformed methods.
    pub fn options(&self) -> Result<RequestOptions, String> {
        let method = match &self.method {
            Some(m) => Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                .map_err(|_| format!("Invalid method: {}", m))?,
            None => Method::GET,
        };
        Ok(RequestOptions {
            method,
            headers: Vec::new(),
            body: self.body.clone(),
        })
    }
}

/// Request body for POST /cache/invalidate
///
/// Either `pattern` (substring invalidation) or `endpoint` (exact key) must
/// be given, not both. `method` and `body` refine an endpoint target.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvalidateRequest {
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl InvalidateRequest {
    /// The exact-key target, if an endpoint was given.
    pub fn target(&self) -> Option<EndpointTarget> {
        self.endpoint.as_ref().map(|endpoint| EndpointTarget {
            endpoint: endpoint.clone(),
            method: self.method.clone(),
            body: self.body.clone(),
        })
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        match (&self.pattern, self.target()) {
            (Some(_), Some(_)) => Some("Provide either pattern or endpoint, not both".to_string()),
            (None, None) => Some("Provide a pattern or an endpoint".to_string()),
            (Some(pattern), None) if pattern.is_empty() => {
                Some("Pattern cannot be empty".to_string())
            }
            (None, Some(target)) if target.endpoint.is_empty() => {
                Some("Endpoint cannot be empty".to_string())
            }
            (None, Some(target)) => target.options().err(),
            _ => None,
        }
    }
}

/// Request body for POST /cache/prefetch
#[derive(Debug, Clone, Deserialize)]
pub struct PrefetchBatchRequest {
    pub endpoints: Vec<EndpointTarget>,
}

impl PrefetchBatchRequest {
    /// Converts every entry to a prefetch request.
    pub fn into_requests(self) -> Result<Vec<PrefetchRequest>, String> {
        self.endpoints
            .into_iter()
            .map(|target| {
                let options = target.options()?;
                Ok(PrefetchRequest {
                    endpoint: target.endpoint,
                    options,
                })
            })
            .collect()
    }
}
