//! Authenticated HTTP client for the dashboard REST API.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::cache::normalize_endpoint;
use crate::error::{Error, Result};
use crate::request::{ApiResponse, RequestOptions};

/// Network collaborator used by the cached client.
///
/// Implementations attach credentials and report the backend's response
/// as-is; non-2xx statuses are responses, not errors.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn call(&self, endpoint: &str, options: &RequestOptions) -> Result<ApiResponse>;
}

/// `reqwest`-backed [`ApiClient`] with bearer-token authentication.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: Client,
    /// Scheme and host, without the `/api` suffix
    origin: String,
    token: Option<String>,
}

impl HttpApiClient {
    /// Creates a client for an API base URL such as `http://localhost:3000/api`.
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            origin: origin_of(base_url),
            token,
        }
    }

    /// Full URL for an endpoint.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.origin, normalize_endpoint(endpoint))
    }

    fn headers_for(&self, options: &RequestOptions) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::InvalidRequest(format!("header name {}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::InvalidRequest(format!("header {}: {}", name, e)))?;
            headers.insert(name, value);
        }

        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| Error::InvalidRequest(format!("token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn call(&self, endpoint: &str, options: &RequestOptions) -> Result<ApiResponse> {
        let url = self.url_for(endpoint);
        debug!(method = %options.method, %url, "api call");

        let mut request = self
            .client
            .request(options.method.clone(), &url)
            .headers(self.headers_for(options)?);
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        let response = request.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(%url, "unauthorized response from backend");
            return Err(Error::Unauthorized);
        }

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

/// Strips a trailing `/api` (and slash) from a base URL.
fn origin_of(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    trimmed.strip_suffix("/api").unwrap_or(trimmed).to_string()
}
