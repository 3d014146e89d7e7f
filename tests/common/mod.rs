//! Shared test doubles for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashboard_cache::{ApiClient, ApiResponse, Error, RequestOptions, Result};
use reqwest::Method;
use serde_json::json;

type Responder = dyn Fn(&str, &RequestOptions, usize) -> Result<ApiResponse> + Send + Sync;

/// Counting [`ApiClient`] that answers from a closure.
///
/// The closure receives the endpoint, options and the 1-based call number.
pub struct MockApi {
    calls: AtomicUsize,
    log: Mutex<Vec<(Method, String)>>,
    responder: Box<Responder>,
}

impl MockApi {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&str, &RequestOptions, usize) -> Result<ApiResponse> + Send + Sync + 'static,
    {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            log: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        })
    }

    /// Backend that answers GETs with a JSON body tagged by call number,
    /// POST with 201, other writes with 200, and `/fail` paths with 500.
    pub fn backend() -> Arc<Self> {
        Self::new(|endpoint, options, call| {
            if endpoint.contains("/fail") {
                return Ok(ApiResponse::json_body(500, &json!({"message": "boom"})));
            }
            if options.method == Method::GET {
                Ok(ApiResponse::json_body(
                    200,
                    &json!([{"endpoint": endpoint, "call": call}]),
                ))
            } else if options.method == Method::POST {
                Ok(ApiResponse::json_body(201, &json!({"id": call})))
            } else {
                Ok(ApiResponse::json_body(200, &json!({"ok": true})))
            }
        })
    }

    /// Backend that rejects every call as unauthorized.
    pub fn unauthorized() -> Arc<Self> {
        Self::new(|_, _, _| Err(Error::Unauthorized))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of calls made for a method and endpoint.
    pub fn calls_to(&self, method: Method, endpoint: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, e)| *m == method && e == endpoint)
            .count()
    }
}

#[async_trait]
impl ApiClient for MockApi {
    async fn call(&self, endpoint: &str, options: &RequestOptions) -> Result<ApiResponse> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.log
            .lock()
            .unwrap()
            .push((options.method.clone(), endpoint.to_string()));
        (self.responder)(endpoint, options, call)
    }
}
