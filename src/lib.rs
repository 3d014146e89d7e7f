//! Dashboard Cache - response caching for the dashboard REST API
//!
//! Read requests are memoized with per-endpoint TTLs; successful writes
//! invalidate the dependent resource families and publish mutation events.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod request;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStore, TtlConfig};
pub use client::{ApiClient, CachedClient, HttpApiClient, PrefetchRequest};
pub use config::Config;
pub use error::{Error, Result};
pub use events::{EventBus, EventKind};
pub use request::{ApiResponse, CacheOptions, CallResult, RequestOptions};
pub use tasks::spawn_cleanup_task;
