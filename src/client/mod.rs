//! Client Module
//!
//! The authenticated network call and the caching wrapper around it.
//!
//! # Components
//! - `ApiClient` / `HttpApiClient`: bearer-token REST calls via reqwest
//! - `CachedClient`: read-through caching, write invalidation, prefetching
//! - `Resource`: resource families and their invalidation cascade

mod cached;
mod http;
mod resource;

pub use cached::{CachedClient, PrefetchRequest};
pub use http::{ApiClient, HttpApiClient};
pub use resource::{resource_segment, Resource};
