//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::cache::{TtlConfig, DEFAULT_TTL_MS};

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the proxy binds to
    pub bind_address: IpAddr,
    /// HTTP port the proxy listens on
    pub server_port: u16,
    /// Backend API base URL, including its `/api` suffix
    pub api_base_url: String,
    /// Bearer token attached to every backend call
    pub api_token: Option<String>,
    /// TTL in milliseconds for endpoints without a configured prefix
    pub default_ttl_ms: u64,
    /// Expired-entry sweep interval in seconds
    pub cleanup_interval: u64,
    /// JSON file backing the persistent tier
    pub cache_file: PathBuf,
    /// Whether the persistent tier starts enabled
    pub use_persistent: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `BIND_ADDRESS` - Listen address (default: 127.0.0.1)
    /// - `SERVER_PORT` - Proxy port (default: 8080)
    /// - `API_BASE_URL` - Backend base URL (default: http://localhost:3000/api)
    /// - `API_TOKEN` - Bearer token (default: unset)
    /// - `DEFAULT_TTL_MS` - Fallback TTL in milliseconds (default: 300000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 300)
    /// - `CACHE_FILE` - Persistent tier file (default: dashboard_cache.json)
    /// - `USE_PERSISTENT_CACHE` - `true`/`1` enables the persistent tier (default: off)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: env::var("BIND_ADDRESS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.bind_address),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            api_base_url: env::var("API_BASE_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_base_url),
            api_token: env::var("API_TOKEN").ok().filter(|v| !v.is_empty()),
            default_ttl_ms: env::var("DEFAULT_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_ttl_ms),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cleanup_interval),
            cache_file: env::var("CACHE_FILE")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_file),
            use_persistent: env::var("USE_PERSISTENT_CACHE")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.use_persistent),
        }
    }

    /// Policy for the cache store: the built-in endpoint table with the
    /// configured fallback TTL and tier switches.
    pub fn ttl_config(&self) -> TtlConfig {
        TtlConfig {
            use_persistent: self.use_persistent,
            ..TtlConfig::with_default_ttl(self.default_ttl_ms)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            server_port: 8080,
            api_base_url: "http://localhost:3000/api".to_string(),
            api_token: None,
            default_ttl_ms: DEFAULT_TTL_MS,
            cleanup_interval: 300,
            cache_file: PathBuf::from("dashboard_cache.json"),
            use_persistent: false,
        }
    }
}
