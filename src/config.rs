//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.
//!
//! Configuration is read once at process start and fixed for the process
//! lifetime; there is no hot-reload path.

use std::env;

/// Cache subsystem configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Master switch for the whole subsystem; when false every operation
    /// degrades to the direct factory path and nothing is ever cached
    pub enabled: bool,
    /// Maximum number of entries the local tier can hold
    pub max_entries: usize,
    /// Default TTL in seconds when no policy-table TTL applies
    pub default_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Remote tier configuration
    pub remote: RemoteConfig,
}

/// Remote tier connection parameters.
///
/// The remote tier is optional: with `enabled` false or `url` absent the
/// subsystem runs in permanent local-only mode.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Enable flag for the remote tier
    pub enabled: bool,
    /// Endpoint URL of the remote store (e.g. "redis://127.0.0.1:6379")
    pub url: Option<String>,
    /// Access token spliced into the connection URL when set
    pub token: Option<String>,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_ENABLED` - Master switch for the subsystem (default: true)
    /// - `CACHE_MAX_ENTRIES` - Maximum local entries (default: 1000)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `CACHE_CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `REMOTE_CACHE_ENABLED` - Enable flag for the remote tier (default: false)
    /// - `REMOTE_CACHE_URL` - Remote store endpoint URL (no default)
    /// - `REMOTE_CACHE_TOKEN` - Remote store access token (no default)
    pub fn from_env() -> Self {
        Self {
            enabled: env::var("CACHE_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            default_ttl: env::var("CACHE_DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            cleanup_interval: env::var("CACHE_CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            remote: RemoteConfig::from_env(),
        }
    }
}

impl RemoteConfig {
    /// Creates a new RemoteConfig by loading values from environment variables.
    pub fn from_env() -> Self {
        Self {
            enabled: env::var("REMOTE_CACHE_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            url: env::var("REMOTE_CACHE_URL").ok().filter(|v| !v.is_empty()),
            token: env::var("REMOTE_CACHE_TOKEN")
                .ok()
                .filter(|v| !v.is_empty()),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1000,
            default_ttl: 300,
            cleanup_interval: 60,
            remote: RemoteConfig::default(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: None,
            token: None,
        }
    }
}
