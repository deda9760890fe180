//! Error types for the caching subsystem
//!
//! Provides unified error handling using thiserror.
//!
//! Only a small set of failures is ever visible to callers: local-tier
//! validation errors on `set` and serialization failures at the value
//! boundary. Remote-tier failures are contained inside `RemoteCache` and
//! resolve to the operation's safe default. Factory failures in
//! `get_or_set` travel as `anyhow::Error`, unchanged.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the caching subsystem.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key exceeds the maximum allowed length
    #[error("Key exceeds maximum length of {limit} bytes: '{key}'")]
    KeyTooLong { key: String, limit: usize },

    /// Value exceeds the maximum allowed size
    #[error("Value for key '{key}' exceeds maximum size of {limit} bytes")]
    ValueTooLarge { key: String, limit: usize },

    /// Value could not be serialized or deserialized at the tier boundary
    #[error("Serialization failed for key '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Remote tier operation failed
    #[error("Remote cache error: {0}")]
    Remote(#[from] redis::RedisError),
}

// == Result Type Alias ==
/// Convenience Result type for the caching subsystem.
pub type Result<T> = std::result::Result<T, CacheError>;
