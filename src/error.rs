//! Error types for the cache
//!
//! Provides unified error handling using thiserror. A cache miss is never an
//! error; it is reported as `Ok(None)` by the coordinator.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache library and server.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Shard id is already part of the ring
    #[error("Shard already exists: {0}")]
    DuplicateShard(String),

    /// Shard id is not part of the ring
    #[error("Unknown shard: {0}")]
    UnknownShard(String),

    /// The ring has no shards, so no key can be routed
    #[error("No shards available")]
    NoShardsAvailable,

    /// The shard owning the key is marked as failed
    #[error("Shard unavailable: {0}")]
    ShardUnavailable(String),

    /// Key not found in cache (HTTP surface only)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration value could not be parsed or is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::UnknownShard(_) => StatusCode::NOT_FOUND,
            CacheError::DuplicateShard(_) => StatusCode::CONFLICT,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::NoShardsAvailable | CacheError::ShardUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            CacheError::InvalidConfig(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_errors_map_to_503() {
        assert_eq!(
            CacheError::NoShardsAvailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            CacheError::ShardUnavailable("s0".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_topology_misuse_status_codes() {
        assert_eq!(
            CacheError::DuplicateShard("s0".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            CacheError::UnknownShard("s9".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_error_display() {
        let err = CacheError::DuplicateShard("shard-1".to_string());
        assert_eq!(err.to_string(), "Shard already exists: shard-1");
        assert_eq!(CacheError::NoShardsAvailable.to_string(), "No shards available");
    }
}
