//! Request and Response models for the cache server API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! query strings and JSON response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{InvalidateParams, PutParams};
pub use responses::{
    HealthResponse, OwnerResponse, ShardAddedResponse, ShardInfo, ShardListResponse,
    StatsResponse,
};
