//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `GET /cache/:key` - Retrieve a value (404 on miss)
//! - `PUT /cache/:key?ttl=` - Store a value
//! - `DELETE /cache/:key` - Delete a key
//! - `POST /admin/shards/:shard_id` - Add a shard
//! - `DELETE /admin/shards/:shard_id` - Remove a shard
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
