//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::cache::{ShardStore, MAX_VALUE_SIZE};
use crate::cluster::CacheCoordinator;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    HealthResponse, InvalidateParams, OwnerResponse, PutParams, ShardAddedResponse,
    ShardListResponse, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Coordinator routing every request to its shard
    pub cache: Arc<CacheCoordinator<Bytes>>,
    /// Capacity given to shards added through the admin API
    pub capacity_per_shard: usize,
}

impl AppState {
    /// Creates a new AppState around an existing coordinator.
    pub fn new(cache: CacheCoordinator<Bytes>, capacity_per_shard: usize) -> Self {
        Self {
            cache: Arc::new(cache),
            capacity_per_shard,
        }
    }

    /// Creates a new AppState from configuration, including the initial
    /// shards.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = CacheCoordinator::from_config(config)?;
        Ok(Self::new(cache, config.capacity_per_shard))
    }
}

/// Handler for GET /cache/:key
///
/// Returns the raw value, or 404 on a miss.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    match state.cache.get(&key)? {
        Some(value) => {
            Ok(([(header::CONTENT_TYPE, "application/octet-stream")], value).into_response())
        }
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for PUT /cache/:key?ttl=<seconds>
///
/// Stores the request body under `key`.
pub async fn put_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<PutParams>,
    body: Bytes,
) -> Result<StatusCode> {
    let ttl = params.ttl()?;
    if body.len() > MAX_VALUE_SIZE {
        return Err(CacheError::InvalidRequest(format!(
            "Value exceeds maximum size of {} bytes",
            MAX_VALUE_SIZE
        )));
    }

    state.cache.set(&key, body, ttl)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /cache/:key
///
/// Always 204, whether or not the key existed.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode> {
    state.cache.delete(&key)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST /admin/shards/:shard_id
pub async fn add_shard_handler(
    State(state): State<AppState>,
    Path(shard_id): Path<String>,
) -> Result<(StatusCode, Json<ShardAddedResponse>)> {
    state
        .cache
        .add_shard(shard_id.clone(), ShardStore::new(state.capacity_per_shard))?;
    Ok((StatusCode::CREATED, Json(ShardAddedResponse::new(shard_id))))
}

/// Handler for DELETE /admin/shards/:shard_id
pub async fn remove_shard_handler(
    State(state): State<AppState>,
    Path(shard_id): Path<String>,
) -> Result<StatusCode> {
    state.cache.remove_shard(&shard_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /admin/shards
pub async fn list_shards_handler(State(state): State<AppState>) -> Json<ShardListResponse> {
    Json(ShardListResponse::new(&state.cache.stats()))
}

/// Handler for GET /admin/owner/:key
pub async fn owner_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<OwnerResponse>> {
    let shard_id = state.cache.owner_of(&key)?;
    Ok(Json(OwnerResponse { key, shard_id }))
}

/// Handler for POST /admin/invalidate?pattern=<glob>
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Query(params): Query<InvalidateParams>,
) -> Result<StatusCode> {
    state.cache.invalidate_pattern(params.pattern()?)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(state.cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.shard_ids().len()))
}
