//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing JSON response bodies. Cache hits are
//! returned as raw bytes and need no DTO.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::cluster::{ClusterStats, ShardId, ShardStats};

/// One entry of `GET /admin/shards`
#[derive(Debug, Clone, Serialize)]
pub struct ShardInfo {
    pub shard_id: ShardId,
    pub size: usize,
    pub capacity: usize,
    pub available: bool,
}

impl From<&ShardStats> for ShardInfo {
    fn from(shard: &ShardStats) -> Self {
        Self {
            shard_id: shard.shard_id.clone(),
            size: shard.stats.total_entries,
            capacity: shard.stats.capacity,
            available: shard.available,
        }
    }
}

/// Response body for `GET /admin/shards`
#[derive(Debug, Clone, Serialize)]
pub struct ShardListResponse {
    pub shards: Vec<ShardInfo>,
}

impl ShardListResponse {
    pub fn new(stats: &ClusterStats) -> Self {
        Self {
            shards: stats.shards.iter().map(ShardInfo::from).collect(),
        }
    }
}

/// Response body for `POST /admin/shards/:shard_id`
#[derive(Debug, Clone, Serialize)]
pub struct ShardAddedResponse {
    pub message: String,
    pub shard_id: ShardId,
}

impl ShardAddedResponse {
    pub fn new(shard_id: impl Into<ShardId>) -> Self {
        let shard_id = shard_id.into();
        Self {
            message: format!("Shard '{}' added", shard_id),
            shard_id,
        }
    }
}

/// Response body for `GET /admin/owner/:key`
#[derive(Debug, Clone, Serialize)]
pub struct OwnerResponse {
    pub key: String,
    pub shard_id: ShardId,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Hit rate over all shards (hits / (hits + misses))
    pub hit_rate: f64,
    /// Counters summed over all shards
    pub totals: CacheStats,
    /// Counters per shard
    pub shards: Vec<ShardStats>,
}

impl StatsResponse {
    pub fn new(stats: ClusterStats) -> Self {
        Self {
            hit_rate: stats.totals.hit_rate(),
            totals: stats.totals,
            shards: stats.shards,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Number of shards on the ring
    pub shards: usize,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(shards: usize) -> Self {
        Self {
            status: "healthy".to_string(),
            shards,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
