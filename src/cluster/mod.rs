//! Cluster Module
//!
//! Consistent-hash routing of keys onto shards and the coordinator that
//! owns the shards.

mod coordinator;
mod ring;

pub use coordinator::{
    validate_key, CacheCoordinator, ClusterStats, CoordinatorConfig, FailoverPolicy, ShardStats,
};
pub use ring::{hash_position, HashRing, ShardId, DEFAULT_VIRTUAL_NODES};
