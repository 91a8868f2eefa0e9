//! Shardcache - An in-memory cache sharded over a consistent hash ring
//!
//! Keys are routed to shards through a hash ring with virtual nodes. Each
//! shard is a bounded store with TTL expiration and LRU eviction, and
//! explicit invalidations fan out over an in-process bus.

pub mod api;
pub mod cache;
pub mod cluster;
pub mod config;
pub mod error;
pub mod invalidation;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::ShardStore;
pub use cluster::{CacheCoordinator, CoordinatorConfig, FailoverPolicy, HashRing};
pub use config::Config;
pub use error::{CacheError, Result};
pub use invalidation::{InvalidationBus, InvalidationEvent};
pub use tasks::spawn_sweep_task;
