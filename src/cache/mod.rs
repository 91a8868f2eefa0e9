//! Cache Module
//!
//! Per-shard in-memory storage with TTL expiration and LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::ShardStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes accepted over HTTP
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
