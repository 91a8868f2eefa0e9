//! Invalidation Event Module

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::KeyPattern;
use crate::cluster::ShardId;
use crate::error::Result;

/// What an invalidation removes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum InvalidationTarget {
    /// A single key, deleted or overwritten
    Key(String),
    /// Every key matching a glob (`*` wildcards)
    Pattern(KeyPattern),
}

// == Invalidation Event ==
/// An explicit invalidation fanned out over the bus. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidationEvent {
    pub target: InvalidationTarget,
    /// Shard that already applied the change, if any
    pub origin_shard: Option<ShardId>,
    pub timestamp: DateTime<Utc>,
}

impl InvalidationEvent {
    /// Event for one key whose current value lives on `origin_shard`.
    pub fn key(key: impl Into<String>, origin_shard: impl Into<ShardId>) -> Self {
        Self {
            target: InvalidationTarget::Key(key.into()),
            origin_shard: Some(origin_shard.into()),
            timestamp: Utc::now(),
        }
    }

    /// Event for every key matching `glob` on every shard.
    pub fn pattern(glob: &str) -> Result<Self> {
        Ok(Self {
            target: InvalidationTarget::Pattern(KeyPattern::new(glob)?),
            origin_shard: None,
            timestamp: Utc::now(),
        })
    }

    /// True if `shard_id` produced this event.
    pub fn is_from(&self, shard_id: &str) -> bool {
        self.origin_shard.as_deref() == Some(shard_id)
    }
}
