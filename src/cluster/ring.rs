//! Hash Ring Module
//!
//! Consistent hashing with virtual nodes. Each physical shard owns
//! `virtual_nodes_per_shard` positions on a 32-bit ring; a key belongs to the
//! first position at or after its own hash, wrapping around at the end.

use std::collections::BTreeSet;

use xxhash_rust::xxh32::xxh32;

use crate::error::{CacheError, Result};

/// Identifier of a physical shard.
pub type ShardId = String;

/// Fixed seed so ring positions are stable across restarts.
const RING_SEED: u32 = 0;

/// Default number of virtual nodes per shard.
pub const DEFAULT_VIRTUAL_NODES: usize = 150;

// == Hash Position ==
/// Maps an arbitrary string to a ring position.
pub fn hash_position(input: &str) -> u32 {
    xxh32(input.as_bytes(), RING_SEED)
}

// == Hash Ring ==
#[derive(Debug, Clone)]
pub struct HashRing {
    /// Sorted by position, ties broken by shard id
    vnodes: Vec<(u32, ShardId)>,
    /// Physical shards currently on the ring
    shards: BTreeSet<ShardId>,
    virtual_nodes_per_shard: usize,
}

impl HashRing {
    /// Creates an empty ring. A value of 0 is raised to 1 so that every
    /// added shard owns at least one position.
    pub fn new(virtual_nodes_per_shard: usize) -> Self {
        Self {
            vnodes: Vec::new(),
            shards: BTreeSet::new(),
            virtual_nodes_per_shard: virtual_nodes_per_shard.max(1),
        }
    }

    // == Add Shard ==
    /// Places the shard's virtual nodes at `hash("{shard_id}-{i}")`.
    pub fn add_shard(&mut self, shard_id: &str) -> Result<()> {
        if self.shards.contains(shard_id) {
            return Err(CacheError::DuplicateShard(shard_id.to_string()));
        }

        self.vnodes.reserve(self.virtual_nodes_per_shard);
        for i in 0..self.virtual_nodes_per_shard {
            let position = hash_position(&format!("{}-{}", shard_id, i));
            self.vnodes.push((position, shard_id.to_string()));
        }
        self.vnodes.sort_unstable();
        self.shards.insert(shard_id.to_string());

        Ok(())
    }

    // == Remove Shard ==
    /// Drops every virtual node belonging to the shard.
    pub fn remove_shard(&mut self, shard_id: &str) -> Result<()> {
        if !self.shards.remove(shard_id) {
            return Err(CacheError::UnknownShard(shard_id.to_string()));
        }
        self.vnodes.retain(|(_, owner)| owner != shard_id);
        Ok(())
    }

    // == Owner Of ==
    /// Returns the shard owning `key`.
    pub fn owner_of(&self, key: &str) -> Result<&ShardId> {
        let idx = self.index_for(key)?;
        Ok(&self.vnodes[idx].1)
    }

    // == Successors ==
    /// Distinct shards in ring order, starting with the owner of `key`.
    ///
    /// Used to pick a fail-over target when the owner is unavailable.
    pub fn successors(&self, key: &str) -> Result<Vec<&ShardId>> {
        let start = self.index_for(key)?;
        let mut seen: Vec<&ShardId> = Vec::with_capacity(self.shards.len());

        for offset in 0..self.vnodes.len() {
            let (_, owner) = &self.vnodes[(start + offset) % self.vnodes.len()];
            if !seen.contains(&owner) {
                seen.push(owner);
                if seen.len() == self.shards.len() {
                    break;
                }
            }
        }

        Ok(seen)
    }

    fn index_for(&self, key: &str) -> Result<usize> {
        if self.vnodes.is_empty() {
            return Err(CacheError::NoShardsAvailable);
        }

        let hash = hash_position(key);
        let idx = self.vnodes.partition_point(|(position, _)| *position < hash);
        Ok(if idx == self.vnodes.len() { 0 } else { idx })
    }

    pub fn contains(&self, shard_id: &str) -> bool {
        self.shards.contains(shard_id)
    }

    /// Shard ids in sorted order.
    pub fn shards(&self) -> impl Iterator<Item = &ShardId> {
        self.shards.iter()
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.vnodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vnodes.is_empty()
    }

    pub fn virtual_nodes_per_shard(&self) -> usize {
        self.virtual_nodes_per_shard
    }
}

impl Default for HashRing {
    fn default() -> Self {
        Self::new(DEFAULT_VIRTUAL_NODES)
    }
}
