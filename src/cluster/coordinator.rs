//! Cache Coordinator Module
//!
//! Public entry point of the cache. Routes every operation to the shard that
//! owns the key on the hash ring and manages topology changes.
//!
//! The ring and the shard table live together in an immutable topology
//! snapshot. Readers clone the `Arc` under a short read lock and route
//! against that snapshot; topology changes build a new snapshot and swap it
//! in. Shard data is only ever touched through the shard's own lock.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, ShardStore, MAX_KEY_LENGTH};
use crate::cluster::ring::{HashRing, ShardId, DEFAULT_VIRTUAL_NODES};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::invalidation::{InvalidationBus, InvalidationEvent, InvalidationTarget, SubscriptionId};

// == Failover Policy ==
/// What the coordinator does when the owning shard is unavailable.
///
/// The policy is fixed per coordinator, never chosen per call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailoverPolicy {
    /// Surface `ShardUnavailable` to the caller
    #[default]
    FailFast,
    /// Walk the ring to the next available shard
    NextNeighbor,
}

impl FromStr for FailoverPolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-fast" | "failfast" => Ok(FailoverPolicy::FailFast),
            "next-neighbor" | "nextneighbor" => Ok(FailoverPolicy::NextNeighbor),
            other => Err(CacheError::InvalidConfig(format!(
                "unknown failover policy '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for FailoverPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailoverPolicy::FailFast => f.write_str("fail-fast"),
            FailoverPolicy::NextNeighbor => f.write_str("next-neighbor"),
        }
    }
}

// == Coordinator Config ==
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub virtual_nodes_per_shard: usize,
    /// Applied to `set` calls that pass no TTL
    pub default_ttl: Option<Duration>,
    pub failover: FailoverPolicy,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            virtual_nodes_per_shard: DEFAULT_VIRTUAL_NODES,
            default_ttl: None,
            failover: FailoverPolicy::FailFast,
        }
    }
}

impl From<&Config> for CoordinatorConfig {
    fn from(config: &Config) -> Self {
        Self {
            virtual_nodes_per_shard: config.virtual_nodes_per_shard,
            default_ttl: config.default_ttl_seconds.map(Duration::from_secs),
            failover: config.failover_policy,
        }
    }
}

// == Shard ==
/// One physical shard: its store behind an exclusive lock plus a simulated
/// availability flag.
#[derive(Debug)]
struct Shard<V> {
    id: ShardId,
    store: Mutex<ShardStore<V>>,
    available: AtomicBool,
}

impl<V: Clone> Shard<V> {
    fn new(id: ShardId, store: ShardStore<V>) -> Self {
        Self {
            id,
            store: Mutex::new(store),
            available: AtomicBool::new(true),
        }
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    fn apply_invalidation(&self, event: &InvalidationEvent) {
        match &event.target {
            InvalidationTarget::Key(key) => {
                if !event.is_from(&self.id) {
                    self.store.lock().delete(key);
                }
            }
            InvalidationTarget::Pattern(pattern) => {
                let removed = self.store.lock().invalidate_matching(pattern.regex());
                if removed > 0 {
                    debug!(shard = %self.id, pattern = %pattern, removed, "pattern invalidated");
                }
            }
        }
    }
}

struct ShardSlot<V> {
    shard: Arc<Shard<V>>,
    subscription: SubscriptionId,
}

impl<V> Clone for ShardSlot<V> {
    fn clone(&self) -> Self {
        Self {
            shard: Arc::clone(&self.shard),
            subscription: self.subscription,
        }
    }
}

struct Topology<V> {
    ring: HashRing,
    shards: HashMap<ShardId, ShardSlot<V>>,
}

impl<V> Clone for Topology<V> {
    fn clone(&self) -> Self {
        Self {
            ring: self.ring.clone(),
            shards: self.shards.clone(),
        }
    }
}

impl<V> Topology<V> {
    fn shard(&self, id: &str) -> Result<&Arc<Shard<V>>> {
        self.shards
            .get(id)
            .map(|slot| &slot.shard)
            .ok_or_else(|| CacheError::Internal(format!("ring references missing shard {}", id)))
    }
}

// == Stats ==
#[derive(Debug, Clone, Serialize)]
pub struct ShardStats {
    pub shard_id: ShardId,
    pub available: bool,
    #[serde(flatten)]
    pub stats: CacheStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterStats {
    /// Per shard, sorted by shard id
    pub shards: Vec<ShardStats>,
    /// Sum over all shards
    pub totals: CacheStats,
}

// == Cache Coordinator ==
pub struct CacheCoordinator<V> {
    topology: RwLock<Arc<Topology<V>>>,
    bus: Arc<InvalidationBus>,
    config: CoordinatorConfig,
}

impl<V> CacheCoordinator<V>
where
    V: Clone + Send + 'static,
{
    /// Creates a coordinator with an empty ring.
    pub fn new(config: CoordinatorConfig) -> Self {
        Self {
            topology: RwLock::new(Arc::new(Topology {
                ring: HashRing::new(config.virtual_nodes_per_shard),
                shards: HashMap::new(),
            })),
            bus: Arc::new(InvalidationBus::new()),
            config,
        }
    }

    /// Creates a coordinator with the configured initial shards, each
    /// holding `capacity_per_shard` entries.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let coordinator = Self::new(CoordinatorConfig::from(config));
        for shard_id in &config.shards {
            coordinator.add_shard(shard_id.clone(), ShardStore::new(config.capacity_per_shard))?;
        }
        Ok(coordinator)
    }

    // == Get ==
    /// Returns the cached value, or `None` on a miss.
    pub fn get(&self, key: &str) -> Result<Option<V>> {
        let shard = self.route(key)?;
        let value = shard.store.lock().get(key);
        Ok(value)
    }

    // == Set ==
    /// Stores a value on the serving shard. `ttl` of `None` falls back to the
    /// configured default TTL.
    ///
    /// The update is then published so any other shard still holding the key
    /// (e.g. a fail-over neighbour written during an outage) drops its copy.
    pub fn set(&self, key: &str, value: V, ttl: Option<Duration>) -> Result<()> {
        let shard = self.route(key)?;
        let ttl = ttl.or(self.config.default_ttl);
        shard.store.lock().set(key, value, ttl);
        self.bus.publish(&InvalidationEvent::key(key, shard.id.clone()));
        Ok(())
    }

    // == Delete ==
    /// Removes the key from its owner, then publishes the invalidation so
    /// every other subscriber drops it too. Returns whether the owner held it.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let shard = self.route(key)?;
        let existed = shard.store.lock().delete(key);
        self.bus.publish(&InvalidationEvent::key(key, shard.id.clone()));
        Ok(existed)
    }

    // == Invalidate Pattern ==
    /// Publishes a pattern invalidation; every subscribed shard drops the
    /// matching keys. Returns the number of subscribers notified.
    ///
    /// The glob is compiled once here; an empty or invalid pattern is an
    /// `InvalidRequest`.
    pub fn invalidate_pattern(&self, glob: &str) -> Result<usize> {
        let event = InvalidationEvent::pattern(glob)?;
        Ok(self.bus.publish(&event))
    }

    // == Add Shard ==
    /// Adds a shard to the ring and subscribes it to the invalidation bus.
    ///
    /// Keys that now hash to the new shard start cold; nothing is migrated.
    pub fn add_shard(&self, shard_id: impl Into<ShardId>, store: ShardStore<V>) -> Result<()> {
        let shard_id = shard_id.into();
        let mut topology = self.topology.write();

        let mut next = Topology::clone(&topology);
        next.ring.add_shard(&shard_id)?;

        let shard = Arc::new(Shard::new(shard_id.clone(), store));
        let handler_shard = Arc::clone(&shard);
        let subscription = self
            .bus
            .subscribe(move |event| handler_shard.apply_invalidation(event));

        next.shards
            .insert(shard_id.clone(), ShardSlot { shard, subscription });
        *topology = Arc::new(next);

        info!(shard = %shard_id, shards = topology.ring.shard_count(), "shard added");
        Ok(())
    }

    // == Remove Shard ==
    /// Removes a shard from the ring. Its entries are dropped; keys it owned
    /// resolve to their new ring neighbour and miss until re-populated.
    pub fn remove_shard(&self, shard_id: &str) -> Result<()> {
        let mut topology = self.topology.write();

        let mut next = Topology::clone(&topology);
        next.ring.remove_shard(shard_id)?;
        let slot = next
            .shards
            .remove(shard_id)
            .ok_or_else(|| CacheError::UnknownShard(shard_id.to_string()))?;
        *topology = Arc::new(next);
        drop(topology);

        self.bus.unsubscribe(slot.subscription);
        let dropped = slot.shard.store.lock().len();
        info!(shard = %shard_id, dropped_entries = dropped, "shard removed");
        Ok(())
    }

    // == Availability ==
    /// Marks a shard as failed or recovered (simulated failure).
    pub fn set_shard_available(&self, shard_id: &str, available: bool) -> Result<()> {
        let topology = self.snapshot();
        let slot = topology
            .shards
            .get(shard_id)
            .ok_or_else(|| CacheError::UnknownShard(shard_id.to_string()))?;
        slot.shard.available.store(available, Ordering::Release);

        if available {
            info!(shard = %shard_id, "shard marked available");
        } else {
            warn!(shard = %shard_id, "shard marked unavailable");
        }
        Ok(())
    }

    /// Shard that owns `key` on the current ring, ignoring availability.
    pub fn owner_of(&self, key: &str) -> Result<ShardId> {
        self.snapshot().ring.owner_of(key).cloned()
    }

    /// Shard ids in sorted order.
    pub fn shard_ids(&self) -> Vec<ShardId> {
        self.snapshot().ring.shards().cloned().collect()
    }

    // == Sweep ==
    /// Drops expired entries on every shard. Returns the total removed.
    pub fn sweep_expired(&self) -> usize {
        let topology = self.snapshot();
        topology
            .shards
            .values()
            .map(|slot| slot.shard.store.lock().cleanup_expired())
            .sum()
    }

    // == Stats ==
    pub fn stats(&self) -> ClusterStats {
        let topology = self.snapshot();
        let mut shards: Vec<ShardStats> = topology
            .shards
            .values()
            .map(|slot| ShardStats {
                shard_id: slot.shard.id.clone(),
                available: slot.shard.is_available(),
                stats: slot.shard.store.lock().stats(),
            })
            .collect();
        shards.sort_by(|a, b| a.shard_id.cmp(&b.shard_id));

        let mut totals = CacheStats::default();
        for shard in &shards {
            totals.merge(&shard.stats);
        }

        ClusterStats { shards, totals }
    }

    /// The bus that carries invalidations; replicas subscribe here.
    pub fn bus(&self) -> &InvalidationBus {
        &self.bus
    }

    fn snapshot(&self) -> Arc<Topology<V>> {
        self.topology.read().clone()
    }

    // == Route ==
    fn route(&self, key: &str) -> Result<Arc<Shard<V>>> {
        validate_key(key)?;

        let topology = self.snapshot();
        let owner_id = topology.ring.owner_of(key)?;
        let owner = topology.shard(owner_id)?;
        if owner.is_available() {
            return Ok(Arc::clone(owner));
        }

        match self.config.failover {
            FailoverPolicy::FailFast => {
                warn!(shard = %owner_id, key = %key, "owning shard unavailable");
                Err(CacheError::ShardUnavailable(owner_id.clone()))
            }
            FailoverPolicy::NextNeighbor => {
                for candidate in topology.ring.successors(key)?.into_iter().skip(1) {
                    let shard = topology.shard(candidate)?;
                    if shard.is_available() {
                        debug!(from = %owner_id, to = %candidate, key = %key, "failing over");
                        return Ok(Arc::clone(shard));
                    }
                }
                warn!(key = %key, "no available shard on the ring");
                Err(CacheError::ShardUnavailable(owner_id.clone()))
            }
        }
    }
}

impl<V> fmt::Debug for CacheCoordinator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let topology = self.topology.read();
        f.debug_struct("CacheCoordinator")
            .field("shards", &topology.ring.shard_count())
            .field("virtual_nodes", &topology.ring.len())
            .field("failover", &self.config.failover)
            .finish()
    }
}

/// Rejects empty keys and keys longer than `MAX_KEY_LENGTH` bytes.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn coordinator(shards: &[&str], capacity: usize) -> CacheCoordinator<String> {
        coordinator_with(shards, capacity, CoordinatorConfig::default())
    }

    fn coordinator_with(
        shards: &[&str],
        capacity: usize,
        config: CoordinatorConfig,
    ) -> CacheCoordinator<String> {
        let coordinator = CacheCoordinator::new(config);
        for shard in shards {
            coordinator.add_shard(*shard, ShardStore::new(capacity)).unwrap();
        }
        coordinator
    }

    #[test]
    fn test_set_get_delete_round_trip() {
        let cache = coordinator(&["s0", "s1", "s2"], 100);

        cache.set("user:42", "alice".to_string(), None).unwrap();
        assert_eq!(cache.get("user:42").unwrap(), Some("alice".to_string()));

        assert!(cache.delete("user:42").unwrap());
        assert!(!cache.delete("user:42").unwrap());
        assert_eq!(cache.get("user:42").unwrap(), None);
    }

    #[test]
    fn test_entries_land_on_owning_shard() {
        let cache = coordinator(&["s0", "s1", "s2"], 100);
        for i in 0..50 {
            cache.set(&format!("k{}", i), i.to_string(), None).unwrap();
        }

        let stats = cache.stats();
        assert_eq!(stats.totals.total_entries, 50);
        for shard in &stats.shards {
            let topology = cache.snapshot();
            let store = topology.shards[&shard.shard_id].shard.store.lock();
            for key in store.keys_by_recency() {
                assert_eq!(cache.owner_of(&key).unwrap(), shard.shard_id);
            }
        }
    }

    #[test]
    fn test_empty_ring_errors() {
        let cache: CacheCoordinator<String> = CacheCoordinator::new(CoordinatorConfig::default());

        assert_eq!(cache.get("k"), Err(CacheError::NoShardsAvailable));
        assert_eq!(
            cache.set("k", "v".to_string(), None),
            Err(CacheError::NoShardsAvailable)
        );
        assert_eq!(cache.delete("k"), Err(CacheError::NoShardsAvailable));
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let cache = coordinator(&["s0"], 10);
        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);

        assert!(matches!(cache.get(""), Err(CacheError::InvalidRequest(_))));
        assert!(matches!(
            cache.set(&long_key, "v".to_string(), None),
            Err(CacheError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_topology_misuse() {
        let cache = coordinator(&["s0"], 10);

        assert_eq!(
            cache.add_shard("s0", ShardStore::new(10)),
            Err(CacheError::DuplicateShard("s0".to_string()))
        );
        assert_eq!(
            cache.remove_shard("nope"),
            Err(CacheError::UnknownShard("nope".to_string()))
        );
        assert_eq!(cache.shard_ids(), vec!["s0".to_string()]);
        assert_eq!(cache.bus().subscriber_count(), 1);
    }

    #[test]
    fn test_remove_shard_gives_cold_misses_only_for_its_keys() {
        let cache = coordinator(&["s0", "s1", "s2", "s3"], 10_000);
        let keys: Vec<String> = (0..400).map(|i| format!("key-{}", i)).collect();
        for key in &keys {
            cache.set(key, key.clone(), None).unwrap();
        }
        let owners: HashMap<String, ShardId> = keys
            .iter()
            .map(|k| (k.clone(), cache.owner_of(k).unwrap()))
            .collect();

        cache.remove_shard("s2").unwrap();
        assert_eq!(cache.bus().subscriber_count(), 3);

        for key in &keys {
            let value = cache.get(key).unwrap();
            if owners[key] == "s2" {
                assert_eq!(value, None, "remapped key {} should be a cold miss", key);
                assert_ne!(cache.owner_of(key).unwrap(), "s2");
            } else {
                assert_eq!(value.as_deref(), Some(key.as_str()));
                assert_eq!(cache.owner_of(key).unwrap(), owners[key]);
            }
        }
    }

    #[test]
    fn test_default_ttl_applies_when_none_given() {
        let config = CoordinatorConfig {
            default_ttl: Some(Duration::from_millis(30)),
            ..CoordinatorConfig::default()
        };
        let cache = coordinator_with(&["s0"], 10, config);

        cache.set("short", "v".to_string(), None).unwrap();
        cache
            .set("long", "v".to_string(), Some(Duration::from_secs(60)))
            .unwrap();
        thread::sleep(Duration::from_millis(60));

        assert_eq!(cache.get("short").unwrap(), None);
        assert!(cache.get("long").unwrap().is_some());
    }

    #[test]
    fn test_sweep_expired_covers_all_shards() {
        let cache = coordinator(&["s0", "s1", "s2"], 100);
        for i in 0..30 {
            cache
                .set(&format!("k{}", i), "v".to_string(), Some(Duration::from_millis(20)))
                .unwrap();
        }
        cache.set("keep", "v".to_string(), None).unwrap();
        thread::sleep(Duration::from_millis(50));

        assert_eq!(cache.sweep_expired(), 30);
        assert_eq!(cache.stats().totals.total_entries, 1);
    }

    #[test]
    fn test_fail_fast_policy() {
        let cache = coordinator(&["s0", "s1"], 10);
        let owner = cache.owner_of("user:42").unwrap();

        cache.set_shard_available(&owner, false).unwrap();
        assert_eq!(
            cache.get("user:42"),
            Err(CacheError::ShardUnavailable(owner.clone()))
        );

        cache.set_shard_available(&owner, true).unwrap();
        assert_eq!(cache.get("user:42").unwrap(), None);
    }

    #[test]
    fn test_next_neighbor_policy() {
        let config = CoordinatorConfig {
            failover: FailoverPolicy::NextNeighbor,
            ..CoordinatorConfig::default()
        };
        let cache = coordinator_with(&["s0", "s1", "s2"], 10, config);
        let owner = cache.owner_of("user:42").unwrap();

        cache.set_shard_available(&owner, false).unwrap();
        cache.set("user:42", "v".to_string(), None).unwrap();
        assert_eq!(cache.get("user:42").unwrap(), Some("v".to_string()));

        for id in cache.shard_ids() {
            cache.set_shard_available(&id, false).unwrap();
        }
        assert_eq!(
            cache.get("user:42"),
            Err(CacheError::ShardUnavailable(owner))
        );
    }

    #[test]
    fn test_set_shard_available_unknown() {
        let cache = coordinator(&["s0"], 10);
        assert_eq!(
            cache.set_shard_available("s9", false),
            Err(CacheError::UnknownShard("s9".to_string()))
        );
    }

    #[test]
    fn test_delete_publishes_invalidation() {
        let cache = coordinator(&["s0", "s1"], 10);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        cache.bus().subscribe(move |event| sink.lock().push(event.clone()));

        cache.delete("missing").unwrap();

        let events = seen.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].target, InvalidationTarget::Key("missing".to_string()));
        assert_eq!(events[0].origin_shard, Some(cache.owner_of("missing").unwrap()));
    }

    #[test]
    fn test_set_publishes_update_invalidation() {
        let cache = coordinator(&["s0", "s1"], 10);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        cache.bus().subscribe(move |event| sink.lock().push(event.clone()));

        cache.set("user:7", "v".to_string(), None).unwrap();

        let events = seen.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].target, InvalidationTarget::Key("user:7".to_string()));
        assert_eq!(events[0].origin_shard, Some(cache.owner_of("user:7").unwrap()));
    }

    #[test]
    fn test_overwrite_after_recovery_clears_failover_copy() {
        let config = CoordinatorConfig {
            failover: FailoverPolicy::NextNeighbor,
            ..CoordinatorConfig::default()
        };
        let cache = coordinator_with(&["s0", "s1", "s2"], 10, config);
        let owner = cache.owner_of("user:42").unwrap();

        // Written to the neighbour while the owner is down
        cache.set_shard_available(&owner, false).unwrap();
        cache.set("user:42", "v1".to_string(), None).unwrap();

        cache.set_shard_available(&owner, true).unwrap();
        cache.set("user:42", "v2".to_string(), None).unwrap();
        assert_eq!(cache.get("user:42").unwrap(), Some("v2".to_string()));

        cache.set_shard_available(&owner, false).unwrap();
        let got = cache.get("user:42").unwrap();
        assert_ne!(got, Some("v1".to_string()), "neighbour served an overwritten value");
        assert_eq!(got, None);
    }

    #[test]
    fn test_replica_subscriber_drops_deleted_key() {
        let cache = coordinator(&["s0", "s1"], 10);
        let replica: Arc<Mutex<ShardStore<String>>> = Arc::new(Mutex::new(ShardStore::new(10)));
        replica.lock().set("user:1", "stale".to_string(), None);

        let handle = Arc::clone(&replica);
        cache.bus().subscribe(move |event| {
            if let InvalidationTarget::Key(key) = &event.target {
                handle.lock().delete(key);
            }
        });

        cache.set("user:1", "fresh".to_string(), None).unwrap();
        cache.delete("user:1").unwrap();

        assert!(!replica.lock().contains("user:1"));
    }

    #[test]
    fn test_invalidate_pattern_hits_every_shard() {
        let cache = coordinator(&["s0", "s1", "s2"], 100);
        for i in 0..20 {
            cache.set(&format!("user:{}", i), "u".to_string(), None).unwrap();
            cache.set(&format!("order:{}", i), "o".to_string(), None).unwrap();
        }

        assert_eq!(cache.invalidate_pattern("user:*").unwrap(), 3);

        for i in 0..20 {
            assert_eq!(cache.get(&format!("user:{}", i)).unwrap(), None);
            assert!(cache.get(&format!("order:{}", i)).unwrap().is_some());
        }
        assert!(matches!(
            cache.invalidate_pattern(""),
            Err(CacheError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_invalidate_pattern_treats_regex_syntax_literally() {
        let cache = coordinator(&["s0", "s1"], 100);
        cache.set("a.b:1", "v".to_string(), None).unwrap();
        cache.set("axb:1", "v".to_string(), None).unwrap();

        cache.invalidate_pattern("a.b:*").unwrap();

        assert_eq!(cache.get("a.b:1").unwrap(), None);
        assert!(cache.get("axb:1").unwrap().is_some());
    }

    #[test]
    fn test_failover_policy_parse() {
        assert_eq!("fail-fast".parse::<FailoverPolicy>().unwrap(), FailoverPolicy::FailFast);
        assert_eq!(
            "Next-Neighbor".parse::<FailoverPolicy>().unwrap(),
            FailoverPolicy::NextNeighbor
        );
        assert!("retry".parse::<FailoverPolicy>().is_err());
        assert_eq!(FailoverPolicy::NextNeighbor.to_string(), "next-neighbor");
    }

    #[test]
    fn test_concurrent_traffic_during_topology_changes() {
        let cache = Arc::new(coordinator(&["s0", "s1", "s2"], 1_000));

        let workers: Vec<_> = (0..4)
            .map(|w| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..500 {
                        let key = format!("w{}-{}", w, i);
                        cache.set(&key, key.clone(), None).unwrap();
                        if let Some(value) = cache.get(&key).unwrap() {
                            assert_eq!(value, key);
                        }
                    }
                })
            })
            .collect();

        for round in 0..10 {
            let id = format!("extra-{}", round);
            cache.add_shard(id.clone(), ShardStore::new(1_000)).unwrap();
            cache.remove_shard(&id).unwrap();
        }

        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(cache.shard_ids().len(), 3);
    }
}
