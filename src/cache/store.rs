//! Shard Store Module
//!
//! Cache engine for a single shard: HashMap storage combined with LRU
//! tracking and TTL expiration.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use regex::Regex;
use tracing::debug;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Shard Store ==
/// Bounded, expiring, LRU-ordered storage for one shard.
///
/// The store itself is not synchronized; the owning shard wraps it in a
/// single exclusive lock, which `get` takes as well since it reorders
/// recency.
#[derive(Debug)]
pub struct ShardStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// (expires_at, key) for every entry with a TTL, soonest first
    expiries: BTreeSet<(u64, String)>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<V: Clone> ShardStore<V> {
    // == Constructor ==
    /// Creates a new ShardStore holding at most `capacity` entries.
    ///
    /// A capacity of 0 turns every `set` into an immediate eviction.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            expiries: BTreeSet::new(),
            stats: CacheStats::new(capacity),
            capacity,
        }
    }

    // == Get ==
    /// Retrieves a value by key, refreshing its recency.
    ///
    /// Returns `None` on a miss. An expired entry is removed on the spot and
    /// counted as a miss.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        let entry = self.entries.get_mut(key)?;
        entry.touch();
        let value = entry.value.clone();
        self.lru.touch(key);
        self.stats.record_hit();
        Some(value)
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// Overwrites reset the TTL. When the store grows past capacity, expired
    /// entries are dropped first and then entries are evicted from the least
    /// recently used end until the store is back at capacity.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();

        if self.capacity == 0 {
            self.stats.record_eviction();
            debug!(key = %key, "capacity is zero, entry evicted immediately");
            return;
        }

        let entry = CacheEntry::new(value, ttl);
        let expires_at = entry.expires_at;
        if let Some(old) = self.entries.insert(key.clone(), entry) {
            self.forget_expiry(&key, &old);
        }
        if let Some(expires_at) = expires_at {
            self.expiries.insert((expires_at, key.clone()));
        }
        self.lru.touch(&key);

        if self.entries.len() > self.capacity {
            self.cleanup_expired();
        }

        while self.entries.len() > self.capacity {
            match self.lru.evict_oldest() {
                Some(evicted) => {
                    if let Some(old) = self.entries.remove(&evicted) {
                        self.forget_expiry(&evicted, &old);
                    }
                    self.stats.record_eviction();
                    debug!(key = %evicted, "evicted least recently used entry");
                }
                None => break,
            }
        }

        debug_assert_eq!(self.entries.len(), self.lru.len());
        self.stats.set_total_entries(self.entries.len());
    }

    // == Delete ==
    /// Removes an entry by key and reports whether it existed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Walks the expiry index from the soonest deadline, so the cost is
    /// proportional to the number of expired entries rather than the size of
    /// the store. Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let mut count = 0;

        while let Some((expires_at, _)) = self.expiries.first() {
            if *expires_at > now {
                break;
            }
            if let Some((_, key)) = self.expiries.pop_first() {
                if self.entries.remove(&key).is_some() {
                    self.lru.remove(&key);
                    count += 1;
                }
            }
        }

        self.stats.set_total_entries(self.entries.len());
        self.stats.record_expirations(count);
        count
    }

    // == Invalidate Matching ==
    /// Removes every key matched by `pattern`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_matching(&mut self, pattern: &Regex) -> usize {
        let matching: Vec<String> = self
            .entries
            .keys()
            .filter(|key| pattern.is_match(key))
            .cloned()
            .collect();

        let count = matching.len();
        for key in matching {
            self.remove_entry(&key);
        }
        count
    }

    // == Stats ==
    /// Returns current shard statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Returns true if the key is present and not expired, without touching
    /// recency or counters.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    /// Keys from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.lru.iter_oldest_first().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(old) => {
                self.forget_expiry(key, &old);
                self.lru.remove(key);
                self.stats.set_total_entries(self.entries.len());
                true
            }
            None => false,
        }
    }

    fn forget_expiry(&mut self, key: &str, entry: &CacheEntry<V>) {
        if let Some(expires_at) = entry.expires_at {
            self.expiries.remove(&(expires_at, key.to_string()));
        }
    }
}
