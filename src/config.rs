//! Configuration Module
//!
//! Handles loading and validating server configuration from environment
//! variables.

use std::env;
use std::str::FromStr;

use crate::cluster::{FailoverPolicy, DEFAULT_VIRTUAL_NODES};
use crate::error::{CacheError, Result};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries each shard can hold
    pub capacity_per_shard: usize,
    /// Ring positions per physical shard
    pub virtual_nodes_per_shard: usize,
    /// TTL for entries stored without an explicit TTL, None = never expire
    pub default_ttl_seconds: Option<u64>,
    /// Background sweep interval in seconds, None = lazy expiry only
    pub eviction_sweep_interval_seconds: Option<u64>,
    /// HTTP server port
    pub server_port: u16,
    /// Shards created at startup
    pub shards: Vec<String>,
    /// Behaviour when the owning shard is unavailable
    pub failover_policy: FailoverPolicy,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CAPACITY_PER_SHARD` - Entries per shard (default: 1000)
    /// - `VIRTUAL_NODES_PER_SHARD` - Ring positions per shard (default: 150)
    /// - `DEFAULT_TTL_SECONDS` - Default TTL in seconds (default: unset, no TTL)
    /// - `EVICTION_SWEEP_INTERVAL_SECONDS` - Sweep frequency, `0` disables (default: 1)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SHARDS` - Comma separated shard ids (default: shard-0..shard-3)
    /// - `FAILOVER_POLICY` - `fail-fast` or `next-neighbor` (default: fail-fast)
    ///
    /// A variable that is set but cannot be parsed is an error rather than
    /// silently falling back to the default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let sweep_interval = match parse_var::<u64, _>(&lookup, "EVICTION_SWEEP_INTERVAL_SECONDS")? {
            Some(0) => None,
            Some(secs) => Some(secs),
            None => defaults.eviction_sweep_interval_seconds,
        };

        let shards = match lookup("SHARDS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.shards,
        };

        let config = Self {
            capacity_per_shard: parse_var(&lookup, "CAPACITY_PER_SHARD")?
                .unwrap_or(defaults.capacity_per_shard),
            virtual_nodes_per_shard: parse_var(&lookup, "VIRTUAL_NODES_PER_SHARD")?
                .unwrap_or(defaults.virtual_nodes_per_shard),
            default_ttl_seconds: parse_var(&lookup, "DEFAULT_TTL_SECONDS")?,
            eviction_sweep_interval_seconds: sweep_interval,
            server_port: parse_var(&lookup, "SERVER_PORT")?.unwrap_or(defaults.server_port),
            shards,
            failover_policy: parse_var(&lookup, "FAILOVER_POLICY")?
                .unwrap_or(defaults.failover_policy),
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the cache cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.virtual_nodes_per_shard == 0 {
            return Err(CacheError::InvalidConfig(
                "VIRTUAL_NODES_PER_SHARD must be at least 1".to_string(),
            ));
        }
        if self.shards.is_empty() {
            return Err(CacheError::InvalidConfig(
                "SHARDS must name at least one shard".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reads and parses one variable. Unset or blank yields `Ok(None)`.
fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CacheError::InvalidConfig(format!("{} has invalid value '{}'", name, raw))),
        _ => Ok(None),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity_per_shard: 1000,
            virtual_nodes_per_shard: DEFAULT_VIRTUAL_NODES,
            default_ttl_seconds: None,
            eviction_sweep_interval_seconds: Some(1),
            server_port: 3000,
            shards: (0..4).map(|i| format!("shard-{}", i)).collect(),
            failover_policy: FailoverPolicy::FailFast,
        }
    }
}
