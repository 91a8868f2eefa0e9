//! Request DTOs for the cache server API
//!
//! Query parameters accepted by the HTTP endpoints. Cache values travel as
//! raw request bodies and need no DTO.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{CacheError, Result};

/// Query string of `PUT /cache/:key`
///
/// `ttl` is kept as text so a malformed value becomes a JSON 400 from
/// [`PutParams::ttl`] rather than a plain-text extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PutParams {
    /// TTL in seconds
    #[serde(default)]
    pub ttl: Option<String>,
}

impl PutParams {
    /// Parses the TTL.
    ///
    /// Missing means "use the default TTL". Zero or negative values produce
    /// an entry that is already expired.
    pub fn ttl(&self) -> Result<Option<Duration>> {
        let raw = match self.ttl.as_deref().map(str::trim) {
            None | Some("") => return Ok(None),
            Some(raw) => raw,
        };

        let seconds: i64 = raw.parse().map_err(|_| {
            CacheError::InvalidRequest(format!("ttl must be an integer number of seconds, got '{}'", raw))
        })?;

        Ok(Some(if seconds <= 0 {
            Duration::ZERO
        } else {
            Duration::from_secs(seconds as u64)
        }))
    }
}

/// Query string of `POST /admin/invalidate`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvalidateParams {
    /// Glob with `*` wildcards
    #[serde(default)]
    pub pattern: Option<String>,
}

impl InvalidateParams {
    /// Returns the pattern, or an error if it is missing or blank.
    pub fn pattern(&self) -> Result<&str> {
        match self.pattern.as_deref() {
            Some(p) if !p.is_empty() => Ok(p),
            _ => Err(CacheError::InvalidRequest(
                "pattern query parameter is required".to_string(),
            )),
        }
    }
}
