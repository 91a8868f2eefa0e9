//! Key Pattern Module
//!
//! Glob patterns for pattern invalidation. `*` matches any run of characters
//! (including none); every other character matches itself. The glob is
//! compiled to an anchored regex once, when the invalidation is created.

use std::fmt;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::{CacheError, Result};

/// A compiled key glob.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    glob: String,
    regex: Regex,
}

impl KeyPattern {
    /// Compiles `glob`. Empty or uncompilable patterns are rejected as
    /// `InvalidRequest`.
    pub fn new(glob: &str) -> Result<Self> {
        if glob.is_empty() {
            return Err(CacheError::InvalidRequest("Pattern cannot be empty".to_string()));
        }

        let body: Vec<String> = glob.split('*').map(regex::escape).collect();
        let regex = Regex::new(&format!("(?s)^{}$", body.join(".*"))).map_err(|e| {
            CacheError::InvalidRequest(format!("invalid pattern '{}': {}", glob, e))
        })?;

        Ok(Self {
            glob: glob.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.glob
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl PartialEq for KeyPattern {
    fn eq(&self, other: &Self) -> bool {
        self.glob == other.glob
    }
}

impl Eq for KeyPattern {}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.glob)
    }
}

impl Serialize for KeyPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.glob)
    }
}
