//! Cache types

use crate::error::CacheError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which storage backend a call goes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// Cleared when the session ends
    #[default]
    Session,
    /// Persists across sessions
    Local,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Session => "session",
            Location::Local => "local",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "session" => Ok(Location::Session),
            "local" => Ok(Location::Local),
            other => Err(CacheError::Config(format!("unknown location '{}'", other))),
        }
    }
}

/// A single cached value together with its absolute expiration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub payload: T,
    /// Milliseconds since the Unix epoch; `None` never expires
    #[serde(default)]
    pub expiration: Option<i64>,
}

impl<T> CacheEntry<T> {
    pub fn new(payload: T, expiration: Option<i64>) -> Self {
        Self {
            payload,
            expiration,
        }
    }

    /// An entry is expired from its expiration instant onwards.
    /// An expiration of `0` is treated like no expiration at all.
    pub fn has_expired(&self, now_millis: i64) -> bool {
        self.expiration
            .filter(|&at| at != 0)
            .is_some_and(|at| now_millis >= at)
    }
}

/// Everything stored under one top-level key: sub key -> serialized entry
pub type CacheBlob = serde_json::Map<String, serde_json::Value>;
