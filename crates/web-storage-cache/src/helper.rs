//! Two-level cache over string storage with lazy expiration

use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::storage::{FileStorage, MemoryStorage, StorageBackend};
use crate::types::{CacheBlob, CacheEntry, Location};
use chrono::Duration;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

/// Reads and writes cache entries stored as one JSON blob per top-level key
pub struct CacheHelper {
    session: Arc<dyn StorageBackend>,
    local: Arc<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
}

impl CacheHelper {
    /// Create a helper over the given backends and clock
    pub fn new(
        session: Arc<dyn StorageBackend>,
        local: Arc<dyn StorageBackend>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            session,
            local,
            clock,
        }
    }

    /// Create a helper whose backends both live in memory
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStorage::new()),
            Arc::new(MemoryStorage::new()),
            Arc::new(SystemClock),
        )
    }

    /// Create a helper with memory session storage and file-backed local storage
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        let local = FileStorage::new(config.storage_dir.clone());
        local.init()?;

        let session = match config.session_quota_bytes {
            Some(quota) => MemoryStorage::with_quota(quota),
            None => MemoryStorage::new(),
        };

        Ok(Self::new(
            Arc::new(session),
            Arc::new(local),
            Arc::new(SystemClock),
        ))
    }

    fn storage(&self, location: Location) -> &dyn StorageBackend {
        match location {
            Location::Session => self.session.as_ref(),
            Location::Local => self.local.as_ref(),
        }
    }

    /// Get the payload stored at `key`/`sub_key`.
    ///
    /// Returns `None` when nothing is stored, when the entry has expired, or
    /// when anything goes wrong. Failures are logged, never returned.
    pub fn get<T: DeserializeOwned>(
        &self,
        key: &str,
        sub_key: &str,
        location: Location,
    ) -> Option<T> {
        match self.try_get(key, sub_key, location) {
            Ok(value) => value,
            Err(e) => {
                error!(
                    operation = "get",
                    key = %key,
                    sub_key = %sub_key,
                    location = %location,
                    error = %e,
                    "[CacheHelper] Error on get()"
                );
                None
            }
        }
    }

    /// Like [`CacheHelper::get`], but reports failures instead of logging them
    pub fn try_get<T: DeserializeOwned>(
        &self,
        key: &str,
        sub_key: &str,
        location: Location,
    ) -> Result<Option<T>> {
        let text = match self.storage(location).read_text(key)? {
            Some(text) if !text.is_empty() => text,
            _ => {
                debug!(key = %key, location = %location, "Cache blob missing");
                return Ok(None);
            }
        };

        let blob: Value = serde_json::from_str(&text)?;

        // Non-object blobs have no sub keys; falsy sub entries count as absent
        let raw = match blob.get(sub_key) {
            Some(raw) if !is_falsy(raw) => raw,
            _ => {
                debug!(key = %key, sub_key = %sub_key, "Cache miss");
                return Ok(None);
            }
        };

        let entry = CacheEntry::<Value>::deserialize(raw)?;
        let now = self.clock.now_millis();

        if entry.has_expired(now) {
            debug!(
                key = %key,
                sub_key = %sub_key,
                expiration = ?entry.expiration,
                now,
                "Cache entry expired"
            );
            return Ok(None);
        }

        debug!(key = %key, sub_key = %sub_key, "Cache hit");
        Ok(Some(serde_json::from_value(entry.payload)?))
    }

    /// Store `payload` at `key`/`sub_key`, expiring `expires_in` from now.
    ///
    /// Returns what an immediate [`CacheHelper::get`] would, so a zero or
    /// negative `expires_in` yields `None` even though the write happened.
    /// Failures are logged and yield `None`.
    pub fn set<T: Serialize + DeserializeOwned>(
        &self,
        key: &str,
        sub_key: &str,
        payload: &T,
        expires_in: Option<Duration>,
        location: Location,
    ) -> Option<T> {
        match self.try_set(key, sub_key, payload, expires_in, location) {
            Ok(value) => value,
            Err(e) => {
                error!(
                    operation = "set",
                    key = %key,
                    sub_key = %sub_key,
                    expires_in_ms = ?expires_in.map(|d| d.num_milliseconds()),
                    location = %location,
                    error = %e,
                    "[CacheHelper] Error on set()"
                );
                None
            }
        }
    }

    /// Like [`CacheHelper::set`], but reports failures instead of logging them
    pub fn try_set<T: Serialize + DeserializeOwned>(
        &self,
        key: &str,
        sub_key: &str,
        payload: &T,
        expires_in: Option<Duration>,
        location: Location,
    ) -> Result<Option<T>> {
        let storage = self.storage(location);
        let now = self.clock.now_millis();
        let expiration = expires_in.map(|ttl| now.saturating_add(ttl.num_milliseconds()));

        // A corrupt blob is not recovered from; the write is abandoned
        let mut blob = match storage.read_text(key)? {
            Some(text) if !text.is_empty() => match serde_json::from_str::<Value>(&text)? {
                Value::Object(map) => map,
                _ => {
                    return Err(CacheError::MalformedBlob {
                        key: key.to_string(),
                    })
                }
            },
            _ => CacheBlob::new(),
        };

        let entry = CacheEntry::new(payload, expiration);
        blob.insert(sub_key.to_string(), serde_json::to_value(&entry)?);

        storage.write_text(key, &serde_json::to_string(&blob)?)?;
        debug!(
            key = %key,
            sub_key = %sub_key,
            location = %location,
            expiration = ?expiration,
            "Cached entry"
        );

        self.try_get(key, sub_key, location)
    }

    /// Return the cached payload, or compute it with `fetch` and cache it.
    ///
    /// The fetched value is returned even if caching it fails or it expires
    /// immediately.
    pub fn get_or_insert_with<T, F>(
        &self,
        key: &str,
        sub_key: &str,
        expires_in: Option<Duration>,
        location: Location,
        fetch: F,
    ) -> T
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        if let Some(cached) = self.get(key, sub_key, location) {
            return cached;
        }

        let value = fetch();
        self.set(key, sub_key, &value, expires_in, location);
        value
    }
}

/// JSON values that a script host would treat as false
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
