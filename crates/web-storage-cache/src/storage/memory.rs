use super::StorageBackend;
use crate::error::{CacheError, Result};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct Items {
    values: HashMap<String, String>,
    /// Sum of key and value lengths in bytes
    used: usize,
}

/// Session-scoped storage held in process memory
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<Items>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an unbounded storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage that rejects writes beyond `quota` bytes
    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: RwLock::new(Items::default()),
            quota: Some(quota),
        }
    }

    /// Bytes currently in use (keys plus values)
    pub fn used_bytes(&self) -> usize {
        self.items.read().map(|items| items.used).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every stored value, like the end of a browsing session
    pub fn clear(&self) -> Result<()> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        items.values.clear();
        items.used = 0;
        Ok(())
    }
}

fn poisoned() -> CacheError {
    CacheError::Unavailable("session storage lock poisoned".to_string())
}

impl StorageBackend for MemoryStorage {
    fn read_text(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items.values.get(key).cloned())
    }

    fn write_text(&self, key: &str, text: &str) -> Result<()> {
        let mut items = self.items.write().map_err(|_| poisoned())?;

        let previous = items
            .values
            .get(key)
            .map(|old| key.len() + old.len())
            .unwrap_or(0);
        let used = items.used - previous + key.len() + text.len();

        if let Some(quota) = self.quota {
            if used > quota {
                warn!(key = %key, used, quota, "Session storage quota exceeded");
                return Err(CacheError::QuotaExceeded {
                    key: key.to_string(),
                    quota,
                });
            }
        }

        items.values.insert(key.to_string(), text.to_string());
        items.used = used;
        debug!(key = %key, bytes = text.len(), "Wrote session storage");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_key() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read_text("nope").unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let storage = MemoryStorage::new();
        storage.write_text("k", "{}").unwrap();
        assert_eq!(storage.read_text("k").unwrap().as_deref(), Some("{}"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_overwrite_updates_usage() {
        let storage = MemoryStorage::new();
        storage.write_text("k", "12345").unwrap();
        assert_eq!(storage.used_bytes(), 6);

        storage.write_text("k", "12").unwrap();
        assert_eq!(storage.used_bytes(), 3);
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_quota_rejects_and_keeps_old_value() {
        let storage = MemoryStorage::with_quota(8);
        storage.write_text("k", "1234").unwrap();

        let err = storage.write_text("k", "123456789").unwrap_err();
        assert!(matches!(err, CacheError::QuotaExceeded { quota: 8, .. }));
        assert_eq!(storage.read_text("k").unwrap().as_deref(), Some("1234"));
        assert_eq!(storage.used_bytes(), 5);
    }

    #[test]
    fn test_clear() {
        let storage = MemoryStorage::new();
        storage.write_text("a", "1").unwrap();
        storage.write_text("b", "2").unwrap();
        storage.clear().unwrap();

        assert!(storage.is_empty());
        assert_eq!(storage.used_bytes(), 0);
    }
}
