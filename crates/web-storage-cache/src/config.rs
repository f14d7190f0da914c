use crate::error::{CacheError, Result};
use std::env;
use std::path::PathBuf;

const DEFAULT_STORAGE_DIR: &str = "./cache/web-storage";
const DEFAULT_SESSION_QUOTA: usize = 5 * 1024 * 1024; // 5 MiB, the usual browser limit

/// Backend configuration parsed from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Directory for durable (`local`) storage
    pub storage_dir: PathBuf,
    /// Byte quota for session storage; `None` is unbounded
    pub session_quota_bytes: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            session_quota_bytes: Some(DEFAULT_SESSION_QUOTA),
        }
    }
}

impl CacheConfig {
    /// Parse configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            env::var("WEB_STORAGE_CACHE_DIR").ok(),
            env::var("WEB_STORAGE_SESSION_QUOTA").ok(),
        )
    }

    fn from_vars(storage_dir: Option<String>, session_quota: Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let storage_dir = storage_dir
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_dir);

        let session_quota_bytes = match session_quota {
            Some(raw) => {
                let quota = raw.trim().parse::<usize>().map_err(|e| {
                    CacheError::Config(format!(
                        "invalid WEB_STORAGE_SESSION_QUOTA '{}': {}",
                        raw, e
                    ))
                })?;
                // 0 disables the quota
                (quota > 0).then_some(quota)
            }
            None => defaults.session_quota_bytes,
        };

        Ok(Self {
            storage_dir,
            session_quota_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::from_vars(None, None).unwrap();
        assert_eq!(config, CacheConfig::default());
        assert_eq!(config.session_quota_bytes, Some(5 * 1024 * 1024));
    }

    #[test]
    fn test_overrides() {
        let config =
            CacheConfig::from_vars(Some("/tmp/wsc".to_string()), Some(" 1024 ".to_string()))
                .unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/wsc"));
        assert_eq!(config.session_quota_bytes, Some(1024));
    }

    #[test]
    fn test_zero_quota_disables_limit() {
        let config = CacheConfig::from_vars(None, Some("0".to_string())).unwrap();
        assert_eq!(config.session_quota_bytes, None);
    }

    #[test]
    fn test_invalid_quota() {
        let err = CacheConfig::from_vars(None, Some("lots".to_string())).unwrap_err();
        assert!(matches!(err, CacheError::Config(_)));
        assert!(err.to_string().contains("WEB_STORAGE_SESSION_QUOTA"));
    }
}
