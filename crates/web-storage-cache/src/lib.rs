//! Two-level key-value cache with lazy expiration over string storage
//!
//! Values are grouped under a top-level storage key as one JSON blob of
//! `sub_key -> { payload, expiration }`. Expired entries are ignored on read
//! but never deleted. Every failure degrades to a logged cache miss.
//!
//! ```
//! use chrono::Duration;
//! use web_storage_cache::{CacheHelper, Location, GLOBAL_CACHE_KEY};
//!
//! let cache = CacheHelper::in_memory();
//!
//! let items: Vec<String> = match cache.get(GLOBAL_CACHE_KEY, "NavigationItems", Location::Session) {
//!     Some(items) => items,
//!     None => {
//!         let items = vec!["Home".to_string(), "About".to_string()];
//!         cache.set(
//!             GLOBAL_CACHE_KEY,
//!             "NavigationItems",
//!             &items,
//!             Some(Duration::minutes(15)),
//!             Location::Session,
//!         );
//!         items
//!     }
//! };
//!
//! assert_eq!(items.len(), 2);
//! ```

mod clock;
mod config;
mod error;
mod helper;
mod storage;
mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use helper::CacheHelper;
pub use storage::{FileStorage, MemoryStorage, StorageBackend};
pub use types::{CacheBlob, CacheEntry, Location};

/// Conventional top-level key for application-wide cache entries
pub const GLOBAL_CACHE_KEY: &str = "MyAppGlobalCacheKey";
