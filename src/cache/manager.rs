//! In-memory cache manager with per-entry expiry
//!
//! Provides a `CacheManager` that stores whole values alongside expiry
//! timestamps, shared between concurrent requests behind a read/write lock.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

/// A cached value with its timestamps
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    /// The cached data
    data: T,
    /// When the data was cached
    cached_at: DateTime<Utc>,
    /// When the cache entry expires
    expires_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Thread-safe expiring key/value store
///
/// Entries are only ever inserted or replaced whole. Expired entries are
/// dropped when they are next read; there is no background sweep. There is
/// no size bound either, the key space is the set of distinct queries
/// actually requested.
///
/// Two concurrent misses on the same key both go upstream and the later
/// `put` wins; callers accept that rather than coordinating in-flight fetches.
#[derive(Debug)]
pub struct CacheManager<T> {
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
}

impl<T> Default for CacheManager<T> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Clone> CacheManager<T> {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a live entry
    ///
    /// Returns `None` if the key is missing or its entry has expired; an
    /// expired entry is evicted on the way out.
    pub fn get(&self, key: &str) -> Option<T> {
        let now = Utc::now();
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => {
                    tracing::trace!(key, cached_at = %entry.cached_at, "cache entry is fresh");
                    return Some(entry.data.clone());
                }
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Re-check under the write lock; another request may have refreshed it
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
        }
        None
    }

    /// Stores `data` under `key` for `ttl`, replacing any previous entry
    pub fn put(&self, key: &str, data: T, ttl: Duration) {
        let now = Utc::now();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let entry = CacheEntry {
            data,
            cached_at: now,
            expires_at,
        };

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), entry);
    }

    /// Number of stored entries, expired ones included until they are read
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry
    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}
