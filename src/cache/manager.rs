//! In-memory cache with per-entry expiry
//!
//! Provides a `MemoryCache` that stores cloneable values under string keys with
//! absolute expiry timestamps. Expired entries are evicted lazily on the read
//! path rather than by a background sweeper.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// A single cached value with its expiry bookkeeping
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    /// The cached value
    value: T,
    /// When the value was cached
    cached_at: DateTime<Utc>,
    /// When the entry stops being served
    expires_at: DateTime<Utc>,
}

/// Session-scoped cache mapping string keys to values of a single payload type
///
/// Each entry carries an absolute expiry timestamp computed from a TTL at write
/// time. A read that finds an expired entry removes it and reports a miss; a
/// miss is a normal outcome, never an error. Overwriting a key replaces both
/// the value and the expiry, so a later `set` with a shorter TTL shortens the
/// entry's life.
///
/// Freshness uses a strict comparison (`now < expires_at`), so an entry stored
/// with a zero TTL is already stale on the very next read.
#[derive(Debug)]
pub struct MemoryCache<T> {
    /// Keyed entries behind a lock so the cache can be shared by `&self`
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T> Default for MemoryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemoryCache<T> {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Locks the entry map, recovering the guard if a writer panicked
    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Removes all entries unconditionally
    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Number of resident entries, counting stale ones not yet evicted
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Returns `true` if no entries are resident
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl<T: Clone> MemoryCache<T> {
    /// Stores `value` under `key`, expiring `ttl` from now
    ///
    /// Overwrites any existing entry for `key`, replacing both the value and
    /// the expiry. Always succeeds.
    ///
    /// # Arguments
    /// * `key` - Unique identifier for the cache entry (e.g., "stories")
    /// * `value` - The value to cache
    /// * `ttl` - How long the entry should be served before going stale
    pub fn set(&self, key: &str, value: T, ttl: Duration) {
        self.set_at(key, value, ttl, Utc::now());
    }

    /// `set` with an explicit clock, so expiry is testable without sleeping
    fn set_at(&self, key: &str, value: T, ttl: Duration, now: DateTime<Utc>) {
        let entry = CacheEntry {
            value,
            cached_at: now,
            expires_at: now + ttl,
        };
        self.entries().insert(key.to_string(), entry);
    }

    /// Returns the cached value for `key` if one exists and is still fresh
    ///
    /// A stale entry is removed during the lookup and reported as a miss, as
    /// is a key that was never set. Callers receive a clone of the value; the
    /// cache keeps exclusive ownership of its own bookkeeping.
    pub fn get(&self, key: &str) -> Option<T> {
        self.get_at(key, Utc::now())
    }

    /// `get` with an explicit clock; see `set_at`
    fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let mut entries = self.entries();
        match entries.get(key) {
            Some(entry) if now < entry.expires_at => {
                debug!(key, cached_at = %entry.cached_at, "cache hit");
                Some(entry.value.clone())
            }
            Some(_) => {
                debug!(key, "cache entry expired, evicting");
                entries.remove(key);
                None
            }
            None => {
                debug!(key, "cache miss");
                None
            }
        }
    }
}
