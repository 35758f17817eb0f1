//! Session-scoped caching for API responses
//!
//! This module provides an in-memory cache keyed by string with per-entry TTL
//! values. Entries past their expiry are never served; they are purged lazily
//! on the next read rather than by a timer, which keeps the cache free of any
//! background scheduling for the bounded number of keys one session produces.

mod manager;

pub use manager::MemoryCache;
