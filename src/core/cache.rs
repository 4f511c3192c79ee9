//! # Query Cache
//!
//! In-memory store for library payloads, keyed by the query that produced
//! them. Owned by `App`; lives exactly as long as the session.
//!
//! ```text
//! QueryCache
//! └── entries: LibraryQuery → CacheEntry { payload, fetched_at, invalidated }
//! ```
//!
//! Freshness decides whether entering a navigator level needs a fetch:
//! fresh entries are applied as-is, stale ones are shown while a refetch runs.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::backend::LibraryQuery;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub payload: Value,
    pub fetched_at: Instant,
    pub invalidated: bool,
}

#[derive(Debug)]
pub struct QueryCache {
    entries: HashMap<LibraryQuery, CacheEntry>,
    ttl: Duration,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, key: &LibraryQuery) -> Option<&Value> {
        self.entries.get(key).map(|entry| &entry.payload)
    }

    pub fn insert(&mut self, key: LibraryQuery, payload: Value) {
        self.insert_at(key, payload, Instant::now());
    }

    pub fn insert_at(&mut self, key: LibraryQuery, payload: Value, fetched_at: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                payload,
                fetched_at,
                invalidated: false,
            },
        );
    }

    /// True if an entry exists, was not invalidated, and is younger than the TTL.
    pub fn is_fresh(&self, key: &LibraryQuery, now: Instant) -> bool {
        self.entries.get(key).is_some_and(|entry| {
            !entry.invalidated && now.saturating_duration_since(entry.fetched_at) < self.ttl
        })
    }

    /// Marks an entry stale so the next read refetches. Returns whether it existed.
    pub fn invalidate(&mut self, key: &LibraryQuery) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.invalidated = true;
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
