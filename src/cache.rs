// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bounded, time-expiring in-memory cache.
//!
//! Capacity is enforced by LRU eviction; age is enforced lazily, so a
//! stale entry costs nothing until it is next read.

use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// Key/value cache bounded by entry count and entry age.
///
/// Reads refresh recency (LRU order) but never extend lifetime: an
/// entry inserted at `t` is gone for every read at or after `t + ttl`,
/// no matter how often it was read in between.
pub struct BoundedCache<K, V> {
    inner: Mutex<LruCache<K, Entry<V>>>,
    ttl: Duration,
}

impl<K: Hash + Eq, V: Clone> BoundedCache<K, V> {
    /// Create a cache holding at most `capacity` entries, each for at
    /// most `ttl`. A zero capacity is clamped to one entry.
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity is at least one");
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Fetch a live value. An entry past its TTL is dropped here and
    /// reported as absent.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");

        let expired = match inner.get(key) {
            Some(entry) => {
                if entry.stored_at.elapsed() < self.ttl {
                    return Some(entry.value.clone());
                }
                true
            }
            None => false,
        };

        if expired {
            inner.pop(key);
        }
        None
    }

    /// Insert or replace a value, evicting the least-recently-used
    /// entry if the cache is full.
    pub fn insert(&self, key: K, value: V) {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        inner.put(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Number of entries currently held, live or not.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
