//! Explicit query cache for listing results.
//!
//! Entries are keyed by the full query (criteria plus pagination or
//! partitions) and expire after a fixed TTL. Callers invalidate after
//! mutations; nothing is invalidated implicitly.
//!
//! Every invalidation starts a new generation. A result is stored with the
//! generation that was current when its fetch began, and only entries of the
//! current generation are served, so a fetch that raced a mutation never
//! repopulates the cache with pre-mutation data.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
    generation: u64,
}

pub struct QueryCache<K, V> {
    entries: DashMap<K, CacheEntry<V>>,
    ttl: Duration,
    generation: AtomicU64,
}

impl<K: Eq + Hash, V: Clone> QueryCache<K, V> {
    /// A zero TTL disables caching entirely.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            generation: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Generation to pass to [`QueryCache::insert`]; read it before fetching.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        if !self.is_enabled() {
            return None;
        }
        let current = self.generation();
        let fresh = self
            .entries
            .get(key)
            .filter(|entry| entry.generation == current && entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone());
        if fresh.is_none() {
            self.entries.remove(key);
        }
        fresh
    }

    /// Store a value fetched during `generation`. Values from an earlier
    /// generation are dropped.
    pub fn insert(&self, key: K, value: V, generation: u64) {
        if !self.is_enabled() || generation != self.generation() {
            return;
        }
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
                generation,
            },
        );
    }

    pub fn invalidate_all(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.entries.clear();
    }
}
