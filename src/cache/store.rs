//! Cache Store Module
//!
//! Process-wide key/value cache with TTL expiry and explicit invalidation.
//! Read-through composition (lookup, load on miss, store) is done by the
//! caller; this type only offers the two halves.
//!
//! Fills that race with an invalidation are dropped: a caller takes a
//! [`FillTicket`] before reading the durable store, and [`CacheStore::complete_fill`]
//! refuses the value if the key was invalidated in the meantime.

use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;

use crate::cache::stats::Counters;
use crate::cache::{CacheEntry, CacheStats, CachedValue};

/// Number of invalidation generation counters. Keys hash onto these, so two
/// keys sharing a stripe only cost each other a skipped fill.
const GENERATION_STRIPES: usize = 64;

// == Fill Ticket ==
/// Proof of the invalidation generation of a key, taken before loading its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillTicket {
    key: String,
    generation: u64,
}

impl FillTicket {
    pub fn key(&self) -> &str {
        &self.key
    }
}

// == Cache Store ==
/// Concurrent cache storage with TTL support.
///
/// Entries live in a sharded map, so operations on distinct keys do not
/// contend. Races on the same key resolve last-write-wins.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: DashMap<String, CacheEntry>,
    /// Bumped by every invalidation of a key hashing onto the stripe
    generations: Vec<AtomicU64>,
    hasher: RandomState,
    /// Activity counters
    counters: Counters,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            generations: (0..GENERATION_STRIPES).map(|_| AtomicU64::new(0)).collect(),
            hasher: RandomState::new(),
            counters: Counters::default(),
        }
    }

    fn generation(&self, key: &str) -> &AtomicU64 {
        let stripe = self.hasher.hash_one(key) as usize % self.generations.len();
        &self.generations[stripe]
    }

    // == Lookup ==
    /// Returns the value under `key` if a live entry exists.
    ///
    /// An expired entry is removed and reported as absent.
    pub fn lookup(&self, key: &str) -> Option<CachedValue> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                self.counters.record_hit();
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        // The read guard is released above; removing under it would deadlock the shard.
        if expired && self.entries.remove_if(key, |_, e| e.is_expired()).is_some() {
            self.counters.record_expirations(1);
        }
        self.counters.record_miss();
        None
    }

    // == Store ==
    /// Stores `value` under `key`, replacing any previous entry and resetting its TTL.
    pub fn store(&self, key: impl Into<String>, value: CachedValue, ttl: Duration) {
        self.entries.insert(key.into(), CacheEntry::new(value, ttl));
        self.counters.record_fill();
    }

    // == Fill ==
    /// Records the current invalidation generation of `key`.
    ///
    /// Take the ticket before reading the value from the durable store.
    pub fn begin_fill(&self, key: impl Into<String>) -> FillTicket {
        let key = key.into();
        let generation = self.generation(&key).load(Ordering::SeqCst);
        FillTicket { key, generation }
    }

    /// Stores `value` unless the ticket's key was invalidated after the
    /// ticket was taken. Returns whether the value was stored.
    pub fn complete_fill(&self, ticket: FillTicket, value: CachedValue, ttl: Duration) -> bool {
        let FillTicket { key, generation } = ticket;
        let current = self.generation(&key);

        // Holding the shard lock orders this check against `invalidate`,
        // which bumps the generation before taking the same lock to remove.
        let entry = self.entries.entry(key);
        if current.load(Ordering::SeqCst) != generation {
            return false;
        }
        entry.insert(CacheEntry::new(value, ttl));

        self.counters.record_fill();
        true
    }

    // == Invalidate ==
    /// Removes every listed key that is present. Absent keys are ignored.
    ///
    /// Returns the number of entries actually removed, so invalidating the
    /// same keys twice removes nothing the second time. In-flight fills for
    /// the listed keys are refused either way.
    pub fn invalidate(&self, keys: &[&str]) -> usize {
        let removed = keys
            .iter()
            .filter(|key| {
                self.generation(key).fetch_add(1, Ordering::SeqCst);
                self.entries.remove(**key).is_some()
            })
            .count();
        self.counters.record_invalidations(removed as u64);
        removed
    }

    // == Contains ==
    /// True if a live entry exists under `key`. Does not touch the counters.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.entries.len())
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired();
            if !keep {
                removed += 1;
            }
            keep
        });
        self.counters.record_expirations(removed as u64);
        removed
    }

    // == Length ==
    /// Returns the current number of entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Price, Product};
    use chrono::Utc;
    use std::sync::Arc;
    use std::thread::sleep;
    use uuid::Uuid;

    const LONG_TTL: Duration = Duration::from_secs(300);

    fn product(name: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            price: Price::from_cents(100),
            created_at: Utc::now(),
            description: None,
        }
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_and_lookup() {
        let store = CacheStore::new();
        let value = CachedValue::Product(product("Widget"));

        store.store("product-1", value.clone(), LONG_TTL);

        assert_eq!(store.lookup("product-1"), Some(value));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_lookup_missing() {
        let store = CacheStore::new();
        assert!(store.lookup("missing").is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_overwrite() {
        let store = CacheStore::new();
        store.store("k", CachedValue::Products(vec![]), LONG_TTL);
        store.store("k", CachedValue::Products(vec![product("a")]), LONG_TTL);

        match store.lookup("k") {
            Some(CachedValue::Products(list)) => assert_eq!(list.len(), 1),
            other => panic!("unexpected value: {:?}", other),
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_invalidate_is_idempotent() {
        let store = CacheStore::new();
        store.store("k", CachedValue::Products(vec![]), LONG_TTL);

        assert_eq!(store.invalidate(&["k"]), 1);
        assert_eq!(store.invalidate(&["k"]), 0);
        assert!(store.lookup("k").is_none());
        assert_eq!(store.stats().invalidations, 1);
    }

    #[test]
    fn test_invalidate_absent_key_is_noop() {
        let store = CacheStore::new();
        store.store("kept", CachedValue::Products(vec![]), LONG_TTL);

        assert_eq!(store.invalidate(&["absent", "also-absent"]), 0);
        assert!(store.contains("kept"));
    }

    #[test]
    fn test_fill_completes_without_invalidation() {
        let store = CacheStore::new();
        let value = CachedValue::Product(product("Widget"));

        let ticket = store.begin_fill("product-1");
        assert_eq!(ticket.key(), "product-1");
        assert!(store.complete_fill(ticket, value.clone(), LONG_TTL));

        assert_eq!(store.lookup("product-1"), Some(value));
        assert_eq!(store.stats().fills, 1);
    }

    #[test]
    fn test_fill_refused_after_invalidation() {
        let store = CacheStore::new();

        // Invalidating an absent key still refuses the pending fill
        let ticket = store.begin_fill("product-1");
        assert_eq!(store.invalidate(&["product-1"]), 0);
        assert!(!store.complete_fill(ticket, CachedValue::Product(product("Old")), LONG_TTL));

        assert!(!store.contains("product-1"));
        assert_eq!(store.stats().fills, 0);

        // A ticket taken after the invalidation fills normally
        let ticket = store.begin_fill("product-1");
        assert!(store.complete_fill(ticket, CachedValue::Product(product("New")), LONG_TTL));
        assert!(store.contains("product-1"));
    }

    #[test]
    fn test_fill_unaffected_by_other_key_invalidation() {
        let store = CacheStore::new();
        let ticket = store.begin_fill("all-products");

        // Keys may share a stripe; only a handful can, so most fills survive
        let others: Vec<String> = (0..8).map(|i| format!("product-{i}")).collect();
        let colliding = others
            .iter()
            .filter(|k| std::ptr::eq(store.generation(k), store.generation("all-products")))
            .count();
        let refs: Vec<&str> = others.iter().map(String::as_str).collect();
        store.invalidate(&refs);

        let stored = store.complete_fill(ticket, CachedValue::Products(vec![]), LONG_TTL);
        assert_eq!(stored, colliding == 0);
    }

    #[test]
    fn test_concurrent_fill_and_invalidate() {
        let store = Arc::new(CacheStore::new());

        for round in 0..200 {
            let key = format!("product-{round}");
            let ticket = store.begin_fill(key.clone());

            let invalidator = {
                let store = Arc::clone(&store);
                let key = key.clone();
                std::thread::spawn(move || {
                    store.invalidate(&[key.as_str()]);
                })
            };
            let stored =
                store.complete_fill(ticket, CachedValue::Products(vec![]), LONG_TTL);
            invalidator.join().unwrap();

            // Whatever the interleaving, the invalidation wins
            assert!(!store.contains(&key), "round {round}: stored={stored}");
        }
    }

    #[test]
    fn test_huge_ttl_store() {
        let store = CacheStore::new();
        store.store("k", CachedValue::Products(vec![]), Duration::from_secs(u64::MAX));
        assert!(store.lookup("k").is_some());
    }

    #[test]
    fn test_ttl_expiration() {
        let store = CacheStore::new();
        store.store("k", CachedValue::Products(vec![]), Duration::from_millis(30));

        assert!(store.lookup("k").is_some());

        sleep(Duration::from_millis(50));

        assert!(store.lookup("k").is_none());
        assert!(store.is_empty(), "expired entry is dropped on lookup");
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_contains_does_not_count() {
        let store = CacheStore::new();
        store.store("k", CachedValue::Products(vec![]), LONG_TTL);

        assert!(store.contains("k"));
        assert!(!store.contains("other"));

        let stats = store.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_stats() {
        let store = CacheStore::new();
        store.store("k", CachedValue::Products(vec![]), LONG_TTL);
        store.lookup("k"); // hit
        store.lookup("nonexistent"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.fills, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_cleanup_expired() {
        let store = CacheStore::new();
        store.store("short", CachedValue::Products(vec![]), Duration::from_millis(30));
        store.store("long", CachedValue::Products(vec![]), LONG_TTL);

        sleep(Duration::from_millis(50));

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.contains("long"));
    }

    #[test]
    fn test_concurrent_distinct_keys() {
        let store = Arc::new(CacheStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let key = format!("t{t}-{i}");
                        store.store(key.clone(), CachedValue::Products(vec![]), LONG_TTL);
                        assert!(store.lookup(&key).is_some());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 800);
        assert_eq!(store.stats().hits, 800);
    }
}
