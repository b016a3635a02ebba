//! Fetched entity lists, kept until a mutation invalidates them or they expire.
//!
//! A list is filled in two halves: take a [`FillTicket`] before fetching, then
//! hand it back to [`QueryCache::fill`]. Any invalidation in between voids the
//! ticket, so a fetch that raced a mutation is never cached.

use dashmap::DashMap;
use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long a list is served before it is fetched again.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Every recipe, newest first.
    Recipes,
    /// Meals visible to one user.
    Meals { user: String },
    /// Stories attached to one recipe, newest first.
    Stories { recipe_id: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Proof that no invalidation happened since it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillTicket(u64);

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

pub struct QueryCache {
    entries: DashMap<QueryKey, CacheEntry>,
    /// Bumped before every invalidation.
    epoch: AtomicU64,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            epoch: AtomicU64::new(0),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get<T: Any + Send + Sync>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let now = Instant::now();
        // Release the shard guard before any removal.
        let found = self
            .entries
            .get(key)
            .map(|entry| (entry.is_expired(now), entry.value.clone()));
        let cached = match found {
            Some((false, value)) => value.downcast::<T>().ok(),
            Some((true, _)) => {
                self.entries.remove_if(key, |_, e| e.is_expired(now));
                None
            }
            None => None,
        };

        let counter = if cached.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        cached
    }

    /// Take before fetching a list that will be passed to [`fill`](Self::fill).
    pub fn ticket(&self) -> FillTicket {
        FillTicket(self.epoch.load(Ordering::Acquire))
    }

    /// Cache `value` unless something was invalidated since `ticket` was taken.
    /// Returns whether the value was stored.
    pub fn fill<T: Any + Send + Sync>(&self, key: QueryKey, ticket: FillTicket, value: Arc<T>) -> bool {
        let now = Instant::now();
        self.entries.retain(|_, e| !e.is_expired(now));

        // The shard lock is held across the check, and invalidations bump the
        // epoch before they take it.
        let entry = self.entries.entry(key);
        if self.epoch.load(Ordering::Acquire) != ticket.0 {
            tracing::debug!(key = ?entry.key(), "stale fetch not cached");
            return false;
        }
        entry.insert(CacheEntry {
            value,
            expires_at: now + self.ttl,
        });
        true
    }

    /// Cache `value` as of now.
    pub fn insert<T: Any + Send + Sync>(&self, key: QueryKey, value: Arc<T>) {
        let ticket = self.ticket();
        self.fill(key, ticket, value);
    }

    fn bump(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }

    pub fn invalidate(&self, key: &QueryKey) {
        self.bump();
        if self.entries.remove(key).is_some() {
            tracing::debug!(?key, "cache entry invalidated");
        }
    }

    /// Drop every meal list, whoever it belongs to.
    pub fn invalidate_meals(&self) {
        self.bump();
        self.entries
            .retain(|key, _| !matches!(key, QueryKey::Meals { .. }));
    }

    pub fn clear(&self) {
        self.bump();
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_insert_invalidate() {
        let cache = QueryCache::new();
        assert!(cache.get::<Vec<u32>>(&QueryKey::Recipes).is_none());

        cache.insert(QueryKey::Recipes, Arc::new(vec![1u32, 2]));
        assert_eq!(*cache.get::<Vec<u32>>(&QueryKey::Recipes).unwrap(), vec![1, 2]);

        cache.invalidate(&QueryKey::Recipes);
        assert!(cache.get::<Vec<u32>>(&QueryKey::Recipes).is_none());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.entries, 0);
    }

    #[test]
    fn test_wrong_type_is_a_miss() {
        let cache = QueryCache::new();
        cache.insert(QueryKey::Recipes, Arc::new(vec![1u32]));
        assert!(cache.get::<String>(&QueryKey::Recipes).is_none());
    }

    #[test]
    fn test_invalidate_meals_for_everyone() {
        let cache = QueryCache::new();
        for user in ["a", "b"] {
            cache.insert(
                QueryKey::Meals {
                    user: user.to_string(),
                },
                Arc::new(0u8),
            );
        }
        cache.insert(QueryKey::Recipes, Arc::new(0u8));

        cache.invalidate_meals();
        assert_eq!(cache.stats().entries, 1);
    }

    #[test]
    fn test_fill_after_invalidation_is_dropped() {
        let cache = QueryCache::new();
        let ticket = cache.ticket();
        cache.invalidate(&QueryKey::Recipes);

        assert!(!cache.fill(QueryKey::Recipes, ticket, Arc::new(vec![1u32])));
        assert!(cache.get::<Vec<u32>>(&QueryKey::Recipes).is_none());

        let ticket = cache.ticket();
        assert!(cache.fill(QueryKey::Recipes, ticket, Arc::new(vec![2u32])));
        assert_eq!(*cache.get::<Vec<u32>>(&QueryKey::Recipes).unwrap(), vec![2]);
    }

    #[test]
    fn test_entries_expire() {
        let cache = QueryCache::with_ttl(Duration::ZERO);
        cache.insert(QueryKey::Recipes, Arc::new(1u8));
        assert!(cache.get::<u8>(&QueryKey::Recipes).is_none());
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_fill_sweeps_expired_entries() {
        let cache = QueryCache::with_ttl(Duration::from_millis(10));
        for i in 0..5 {
            cache.insert(
                QueryKey::Stories {
                    recipe_id: i.to_string(),
                },
                Arc::new(0u8),
            );
        }
        std::thread::sleep(Duration::from_millis(20));
        cache.insert(QueryKey::Recipes, Arc::new(0u8));
        assert_eq!(cache.stats().entries, 1);
    }
}
