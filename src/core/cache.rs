use crate::config::toml_config::CacheConfig;
use moka::sync::Cache;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: u64,
}

/// Bounded, expiring map from entity id to its last committed value.
///
/// Owned by a manager and handed in at construction; nothing here is global.
/// Entries expire a fixed time after they were written and the least useful
/// entries are dropped once `max_entries` is reached.
pub struct EntityCache<K, V> {
    name: &'static str,
    entries: Cache<K, V>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> EntityCache<K, V>
where
    K: Hash + Eq + Send + Sync + std::fmt::Debug + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str, config: &CacheConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(Duration::from_secs(config.ttl_seconds))
            .build();

        tracing::debug!(
            "Cache '{}' created (ttl: {}s, max entries: {})",
            name,
            config.ttl_seconds,
            config.max_entries
        );

        Self {
            name,
            entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        match self.entries.get(key) {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("{} {:?} served from cache", self.name, key);
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn put(&self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    pub fn evict(&self, key: &K) {
        self.entries.invalidate(key);
    }

    pub fn stats(&self) -> CacheStats {
        self.entries.run_pending_tasks();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.entry_count(),
        }
    }
}
