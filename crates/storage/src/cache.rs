//! In-memory cache
//!
//! LRU cache with per-entry TTL. This is the only data cache the client
//! keeps: the server is the source of truth and cached values are simply
//! dropped when the query layer invalidates them.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

/// Cache entry with expiry metadata
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Option<SystemTime>,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Option<Duration>) -> Self {
        Self {
            value,
            expires_at: ttl.map(|d| SystemTime::now() + d),
        }
    }

    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => SystemTime::now() > expires_at,
            None => false,
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries before LRU eviction
    pub max_entries: usize,
    /// TTL applied when a put does not specify one
    pub default_ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            default_ttl: Some(Duration::from_secs(300)),
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of entries
    pub fn max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Set the default TTL
    pub fn default_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.default_ttl = ttl;
        self
    }
}

/// In-memory LRU cache with TTL expiry
///
/// Cloning is cheap; clones share the underlying cache.
pub struct MemoryCache<V> {
    cache: Arc<Mutex<LruCache<String, CacheEntry<V>>>>,
    config: CacheConfig,
}

impl<V: Clone> MemoryCache<V> {
    /// Create a new cache from a configuration
    pub fn new(config: CacheConfig) -> Self {
        let capacity =
            NonZeroUsize::new(config.max_entries).unwrap_or(NonZeroUsize::new(1).unwrap());

        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
            config,
        }
    }

    /// Get a value, treating expired entries as misses
    pub fn get(&self, key: &str) -> Option<V> {
        let mut cache = self.cache.lock().unwrap();

        let is_expired = cache.peek(key).map(|e| e.is_expired()).unwrap_or(false);
        if is_expired {
            cache.pop(key);
            tracing::debug!(key, "cache entry expired");
            return None;
        }

        cache.get(key).map(|entry| entry.value.clone())
    }

    /// Insert a value with an optional TTL
    ///
    /// Passing `None` falls back to the configured default TTL.
    pub fn put(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let entry = CacheEntry::new(value, ttl.or(self.config.default_ttl));
        let mut cache = self.cache.lock().unwrap();
        cache.put(key.into(), entry);
    }

    /// Remove a value, returning it if present and not expired
    pub fn remove(&self, key: &str) -> Option<V> {
        let mut cache = self.cache.lock().unwrap();
        cache
            .pop(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value)
    }

    /// Remove all entries
    pub fn clear(&self) {
        let mut cache = self.cache.lock().unwrap();
        cache.clear();
    }

    /// Number of entries currently held (including not-yet-collected expired ones)
    pub fn len(&self) -> usize {
        self.cache.lock().unwrap().len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> Clone for MemoryCache<V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            config: self.config.clone(),
        }
    }
}
