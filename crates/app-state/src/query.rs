//! Query management
//!
//! A reactive query system for server state: fetch results are cached under
//! structured keys, served fresh while within their stale window, and
//! refetched in the background once stale. Mutations invalidate entries so
//! the next read goes back to the server.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use storage::{CacheConfig, MemoryCache};
use thiserror::Error;
use todo_client::ApiError;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

/// Query errors
#[derive(Debug, Error)]
pub enum QueryError {
    /// Query fetch failed
    #[error("Query fetch failed: {0}")]
    FetchError(String),

    /// API error from the backend
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for query operations
pub type Result<T> = std::result::Result<T, QueryError>;

/// Query key for identifying and caching queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct QueryKey {
    /// Scope of the query (e.g., "todos", "health", "session")
    pub scope: String,

    /// Unique identifier within the scope
    pub id: String,

    /// Optional parameters
    pub params: HashMap<String, String>,
}

impl QueryKey {
    /// Create a new query key
    pub fn new(scope: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            id: id.into(),
            params: HashMap::new(),
        }
    }

    /// Add a parameter to the query key
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Convert to cache key string
    pub fn to_cache_key(&self) -> String {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.scope.hash(&mut hasher);
        self.id.hash(&mut hasher);
        // Hash params in sorted order for consistency
        let mut params: Vec<_> = self.params.iter().collect();
        params.sort_by_key(|(k, _)| *k);
        for (k, v) in params {
            k.hash(&mut hasher);
            v.hash(&mut hasher);
        }
        format!("query:{}:{}:{:x}", self.scope, self.id, hasher.finish())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scope, self.id)?;
        if !self.params.is_empty() {
            write!(f, "?")?;
            let mut first = true;
            for (k, v) in &self.params {
                if !first {
                    write!(f, "&")?;
                }
                write!(f, "{}={}", k, v)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Query state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    /// Query is idle (never fetched or invalidated)
    Idle,

    /// Query is fetching data
    Fetching,

    /// Query fetch succeeded
    Success,

    /// Query fetch failed
    Error,
}

/// Query metadata
#[derive(Debug, Clone)]
struct QueryMeta {
    state: QueryState,
    fetched_at: Option<SystemTime>,
    stale_at: Option<SystemTime>,
    fetch_count: u32,
    last_error: Option<String>,
}

impl QueryMeta {
    fn new() -> Self {
        Self {
            state: QueryState::Idle,
            fetched_at: None,
            stale_at: None,
            fetch_count: 0,
            last_error: None,
        }
    }

    fn is_stale(&self) -> bool {
        match self.stale_at {
            Some(stale_at) => SystemTime::now() >= stale_at,
            None => true,
        }
    }
}

/// Query configuration
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Time until data becomes stale
    pub stale_time: Duration,

    /// Time until cached data is dropped
    pub cache_time: Duration,

    /// Enable background refetching when stale
    pub refetch_on_stale: bool,

    /// Retry failed fetches
    pub retry: bool,

    /// Maximum retry attempts
    pub retry_count: u32,

    /// Retry delay
    pub retry_delay: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(0), // Immediately stale by default
            cache_time: Duration::from_secs(300), // 5 minutes
            refetch_on_stale: true,
            retry: true,
            retry_count: 1, // One retry for reads
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// Query trait for defining data fetching logic
#[async_trait]
pub trait Query: Send + Sync + Clone {
    /// The type of data this query returns
    type Data: Serialize + DeserializeOwned + Clone + Send + Sync;

    /// Fetch the data from the server
    async fn fetch(&self) -> Result<Self::Data>;

    /// Get the query key
    fn key(&self) -> QueryKey;

    /// Get the query configuration
    fn config(&self) -> QueryConfig {
        QueryConfig::default()
    }
}

/// Query client managing the cache and fetch lifecycle
pub struct QueryClient {
    cache: MemoryCache<String>,
    meta: Arc<RwLock<HashMap<String, QueryMeta>>>,
    background_tasks: Arc<Mutex<HashMap<String, JoinHandle<()>>>>,
}

impl QueryClient {
    /// Create a new query client
    pub fn new(cache_config: CacheConfig) -> Self {
        Self {
            cache: MemoryCache::new(cache_config),
            meta: Arc::new(RwLock::new(HashMap::new())),
            background_tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get query data, using the cache if available
    ///
    /// Fresh cached data is returned as-is. Stale cached data is returned
    /// immediately while a background refetch is spawned (when the query
    /// allows it). A cache miss fetches synchronously.
    pub async fn get<Q: Query + 'static>(&self, query: &Q) -> Result<Q::Data> {
        let cache_key = query.key().to_cache_key();
        let config = query.config();

        if let Some(cached) = self.cache.get(&cache_key) {
            let data: Q::Data = serde_json::from_str(&cached)?;

            let meta = self.meta.read().await;
            if let Some(query_meta) = meta.get(&cache_key) {
                if !query_meta.is_stale() {
                    return Ok(data);
                }

                drop(meta);
                if config.refetch_on_stale {
                    self.spawn_background_refetch(query.clone(), cache_key).await;
                }

                return Ok(data);
            }

            // Cached data without metadata (metadata was dropped) - return it
            return Ok(data);
        }

        self.fetch(query).await
    }

    /// Spawn a background refetch for stale data, deduplicated per key
    async fn spawn_background_refetch<Q: Query + 'static>(&self, query: Q, cache_key: String) {
        {
            let tasks = self.background_tasks.lock().await;
            if tasks.contains_key(&cache_key) {
                // Already refetching this key
                return;
            }
        }

        let cache = self.cache.clone();
        let meta = Arc::clone(&self.meta);
        let background_tasks = Arc::clone(&self.background_tasks);
        let task_cache_key = cache_key.clone();

        let handle = tokio::spawn(async move {
            let config = query.config();

            {
                let mut meta_guard = meta.write().await;
                let query_meta = meta_guard
                    .entry(task_cache_key.clone())
                    .or_insert_with(QueryMeta::new);
                query_meta.state = QueryState::Fetching;
                query_meta.fetch_count += 1;
            }

            match Self::fetch_with_retry(&query, &config).await {
                Ok(data) => {
                    if let Ok(serialized) = serde_json::to_string(&data) {
                        cache.put(task_cache_key.clone(), serialized, Some(config.cache_time));
                    }

                    let now = SystemTime::now();
                    let mut meta_guard = meta.write().await;
                    if let Some(query_meta) = meta_guard.get_mut(&task_cache_key) {
                        query_meta.state = QueryState::Success;
                        query_meta.fetched_at = Some(now);
                        query_meta.stale_at = Some(now + config.stale_time);
                        query_meta.last_error = None;
                    }
                }
                Err(e) => {
                    tracing::warn!(key = %task_cache_key, error = %e, "background refetch failed");
                    let mut meta_guard = meta.write().await;
                    if let Some(query_meta) = meta_guard.get_mut(&task_cache_key) {
                        query_meta.state = QueryState::Error;
                        query_meta.last_error = Some(e.to_string());
                    }
                }
            }

            let mut tasks = background_tasks.lock().await;
            tasks.remove(&task_cache_key);
        });

        let mut tasks = self.background_tasks.lock().await;
        tasks.insert(cache_key, handle);
    }

    async fn fetch_with_retry<Q: Query>(query: &Q, config: &QueryConfig) -> Result<Q::Data> {
        let max_attempts = if config.retry {
            config.retry_count + 1
        } else {
            1
        };

        let mut last_error = None;
        for attempt in 0..max_attempts {
            if attempt > 0 {
                tokio::time::sleep(config.retry_delay).await;
            }

            match query.fetch().await {
                Ok(data) => return Ok(data),
                Err(e) => last_error = Some(e),
            }
        }

        // max_attempts >= 1, so last_error is set
        Err(last_error.unwrap_or_else(|| QueryError::FetchError("no attempts made".to_string())))
    }

    /// Fetch query data, ignoring the cache
    pub async fn fetch<Q: Query>(&self, query: &Q) -> Result<Q::Data> {
        let cache_key = query.key().to_cache_key();
        let config = query.config();

        {
            let mut meta = self.meta.write().await;
            let query_meta = meta.entry(cache_key.clone()).or_insert_with(QueryMeta::new);
            query_meta.state = QueryState::Fetching;
            query_meta.fetch_count += 1;
        }

        match Self::fetch_with_retry(query, &config).await {
            Ok(data) => {
                let serialized = serde_json::to_string(&data)?;
                self.cache
                    .put(cache_key.clone(), serialized, Some(config.cache_time));

                let now = SystemTime::now();
                let mut meta = self.meta.write().await;
                if let Some(query_meta) = meta.get_mut(&cache_key) {
                    query_meta.state = QueryState::Success;
                    query_meta.fetched_at = Some(now);
                    query_meta.stale_at = Some(now + config.stale_time);
                    query_meta.last_error = None;
                }

                Ok(data)
            }
            Err(error) => {
                let mut meta = self.meta.write().await;
                if let Some(query_meta) = meta.get_mut(&cache_key) {
                    query_meta.state = QueryState::Error;
                    query_meta.last_error = Some(error.to_string());
                }

                Err(error)
            }
        }
    }

    /// Invalidate cached query data, forcing the next read to refetch
    pub async fn invalidate(&self, key: &QueryKey) {
        let cache_key = key.to_cache_key();
        tracing::debug!(key = %key, "invalidating query");

        self.cache.remove(&cache_key);

        let mut meta = self.meta.write().await;
        meta.remove(&cache_key);
    }

    /// Invalidate all queries within a scope
    pub async fn invalidate_scope(&self, scope: &str) {
        let mut meta = self.meta.write().await;
        let prefix = format!("query:{}:", scope);
        let keys_to_remove: Vec<String> =
            meta.keys().filter(|k| k.starts_with(&prefix)).cloned().collect();

        tracing::debug!(scope, count = keys_to_remove.len(), "invalidating scope");

        for cache_key in keys_to_remove {
            self.cache.remove(&cache_key);
            meta.remove(&cache_key);
        }
    }

    /// Get query state
    pub async fn state(&self, key: &QueryKey) -> QueryState {
        let cache_key = key.to_cache_key();
        let meta = self.meta.read().await;
        meta.get(&cache_key)
            .map(|m| m.state)
            .unwrap_or(QueryState::Idle)
    }

    /// Get the last error recorded for a query, if any
    pub async fn last_error(&self, key: &QueryKey) -> Option<String> {
        let cache_key = key.to_cache_key();
        let meta = self.meta.read().await;
        meta.get(&cache_key).and_then(|m| m.last_error.clone())
    }

    /// Clear all cached queries
    pub async fn clear(&self) {
        self.cache.clear();
        let mut meta = self.meta.write().await;
        meta.clear();
    }
}

impl Clone for QueryClient {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            meta: Arc::clone(&self.meta),
            background_tasks: Arc::clone(&self.background_tasks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, Clone, Serialize, serde::Deserialize, PartialEq)]
    struct TestData {
        value: String,
    }

    #[derive(Clone)]
    struct TestQuery {
        key: QueryKey,
        data: TestData,
        should_fail: bool,
        fetch_count: Arc<AtomicU32>,
        config: QueryConfig,
    }

    impl TestQuery {
        fn new(key: QueryKey, value: &str) -> Self {
            Self {
                key,
                data: TestData { value: value.to_string() },
                should_fail: false,
                fetch_count: Arc::new(AtomicU32::new(0)),
                config: QueryConfig {
                    retry: false,
                    ..Default::default()
                },
            }
        }

        fn failing(key: QueryKey) -> Self {
            let mut query = Self::new(key, "unused");
            query.should_fail = true;
            query
        }

        fn fetches(&self) -> u32 {
            self.fetch_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Query for TestQuery {
        type Data = TestData;

        async fn fetch(&self) -> Result<Self::Data> {
            self.fetch_count.fetch_add(1, Ordering::SeqCst);
            if self.should_fail {
                Err(QueryError::FetchError("simulated failure".to_string()))
            } else {
                Ok(self.data.clone())
            }
        }

        fn key(&self) -> QueryKey {
            self.key.clone()
        }

        fn config(&self) -> QueryConfig {
            self.config.clone()
        }
    }

    #[tokio::test]
    async fn test_query_key_creation() {
        let key = QueryKey::new("todos", "all").with_param("limit", "20");

        assert_eq!(key.scope, "todos");
        assert_eq!(key.id, "all");
        assert_eq!(key.params.get("limit"), Some(&"20".to_string()));
    }

    #[tokio::test]
    async fn test_query_key_to_cache_key() {
        let key = QueryKey::new("todos", "all");
        assert!(key.to_cache_key().starts_with("query:todos:all:"));
    }

    #[tokio::test]
    async fn test_fetch_stores_in_cache() {
        let client = QueryClient::new(CacheConfig::default());
        let query = TestQuery::new(QueryKey::new("test", "1"), "hello");

        let result = client.fetch(&query).await.unwrap();
        assert_eq!(result.value, "hello");
        assert_eq!(client.state(&query.key()).await, QueryState::Success);
    }

    #[tokio::test]
    async fn test_get_serves_fresh_cache_without_refetching() {
        let client = QueryClient::new(CacheConfig::default());
        let mut query = TestQuery::new(QueryKey::new("test", "2"), "cached");
        query.config.stale_time = Duration::from_secs(60);

        let first = client.get(&query).await.unwrap();
        let second = client.get(&query).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(query.fetches(), 1);
    }

    #[tokio::test]
    async fn test_get_returns_stale_data_and_refetches_in_background() {
        let client = QueryClient::new(CacheConfig::default());
        let mut query = TestQuery::new(QueryKey::new("test", "stale"), "v1");
        query.config.stale_time = Duration::from_secs(0);

        client.fetch(&query).await.unwrap();

        // Stale hit: returned immediately, background refetch spawned
        let result = client.get(&query).await.unwrap();
        assert_eq!(result.value, "v1");

        // Give the background task a moment to run
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(query.fetches() >= 2);
    }

    #[tokio::test]
    async fn test_invalidation_forces_refetch() {
        let client = QueryClient::new(CacheConfig::default());
        let mut query = TestQuery::new(QueryKey::new("test", "3"), "value");
        query.config.stale_time = Duration::from_secs(60);

        client.get(&query).await.unwrap();
        assert_eq!(query.fetches(), 1);

        client.invalidate(&query.key()).await;
        assert_eq!(client.state(&query.key()).await, QueryState::Idle);

        client.get(&query).await.unwrap();
        assert_eq!(query.fetches(), 2);
    }

    #[tokio::test]
    async fn test_scope_invalidation() {
        let client = QueryClient::new(CacheConfig::default());
        let mut query1 = TestQuery::new(QueryKey::new("todos", "1"), "todo 1");
        let mut query2 = TestQuery::new(QueryKey::new("todos", "2"), "todo 2");
        let mut other = TestQuery::new(QueryKey::new("health", "status"), "ok");
        query1.config.stale_time = Duration::from_secs(60);
        query2.config.stale_time = Duration::from_secs(60);
        other.config.stale_time = Duration::from_secs(60);

        client.fetch(&query1).await.unwrap();
        client.fetch(&query2).await.unwrap();
        client.fetch(&other).await.unwrap();

        client.invalidate_scope("todos").await;

        assert_eq!(client.state(&query1.key()).await, QueryState::Idle);
        assert_eq!(client.state(&query2.key()).await, QueryState::Idle);
        // Other scopes are untouched
        assert_eq!(client.state(&other.key()).await, QueryState::Success);
    }

    #[tokio::test]
    async fn test_failed_fetch_records_error() {
        let client = QueryClient::new(CacheConfig::default());
        let query = TestQuery::failing(QueryKey::new("test", "fail"));

        let result = client.fetch(&query).await;
        assert!(result.is_err());
        assert_eq!(client.state(&query.key()).await, QueryState::Error);

        let error = client.last_error(&query.key()).await.unwrap();
        assert!(error.contains("simulated failure"));
    }

    #[tokio::test]
    async fn test_single_retry_for_reads() {
        let client = QueryClient::new(CacheConfig::default());
        let mut query = TestQuery::failing(QueryKey::new("test", "retry"));
        query.config = QueryConfig {
            retry: true,
            retry_count: 1,
            retry_delay: Duration::from_millis(10),
            ..Default::default()
        };

        let result = client.fetch(&query).await;
        assert!(result.is_err());
        // initial attempt + one retry
        assert_eq!(query.fetches(), 2);
    }

    #[tokio::test]
    async fn test_clear() {
        let client = QueryClient::new(CacheConfig::default());
        let query = TestQuery::new(QueryKey::new("test", "clear"), "data");

        client.fetch(&query).await.unwrap();
        client.clear().await;

        assert_eq!(client.state(&query.key()).await, QueryState::Idle);
    }
}
