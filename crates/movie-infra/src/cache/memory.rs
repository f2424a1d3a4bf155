//! In-memory cache implementation - used when Redis is not configured or unreachable.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use movie_core::ports::{Cache, CacheError};

struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.expires_at
            .map(|exp| Instant::now() >= exp)
            .unwrap_or(false)
    }
}

/// In-memory cache using a HashMap behind an async RwLock.
///
/// Process-local: every replica holds its own copy and data is lost on restart.
pub struct InMemoryCache {
    store: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        {
            let store = self.store.read().await;
            match store.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        // Expired: re-check under the write lock, a concurrent set may have refreshed it
        let mut store = self.store.write().await;
        if store.get(key).is_some_and(CacheEntry::is_expired) {
            store.remove(key);
            return Ok(None);
        }
        Ok(store.get(key).map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut store = self.store.write().await;

        store.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                // A TTL past the clock's range never expires
                expires_at: ttl.and_then(|d| Instant::now().checked_add(d)),
            },
        );

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut store = self.store.write().await;
        store.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryCache::new();
        cache.set("movies", "[]", None).await.unwrap();
        assert_eq!(cache.get("movies").await.unwrap(), Some("[]".to_string()));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let cache = InMemoryCache::new();
        cache.set("movies", "[]", None).await.unwrap();
        cache.delete("movies").await.unwrap();
        cache.delete("movies").await.unwrap();
        assert_eq!(cache.get("movies").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = InMemoryCache::new();
        cache
            .set("movies", "[]", Some(Duration::from_millis(20)))
            .await
            .unwrap();
        assert!(cache.get("movies").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get("movies").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unrepresentable_ttl_never_expires() {
        let cache = InMemoryCache::new();
        cache
            .set("movies", "[]", Some(Duration::from_secs(u64::MAX)))
            .await
            .unwrap();
        assert_eq!(cache.get("movies").await.unwrap(), Some("[]".to_string()));
    }

    #[tokio::test]
    async fn test_set_replaces_previous_value() {
        let cache = InMemoryCache::new();
        cache.set("movies", "old", None).await.unwrap();
        cache.set("movies", "new", None).await.unwrap();
        assert_eq!(cache.get("movies").await.unwrap(), Some("new".to_string()));
    }
}
