//! In-memory cache implementation using the moka crate.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use social_core::config::cache::MemoryCacheConfig;
use social_core::result::AppResult;
use social_core::traits::cache::CacheProvider;

/// A cached value together with the TTL it was written with.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Expires each entry after the TTL given at write time.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-memory cache provider using moka.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    /// The underlying moka cache.
    cache: Cache<String, Entry>,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.cache
            .insert(
                key.to_string(),
                Entry {
                    value: value.to_string(),
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
