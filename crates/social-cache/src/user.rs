//! Read-through cache for principal lookups.
//!
//! Entries are serialized [`User`] values without their password hash, so a
//! cached principal is only fit for request authorization, never for
//! credential checks.

use std::time::Duration;

use tracing::{debug, warn};

use social_core::config::cache::CacheConfig;
use social_core::result::AppResult;
use social_core::traits::cache::CacheProvider;
use social_entity::User;

use crate::keys;

/// Upper bound on a health probe against the backend.
const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(2);
use crate::provider::CacheManager;

/// Optional, TTL-bounded cache of principals keyed by id.
#[derive(Debug, Clone)]
pub struct UserCache {
    manager: Option<CacheManager>,
    ttl: Duration,
}

impl UserCache {
    /// Build from configuration. A disabled cache turns every call into a no-op.
    pub async fn from_config(config: &CacheConfig) -> AppResult<Self> {
        let ttl = Duration::from_secs(config.user_ttl_seconds);
        if !config.enabled {
            return Ok(Self::disabled(ttl));
        }
        Ok(Self::new(CacheManager::new(config).await?, ttl))
    }

    /// Wrap an existing cache manager.
    pub fn new(manager: CacheManager, ttl: Duration) -> Self {
        Self {
            manager: Some(manager),
            ttl,
        }
    }

    /// A cache that never stores anything.
    pub fn disabled(ttl: Duration) -> Self {
        Self { manager: None, ttl }
    }

    /// The configured entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a principal. Cache failures are logged and reported as a miss.
    pub async fn get(&self, user_id: i64) -> Option<User> {
        let manager = self.manager.as_ref()?;
        match manager.get_json::<User>(&keys::user_by_id(user_id)).await {
            Ok(hit) => {
                debug!(user_id, hit = hit.is_some(), "User cache lookup");
                hit
            }
            Err(e) => {
                warn!(user_id, error = %e, "User cache read failed");
                None
            }
        }
    }

    /// Store a principal for `ttl`. Failures are logged and swallowed.
    pub async fn set(&self, user: &User, ttl: Duration) {
        let Some(manager) = &self.manager else {
            return;
        };
        if let Err(e) = manager
            .set_json(&keys::user_by_id(user.id), user, ttl)
            .await
        {
            warn!(user_id = user.id, error = %e, "User cache write failed");
        }
    }

    /// Probe the backend. `None` when the cache is disabled; a failed or
    /// stalled probe reports `Some(false)`.
    pub async fn health_check(&self) -> Option<bool> {
        let manager = self.manager.as_ref()?;
        match tokio::time::timeout(HEALTH_PROBE_TIMEOUT, manager.health_check()).await {
            Ok(Ok(healthy)) => Some(healthy),
            Ok(Err(e)) => {
                warn!(error = %e, "Cache health check failed");
                Some(false)
            }
            Err(_) => {
                warn!("Cache health check timed out");
                Some(false)
            }
        }
    }

    /// Drop a principal from the cache.
    pub async fn invalidate(&self, user_id: i64) {
        let Some(manager) = &self.manager else {
            return;
        };
        if let Err(e) = manager.delete(&keys::user_by_id(user_id)).await {
            warn!(user_id, error = %e, "User cache invalidation failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Utc;
    use social_core::config::cache::MemoryCacheConfig;
    use social_core::error::AppError;
    use social_entity::{PasswordHash, Role};

    use super::*;
    use crate::memory::MemoryCacheProvider;

    fn alice() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password: PasswordHash::from_encoded("hash"),
            is_active: true,
            role_id: 1,
            role: Role {
                id: 1,
                name: "user".to_string(),
                description: String::new(),
                level: 1,
            },
            created_at: Utc::now(),
        }
    }

    fn memory_cache() -> UserCache {
        let provider = Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig {
            max_capacity: 10,
        }));
        UserCache::new(
            CacheManager::from_provider(provider),
            Duration::from_secs(60),
        )
    }

    #[tokio::test]
    async fn test_round_trip_drops_password() {
        let cache = memory_cache();
        cache.set(&alice(), cache.ttl()).await;

        let cached = cache.get(1).await.unwrap();
        assert_eq!(cached.username, "alice");
        assert!(cached.password.is_empty());

        cache.invalidate(1).await;
        assert!(cache.get(1).await.is_none());
    }

    #[tokio::test]
    async fn test_disabled_cache_never_hits() {
        let cache = UserCache::disabled(Duration::from_secs(60));
        cache.set(&alice(), cache.ttl()).await;
        assert!(cache.get(1).await.is_none());
    }

    #[derive(Debug)]
    struct BrokenProvider;

    #[async_trait]
    impl CacheProvider for BrokenProvider {
        async fn get(&self, _key: &str) -> AppResult<Option<String>> {
            Err(AppError::cache("connection refused"))
        }
        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> AppResult<()> {
            Err(AppError::cache("connection refused"))
        }
        async fn delete(&self, _key: &str) -> AppResult<()> {
            Err(AppError::cache("connection refused"))
        }
        async fn health_check(&self) -> AppResult<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_backend_failure_is_a_miss() {
        let cache = UserCache::new(
            CacheManager::from_provider(Arc::new(BrokenProvider)),
            Duration::from_secs(60),
        );
        cache.set(&alice(), cache.ttl()).await;
        assert!(cache.get(1).await.is_none());
        cache.invalidate(1).await;
        assert_eq!(cache.health_check().await, Some(false));
    }

    #[tokio::test]
    async fn test_health_reports_backend_state() {
        assert_eq!(memory_cache().health_check().await, Some(true));
        assert_eq!(
            UserCache::disabled(Duration::from_secs(60)).health_check().await,
            None
        );
    }
}
