//! Cache manager that dispatches to the configured provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use larder_core::config::cache::CacheConfig;
use larder_core::error::AppError;
use larder_core::result::AppResult;
use larder_core::traits::cache::CacheProvider;

/// Cache manager that wraps the configured cache provider.
#[derive(Debug, Clone)]
pub struct CacheManager {
    inner: Arc<dyn CacheProvider>,
}

impl CacheManager {
    /// Create a new cache manager from configuration.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let inner: Arc<dyn CacheProvider> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis cache provider");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisCacheProvider::new(
                    client,
                    config.redis.scan_count,
                ))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory cache provider");
                Arc::new(crate::memory::MemoryCacheProvider::new(&config.memory))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown cache provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a cache manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn CacheProvider>) -> Self {
        Self { inner: provider }
    }
}

#[async_trait]
impl CacheProvider for CacheManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        self.inner.set_nx(key, value, ttl).await
    }

    async fn compare_and_delete(&self, key: &str, expected: &str) -> AppResult<bool> {
        self.inner.compare_and_delete(key, expected).await
    }

    async fn keys(&self, pattern: &str) -> AppResult<Vec<String>> {
        self.inner.keys(pattern).await
    }

    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64> {
        self.inner.delete_pattern(pattern).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::error::ErrorKind;

    #[tokio::test]
    async fn test_unknown_provider_is_configuration_error() {
        let config = CacheConfig {
            provider: "memcached".to_string(),
            ..CacheConfig::default()
        };
        let err = CacheManager::new(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[cfg(feature = "memory")]
    #[tokio::test]
    async fn test_memory_provider_dispatch() {
        let manager = CacheManager::new(&CacheConfig::default()).await.unwrap();
        manager
            .set("k", "v", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(manager.get("k").await.unwrap(), Some("v".to_string()));
    }
}
