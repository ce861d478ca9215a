//! In-memory cache implementation using the moka crate.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tokio::sync::Mutex;
use tracing::debug;

use larder_core::config::cache::MemoryCacheConfig;
use larder_core::result::AppResult;
use larder_core::traits::cache::CacheProvider;

/// A stored value together with the TTL it was written with.
#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    ttl: Duration,
}

/// Expires every entry after the TTL it was written with.
struct PerEntryTtl;

impl Expiry<String, StoredValue> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-memory cache provider using moka.
///
/// Suitable for a single process. `set_nx` goes through moka's entry API,
/// so concurrent callers racing on one key see exactly one winner.
/// Conditional writes additionally serialise on `cas_lock` so a
/// compare-and-delete can't interleave with a set-if-absent.
///
/// The cache is bounded by `max_capacity`; once full, moka evicts entries
/// before their TTL, which ends the affected sessions early.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    cache: Cache<String, StoredValue>,
    cas_lock: Arc<Mutex<()>>,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self {
            cache,
            cas_lock: Arc::new(Mutex::new(())),
        }
    }

    fn matching_keys(&self, pattern: &str) -> Vec<String> {
        self.cache
            .iter()
            .filter(|(key, _)| glob_match(pattern, key))
            .map(|(key, _)| key.to_string())
            .collect()
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.cache.get(key).await.map(|stored| stored.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.cache
            .insert(
                key.to_string(),
                StoredValue {
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

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.cache.get(key).await.is_some())
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        let _guard = self.cas_lock.lock().await;
        let entry = self
            .cache
            .entry(key.to_string())
            .or_insert_with(async {
                StoredValue {
                    value: value.to_string(),
                    ttl,
                }
            })
            .await;
        Ok(entry.is_fresh())
    }

    async fn compare_and_delete(&self, key: &str, expected: &str) -> AppResult<bool> {
        let _guard = self.cas_lock.lock().await;
        match self.cache.get(key).await {
            Some(stored) if stored.value == expected => {
                self.cache.invalidate(key).await;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn keys(&self, pattern: &str) -> AppResult<Vec<String>> {
        Ok(self.matching_keys(pattern))
    }

    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64> {
        let mut count = 0u64;
        for key in self.matching_keys(pattern) {
            if self.cache.remove(&key).await.is_some() {
                count += 1;
            }
        }

        debug!(pattern, count, "Deleted keys matching pattern");
        Ok(count)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// Redis-style glob match where only `*` is special.
fn glob_match(pattern: &str, key: &str) -> bool {
    let mut parts = pattern.split('*');
    let first = parts.next().unwrap_or_default();
    let Some(mut rest) = key.strip_prefix(first) else {
        return false;
    };

    let tail: Vec<&str> = parts.collect();
    let Some((last, middle)) = tail.split_last() else {
        return rest.is_empty();
    };

    for part in middle {
        match rest.find(part) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }
    rest.len() >= last.len() && rest.ends_with(last)
}
