//! Redis cache provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use larder_core::error::{AppError, ErrorKind};
use larder_core::result::AppResult;
use larder_core::traits::cache::CacheProvider;

use super::client::RedisClient;

/// Delete KEYS[1] only if it holds ARGV[1].
const COMPARE_AND_DELETE_SCRIPT: &str = r#"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    return redis.call('DEL', KEYS[1])
end
return 0
"#;

/// Redis-backed cache provider.
///
/// TTLs are written with `PX` so sub-second lifetimes survive, and pattern
/// operations walk the keyspace with `SCAN` rather than blocking on `KEYS`.
#[derive(Debug, Clone)]
pub struct RedisCacheProvider {
    client: RedisClient,
    scan_count: usize,
}

impl RedisCacheProvider {
    /// Create a new Redis cache provider.
    pub fn new(client: RedisClient, scan_count: usize) -> Self {
        Self {
            client,
            scan_count: scan_count.max(1),
        }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Transient, format!("Redis error: {e}"), e)
    }

    fn ttl_millis(ttl: Duration) -> u64 {
        (ttl.as_millis() as u64).max(1)
    }

    /// Full (prefixed) keys matching a pattern.
    async fn scan(&self, pattern: &str) -> AppResult<Vec<String>> {
        let full_pattern = self.client.prefixed_key(pattern);
        let mut conn = self.client.conn_mut();
        let mut cursor: u64 = 0;
        let mut found = Vec::new();

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&full_pattern)
                .arg("COUNT")
                .arg(self.scan_count)
                .query_async(&mut conn)
                .await
                .map_err(Self::map_err)?;
            found.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        found.sort();
        found.dedup();
        Ok(found)
    }
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: Option<String> = conn.get(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: () = redis::cmd("SET")
            .arg(&full_key)
            .arg(value)
            .arg("PX")
            .arg(Self::ttl_millis(ttl))
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: () = conn.del(&full_key).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: bool = conn.exists(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();

        // SET key value PX ttl NX
        let result: Option<String> = redis::cmd("SET")
            .arg(&full_key)
            .arg(value)
            .arg("PX")
            .arg(Self::ttl_millis(ttl))
            .arg("NX")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        Ok(result.is_some())
    }

    async fn compare_and_delete(&self, key: &str, expected: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let removed: i64 = redis::Script::new(COMPARE_AND_DELETE_SCRIPT)
            .key(&full_key)
            .arg(expected)
            .invoke_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(removed > 0)
    }

    async fn keys(&self, pattern: &str) -> AppResult<Vec<String>> {
        let keys = self.scan(pattern).await?;
        Ok(keys
            .iter()
            .map(|key| self.client.unprefixed_key(key).to_string())
            .collect())
    }

    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64> {
        let keys = self.scan(pattern).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.client.conn_mut();
        let mut count = 0u64;
        for chunk in keys.chunks(self.scan_count) {
            let removed: u64 = redis::cmd("DEL")
                .arg(chunk.to_vec())
                .query_async(&mut conn)
                .await
                .map_err(Self::map_err)?;
            count += removed;
        }

        debug!(pattern, count, "Deleted keys matching pattern");
        Ok(count)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
