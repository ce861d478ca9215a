//! Session store / cache provider configuration.

use serde::{Deserialize, Serialize};

/// Top-level cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache provider type: `"memory"` or `"redis"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Redis-specific configuration.
    #[serde(default)]
    pub redis: RedisCacheConfig,
    /// In-memory configuration.
    #[serde(default)]
    pub memory: MemoryCacheConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            redis: RedisCacheConfig::default(),
            memory: MemoryCacheConfig::default(),
        }
    }
}

/// Redis cache backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisCacheConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Prefix prepended to every key. Empty by default so session keys
    /// appear in Redis exactly as `user-t-<account_id>:<token>`.
    #[serde(default)]
    pub key_prefix: String,
    /// Number of keys requested per SCAN round trip.
    #[serde(default = "default_scan_count")]
    pub scan_count: usize,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: String::new(),
            scan_count: default_scan_count(),
        }
    }
}

/// In-memory cache backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCacheConfig {
    /// Maximum number of entries in the cache. Past this bound moka evicts
    /// entries, and an evicted session entry ends that session early, so
    /// size it above two keys per concurrently logged-in account.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_scan_count() -> usize {
    100
}

fn default_max_capacity() -> u64 {
    100_000
}
