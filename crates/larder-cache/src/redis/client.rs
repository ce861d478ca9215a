//! Redis connection management.

use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use larder_core::config::cache::RedisCacheConfig;
use larder_core::error::{AppError, ErrorKind};
use larder_core::result::AppResult;

/// Redis client wrapper with connection management.
#[derive(Clone)]
pub struct RedisClient {
    /// Multiplexed, reconnecting connection.
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisClient {
    /// Create a new Redis client from configuration.
    pub async fn connect(config: &RedisCacheConfig) -> AppResult<Self> {
        info!(url = %mask_redis_url(&config.url), "Connecting to Redis");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid Redis URL", e)
        })?;

        let conn = ConnectionManager::new(client).await.map_err(|e| {
            AppError::with_source(ErrorKind::Transient, "Failed to connect to Redis", e)
        })?;

        info!("Successfully connected to Redis");
        Ok(Self {
            conn,
            key_prefix: config.key_prefix.clone(),
        })
    }

    /// Get a clone of the connection manager for one command.
    pub fn conn_mut(&self) -> ConnectionManager {
        self.conn.clone()
    }

    /// Build a full key with the configured prefix.
    pub fn prefixed_key(&self, key: &str) -> String {
        format!("{}{key}", self.key_prefix)
    }

    /// Strip the configured prefix from a key returned by the server.
    pub fn unprefixed_key<'a>(&self, key: &'a str) -> &'a str {
        key.strip_prefix(self.key_prefix.as_str()).unwrap_or(key)
    }
}

impl std::fmt::Debug for RedisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisClient")
            .field("key_prefix", &self.key_prefix)
            .finish()
    }
}

/// Mask password in Redis URL for safe logging.
fn mask_redis_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            if colon_pos > scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}
