//! Cache provider trait for pluggable key-value backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for key-value backends (Redis or in-memory) backing the session store.
///
/// Values are plain strings. TTLs are honoured per entry with millisecond
/// precision, and a failure to reach the backend surfaces as
/// [`ErrorKind::Transient`](crate::error::ErrorKind::Transient).
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with a TTL, replacing any previous value.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a key exists and has not expired.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Set a value only if the key does not already exist (NX).
    ///
    /// The check and the write are one atomic step. Returns `true` if this
    /// call stored the value, `false` if a live value was already present.
    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool>;

    /// Delete a key only if it currently holds `expected`, as one atomic
    /// step. Returns `true` if the key was removed.
    async fn compare_and_delete(&self, key: &str, expected: &str) -> AppResult<bool>;

    /// List live keys matching a glob pattern (only `*` is interpreted).
    async fn keys(&self, pattern: &str) -> AppResult<Vec<String>>;

    /// Delete all keys matching a glob pattern. Returns the number removed.
    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
