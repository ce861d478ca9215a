//! Single-live-session store on top of the cache provider.
//!
//! Layout per account:
//!
//! - `user-t-<id>:<token>` = `"true"`, one per live token (the liveness entry)
//! - `user-t-<id>` = `<token>`, the slot naming the current token
//!
//! Claiming the slot with set-if-absent is what serialises concurrent
//! logins: exactly one caller's candidate token wins, and every other
//! caller discards its own and returns the winner's.
//!
//! A losing candidate's liveness entry is written before the slot race
//! and deleted after it, so for that short window a second entry exists.
//! Its token was never handed out, so nothing can authenticate with it,
//! and `revoke` removes it along with the rest. If the delete itself
//! fails the entry simply expires with its TTL.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use larder_cache::keys;
use larder_cache::provider::CacheManager;
use larder_core::error::AppError;
use larder_core::result::AppResult;
use larder_core::traits::CacheProvider;

use crate::token::{Claims, TokenCodec};

/// Value stored in every liveness entry.
const LIVE_MARKER: &str = "true";

/// Rounds of claim-or-reuse before giving up on a contended slot.
const MAX_ISSUE_ATTEMPTS: usize = 5;

/// Maps `(account, token)` to liveness with a TTL.
#[derive(Debug, Clone)]
pub struct SessionStore {
    cache: Arc<CacheManager>,
    codec: Arc<TokenCodec>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(cache: Arc<CacheManager>, codec: Arc<TokenCodec>, ttl_ms: u64) -> Self {
        Self {
            cache,
            codec,
            ttl: Duration::from_millis(ttl_ms.max(1)),
        }
    }

    /// Session lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the account's live token, or mint and store a new one.
    ///
    /// Concurrent calls for the same account all return the same token.
    /// A reused token keeps its original expiry.
    pub async fn issue_or_reuse(&self, claims: &Claims) -> AppResult<String> {
        let account_id = claims.id;
        let slot = keys::session_slot(account_id);

        for attempt in 0..MAX_ISSUE_ATTEMPTS {
            if let Some(existing) = self.cache.get(&slot).await? {
                if self.is_live(account_id, &existing).await? {
                    debug!(account_id = %account_id, "Reusing live session");
                    return Ok(existing);
                }
                // The slot outlived its entry (revoked or expired); clear it
                // only if nobody has replaced it meanwhile.
                self.cache.compare_and_delete(&slot, &existing).await?;
            }

            let candidate = self.codec.issue(claims)?;
            let entry = keys::session_entry(account_id, &candidate);
            self.cache.set(&entry, LIVE_MARKER, self.ttl).await?;

            if self.cache.set_nx(&slot, &candidate, self.ttl).await? {
                info!(account_id = %account_id, "Session issued");
                return Ok(candidate);
            }

            // Another caller claimed the slot first; drop our candidate and
            // pick up theirs on the next round.
            self.cache.delete(&entry).await?;
            debug!(account_id = %account_id, attempt, "Lost session slot race");
        }

        warn!(account_id = %account_id, "Session slot stayed contended");
        Err(AppError::transient(
            "Could not establish a session, please retry",
        ))
    }

    /// Whether `(account_id, token)` has a live entry.
    pub async fn is_live(&self, account_id: Uuid, token: &str) -> AppResult<bool> {
        self.cache
            .exists(&keys::session_entry(account_id, token))
            .await
    }

    /// Delete every session entry of the account. Returns how many entries
    /// were removed.
    pub async fn revoke(&self, account_id: Uuid) -> AppResult<u64> {
        self.cache.delete(&keys::session_slot(account_id)).await?;
        let removed = self
            .cache
            .delete_pattern(&keys::session_pattern(account_id))
            .await?;
        info!(account_id = %account_id, removed, "Sessions revoked");
        Ok(removed)
    }
}
