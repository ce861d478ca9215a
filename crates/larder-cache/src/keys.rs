//! Cache key builders for session entries.
//!
//! The liveness entry layout `user-t-<account_id>:<token>` is a wire
//! contract shared with anything else reading the same Redis.

use uuid::Uuid;

/// Prefix applied to all session keys.
pub const SESSION_PREFIX: &str = "user-t-";

/// Liveness entry for one issued token.
pub fn session_entry(account_id: Uuid, token: &str) -> String {
    format!("{SESSION_PREFIX}{account_id}:{token}")
}

/// Pattern matching every liveness entry of an account.
pub fn session_pattern(account_id: Uuid) -> String {
    format!("{SESSION_PREFIX}{account_id}:*")
}

/// Per-account slot naming the current token. It has no `:` suffix, so
/// [`session_pattern`] never matches it.
pub fn session_slot(account_id: Uuid) -> String {
    format!("{SESSION_PREFIX}{account_id}")
}
