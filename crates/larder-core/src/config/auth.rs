//! Credential, token, and role-policy configuration.

use serde::{Deserialize, Serialize};

const DEFAULT_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// Authentication and authorization configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC-SHA256 key signing the token envelope.
    #[serde(default = "default_secret")]
    pub signing_secret: String,
    /// Key material for the encrypted claims payload inside the envelope.
    #[serde(default = "default_secret")]
    pub payload_secret: String,
    /// Lifetime of both the token envelope and its session entry.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_ms: u64,
    /// AES-256 key for deterministic field encryption (64 hex characters).
    #[serde(default = "default_field_key")]
    pub field_key_hex: String,
    /// Fixed IV for deterministic field encryption (32 hex characters).
    #[serde(default = "default_field_iv")]
    pub field_iv_hex: String,
    /// Argon2 iteration count.
    #[serde(default = "default_time_cost")]
    pub password_time_cost: u32,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub password_memory_kib: u32,
    /// Argon2 lanes.
    #[serde(default = "default_parallelism")]
    pub password_parallelism: u32,
    /// Minimum password length accepted at registration.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Lowest zxcvbn strength score (0 to 4) accepted at registration.
    #[serde(default = "default_password_min_score")]
    pub password_min_score: u8,
    /// Random bytes in an invitation token (hex encoded, so twice as many characters).
    #[serde(default = "default_invitation_bytes")]
    pub invitation_token_bytes: usize,
    /// Global roles denied every mutation-class action.
    #[serde(default = "default_restricted_global_roles")]
    pub restricted_global_roles: Vec<String>,
    /// Group roles denied every mutation-class action inside their group.
    #[serde(default = "default_restricted_group_roles")]
    pub restricted_group_roles: Vec<String>,
    /// Global roles whose tokens carry the `admin` principal class.
    #[serde(default = "default_admin_roles")]
    pub admin_roles: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            signing_secret: default_secret(),
            payload_secret: default_secret(),
            session_ttl_ms: default_session_ttl(),
            field_key_hex: default_field_key(),
            field_iv_hex: default_field_iv(),
            password_time_cost: default_time_cost(),
            password_memory_kib: default_memory_kib(),
            password_parallelism: default_parallelism(),
            password_min_length: default_password_min(),
            password_min_score: default_password_min_score(),
            invitation_token_bytes: default_invitation_bytes(),
            restricted_global_roles: default_restricted_global_roles(),
            restricted_group_roles: default_restricted_group_roles(),
            admin_roles: default_admin_roles(),
        }
    }
}

impl AuthConfig {
    /// Whether any key material is still the shipped development default.
    pub fn uses_default_secrets(&self) -> bool {
        self.signing_secret == DEFAULT_SECRET
            || self.payload_secret == DEFAULT_SECRET
            || self.field_key_hex == default_field_key()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_secret", &"[REDACTED]")
            .field("payload_secret", &"[REDACTED]")
            .field("session_ttl_ms", &self.session_ttl_ms)
            .field("field_key_hex", &"[REDACTED]")
            .field("field_iv_hex", &"[REDACTED]")
            .field("password_time_cost", &self.password_time_cost)
            .field("password_memory_kib", &self.password_memory_kib)
            .field("password_parallelism", &self.password_parallelism)
            .field("password_min_length", &self.password_min_length)
            .field("password_min_score", &self.password_min_score)
            .field("invitation_token_bytes", &self.invitation_token_bytes)
            .field("restricted_global_roles", &self.restricted_global_roles)
            .field("restricted_group_roles", &self.restricted_group_roles)
            .field("admin_roles", &self.admin_roles)
            .finish()
    }
}

fn default_secret() -> String {
    DEFAULT_SECRET.to_string()
}

fn default_session_ttl() -> u64 {
    24 * 60 * 60 * 1000
}

fn default_field_key() -> String {
    "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f".to_string()
}

fn default_field_iv() -> String {
    "0f0e0d0c0b0a09080706050403020100".to_string()
}

fn default_time_cost() -> u32 {
    2
}

fn default_memory_kib() -> u32 {
    19 * 1024
}

fn default_parallelism() -> u32 {
    1
}

fn default_password_min() -> usize {
    8
}

fn default_password_min_score() -> u8 {
    1
}

fn default_invitation_bytes() -> usize {
    50
}

// Registration assigns `viewer`, so only `guest` is restricted account-wide.
fn default_restricted_global_roles() -> Vec<String> {
    vec!["guest".to_string()]
}

fn default_restricted_group_roles() -> Vec<String> {
    vec!["guest".to_string(), "viewer".to_string()]
}

fn default_admin_roles() -> Vec<String> {
    vec!["administrator".to_string()]
}
