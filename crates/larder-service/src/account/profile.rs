//! Decrypted account view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use larder_auth::FieldCipher;
use larder_core::result::AppResult;
use larder_entity::account::{Account, GlobalRole};

/// An account with its sealed fields opened. Never carries the password
/// hash or the invitation token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: GlobalRole,
    pub is_active: bool,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl AccountProfile {
    pub fn open(account: &Account, cipher: &FieldCipher) -> AppResult<Self> {
        Ok(Self {
            id: account.id,
            username: cipher.open(&account.username)?,
            email: cipher.open(&account.email)?,
            role: account.role,
            is_active: account.is_active,
            email_verified: account.email_verified,
            created_at: account.created_at,
        })
    }
}
