//! Account entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::GlobalRole;
use super::sealed::SealedField;

/// A registered account. Username and email are stored encrypted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Encrypted login name (unique).
    pub username: SealedField,
    /// Encrypted, lowercased email address (unique).
    pub email: SealedField,
    /// Argon2 PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Account-wide role.
    pub role: GlobalRole,
    /// Cleared by an administrator to suspend the account.
    pub is_active: bool,
    /// Set once the invitation token has been redeemed.
    pub email_verified: bool,
    /// Pending one-time invitation token.
    #[serde(skip_serializing)]
    pub invitation_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new account.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub username: SealedField,
    pub email: SealedField,
    pub password_hash: String,
    pub role: GlobalRole,
    pub invitation_token: String,
}
