//! Response DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use larder_auth::SessionGrant;
use larder_entity::account::{GlobalRole, PrincipalKind};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Returned by login and email verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    /// Milliseconds left on the token. A reused token reports what remains
    /// of its original lifetime.
    pub expires_in_ms: u64,
    pub account: SessionAccount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAccount {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PrincipalKind,
    pub role: GlobalRole,
}

impl SessionResponse {
    pub fn new(grant: SessionGrant) -> Self {
        Self {
            token: grant.token,
            expires_in_ms: grant.expires_in_ms,
            account: SessionAccount {
                id: grant.claims.id,
                email: grant.claims.email,
                name: grant.claims.name,
                kind: grant.claims.kind,
                role: grant.claims.role,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub cache: String,
    pub database: String,
}
