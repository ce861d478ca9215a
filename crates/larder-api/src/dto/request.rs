//! Request DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use larder_entity::membership::GroupRole;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(length(min = 1, message = "Invitation token is required"))]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReinviteRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: GroupRole,
}

/// Body for membership, group, and account status changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}
