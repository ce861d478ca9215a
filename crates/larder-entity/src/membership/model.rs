//! Membership entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::GroupRole;

/// Links one account to one group with a group-scoped role.
///
/// At most one membership exists per `(account_id, group_id)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Membership {
    pub id: Uuid,
    pub account_id: Uuid,
    pub group_id: Uuid,
    pub role: GroupRole,
    /// Cleared when the member is suspended from the group; the row stays.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a membership.
#[derive(Debug, Clone)]
pub struct CreateMembership {
    pub account_id: Uuid,
    pub group_id: Uuid,
    pub role: GroupRole,
}
