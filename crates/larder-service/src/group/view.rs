//! Response shapes for group operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use larder_entity::group::Group;
use larder_entity::membership::{GroupRole, Membership};

/// A group together with the caller's membership in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupView {
    #[serde(flatten)]
    pub group: Group,
    /// The caller's role in the group.
    pub role: GroupRole,
    /// Whether the caller's membership is active.
    pub membership_active: bool,
}

impl GroupView {
    pub fn new(group: Group, membership: &Membership) -> Self {
        Self {
            group,
            role: membership.role,
            membership_active: membership.is_active,
        }
    }
}

/// One member of a group, with decrypted identity fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberView {
    pub account_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: GroupRole,
    pub is_active: bool,
    pub joined_at: DateTime<Utc>,
}
