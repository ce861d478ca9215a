//! Group entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A household sharing inventory between its members.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: Uuid,
    /// Display name, unique among active groups.
    pub name: String,
    pub address: Option<String>,
    pub is_active: bool,
    /// Account that created the group and holds its first owner membership.
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a group.
#[derive(Debug, Clone)]
pub struct CreateGroup {
    pub name: String,
    pub address: Option<String>,
    pub created_by: Uuid,
}

/// Partial update of a group. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateGroup {
    pub name: Option<String>,
    pub address: Option<String>,
}
