//! Group-scoped role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of an account inside one group.
///
/// Roles are ordered by privilege tier, lowest first:
/// Guest < Viewer < Member < ContentCreator < Moderator < Administrator < Owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "group_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GroupRole {
    Guest,
    Viewer,
    #[default]
    Member,
    #[sqlx(rename = "content creator")]
    #[serde(rename = "content creator")]
    ContentCreator,
    Moderator,
    Administrator,
    Owner,
}

impl GroupRole {
    pub const ALL: [GroupRole; 7] = [
        Self::Guest,
        Self::Viewer,
        Self::Member,
        Self::ContentCreator,
        Self::Moderator,
        Self::Administrator,
        Self::Owner,
    ];

    /// Privilege tier (higher = more privileged).
    pub fn tier(&self) -> u8 {
        match self {
            Self::Guest => 0,
            Self::Viewer => 1,
            Self::Member => 2,
            Self::ContentCreator => 3,
            Self::Moderator => 4,
            Self::Administrator => 5,
            Self::Owner => 6,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: GroupRole) -> bool {
        self.tier() >= other.tier()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Viewer => "viewer",
            Self::Member => "member",
            Self::ContentCreator => "content creator",
            Self::Moderator => "moderator",
            Self::Administrator => "administrator",
            Self::Owner => "owner",
        }
    }
}

impl fmt::Display for GroupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GroupRole {
    type Err = larder_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| {
                larder_core::AppError::validation(format!(
                    "Invalid group role: '{s}'. Expected one of: guest, viewer, member, \
                     content creator, moderator, administrator, owner"
                ))
            })
    }
}
