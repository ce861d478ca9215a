//! Global account role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account-wide role, independent of any group membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "global_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GlobalRole {
    Guest,
    #[default]
    Viewer,
    Member,
    #[sqlx(rename = "content creator")]
    #[serde(rename = "content creator")]
    ContentCreator,
    Moderator,
    Owner,
    Administrator,
}

impl GlobalRole {
    /// Every role, for validation messages and exhaustive tests.
    pub const ALL: [GlobalRole; 7] = [
        Self::Guest,
        Self::Viewer,
        Self::Member,
        Self::ContentCreator,
        Self::Moderator,
        Self::Owner,
        Self::Administrator,
    ];

    /// Return the role as stored and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Viewer => "viewer",
            Self::Member => "member",
            Self::ContentCreator => "content creator",
            Self::Moderator => "moderator",
            Self::Owner => "owner",
            Self::Administrator => "administrator",
        }
    }
}

impl fmt::Display for GlobalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GlobalRole {
    type Err = larder_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| {
                larder_core::AppError::validation(format!(
                    "Invalid global role: '{s}'. Expected one of: guest, viewer, member, \
                     content creator, moderator, owner, administrator"
                ))
            })
    }
}
