//! Protected operations and the tier each one requires.

use serde::{Deserialize, Serialize};
use std::fmt;

use larder_entity::membership::GroupRole;

/// Whether an action reads or changes state.
///
/// Restricted roles keep read access and lose every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionClass {
    Read,
    Mutation,
}

/// Operations that do not target a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalAction {
    /// Read the caller's own profile.
    ViewProfile,
    /// List the caller's own memberships.
    ListOwnGroups,
    /// Create a new group.
    CreateGroup,
    /// List every account (admin surface).
    ViewAccounts,
    /// Suspend or reactivate an account (admin surface).
    ManageAccounts,
}

impl GlobalAction {
    pub fn class(&self) -> ActionClass {
        match self {
            Self::ViewProfile | Self::ListOwnGroups | Self::ViewAccounts => ActionClass::Read,
            Self::CreateGroup | Self::ManageAccounts => ActionClass::Mutation,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewProfile => "view_profile",
            Self::ListOwnGroups => "list_own_groups",
            Self::CreateGroup => "create_group",
            Self::ViewAccounts => "view_accounts",
            Self::ManageAccounts => "manage_accounts",
        }
    }
}

impl fmt::Display for GlobalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations scoped to one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupAction {
    ViewGroup,
    ListMembers,
    /// Rename the group or change its address.
    UpdateGroup,
    /// Archive or restore the whole group.
    SetGroupActive,
    DeleteGroup,
    AddMember,
    RemoveMember,
    UpdateMemberRole,
    SetMemberActive,
}

impl GroupAction {
    pub fn class(&self) -> ActionClass {
        match self {
            Self::ViewGroup | Self::ListMembers => ActionClass::Read,
            Self::UpdateGroup
            | Self::SetGroupActive
            | Self::DeleteGroup
            | Self::AddMember
            | Self::RemoveMember
            | Self::UpdateMemberRole
            | Self::SetMemberActive => ActionClass::Mutation,
        }
    }

    /// Lowest membership role allowed to perform the action.
    pub fn required_role(&self) -> GroupRole {
        match self {
            Self::ViewGroup | Self::ListMembers => GroupRole::Guest,
            Self::UpdateGroup | Self::AddMember | Self::RemoveMember => GroupRole::Administrator,
            Self::SetGroupActive
            | Self::DeleteGroup
            | Self::UpdateMemberRole
            | Self::SetMemberActive => GroupRole::Owner,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewGroup => "view_group",
            Self::ListMembers => "list_members",
            Self::UpdateGroup => "update_group",
            Self::SetGroupActive => "set_group_active",
            Self::DeleteGroup => "delete_group",
            Self::AddMember => "add_member",
            Self::RemoveMember => "remove_member",
            Self::UpdateMemberRole => "update_member_role",
            Self::SetMemberActive => "set_member_active",
        }
    }
}

impl fmt::Display for GroupAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
