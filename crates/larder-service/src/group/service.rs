//! Group operations behind the two-tier authorization gates.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use larder_auth::{AuthorizationResolver, FieldCipher, GlobalAction, GroupAction, SessionManager};
use larder_core::error::AppError;
use larder_core::result::AppResult;
use larder_database::repositories::{AccountRepository, GroupRepository, MembershipRepository};
use larder_entity::group::{CreateGroup, Group, UpdateGroup};
use larder_entity::membership::{CreateMembership, GroupRole, Membership};

use super::view::{GroupView, MemberView};
use crate::context::RequestContext;

/// Input for [`GroupService::create_group`].
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 100, message = "Group name must be 1 to 100 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,
}

/// Input for [`GroupService::update_group`]. Omitted fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateGroupRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Group name must be 1 to 100 characters"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,
}

/// Input for [`GroupService::add_member`].
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddMemberRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub role: GroupRole,
}

/// Creates groups and manages their memberships.
#[derive(Debug, Clone)]
pub struct GroupService {
    groups: Arc<dyn GroupRepository>,
    memberships: Arc<dyn MembershipRepository>,
    accounts: Arc<dyn AccountRepository>,
    resolver: Arc<AuthorizationResolver>,
    cipher: Arc<FieldCipher>,
}

impl GroupService {
    pub fn new(
        groups: Arc<dyn GroupRepository>,
        memberships: Arc<dyn MembershipRepository>,
        accounts: Arc<dyn AccountRepository>,
        resolver: Arc<AuthorizationResolver>,
        cipher: Arc<FieldCipher>,
    ) -> Self {
        Self {
            groups,
            memberships,
            accounts,
            resolver,
            cipher,
        }
    }

    /// Create a group owned by the caller.
    pub async fn create_group(
        &self,
        ctx: &RequestContext,
        req: CreateGroupRequest,
    ) -> AppResult<GroupView> {
        self.resolver
            .check_global(&ctx.principal, GlobalAction::CreateGroup)?;

        let req = CreateGroupRequest {
            name: req.name.trim().to_string(),
            address: trimmed(req.address),
        };
        req.validate()?;

        let (group, owner) = self
            .groups
            .create_with_owner(&CreateGroup {
                name: req.name,
                address: req.address,
                created_by: ctx.account_id(),
            })
            .await?;

        info!(group_id = %group.id, account_id = %ctx.account_id(), "Group created");
        Ok(GroupView::new(group, &owner))
    }

    pub async fn get_group(&self, ctx: &RequestContext, group_id: Uuid) -> AppResult<GroupView> {
        let group = self.find_group(group_id).await?;
        let scoped = self.authorize(ctx, group_id, GroupAction::ViewGroup).await?;
        let membership = scoped.membership.as_ref().ok_or_else(missing_scope)?;
        Ok(GroupView::new(group, membership))
    }

    /// Rename the group or change its address.
    pub async fn update_group(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
        req: UpdateGroupRequest,
    ) -> AppResult<GroupView> {
        self.find_group(group_id).await?;
        let scoped = self.authorize(ctx, group_id, GroupAction::UpdateGroup).await?;

        let req = UpdateGroupRequest {
            name: req.name.map(|n| n.trim().to_string()),
            address: trimmed(req.address),
        };
        req.validate()?;

        let group = self
            .groups
            .update(
                group_id,
                &UpdateGroup {
                    name: req.name,
                    address: req.address,
                },
            )
            .await?;

        info!(group_id = %group_id, account_id = %ctx.account_id(), "Group updated");
        let membership = scoped.membership.as_ref().ok_or_else(missing_scope)?;
        Ok(GroupView::new(group, membership))
    }

    /// Archive or restore a group.
    ///
    /// An archived group is invisible to every other operation, but its
    /// owners can still restore it.
    pub async fn set_group_active(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
        active: bool,
    ) -> AppResult<GroupView> {
        let current = self.find_any_group(group_id).await?;
        let scoped = self
            .authorize(ctx, group_id, GroupAction::SetGroupActive)
            .await?;
        if current.is_active == active {
            let state = if active { "active" } else { "archived" };
            return Err(AppError::conflict(format!("Group is already {state}")));
        }

        let group = self.groups.set_active(group_id, active).await?;

        info!(group_id = %group_id, account_id = %ctx.account_id(), active, "Group status changed");
        let membership = scoped.membership.as_ref().ok_or_else(missing_scope)?;
        Ok(GroupView::new(group, membership))
    }

    /// Delete a group and every membership in it.
    pub async fn delete_group(&self, ctx: &RequestContext, group_id: Uuid) -> AppResult<()> {
        self.find_any_group(group_id).await?;
        self.authorize(ctx, group_id, GroupAction::DeleteGroup)
            .await?;

        self.groups.delete(group_id).await?;
        info!(group_id = %group_id, account_id = %ctx.account_id(), "Group deleted");
        Ok(())
    }

    /// Add an existing account to the group.
    ///
    /// The granted role may not exceed the caller's own role in the group.
    pub async fn add_member(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
        req: AddMemberRequest,
    ) -> AppResult<MemberView> {
        self.find_group(group_id).await?;
        let scoped = self.authorize(ctx, group_id, GroupAction::AddMember).await?;
        let caller_role = scoped.group_role().ok_or_else(missing_scope)?;
        if !caller_role.has_at_least(req.role) {
            return Err(AppError::permission_denied(format!(
                "A {caller_role} cannot grant the {} role",
                req.role
            )));
        }

        let req = AddMemberRequest {
            email: SessionManager::normalize_email(&req.email),
            ..req
        };
        req.validate()?;
        let account = self
            .accounts
            .find_by_email(&self.cipher.seal(&req.email)?)
            .await?
            .ok_or_else(|| AppError::not_found("No account with that email"))?;

        let membership = self
            .memberships
            .create(&CreateMembership {
                account_id: account.id,
                group_id,
                role: req.role,
            })
            .await?;

        info!(
            group_id = %group_id,
            account_id = %account.id,
            added_by = %ctx.account_id(),
            role = %membership.role,
            "Member added"
        );
        self.member_view(&membership).await
    }

    /// Remove another member from the group.
    ///
    /// Nobody can remove a member who outranks them.
    pub async fn remove_member(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
        account_id: Uuid,
    ) -> AppResult<()> {
        self.find_group(group_id).await?;
        let scoped = self
            .authorize(ctx, group_id, GroupAction::RemoveMember)
            .await?;
        if account_id == ctx.account_id() {
            return Err(AppError::conflict("You cannot remove yourself from a group"));
        }

        let caller_role = scoped.group_role().ok_or_else(missing_scope)?;
        let target = self
            .memberships
            .find(account_id, group_id)
            .await?
            .ok_or_else(|| AppError::not_found("Account is not a member of this group"))?;
        if !caller_role.has_at_least(target.role) {
            return Err(AppError::permission_denied(format!(
                "A {caller_role} cannot remove a {}",
                target.role
            )));
        }

        self.memberships.delete(account_id, group_id).await?;
        info!(
            group_id = %group_id,
            account_id = %account_id,
            removed_by = %ctx.account_id(),
            "Member removed"
        );
        Ok(())
    }

    /// Change another member's role.
    pub async fn update_member_role(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
        account_id: Uuid,
        role: GroupRole,
    ) -> AppResult<MemberView> {
        self.find_group(group_id).await?;
        self.authorize(ctx, group_id, GroupAction::UpdateMemberRole)
            .await?;
        if account_id == ctx.account_id() {
            return Err(AppError::conflict("You cannot change your own role"));
        }

        let membership = self
            .memberships
            .update_role(account_id, group_id, role)
            .await?;

        info!(group_id = %group_id, account_id = %account_id, role = %role, "Member role updated");
        self.member_view(&membership).await
    }

    /// Suspend or restore another member's access to the group.
    pub async fn set_member_active(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
        account_id: Uuid,
        active: bool,
    ) -> AppResult<MemberView> {
        self.find_group(group_id).await?;
        self.authorize(ctx, group_id, GroupAction::SetMemberActive)
            .await?;
        if account_id == ctx.account_id() {
            return Err(AppError::conflict("You cannot change your own membership status"));
        }

        let current = self
            .memberships
            .find(account_id, group_id)
            .await?
            .ok_or_else(|| AppError::not_found("Account is not a member of this group"))?;
        if current.is_active == active {
            let state = if active { "active" } else { "suspended" };
            return Err(AppError::conflict(format!("Membership is already {state}")));
        }

        let membership = self
            .memberships
            .set_active(account_id, group_id, active)
            .await?;

        info!(group_id = %group_id, account_id = %account_id, active, "Membership status changed");
        self.member_view(&membership).await
    }

    pub async fn list_members(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
    ) -> AppResult<Vec<MemberView>> {
        self.find_group(group_id).await?;
        self.authorize(ctx, group_id, GroupAction::ListMembers)
            .await?;

        let mut members = Vec::new();
        for membership in self.memberships.find_by_group(group_id).await? {
            members.push(self.member_view(&membership).await?);
        }
        Ok(members)
    }

    /// Every group the caller belongs to, including suspended memberships.
    pub async fn my_groups(&self, ctx: &RequestContext) -> AppResult<Vec<GroupView>> {
        self.resolver
            .check_global(&ctx.principal, GlobalAction::ListOwnGroups)?;

        let mut views = Vec::new();
        for membership in self.memberships.find_by_account(ctx.account_id()).await? {
            if let Some(group) = self.groups.find_by_id(membership.group_id).await? {
                if group.is_active {
                    views.push(GroupView::new(group, &membership));
                }
            }
        }
        Ok(views)
    }

    async fn find_group(&self, group_id: Uuid) -> AppResult<Group> {
        self.find_any_group(group_id)
            .await
            .and_then(|g| if g.is_active { Ok(g) } else { Err(group_not_found(group_id)) })
    }

    /// Like `find_group`, but archived groups are returned too.
    async fn find_any_group(&self, group_id: Uuid) -> AppResult<Group> {
        self.groups
            .find_by_id(group_id)
            .await?
            .ok_or_else(|| group_not_found(group_id))
    }

    async fn authorize(
        &self,
        ctx: &RequestContext,
        group_id: Uuid,
        action: GroupAction,
    ) -> AppResult<RequestContext> {
        let membership = self
            .resolver
            .check_group(&ctx.principal, group_id, action)
            .await?;
        Ok(ctx.scoped(membership))
    }

    async fn member_view(&self, membership: &Membership) -> AppResult<MemberView> {
        let account = self
            .accounts
            .find_by_id(membership.account_id)
            .await?
            .ok_or_else(|| {
                AppError::internal(format!(
                    "Membership {} references a missing account",
                    membership.id
                ))
            })?;

        Ok(MemberView {
            account_id: account.id,
            username: self.cipher.open(&account.username)?,
            email: self.cipher.open(&account.email)?,
            role: membership.role,
            is_active: membership.is_active,
            joined_at: membership.created_at,
        })
    }
}

fn group_not_found(group_id: Uuid) -> AppError {
    AppError::not_found(format!("Group {group_id} not found"))
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn missing_scope() -> AppError {
    AppError::internal("Scoped context is missing its membership")
}
