//! Composes the global gate and the group-scoped gate.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use larder_core::error::AppError;
use larder_core::result::AppResult;
use larder_database::repositories::MembershipRepository;
use larder_entity::membership::Membership;

use super::action::{ActionClass, GlobalAction, GroupAction};
use super::policy::RolePolicy;
use crate::session::Principal;

/// Decides whether a principal may perform an action.
///
/// Every failure is terminal for the request. Nothing here retries.
#[derive(Clone)]
pub struct AuthorizationResolver {
    policy: RolePolicy,
    memberships: Arc<dyn MembershipRepository>,
}

impl std::fmt::Debug for AuthorizationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationResolver")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl AuthorizationResolver {
    pub fn new(policy: RolePolicy, memberships: Arc<dyn MembershipRepository>) -> Self {
        Self {
            policy,
            memberships,
        }
    }

    pub fn policy(&self) -> &RolePolicy {
        &self.policy
    }

    /// Account-wide gate: restricted global roles lose every mutation.
    pub fn check_global(&self, principal: &Principal, action: GlobalAction) -> AppResult<()> {
        self.global_gate(principal, action.class(), action.as_str())
    }

    /// Group-scoped gate, run after the global gate.
    ///
    /// Outcomes in order: no membership is a denial, an inactive membership
    /// is locked, a restricted membership role is denied mutations, and a
    /// role below the action's tier is denied. On success the caller's
    /// membership is returned.
    pub async fn check_group(
        &self,
        principal: &Principal,
        group_id: Uuid,
        action: GroupAction,
    ) -> AppResult<Membership> {
        self.global_gate(principal, action.class(), action.as_str())?;

        let membership = self
            .memberships
            .find(principal.account_id, group_id)
            .await?
            .ok_or_else(|| AppError::permission_denied("You are not a member of this group"))?;

        if !membership.is_active {
            debug!(
                account_id = %principal.account_id,
                group_id = %group_id,
                "Scoped gate: membership locked"
            );
            return Err(AppError::access_locked(
                "Your access to this group has been suspended",
            ));
        }

        if action.class() == ActionClass::Mutation
            && self.policy.is_restricted_group(membership.role)
        {
            return Err(AppError::permission_denied(format!(
                "The {} role cannot {action}",
                membership.role
            )));
        }

        let required = action.required_role();
        if !membership.role.has_at_least(required) {
            return Err(AppError::permission_denied(format!(
                "{action} requires the {required} role in this group"
            )));
        }

        Ok(membership)
    }

    fn global_gate(&self, principal: &Principal, class: ActionClass, action: &str) -> AppResult<()> {
        if class == ActionClass::Mutation && self.policy.is_restricted_global(principal.role) {
            debug!(
                account_id = %principal.account_id,
                role = %principal.role,
                action,
                "Global gate denied"
            );
            return Err(AppError::permission_denied(format!(
                "Your account role does not allow {action}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::error::ErrorKind;
    use larder_database::memory::MemoryMembershipRepository;
    use larder_entity::account::{GlobalRole, PrincipalKind};
    use larder_entity::membership::{CreateMembership, GroupRole};

    fn principal(role: GlobalRole) -> Principal {
        Principal {
            account_id: Uuid::now_v7(),
            email: "a@x.com".to_string(),
            name: "a".to_string(),
            kind: PrincipalKind::Member,
            role,
            token: "t".to_string(),
        }
    }

    fn resolver(policy: RolePolicy) -> (AuthorizationResolver, Arc<MemoryMembershipRepository>) {
        let repo = Arc::new(MemoryMembershipRepository::new());
        (AuthorizationResolver::new(policy, repo.clone()), repo)
    }

    fn default_policy() -> RolePolicy {
        RolePolicy::new([GlobalRole::Guest], [GroupRole::Guest, GroupRole::Viewer])
    }

    async fn join(repo: &MemoryMembershipRepository, who: &Principal, group: Uuid, role: GroupRole) {
        repo.create(&CreateMembership {
            account_id: who.account_id,
            group_id: group,
            role,
        })
        .await
        .unwrap();
    }

    #[test]
    fn test_global_gate_blocks_only_mutations() {
        let (resolver, _) = resolver(default_policy());
        let guest = principal(GlobalRole::Guest);

        let err = resolver
            .check_global(&guest, GlobalAction::CreateGroup)
            .unwrap_err();
        assert!(err.is(ErrorKind::PermissionDenied));
        assert!(resolver.check_global(&guest, GlobalAction::ViewProfile).is_ok());

        let viewer = principal(GlobalRole::Viewer);
        assert!(resolver.check_global(&viewer, GlobalAction::CreateGroup).is_ok());
    }

    #[tokio::test]
    async fn test_non_member_is_denied() {
        let (resolver, _) = resolver(default_policy());
        let err = resolver
            .check_group(&principal(GlobalRole::Member), Uuid::now_v7(), GroupAction::ViewGroup)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::PermissionDenied));
    }

    #[tokio::test]
    async fn test_inactive_membership_is_locked_not_denied() {
        let (resolver, repo) = resolver(default_policy());
        let who = principal(GlobalRole::Member);
        let group = Uuid::now_v7();
        join(&repo, &who, group, GroupRole::Owner).await;
        repo.set_active(who.account_id, group, false).await.unwrap();

        for action in [GroupAction::ViewGroup, GroupAction::UpdateMemberRole] {
            let err = resolver.check_group(&who, group, action).await.unwrap_err();
            assert!(err.is(ErrorKind::AccessLocked), "{action}");
        }
    }

    #[tokio::test]
    async fn test_tier_gates_privileged_actions() {
        let (resolver, repo) = resolver(default_policy());
        let who = principal(GlobalRole::Member);
        let group = Uuid::now_v7();
        join(&repo, &who, group, GroupRole::Member).await;

        assert!(resolver.check_group(&who, group, GroupAction::ListMembers).await.is_ok());
        let err = resolver
            .check_group(&who, group, GroupAction::UpdateMemberRole)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::PermissionDenied));

        repo.update_role(who.account_id, group, GroupRole::Owner)
            .await
            .unwrap();
        let membership = resolver
            .check_group(&who, group, GroupAction::UpdateMemberRole)
            .await
            .unwrap();
        assert_eq!(membership.role, GroupRole::Owner);
    }

    #[tokio::test]
    async fn test_restricted_roles_never_pass_scoped_mutations() {
        // Restrict the top tier so the restriction, not the tier, is what denies.
        let (resolver, repo) = resolver(RolePolicy::new([], [GroupRole::Owner]));
        let who = principal(GlobalRole::Administrator);

        for _ in 0..3 {
            let group = Uuid::now_v7();
            join(&repo, &who, group, GroupRole::Owner).await;

            for action in [
                GroupAction::AddMember,
                GroupAction::UpdateMemberRole,
                GroupAction::SetMemberActive,
            ] {
                let err = resolver.check_group(&who, group, action).await.unwrap_err();
                assert!(err.is(ErrorKind::PermissionDenied), "{action}");
            }
            assert!(resolver.check_group(&who, group, GroupAction::ViewGroup).await.is_ok());
        }
    }

    #[tokio::test]
    async fn test_restricted_global_role_blocks_scoped_mutations() {
        let (resolver, repo) = resolver(default_policy());
        let who = principal(GlobalRole::Guest);
        let group = Uuid::now_v7();
        join(&repo, &who, group, GroupRole::Owner).await;

        let err = resolver
            .check_group(&who, group, GroupAction::AddMember)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::PermissionDenied));
        assert!(resolver.check_group(&who, group, GroupAction::ViewGroup).await.is_ok());
    }
}
