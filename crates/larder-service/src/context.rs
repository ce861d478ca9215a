//! Request context carrying the authenticated principal.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use larder_auth::Principal;
use larder_entity::account::{GlobalRole, PrincipalKind};
use larder_entity::membership::{GroupRole, Membership};

/// Who is calling, for exactly one request.
///
/// Built by the API layer after authentication and passed by reference
/// into every service method. Once a group-scoped check passes, the
/// caller's membership is attached with [`RequestContext::scoped`].
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated principal.
    pub principal: Principal,
    /// The caller's membership in the group being operated on.
    pub membership: Option<Membership>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            membership: None,
            request_time: Utc::now(),
        }
    }

    /// A copy of this context bound to one group membership.
    pub fn scoped(&self, membership: Membership) -> Self {
        Self {
            principal: self.principal.clone(),
            membership: Some(membership),
            request_time: self.request_time,
        }
    }

    pub fn account_id(&self) -> Uuid {
        self.principal.account_id
    }

    pub fn role(&self) -> GlobalRole {
        self.principal.role
    }

    /// Role in the scoped group, if any.
    pub fn group_role(&self) -> Option<GroupRole> {
        self.membership.as_ref().map(|m| m.role)
    }

    /// The raw bearer token of this request.
    pub fn token(&self) -> &str {
        &self.principal.token
    }

    pub fn is_admin(&self) -> bool {
        self.principal.kind == PrincipalKind::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_keeps_principal() {
        let account_id = Uuid::now_v7();
        let ctx = RequestContext::new(Principal {
            account_id,
            email: "a@x.com".to_string(),
            name: "a".to_string(),
            kind: PrincipalKind::Member,
            role: GlobalRole::Viewer,
            token: "tok".to_string(),
        });
        assert_eq!(ctx.group_role(), None);

        let scoped = ctx.scoped(Membership {
            id: Uuid::now_v7(),
            account_id,
            group_id: Uuid::now_v7(),
            role: GroupRole::Moderator,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        assert_eq!(scoped.group_role(), Some(GroupRole::Moderator));
        assert_eq!(scoped.account_id(), account_id);
        assert_eq!(scoped.token(), "tok");
        assert!(!scoped.is_admin());
    }
}
