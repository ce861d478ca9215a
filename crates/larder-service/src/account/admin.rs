//! Administrator account management.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use larder_auth::{AuthorizationResolver, FieldCipher, GlobalAction, SessionManager};
use larder_core::error::AppError;
use larder_core::result::AppResult;
use larder_database::repositories::AccountRepository;

use super::profile::AccountProfile;
use crate::context::RequestContext;

/// Account operations reserved for admin principals.
#[derive(Debug, Clone)]
pub struct AdminAccountService {
    accounts: Arc<dyn AccountRepository>,
    sessions: Arc<SessionManager>,
    resolver: Arc<AuthorizationResolver>,
    cipher: Arc<FieldCipher>,
}

impl AdminAccountService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        sessions: Arc<SessionManager>,
        resolver: Arc<AuthorizationResolver>,
        cipher: Arc<FieldCipher>,
    ) -> Self {
        Self {
            accounts,
            sessions,
            resolver,
            cipher,
        }
    }

    /// Every account, newest first, with sealed fields opened.
    pub async fn list_accounts(&self, ctx: &RequestContext) -> AppResult<Vec<AccountProfile>> {
        self.require_admin(ctx)?;
        self.resolver
            .check_global(&ctx.principal, GlobalAction::ViewAccounts)?;

        self.accounts
            .list()
            .await?
            .iter()
            .map(|a| AccountProfile::open(a, &self.cipher))
            .collect()
    }

    /// Suspend or reactivate an account.
    ///
    /// Suspension revokes every live session of the target before
    /// returning, so its next request fails authentication.
    pub async fn set_account_active(
        &self,
        ctx: &RequestContext,
        account_id: Uuid,
        active: bool,
    ) -> AppResult<AccountProfile> {
        self.require_admin(ctx)?;
        self.resolver
            .check_global(&ctx.principal, GlobalAction::ManageAccounts)?;

        if account_id == ctx.account_id() {
            return Err(AppError::conflict("You cannot change your own account status"));
        }

        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Account {account_id} not found")))?;

        if account.is_active == active {
            let state = if active { "active" } else { "suspended" };
            return Err(AppError::conflict(format!("Account is already {state}")));
        }

        let account = self.accounts.set_active(account_id, active).await?;
        if !active {
            let revoked = self.sessions.revoke_all(account_id).await?;
            info!(
                account_id = %account_id,
                admin_id = %ctx.account_id(),
                revoked,
                "Account suspended"
            );
        } else {
            info!(account_id = %account_id, admin_id = %ctx.account_id(), "Account reactivated");
        }

        AccountProfile::open(&account, &self.cipher)
    }

    fn require_admin(&self, ctx: &RequestContext) -> AppResult<()> {
        if !ctx.is_admin() {
            return Err(AppError::permission_denied("Administrator access required"));
        }
        Ok(())
    }
}
