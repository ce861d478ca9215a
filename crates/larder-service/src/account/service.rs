//! Registration, verification, login, and profile operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use larder_auth::invitation;
use larder_auth::{
    AuthorizationResolver, FieldCipher, GlobalAction, PasswordHasher, PasswordValidator,
    SessionGrant, SessionManager,
};
use larder_core::config::auth::AuthConfig;
use larder_core::error::AppError;
use larder_core::result::AppResult;
use larder_core::traits::{Invitation, InvitationKind, Notifier};
use larder_database::repositories::AccountRepository;
use larder_entity::account::{Account, CreateAccount, GlobalRole};

use super::profile::AccountProfile;
use crate::context::RequestContext;

/// Input for [`AccountService::register`].
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Login name; the email address when omitted.
    #[serde(default)]
    #[validate(length(max = 100, message = "Username must be at most 100 characters"))]
    pub username: Option<String>,
}

/// Handles the account lifecycle from registration to logout.
#[derive(Debug, Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    sessions: Arc<SessionManager>,
    resolver: Arc<AuthorizationResolver>,
    cipher: Arc<FieldCipher>,
    hasher: Arc<PasswordHasher>,
    validator: PasswordValidator,
    notifier: Arc<dyn Notifier>,
    invitation_token_bytes: usize,
}

impl AccountService {
    pub fn new(
        config: &AuthConfig,
        accounts: Arc<dyn AccountRepository>,
        sessions: Arc<SessionManager>,
        resolver: Arc<AuthorizationResolver>,
        cipher: Arc<FieldCipher>,
        hasher: Arc<PasswordHasher>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            accounts,
            sessions,
            resolver,
            cipher,
            hasher,
            validator: PasswordValidator::new(config),
            notifier,
            invitation_token_bytes: config.invitation_token_bytes,
        }
    }

    /// Create an unverified account and send its invitation.
    ///
    /// The account row is the source of truth: if the notifier fails the
    /// account stays, and the user can ask for a re-invite.
    pub async fn register(&self, req: RegisterRequest) -> AppResult<AccountProfile> {
        let req = RegisterRequest {
            email: SessionManager::normalize_email(&req.email),
            username: req
                .username
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
            ..req
        };
        req.validate()?;
        self.validator.validate(&req.password)?;

        let email = req.email.clone();
        let username = req.username.clone().unwrap_or_else(|| email.clone());

        let sealed_email = self.cipher.seal(&email)?;
        if self.accounts.find_by_email(&sealed_email).await?.is_some() {
            return Err(AppError::already_exists("Email already registered"));
        }

        let token = invitation::generate_token(self.invitation_token_bytes);
        let account = self
            .accounts
            .create(&CreateAccount {
                username: self.cipher.seal(&username)?,
                email: sealed_email,
                password_hash: self.hasher.hash(&req.password)?,
                role: GlobalRole::Viewer,
                invitation_token: token.clone(),
            })
            .await?;

        info!(account_id = %account.id, "Account registered");
        self.notify(&account, email.clone(), username.clone(), token, InvitationKind::Registration)
            .await;

        AccountProfile::open(&account, &self.cipher)
    }

    /// Issue a fresh invitation token to an unverified account.
    pub async fn reinvite(&self, email: &str) -> AppResult<()> {
        let email = SessionManager::normalize_email(email);
        let account = self
            .accounts
            .find_by_email(&self.cipher.seal(&email)?)
            .await?
            .ok_or_else(|| AppError::not_found("No account with that email"))?;

        if account.email_verified {
            return Err(AppError::conflict("Email is already verified"));
        }
        if !account.is_active {
            return Err(AppError::account_suspended(
                "Your account has been suspended, please contact support",
            ));
        }

        let token = invitation::generate_token(self.invitation_token_bytes);
        let account = self.accounts.set_invitation_token(account.id, &token).await?;
        let username = self.cipher.open(&account.username)?;

        info!(account_id = %account.id, "Invitation re-issued");
        self.notify(&account, email, username, token, InvitationKind::Reinvite)
            .await;
        Ok(())
    }

    pub async fn verify_email(&self, invitation_token: &str) -> AppResult<SessionGrant> {
        self.sessions.verify_email(invitation_token).await
    }

    pub async fn login(&self, email: &str, password: &str) -> AppResult<SessionGrant> {
        self.sessions.login(email, password).await
    }

    pub async fn logout(&self, ctx: &RequestContext) -> AppResult<()> {
        self.sessions.logout(&ctx.principal).await
    }

    /// The caller's own profile, read fresh from storage.
    pub async fn me(&self, ctx: &RequestContext) -> AppResult<AccountProfile> {
        self.resolver
            .check_global(&ctx.principal, GlobalAction::ViewProfile)?;

        let account = self
            .accounts
            .find_by_id(ctx.account_id())
            .await?
            .ok_or_else(|| AppError::not_found("Account not found"))?;
        AccountProfile::open(&account, &self.cipher)
    }

    async fn notify(
        &self,
        account: &Account,
        email: String,
        display_name: String,
        token: String,
        kind: InvitationKind,
    ) {
        let invitation = Invitation {
            email,
            display_name,
            token,
            kind,
        };
        if let Err(e) = self.notifier.send_invitation(&invitation).await {
            warn!(account_id = %account.id, error = %e, "Invitation delivery failed");
        }
    }
}
