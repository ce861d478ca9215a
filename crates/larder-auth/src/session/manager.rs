//! Session lifecycle: login, email verification, logout, and per-request
//! authentication.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use larder_core::config::auth::AuthConfig;
use larder_core::error::AppError;
use larder_core::result::AppResult;
use larder_database::repositories::AccountRepository;
use larder_entity::account::{Account, GlobalRole, PrincipalKind, RequiredPrincipal};

use crate::cipher::FieldCipher;
use crate::password::PasswordHasher;
use crate::token::{Claims, TokenCodec};

use super::store::SessionStore;

/// The authenticated identity behind one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub account_id: Uuid,
    pub email: String,
    pub name: String,
    pub kind: PrincipalKind,
    pub role: GlobalRole,
    /// The bearer token exactly as presented.
    pub token: String,
}

/// Result of a successful login or verification.
#[derive(Debug, Clone)]
pub struct SessionGrant {
    /// Live session token.
    pub token: String,
    /// Claims embedded in the token.
    pub claims: Claims,
    /// Time left on the token. A reused token reports what remains of its
    /// original lifetime.
    pub expires_in_ms: u64,
}

/// Drives the session lifecycle for accounts.
#[derive(Clone)]
pub struct SessionManager {
    accounts: Arc<dyn AccountRepository>,
    sessions: Arc<SessionStore>,
    codec: Arc<TokenCodec>,
    cipher: Arc<FieldCipher>,
    hasher: Arc<PasswordHasher>,
    admin_roles: Vec<GlobalRole>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("admin_roles", &self.admin_roles)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    pub fn new(
        config: &AuthConfig,
        accounts: Arc<dyn AccountRepository>,
        sessions: Arc<SessionStore>,
        codec: Arc<TokenCodec>,
        cipher: Arc<FieldCipher>,
        hasher: Arc<PasswordHasher>,
    ) -> AppResult<Self> {
        let admin_roles = config
            .admin_roles
            .iter()
            .map(|r| r.parse::<GlobalRole>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AppError::configuration(format!("auth.admin_roles: {}", e.message)))?;

        Ok(Self {
            accounts,
            sessions,
            codec,
            cipher,
            hasher,
            admin_roles,
        })
    }

    /// Normalize an email address the way it is stored.
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Password login.
    ///
    /// The password is checked before the account state, so a wrong
    /// password never reveals whether an account is suspended or
    /// unverified. A second login while a session is live returns the
    /// same token.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<SessionGrant> {
        let sealed = self.cipher.seal(&Self::normalize_email(email))?;
        let account = self
            .accounts
            .find_by_email(&sealed)
            .await?
            .ok_or_else(|| AppError::invalid_credentials("Invalid email or password"))?;

        if !self.hasher.verify(password, &account.password_hash)? {
            warn!(account_id = %account.id, "Login failed: wrong password");
            return Err(AppError::invalid_credentials("Invalid email or password"));
        }

        if !account.is_active {
            warn!(account_id = %account.id, "Login refused: account suspended");
            return Err(AppError::account_suspended(
                "Your account has been suspended, please contact support",
            ));
        }

        if !account.email_verified {
            return Err(AppError::email_not_verified(
                "Please verify your email address before logging in",
            ));
        }

        let grant = self.establish(&account).await?;
        info!(account_id = %account.id, "Login succeeded");
        Ok(grant)
    }

    /// Redeem an invitation token: mark the email verified and open the
    /// first session.
    pub async fn verify_email(&self, invitation_token: &str) -> AppResult<SessionGrant> {
        let account = self
            .accounts
            .find_by_invitation_token(invitation_token)
            .await?
            .ok_or_else(|| AppError::invitation_expired("Invitation link is invalid or expired"))?;

        if !account.is_active {
            return Err(AppError::account_suspended(
                "Your account has been suspended, please contact support",
            ));
        }

        let account = self.accounts.mark_verified(account.id).await?;
        let grant = self.establish(&account).await?;
        info!(account_id = %account.id, "Email verified");
        Ok(grant)
    }

    /// End every session of the calling principal.
    pub async fn logout(&self, principal: &Principal) -> AppResult<()> {
        self.sessions.revoke(principal.account_id).await?;
        info!(account_id = %principal.account_id, "Logged out");
        Ok(())
    }

    /// End every session of an account, whoever asked.
    pub async fn revoke_all(&self, account_id: Uuid) -> AppResult<u64> {
        self.sessions.revoke(account_id).await
    }

    /// Authenticate a request from its `Authorization` header value.
    ///
    /// Checks, in order: a bearer credential is present, the token
    /// verifies, its principal class is admitted by `required`, and its
    /// session entry is live.
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
        required: RequiredPrincipal,
    ) -> AppResult<Principal> {
        let token = bearer_token(authorization)
            .ok_or_else(|| AppError::missing_credentials("Authorization token is required"))?;

        let claims = self.codec.validate(token)?;

        if !required.admits(claims.kind) {
            return Err(AppError::principal_mismatch(format!(
                "This endpoint is not available to {} accounts",
                claims.kind
            )));
        }

        if !self.sessions.is_live(claims.id, token).await? {
            return Err(AppError::session_not_live(
                "Session has ended, please log in again",
            ));
        }

        Ok(Principal {
            account_id: claims.id,
            email: claims.email,
            name: claims.name,
            kind: claims.kind,
            role: claims.role,
            token: token.to_string(),
        })
    }

    /// Principal class a token for this account carries.
    pub fn principal_kind(&self, role: GlobalRole) -> PrincipalKind {
        if self.admin_roles.contains(&role) {
            PrincipalKind::Admin
        } else {
            PrincipalKind::Member
        }
    }

    /// Issue (or reuse) the account's session.
    ///
    /// Suspension writes the inactive flag before revoking sessions, so the
    /// account is read again once the session exists. A suspension that
    /// landed while this login was in flight then tears the new session
    /// down instead of leaving it live.
    async fn establish(&self, account: &Account) -> AppResult<SessionGrant> {
        let claims = Claims {
            id: account.id,
            email: self.cipher.open(&account.email)?,
            name: self.cipher.open(&account.username)?,
            kind: self.principal_kind(account.role),
            role: account.role,
        };
        let token = self.sessions.issue_or_reuse(&claims).await?;

        let still_active = self
            .accounts
            .find_by_id(account.id)
            .await?
            .is_some_and(|current| current.is_active);
        if !still_active {
            self.sessions.revoke(account.id).await?;
            warn!(account_id = %account.id, "Account suspended during login, session revoked");
            return Err(AppError::account_suspended(
                "Your account has been suspended, please contact support",
            ));
        }

        let expires_in_ms = self.remaining_ms(&token)?;
        Ok(SessionGrant {
            token,
            claims,
            expires_in_ms,
        })
    }

    fn remaining_ms(&self, token: &str) -> AppResult<u64> {
        let exp_ms = self.codec.expires_at(token)?.saturating_mul(1000);
        let left = exp_ms.saturating_sub(Utc::now().timestamp_millis()).max(0) as u64;
        Ok(left.min(self.sessions.ttl().as_millis() as u64))
    }
}

/// Extract the token from `Bearer <token>`. The scheme is case-insensitive.
fn bearer_token(header: Option<&str>) -> Option<&str> {
    let (scheme, token) = header?.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
