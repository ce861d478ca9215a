//! Repository traits consumed by the auth core, with their Postgres
//! implementations.

pub mod account;
pub mod group;
pub mod membership;

use async_trait::async_trait;
use uuid::Uuid;

use larder_core::error::{AppError, ErrorKind};
use larder_core::result::AppResult;
use larder_entity::account::{Account, CreateAccount, SealedField};
use larder_entity::group::{CreateGroup, Group, UpdateGroup};
use larder_entity::membership::{CreateMembership, GroupRole, Membership};

pub use account::PgAccountRepository;
pub use group::PgGroupRepository;
pub use membership::PgMembershipRepository;

/// Account lookups and updates. Username and email are only ever handled
/// as ciphertext.
#[async_trait]
pub trait AccountRepository: Send + Sync + std::fmt::Debug + 'static {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Exact-match lookup on the sealed email column.
    async fn find_by_email(&self, email: &SealedField) -> AppResult<Option<Account>>;

    async fn find_by_invitation_token(&self, token: &str) -> AppResult<Option<Account>>;

    async fn list(&self) -> AppResult<Vec<Account>>;

    /// Insert a new unverified account. A duplicate username or email
    /// yields [`ErrorKind::AlreadyExists`].
    async fn create(&self, data: &CreateAccount) -> AppResult<Account>;

    /// Consume the invitation token and mark the email verified.
    async fn mark_verified(&self, id: Uuid) -> AppResult<Account>;

    /// Store a fresh invitation token and reset the verified flag.
    async fn set_invitation_token(&self, id: Uuid, token: &str) -> AppResult<Account>;

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Account>;
}

/// Group (household) persistence.
#[async_trait]
pub trait GroupRepository: Send + Sync + std::fmt::Debug + 'static {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Group>>;

    /// Create a group and the creator's active owner membership together.
    /// A name already used by an active group yields
    /// [`ErrorKind::AlreadyExists`].
    async fn create_with_owner(&self, data: &CreateGroup) -> AppResult<(Group, Membership)>;

    /// Apply a partial update. Renaming onto a name held by another active
    /// group yields [`ErrorKind::AlreadyExists`].
    async fn update(&self, id: Uuid, data: &UpdateGroup) -> AppResult<Group>;

    /// Archive or restore a group. Restoring a group whose name has since
    /// been taken yields [`ErrorKind::AlreadyExists`].
    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Group>;

    /// Delete a group together with all of its memberships.
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Membership lookups and updates.
#[async_trait]
pub trait MembershipRepository: Send + Sync + std::fmt::Debug + 'static {
    async fn find(&self, account_id: Uuid, group_id: Uuid) -> AppResult<Option<Membership>>;

    async fn find_by_group(&self, group_id: Uuid) -> AppResult<Vec<Membership>>;

    async fn find_by_account(&self, account_id: Uuid) -> AppResult<Vec<Membership>>;

    /// A second membership for the same pair yields [`ErrorKind::AlreadyExists`].
    async fn create(&self, data: &CreateMembership) -> AppResult<Membership>;

    async fn update_role(
        &self,
        account_id: Uuid,
        group_id: Uuid,
        role: GroupRole,
    ) -> AppResult<Membership>;

    async fn set_active(
        &self,
        account_id: Uuid,
        group_id: Uuid,
        active: bool,
    ) -> AppResult<Membership>;

    async fn delete(&self, account_id: Uuid, group_id: Uuid) -> AppResult<()>;
}

/// Map a sqlx failure into the application taxonomy.
///
/// Connection-class failures are [`ErrorKind::Transient`]; unique
/// violations are [`ErrorKind::AlreadyExists`]; anything else is internal.
pub(crate) fn map_sqlx_error(context: &str, err: sqlx::Error) -> AppError {
    let kind = match &err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => ErrorKind::Transient,
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => ErrorKind::AlreadyExists,
        _ => ErrorKind::Internal,
    };
    AppError::with_source(kind, format!("{context}: {err}"), err)
}

/// Name of the violated constraint, if the error is a unique violation.
pub(crate) fn unique_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => db_err.constraint(),
        _ => None,
    }
}
