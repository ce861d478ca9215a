//! Application builder: wires repositories, auth, and services into
//! `AppState`, and state plus middleware into an Axum app.

use std::sync::Arc;

use axum::Router;
use tracing::info;

use larder_auth::{
    AuthorizationResolver, FieldCipher, PasswordHasher, RolePolicy, SessionManager, SessionStore,
    TokenCodec,
};
use larder_cache::CacheManager;
use larder_core::config::AppConfig;
use larder_core::error::AppError;
use larder_core::result::AppResult;
use larder_core::traits::Notifier;
use larder_database::memory::{
    MemoryAccountRepository, MemoryGroupRepository, MemoryMembershipRepository,
};
use larder_database::repositories::{
    AccountRepository, GroupRepository, MembershipRepository, PgAccountRepository,
    PgGroupRepository, PgMembershipRepository,
};
use larder_database::{DatabasePool, migration};
use larder_service::{AccountService, AdminAccountService, GroupService};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// The relational backends a state is built over.
pub struct Repositories {
    pub accounts: Arc<dyn AccountRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub memberships: Arc<dyn MembershipRepository>,
    pub pool: Option<DatabasePool>,
}

impl Repositories {
    /// Process-local repositories with no durable storage.
    pub fn memory() -> Self {
        let memberships = Arc::new(MemoryMembershipRepository::new());
        Self {
            accounts: Arc::new(MemoryAccountRepository::new()),
            groups: Arc::new(MemoryGroupRepository::new(Arc::clone(&memberships))),
            memberships,
            pool: None,
        }
    }
}

/// Construct every shared component from configuration.
///
/// Key material and role names are validated here, so a bad
/// configuration fails at startup rather than on the first request.
pub async fn build_state(config: AppConfig, notifier: Arc<dyn Notifier>) -> AppResult<AppState> {
    let repos = connect_repositories(&config).await?;
    build_state_with(config, repos, notifier).await
}

/// Same as [`build_state`] over caller-supplied repositories.
pub async fn build_state_with(
    config: AppConfig,
    repos: Repositories,
    notifier: Arc<dyn Notifier>,
) -> AppResult<AppState> {
    // ── Step 1: Session store backend ────────────────────────────
    info!(provider = %config.cache.provider, "Initializing cache");
    let cache = Arc::new(CacheManager::new(&config.cache).await?);

    // ── Step 2: Auth core ────────────────────────────────────────
    let codec = Arc::new(TokenCodec::new(&config.auth)?);
    let cipher = Arc::new(FieldCipher::new(&config.auth)?);
    let hasher = Arc::new(PasswordHasher::new(&config.auth)?);
    let store = Arc::new(SessionStore::new(
        Arc::clone(&cache),
        Arc::clone(&codec),
        config.auth.session_ttl_ms,
    ));
    let session_manager = Arc::new(SessionManager::new(
        &config.auth,
        Arc::clone(&repos.accounts),
        store,
        codec,
        Arc::clone(&cipher),
        Arc::clone(&hasher),
    )?);
    let resolver = Arc::new(AuthorizationResolver::new(
        RolePolicy::from_config(&config.auth)?,
        Arc::clone(&repos.memberships),
    ));

    // ── Step 3: Services ─────────────────────────────────────────
    let account_service = Arc::new(AccountService::new(
        &config.auth,
        Arc::clone(&repos.accounts),
        Arc::clone(&session_manager),
        Arc::clone(&resolver),
        Arc::clone(&cipher),
        hasher,
        notifier,
    ));
    let admin_account_service = Arc::new(AdminAccountService::new(
        Arc::clone(&repos.accounts),
        Arc::clone(&session_manager),
        Arc::clone(&resolver),
        Arc::clone(&cipher),
    ));
    let group_service = Arc::new(GroupService::new(
        repos.groups,
        repos.memberships,
        repos.accounts,
        resolver,
        cipher,
    ));

    Ok(AppState {
        config: Arc::new(config),
        cache,
        database: repos.pool,
        session_manager,
        account_service,
        admin_account_service,
        group_service,
    })
}

async fn connect_repositories(config: &AppConfig) -> AppResult<Repositories> {
    match config.database.provider.as_str() {
        "postgres" => {
            let pool = DatabasePool::connect(&config.database).await?;
            migration::run_migrations(pool.pool()).await?;

            Ok(Repositories {
                accounts: Arc::new(PgAccountRepository::new(pool.pool().clone())),
                groups: Arc::new(PgGroupRepository::new(pool.pool().clone())),
                memberships: Arc::new(PgMembershipRepository::new(pool.pool().clone())),
                pool: Some(pool),
            })
        }
        "memory" => {
            info!("Using in-memory repositories; data is lost on restart");
            Ok(Repositories::memory())
        }
        other => Err(AppError::configuration(format!(
            "Unknown database provider: '{other}'. Supported: postgres, memory"
        ))),
    }
}
