//! Services wired over in-memory backends.

use std::sync::Arc;

use larder_auth::{
    AuthorizationResolver, FieldCipher, PasswordHasher, RolePolicy, SessionGrant, SessionManager,
    SessionStore, TokenCodec, invitation,
};
use larder_cache::CacheManager;
use larder_cache::memory::MemoryCacheProvider;
use larder_core::config::auth::AuthConfig;
use larder_core::config::cache::MemoryCacheConfig;
use larder_database::memory::{
    MemoryAccountRepository, MemoryGroupRepository, MemoryMembershipRepository,
};
use larder_database::repositories::AccountRepository;
use larder_entity::account::{CreateAccount, GlobalRole, RequiredPrincipal};

use crate::account::{AccountService, AdminAccountService};
use crate::context::RequestContext;
use crate::group::GroupService;
use crate::notification::RecordingNotifier;

pub(crate) struct Harness {
    pub accounts: AccountService,
    pub admin: AdminAccountService,
    pub groups: GroupService,
    pub sessions: Arc<SessionManager>,
    pub notifier: Arc<RecordingNotifier>,
    account_repo: Arc<MemoryAccountRepository>,
    cipher: Arc<FieldCipher>,
    hasher: Arc<PasswordHasher>,
}

impl Harness {
    pub fn new() -> Self {
        let config = AuthConfig {
            password_time_cost: 1,
            password_memory_kib: 1024,
            ..AuthConfig::default()
        };

        let account_repo = Arc::new(MemoryAccountRepository::new());
        let membership_repo = Arc::new(MemoryMembershipRepository::new());
        let group_repo = Arc::new(MemoryGroupRepository::new(Arc::clone(&membership_repo)));
        let cache = Arc::new(CacheManager::from_provider(Arc::new(
            MemoryCacheProvider::new(&MemoryCacheConfig::default()),
        )));

        let codec = Arc::new(TokenCodec::new(&config).unwrap());
        let cipher = Arc::new(FieldCipher::new(&config).unwrap());
        let hasher = Arc::new(PasswordHasher::new(&config).unwrap());
        let store = Arc::new(SessionStore::new(
            cache,
            Arc::clone(&codec),
            config.session_ttl_ms,
        ));
        let sessions = Arc::new(
            SessionManager::new(
                &config,
                account_repo.clone(),
                store,
                codec,
                Arc::clone(&cipher),
                Arc::clone(&hasher),
            )
            .unwrap(),
        );
        let resolver = Arc::new(AuthorizationResolver::new(
            RolePolicy::from_config(&config).unwrap(),
            membership_repo.clone(),
        ));
        let notifier = Arc::new(RecordingNotifier::new());

        Self {
            accounts: AccountService::new(
                &config,
                account_repo.clone(),
                Arc::clone(&sessions),
                Arc::clone(&resolver),
                Arc::clone(&cipher),
                Arc::clone(&hasher),
                notifier.clone(),
            ),
            admin: AdminAccountService::new(
                account_repo.clone(),
                Arc::clone(&sessions),
                Arc::clone(&resolver),
                Arc::clone(&cipher),
            ),
            groups: GroupService::new(
                group_repo,
                membership_repo,
                account_repo.clone(),
                resolver,
                Arc::clone(&cipher),
            ),
            sessions,
            notifier,
            account_repo,
            cipher,
            hasher,
        }
    }

    /// Seed a verified account with the given global role and log it in.
    /// Returns the session token and the full grant.
    pub async fn verified_account(&self, email: &str, role: GlobalRole) -> (String, SessionGrant) {
        let token = invitation::generate_token(16);
        self.account_repo
            .create(&CreateAccount {
                username: self.cipher.seal(email).unwrap(),
                email: self.cipher.seal(email).unwrap(),
                password_hash: self.hasher.hash("Secret1!").unwrap(),
                role,
                invitation_token: token.clone(),
            })
            .await
            .unwrap();
        let grant = self.sessions.verify_email(&token).await.unwrap();
        (grant.token.clone(), grant)
    }

    pub async fn context(&self, token: &str) -> RequestContext {
        let principal = self
            .sessions
            .authenticate(Some(&format!("Bearer {token}")), RequiredPrincipal::Any)
            .await
            .unwrap();
        RequestContext::new(principal)
    }
}
