//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use larder_api::Repositories;
use larder_auth::{FieldCipher, PasswordHasher, invitation};
use larder_cache::{CacheManager, keys};
use larder_core::config::AppConfig;
use larder_core::traits::CacheProvider;
use larder_database::repositories::AccountRepository;
use larder_entity::account::{CreateAccount, GlobalRole};
use larder_service::RecordingNotifier;

pub const PASSWORD: &str = "Secret1!";

/// Test application over in-memory repositories and session store.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Captures invitation emails instead of sending them
    pub notifier: Arc<RecordingNotifier>,
    /// Session store behind the app
    pub cache: Arc<CacheManager>,
    accounts: Arc<dyn AccountRepository>,
    config: AppConfig,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.provider = "memory".to_string();
        config.cache.provider = "memory".to_string();
        config.auth.password_time_cost = 1;
        config.auth.password_memory_kib = 1024;

        let repos = Repositories::memory();
        let accounts = Arc::clone(&repos.accounts);
        let notifier = Arc::new(RecordingNotifier::new());

        let state = larder_api::build_state_with(config.clone(), repos, notifier.clone())
            .await
            .expect("Failed to build state");

        let cache = Arc::clone(&state.cache);
        Self {
            router: larder_api::build_app(state),
            notifier,
            cache,
            accounts,
            config,
        }
    }

    /// Every session key stored for the account: liveness entries, then
    /// the slot if one is claimed.
    pub async fn session_keys(&self, account_id: Uuid) -> Vec<String> {
        let mut found = self
            .cache
            .keys(&keys::session_pattern(account_id))
            .await
            .expect("Failed to list session entries");
        let slot = keys::session_slot(account_id);
        if self.cache.exists(&slot).await.expect("Failed to read session slot") {
            found.push(slot);
        }
        found
    }

    /// Register through the API and return the invitation token that was sent.
    pub async fn register(&self, email: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/register",
                Some(json!({ "email": email, "password": PASSWORD })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Register failed: {:?}",
            response.body
        );

        self.notifier
            .latest_token_for(email)
            .await
            .expect("No invitation recorded")
    }

    /// Register and verify; returns `(account_id, session_token)`.
    pub async fn verified_account(&self, email: &str) -> (Uuid, String) {
        let invitation = self.register(email).await;
        self.verify(&invitation).await
    }

    /// Seed an administrator directly in the store and verify it.
    pub async fn admin_account(&self, email: &str) -> (Uuid, String) {
        let cipher = FieldCipher::new(&self.config.auth).expect("cipher");
        let hasher = PasswordHasher::new(&self.config.auth).expect("hasher");
        let token = invitation::generate_token(16);

        self.accounts
            .create(&CreateAccount {
                username: cipher.seal(email).expect("seal"),
                email: cipher.seal(email).expect("seal"),
                password_hash: hasher.hash(PASSWORD).expect("hash"),
                role: GlobalRole::Administrator,
                invitation_token: token.clone(),
            })
            .await
            .expect("Failed to seed admin");

        self.verify(&token).await
    }

    pub async fn verify(&self, invitation: &str) -> (Uuid, String) {
        let response = self
            .request(
                "POST",
                "/api/auth/verify-email",
                Some(json!({ "token": invitation })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Verify failed: {:?}",
            response.body
        );

        let data = &response.body["data"];
        let id = data["account"]["id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .expect("No account id in session response");
        let token = data["token"]
            .as_str()
            .expect("No token in session response")
            .to_string();
        (id, token)
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": email, "password": password })),
            None,
        )
        .await
    }

    /// Create a group as `token` and return its id.
    pub async fn create_group(&self, token: &str, name: &str) -> Uuid {
        let response = self
            .request("POST", "/api/groups", Some(json!({ "name": name })), Some(token))
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Create group failed: {:?}",
            response.body
        );

        response.body["data"]["id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .expect("No group id")
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// Machine-readable error code from an error body.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
