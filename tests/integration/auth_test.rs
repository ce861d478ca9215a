//! Integration tests for registration, verification and session flows.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_register_returns_unverified_profile() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "  A@X.com ", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let data = &response.body["data"];
    assert_eq!(data["email"], "a@x.com");
    assert_eq!(data["email_verified"], false);
    assert_eq!(data["role"], "viewer");
    assert!(data.get("password_hash").is_none());
    assert!(app.notifier.latest_token_for("a@x.com").await.is_some());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new().await;
    app.register("dup@x.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "DUP@x.com", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "ALREADY_EXIST");
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "weak@x.com", "password": "short" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION");
}

#[tokio::test]
async fn test_login_before_verification_is_refused() {
    let app = TestApp::new().await;
    let registered = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "a@x.com", "password": PASSWORD })),
            None,
        )
        .await;
    let account_id = registered.body["data"]["id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .expect("No account id");

    let response = app.login("a@x.com", PASSWORD).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VERIFY_EMAIL");
    assert!(response.body.get("data").is_none());
    assert!(app.session_keys(account_id).await.is_empty());
}

#[tokio::test]
async fn test_verify_then_login_reuses_session() {
    let app = TestApp::new().await;
    let invitation = app.register("a@x.com").await;

    let (_, t1) = app.verify(&invitation).await;

    let response = app.login("a@x.com", PASSWORD).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["token"], t1.as_str());
    assert_eq!(response.body["data"]["account"]["type"], "member");
    let expires_in_ms = response.body["data"]["expires_in_ms"]
        .as_u64()
        .expect("No expiry");
    assert!(expires_in_ms > 0 && expires_in_ms <= 86_400_000);

    let me = app.request("GET", "/api/auth/me", None, Some(&t1)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["email"], "a@x.com");
    assert_eq!(me.body["data"]["email_verified"], true);
}

#[tokio::test]
async fn test_invitation_token_is_single_use() {
    let app = TestApp::new().await;
    let invitation = app.register("once@x.com").await;
    app.verify(&invitation).await;

    let response = app
        .request(
            "POST",
            "/api/auth/verify-email",
            Some(json!({ "token": invitation })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::GONE);
    assert_eq!(response.error_code(), "INVITATION_EXPIRED");
}

#[tokio::test]
async fn test_reinvite_rotates_token() {
    let app = TestApp::new().await;
    let first = app.register("late@x.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/reinvite",
            Some(json!({ "email": "late@x.com" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let second = app
        .notifier
        .latest_token_for("late@x.com")
        .await
        .expect("reinvite recorded");
    assert_ne!(first, second);

    let stale = app
        .request(
            "POST",
            "/api/auth/verify-email",
            Some(json!({ "token": first })),
            None,
        )
        .await;
    assert_eq!(stale.status, StatusCode::GONE);

    app.verify(&second).await;
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email_look_alike() {
    let app = TestApp::new().await;
    let (id, token) = app.verified_account("a@x.com").await;
    app.request("POST", "/api/auth/logout", None, Some(&token))
        .await;

    let wrong = app.login("a@x.com", "Wrong1!!").await;
    let unknown = app.login("nobody@x.com", PASSWORD).await;

    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.error_code(), "INVALID_CREDENTIALS");
    assert_eq!(wrong.body, unknown.body);
    assert!(app.session_keys(id).await.is_empty());
}

#[tokio::test]
async fn test_login_with_blank_fields_rejected() {
    let app = TestApp::new().await;

    let response = app.login("", "").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION");
}

#[tokio::test]
async fn test_logout_kills_session() {
    let app = TestApp::new().await;
    let (_, token) = app.verified_account("a@x.com").await;

    let response = app
        .request("POST", "/api/auth/logout", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    assert_eq!(me.error_code(), "SESSION_NOT_LIVE");

    let again = app.login("a@x.com", PASSWORD).await;
    assert_eq!(again.status, StatusCode::OK);
    assert_ne!(again.body["data"]["token"], token.as_str());
}

#[tokio::test]
async fn test_me_without_credentials() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/auth/me", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "MISSING_CREDENTIALS");
}

#[tokio::test]
async fn test_me_with_garbage_token() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", "/api/auth/me", None, Some("not-a-token"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_TOKEN");
}

#[tokio::test]
async fn test_health_reports_memory_backends() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["database"], "memory");
}
