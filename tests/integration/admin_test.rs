//! Integration tests for account administration.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_admin_lists_accounts_with_plain_emails() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin_account("root@x.com").await;
    app.verified_account("b@x.com").await;

    let response = app
        .request("GET", "/api/admin/accounts", None, Some(&admin))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let emails: Vec<&str> = response.body["data"]
        .as_array()
        .expect("account list")
        .iter()
        .filter_map(|a| a["email"].as_str())
        .collect();
    assert!(emails.contains(&"root@x.com"));
    assert!(emails.contains(&"b@x.com"));
}

#[tokio::test]
async fn test_member_token_rejected_on_admin_routes() {
    let app = TestApp::new().await;
    let (_, member) = app.verified_account("b@x.com").await;

    let response = app
        .request("GET", "/api/admin/accounts", None, Some(&member))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "PRINCIPAL_TYPE_MISMATCH");
}

#[tokio::test]
async fn test_suspension_revokes_live_session() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin_account("root@x.com").await;
    let (b_id, b) = app.verified_account("b@x.com").await;

    let before = app.request("GET", "/api/auth/me", None, Some(&b)).await;
    assert_eq!(before.status, StatusCode::OK);

    let response = app
        .request(
            "PATCH",
            &format!("/api/admin/accounts/{b_id}/status"),
            Some(json!({ "is_active": false })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["is_active"], false);

    let after = app.request("GET", "/api/auth/me", None, Some(&b)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
    assert_eq!(after.error_code(), "SESSION_NOT_LIVE");

    let login = app.login("b@x.com", PASSWORD).await;
    assert_eq!(login.status, StatusCode::FORBIDDEN);
    assert_eq!(login.error_code(), "SUSPEND_MESSAGE");
    assert!(app.session_keys(b_id).await.is_empty());
}

#[tokio::test]
async fn test_reactivated_account_can_login_again() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin_account("root@x.com").await;
    let (b_id, _) = app.verified_account("b@x.com").await;
    let path = format!("/api/admin/accounts/{b_id}/status");

    app.request("PATCH", &path, Some(json!({ "is_active": false })), Some(&admin))
        .await;
    let restored = app
        .request("PATCH", &path, Some(json!({ "is_active": true })), Some(&admin))
        .await;
    assert_eq!(restored.status, StatusCode::OK);

    let login = app.login("b@x.com", PASSWORD).await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_cannot_suspend_self() {
    let app = TestApp::new().await;
    let (admin_id, admin) = app.admin_account("root@x.com").await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/admin/accounts/{admin_id}/status"),
            Some(json!({ "is_active": false })),
            Some(&admin),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_suspending_unknown_account() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin_account("root@x.com").await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/admin/accounts/{}/status", uuid::Uuid::new_v4()),
            Some(json!({ "is_active": false })),
            Some(&admin),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
