//! Integration tests for group membership and scoped authorization.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_creator_owns_new_group() {
    let app = TestApp::new().await;
    let (_, token) = app.verified_account("a@x.com").await;

    let group_id = app.create_group(&token, "Flat 4B").await;

    let response = app
        .request("GET", &format!("/api/groups/{group_id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["name"], "Flat 4B");
    assert_eq!(response.body["data"]["role"], "owner");

    let mine = app.request("GET", "/api/groups", None, Some(&token)).await;
    assert_eq!(mine.status, StatusCode::OK);
    assert_eq!(mine.body["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_blank_group_name_rejected() {
    let app = TestApp::new().await;
    let (_, token) = app.verified_account("a@x.com").await;

    let response = app
        .request("POST", "/api/groups", Some(json!({ "name": "   " })), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_member_is_denied() {
    let app = TestApp::new().await;
    let (_, owner) = app.verified_account("a@x.com").await;
    let (_, stranger) = app.verified_account("s@x.com").await;
    let group_id = app.create_group(&owner, "Home").await;

    let response = app
        .request("GET", &format!("/api/groups/{group_id}"), None, Some(&stranger))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "PERMISSION_DENIED");
}

#[tokio::test]
async fn test_owner_tier_required_until_promoted() {
    let app = TestApp::new().await;
    let (_, a) = app.verified_account("a@x.com").await;
    let (b_id, b) = app.verified_account("b@x.com").await;
    let (c_id, _) = app.verified_account("c@x.com").await;
    let group_id = app.create_group(&a, "Home").await;
    let members = format!("/api/groups/{group_id}/members");

    for email in ["b@x.com", "c@x.com"] {
        let added = app
            .request(
                "POST",
                &members,
                Some(json!({ "email": email, "role": "member" })),
                Some(&a),
            )
            .await;
        assert_eq!(added.status, StatusCode::CREATED, "{:?}", added.body);
    }

    let change_c = format!("/api/groups/{group_id}/members/{c_id}/role");
    let denied = app
        .request("PUT", &change_c, Some(json!({ "role": "viewer" })), Some(&b))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.error_code(), "PERMISSION_DENIED");

    let promoted = app
        .request(
            "PUT",
            &format!("/api/groups/{group_id}/members/{b_id}/role"),
            Some(json!({ "role": "owner" })),
            Some(&a),
        )
        .await;
    assert_eq!(promoted.status, StatusCode::OK);
    assert_eq!(promoted.body["data"]["role"], "owner");

    // Same token: group roles are read per request, not from the session.
    let allowed = app
        .request("PUT", &change_c, Some(json!({ "role": "viewer" })), Some(&b))
        .await;
    assert_eq!(allowed.status, StatusCode::OK);
    assert_eq!(allowed.body["data"]["role"], "viewer");
}

#[tokio::test]
async fn test_suspended_membership_is_locked() {
    let app = TestApp::new().await;
    let (_, a) = app.verified_account("a@x.com").await;
    let (b_id, b) = app.verified_account("b@x.com").await;
    let group_id = app.create_group(&a, "Home").await;

    app.request(
        "POST",
        &format!("/api/groups/{group_id}/members"),
        Some(json!({ "email": "b@x.com" })),
        Some(&a),
    )
    .await;

    let suspended = app
        .request(
            "PATCH",
            &format!("/api/groups/{group_id}/members/{b_id}/status"),
            Some(json!({ "is_active": false })),
            Some(&a),
        )
        .await;
    assert_eq!(suspended.status, StatusCode::OK);
    assert_eq!(suspended.body["data"]["is_active"], false);

    let response = app
        .request("GET", &format!("/api/groups/{group_id}"), None, Some(&b))
        .await;
    assert_eq!(response.status, StatusCode::LOCKED);
    assert_eq!(response.error_code(), "ACCESS_LOCKED");

    let mine = app.request("GET", "/api/groups", None, Some(&b)).await;
    assert_eq!(mine.status, StatusCode::OK);
    assert_eq!(mine.body["data"][0]["membership_active"], false);
}

#[tokio::test]
async fn test_restricted_group_role_cannot_mutate() {
    let app = TestApp::new().await;
    let (_, a) = app.verified_account("a@x.com").await;
    let (_, v) = app.verified_account("v@x.com").await;
    app.verified_account("c@x.com").await;
    let group_id = app.create_group(&a, "Home").await;
    let members = format!("/api/groups/{group_id}/members");

    app.request(
        "POST",
        &members,
        Some(json!({ "email": "v@x.com", "role": "viewer" })),
        Some(&a),
    )
    .await;

    let listed = app.request("GET", &members, None, Some(&v)).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["data"].as_array().map(Vec::len), Some(2));

    let add = app
        .request(
            "POST",
            &members,
            Some(json!({ "email": "c@x.com", "role": "guest" })),
            Some(&v),
        )
        .await;
    assert_eq!(add.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cannot_grant_above_own_role() {
    let app = TestApp::new().await;
    let (_, a) = app.verified_account("a@x.com").await;
    let (b_id, b) = app.verified_account("b@x.com").await;
    app.verified_account("c@x.com").await;
    let group_id = app.create_group(&a, "Home").await;
    let members = format!("/api/groups/{group_id}/members");

    app.request(
        "POST",
        &members,
        Some(json!({ "email": "b@x.com", "role": "member" })),
        Some(&a),
    )
    .await;
    app.request(
        "PUT",
        &format!("/api/groups/{group_id}/members/{b_id}/role"),
        Some(json!({ "role": "administrator" })),
        Some(&a),
    )
    .await;

    let too_high = app
        .request(
            "POST",
            &members,
            Some(json!({ "email": "c@x.com", "role": "owner" })),
            Some(&b),
        )
        .await;
    assert_eq!(too_high.status, StatusCode::FORBIDDEN);

    let ok = app
        .request(
            "POST",
            &members,
            Some(json!({ "email": "c@x.com", "role": "moderator" })),
            Some(&b),
        )
        .await;
    assert_eq!(ok.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_unknown_group_is_not_found() {
    let app = TestApp::new().await;
    let (_, token) = app.verified_account("a@x.com").await;

    let response = app
        .request(
            "GET",
            &format!("/api/groups/{}", uuid::Uuid::new_v4()),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_token_rejected_on_member_routes() {
    let app = TestApp::new().await;
    let (_, admin) = app.admin_account("root@x.com").await;

    let response = app.request("GET", "/api/groups", None, Some(&admin)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "PRINCIPAL_TYPE_MISMATCH");
}

#[tokio::test]
async fn test_rename_archive_and_restore() {
    let app = TestApp::new().await;
    let (_, owner) = app.verified_account("a@x.com").await;
    let (_, other) = app.verified_account("o@x.com").await;
    let group_id = app.create_group(&owner, "Home").await;
    let path = format!("/api/groups/{group_id}");

    let renamed = app
        .request(
            "PUT",
            &path,
            Some(json!({ "name": "Lake House", "address": "2 Shore Rd" })),
            Some(&owner),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK, "{:?}", renamed.body);
    assert_eq!(renamed.body["data"]["name"], "Lake House");

    let status = format!("{path}/status");
    let archived = app
        .request("PATCH", &status, Some(json!({ "is_active": false })), Some(&owner))
        .await;
    assert_eq!(archived.status, StatusCode::OK);
    assert_eq!(archived.body["data"]["is_active"], false);

    let hidden = app.request("GET", &path, None, Some(&owner)).await;
    assert_eq!(hidden.status, StatusCode::NOT_FOUND);

    // The archived name is free again, so restoring the original collides.
    app.create_group(&other, "lake house").await;
    let restore = app
        .request("PATCH", &status, Some(json!({ "is_active": true })), Some(&owner))
        .await;
    assert_eq!(restore.status, StatusCode::CONFLICT);
    assert_eq!(restore.error_code(), "ALREADY_EXIST");
}

#[tokio::test]
async fn test_delete_group_requires_owner() {
    let app = TestApp::new().await;
    let (_, owner) = app.verified_account("a@x.com").await;
    let (_, admin) = app.verified_account("b@x.com").await;
    let group_id = app.create_group(&owner, "Home").await;
    let path = format!("/api/groups/{group_id}");

    app.request(
        "POST",
        &format!("{path}/members"),
        Some(json!({ "email": "b@x.com", "role": "administrator" })),
        Some(&owner),
    )
    .await;

    let denied = app.request("DELETE", &path, None, Some(&admin)).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let deleted = app.request("DELETE", &path, None, Some(&owner)).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let gone = app.request("GET", &path, None, Some(&owner)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    let mine = app.request("GET", "/api/groups", None, Some(&admin)).await;
    assert_eq!(mine.body["data"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_remove_member() {
    let app = TestApp::new().await;
    let (owner_id, owner) = app.verified_account("a@x.com").await;
    let (_, admin) = app.verified_account("b@x.com").await;
    let (c_id, c) = app.verified_account("c@x.com").await;
    let group_id = app.create_group(&owner, "Home").await;
    let members = format!("/api/groups/{group_id}/members");

    for (email, role) in [("b@x.com", "administrator"), ("c@x.com", "member")] {
        app.request(
            "POST",
            &members,
            Some(json!({ "email": email, "role": role })),
            Some(&owner),
        )
        .await;
    }

    let outranked = app
        .request("DELETE", &format!("{members}/{owner_id}"), None, Some(&admin))
        .await;
    assert_eq!(outranked.status, StatusCode::FORBIDDEN);

    let removed = app
        .request("DELETE", &format!("{members}/{c_id}"), None, Some(&admin))
        .await;
    assert_eq!(removed.status, StatusCode::OK);

    let after = app
        .request("GET", &format!("/api/groups/{group_id}"), None, Some(&c))
        .await;
    assert_eq!(after.status, StatusCode::FORBIDDEN);
    assert_eq!(after.error_code(), "PERMISSION_DENIED");
}

#[tokio::test]
async fn test_add_member_with_malformed_email() {
    let app = TestApp::new().await;
    let (_, owner) = app.verified_account("a@x.com").await;
    let group_id = app.create_group(&owner, "Home").await;

    let response = app
        .request(
            "POST",
            &format!("/api/groups/{group_id}/members"),
            Some(json!({ "email": "not-an-email" })),
            Some(&owner),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION");
}
