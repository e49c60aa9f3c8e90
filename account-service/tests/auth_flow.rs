mod support;

use axum::http::StatusCode;
use serde_json::json;
use support::{send, test_context};

#[tokio::test]
async fn health_endpoint_responds() {
    let ctx = test_context();
    let (status, body) = send(&ctx.app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_returns_sanitized_user_and_token() {
    let ctx = test_context();

    let (status, body) = send(
        &ctx.app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"email": "A@X.com", "password": "secret1", "name": "Ada"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "ok");
    let user = &body["data"]["user"];
    assert_eq!(user["email"], "a@x.com");
    assert_eq!(user["role"], "creator");
    assert_eq!(user["name"], "Ada");
    assert!(user.get("password_hash").is_none());
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));

    // The returned token is immediately usable on /me.
    let token = body["data"]["token"].as_str().unwrap().to_string();
    let (status, body) = send(&ctx.app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], "a@x.com");
}

#[tokio::test]
async fn register_validation_failures_are_400() {
    let ctx = test_context();

    let (status, body) = send(
        &ctx.app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"email": "a@x.com", "password": "short"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, _) = send(
        &ctx.app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"email": "", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    send(
        &ctx.app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"email": "a@x.com", "password": "secret1"})),
    )
    .await;
    let (status, body) = send(
        &ctx.app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"email": "a@x.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn login_failure_bodies_are_identical() {
    let ctx = test_context();

    send(
        &ctx.app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"email": "a@x.com", "password": "secret1"})),
    )
    .await;

    let (wrong_status, wrong_body) = send(
        &ctx.app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "a@x.com", "password": "nope"})),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &ctx.app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "ghost@x.com", "password": "secret1"})),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn me_requires_a_valid_token() {
    let ctx = test_context();

    let (status, body) = send(&ctx.app, "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "error");

    let (status, _) = send(&ctx.app, "GET", "/api/auth/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_returns_live_data_after_role_change() {
    let ctx = test_context();

    let (_, creator_body) = send(
        &ctx.app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"email": "a@x.com", "password": "secret1"})),
    )
    .await;
    let creator_token = creator_body["data"]["token"].as_str().unwrap().to_string();

    let (_, member_body) = send(
        &ctx.app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"email": "b@x.com", "password": "secret2"})),
    )
    .await;
    let member_token = member_body["data"]["token"].as_str().unwrap().to_string();
    let member_id = member_body["data"]["user"]["id"].as_i64().unwrap();

    send(
        &ctx.app,
        "PUT",
        &format!("/api/admin/users/{member_id}/role"),
        Some(&creator_token),
        Some(json!({"role": "admin"})),
    )
    .await;

    // The member's token still carries role "user", but /me re-fetches.
    let (status, body) = send(&ctx.app, "GET", "/api/auth/me", Some(&member_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["role"], "admin");
}
