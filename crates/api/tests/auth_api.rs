//! HTTP-level integration tests for registration, login, refresh, and logout.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, login_user, post_json, post_json_auth, register_user};

const PASSWORD: &str = "Secret123!";

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Successful registration returns 201 with the new account id.
#[tokio::test]
async fn test_register_success() {
    let (app, _engine) = build_test_app();

    let json = register_user(app, "new@test.com", PASSWORD).await;

    assert!(json["id"].is_string(), "response must contain a uuid id");
}

/// A malformed email, a weak password, and a duplicate email all return
/// 400 with the identical error body, so registration leaks nothing about
/// which emails already exist.
#[tokio::test]
async fn test_register_failures_are_indistinguishable() {
    let (app, _engine) = build_test_app();
    register_user(app.clone(), "taken@test.com", PASSWORD).await;

    let malformed = post_json(
        app.clone(),
        "/api/v1/auth/register",
        serde_json::json!({ "email": "not-an-email", "password": PASSWORD }),
    )
    .await;
    let weak = post_json(
        app.clone(),
        "/api/v1/auth/register",
        serde_json::json!({ "email": "weak@test.com", "password": "short" }),
    )
    .await;
    let duplicate = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({ "email": "taken@test.com", "password": PASSWORD }),
    )
    .await;

    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    assert_eq!(weak.status(), StatusCode::BAD_REQUEST);
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);

    let malformed = body_json(malformed).await;
    let weak = body_json(weak).await;
    let duplicate = body_json(duplicate).await;
    assert_eq!(malformed, weak);
    assert_eq!(malformed, duplicate);
}

/// Registration can carry initial profile fields.
#[tokio::test]
async fn test_register_with_profile() {
    let (app, _engine) = build_test_app();

    let body = serde_json::json!({
        "email": "profiled@test.com",
        "password": PASSWORD,
        "profile": { "first_name": "Ada", "last_name": "Lovelace" },
    });
    let response = post_json(app.clone(), "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let login = login_user(app.clone(), "profiled@test.com", PASSWORD).await;
    let token = login["access_token"].as_str().unwrap();

    let me = common::get_auth(app, "/api/v1/auth/me", token).await;
    let json = body_json(me).await;
    assert_eq!(json["data"]["profile"]["first_name"], "Ada");
    assert_eq!(json["data"]["profile"]["last_name"], "Lovelace");
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns 200 with both tokens and an expiry.
#[tokio::test]
async fn test_login_success() {
    let (app, _engine) = build_test_app();
    register_user(app.clone(), "login@test.com", PASSWORD).await;

    let json = login_user(app, "login@test.com", PASSWORD).await;

    assert!(json["access_token"]
        .as_str()
        .unwrap()
        .starts_with("v2.local."));
    assert!(json["session_token"].is_string());
    assert!(json["expires_at"].is_string());
}

/// A wrong password and an unknown email both return 401 with the same body.
#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let (app, _engine) = build_test_app();
    register_user(app.clone(), "victim@test.com", PASSWORD).await;

    let wrong_password = post_json(
        app.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "victim@test.com", "password": "WrongPass1" }),
    )
    .await;
    let unknown_email = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "ghost@test.com", "password": PASSWORD }),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(wrong_password).await, body_json(unknown_email).await);
}

// ---------------------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------------------

/// Refresh returns a fresh access token and leaves the session token usable.
#[tokio::test]
async fn test_refresh_success() {
    let (app, _engine) = build_test_app();
    register_user(app.clone(), "refresh@test.com", PASSWORD).await;
    let login = login_user(app.clone(), "refresh@test.com", PASSWORD).await;
    let session_token = login["session_token"].as_str().unwrap();

    let body = serde_json::json!({ "session_token": session_token });
    let response = post_json(app.clone(), "/api/v1/auth/refresh", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;
    assert_ne!(first["access_token"], login["access_token"]);

    // The session token is not rotated; a second refresh also succeeds.
    let response = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Refreshing with a token that never existed returns 401.
#[tokio::test]
async fn test_refresh_unknown_session() {
    let (app, _engine) = build_test_app();

    let body = serde_json::json!({ "session_token": "no-such-session" });
    let response = post_json(app, "/api/v1/auth/refresh", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "SESSION_NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

/// Logout requires authentication, kills the session, and is idempotent.
#[tokio::test]
async fn test_logout_flow() {
    let (app, _engine) = build_test_app();
    register_user(app.clone(), "logout@test.com", PASSWORD).await;
    let login = login_user(app.clone(), "logout@test.com", PASSWORD).await;
    let access_token = login["access_token"].as_str().unwrap();
    let session_token = login["session_token"].as_str().unwrap();
    let body = serde_json::json!({ "session_token": session_token });

    // Without a bearer token the endpoint rejects.
    let response = post_json(app.clone(), "/api/v1/auth/logout", body.clone()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Authenticated logout returns 204.
    let response =
        post_json_auth(app.clone(), "/api/v1/auth/logout", access_token, body.clone()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The session is gone.
    let response = post_json(app.clone(), "/api/v1/auth/refresh", body.clone()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Logging out the same session again is still 204.
    let response = post_json_auth(app, "/api/v1/auth/logout", access_token, body).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
