//! Health endpoint tests.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get};

/// GET /health reports ok when no database pool is configured.
#[tokio::test]
async fn test_health_ok() {
    let (app, _engine) = build_test_app();

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert!(json["version"].is_string());
}
