//! Basic Auth gate tests.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use entre_nous_integration_tests::{TestApp, basic_auth, read_json};

#[tokio::test]
async fn missing_header_responds_401_with_challenge() {
    let app = TestApp::seeded();

    let response = app.get("/api/auth/verify").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok()),
        Some("Basic realm=\"Admin Area\"")
    );
    assert_eq!(read_json(response).await["error"], "Authentication required");
}

#[tokio::test]
async fn wrong_password_responds_401() {
    let app = TestApp::seeded();

    let response = app
        .send(
            Request::builder()
                .uri("/api/auth/verify")
                .header(header::AUTHORIZATION, basic_auth("admin", "wrong"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok()),
        Some("Basic realm=\"Admin Area\"")
    );
    assert_eq!(read_json(response).await["error"], "Invalid credentials");
}

#[tokio::test]
async fn non_basic_scheme_is_treated_as_missing() {
    let app = TestApp::seeded();

    let response = app
        .send(
            Request::builder()
                .uri("/api/auth/verify")
                .header(header::AUTHORIZATION, "Bearer some-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(read_json(response).await["error"], "Authentication required");
}

#[tokio::test]
async fn seeded_credentials_verify() {
    let app = TestApp::seeded();

    let response = app.admin("GET", "/api/auth/verify").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Authenticated");
}

#[tokio::test]
async fn credential_document_on_disk_is_authoritative() {
    let app = TestApp::seeded();

    // Replace the admin credentials; no restart is needed because the
    // document is re-read on every request.
    std::fs::write(
        app.data_dir().join("config.json"),
        serde_json::to_vec_pretty(&serde_json::json!({
            "admin": {"username": "root", "password": "hunter2"}
        }))
        .unwrap(),
    )
    .unwrap();

    let response = app
        .send(
            Request::builder()
                .uri("/api/auth/verify")
                .header(header::AUTHORIZATION, basic_auth("root", "hunter2"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.admin("GET", "/api/auth/verify").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
