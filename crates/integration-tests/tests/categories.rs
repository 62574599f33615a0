//! Category API tests.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use entre_nous_integration_tests::{TestApp, read_json};
use serde_json::json;

#[tokio::test]
async fn categories_are_seeded_on_first_run() {
    let app = TestApp::seeded();

    let response = app.get("/api/categories").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(
        body,
        json!(["Figures", "Apparel", "Manga", "Posters", "Accessories", "Plush"])
    );
}

#[tokio::test]
async fn adding_a_category_requires_credentials() {
    let app = TestApp::seeded();

    let response = app
        .json("POST", "/api/categories", &json!({"category": "Keychains"}))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn adding_a_category_appends_and_returns_full_list() {
    let app = TestApp::seeded();

    let response = app
        .admin_json("POST", "/api/categories", &json!({"category": "Keychains"}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    let categories = body.as_array().unwrap();
    assert_eq!(categories.len(), 7);
    assert_eq!(categories.last().unwrap(), "Keychains");
}

#[tokio::test]
async fn adding_an_existing_category_is_a_no_op() {
    let app = TestApp::seeded();

    let response = app
        .admin_json("POST", "/api/categories", &json!({"category": "Manga"}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn missing_category_name_is_400() {
    let app = TestApp::seeded();

    for body in [json!({}), json!({"category": ""}), json!({"category": "   "})] {
        let response = app.admin_json("POST", "/api/categories", &body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["error"], "Category name is required");
    }
}
