//! Image upload API tests.
//!
//! Multipart bodies are assembled by hand so the tests control the exact
//! field names and content types on the wire.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use entre_nous_integration_tests::{ADMIN_PASSWORD, ADMIN_USERNAME, TestApp, basic_auth, read_json};

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// Build a multipart body with a single file field.
fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
             filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(auth: bool, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if auth {
        builder = builder.header(
            header::AUTHORIZATION,
            basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD),
        );
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn upload_requires_credentials() {
    let app = TestApp::seeded();

    let body = multipart_body("image", "figure.png", "image/png", b"fake png bytes");
    let response = app.send(upload_request(false, body)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn upload_stores_file_and_returns_its_url() {
    let app = TestApp::seeded();

    let body = multipart_body("image", "figure.png", "image/png", b"fake png bytes");
    let response = app.send(upload_request(true, body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/product-"));
    assert!(url.ends_with(".png"));

    // The file landed in the uploads directory and is served back.
    let filename = url.strip_prefix("/uploads/").unwrap();
    let stored = std::fs::read(app.uploads_dir().join(filename)).unwrap();
    assert_eq!(stored, b"fake png bytes");

    let response = app.get(url).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn disallowed_content_type_is_400() {
    let app = TestApp::seeded();

    let body = multipart_body("image", "notes.pdf", "application/pdf", b"%PDF-1.4");
    let response = app.send(upload_request(true, body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(response).await["error"],
        "Invalid file type. Only JPEG, PNG, GIF and WebP are allowed."
    );
}

#[tokio::test]
async fn missing_image_field_is_400() {
    let app = TestApp::seeded();

    let body = multipart_body("attachment", "figure.png", "image/png", b"fake png bytes");
    let response = app.send(upload_request(true, body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "No file uploaded");
}

#[tokio::test]
async fn oversized_file_is_400() {
    let app = TestApp::seeded();

    let big = vec![0u8; 10 * 1024 * 1024 + 1];
    let body = multipart_body("image", "huge.png", "image/png", &big);
    let response = app.send(upload_request(true, body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(response).await["error"],
        "File too large. Maximum size is 10MB."
    );
}
