//! In-process integration tests for the Entre Nous API.
//!
//! Each test builds the full router over a temporary data directory and
//! drives it with `tower::ServiceExt::oneshot`, so no port is bound and no
//! external service is needed. SMTP is left unconfigured, which disables the
//! notification fan-out.
//!
//! Run with: `cargo test -p entre-nous-integration-tests`

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use entre_nous_server::config::ServerConfig;
use entre_nous_server::{routes, state::AppState};
use serde_json::Value;
use tower::ServiceExt as _;

/// Credentials seeded into `config.json` on first run.
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "otaku2024";

/// A fully wired application over a temporary data directory.
///
/// The tempdir is dropped (and deleted) with the `TestApp`.
pub struct TestApp {
    router: Router,
    dir: tempfile::TempDir,
}

impl TestApp {
    /// Build an app seeded with the default catalog.
    #[must_use]
    pub fn seeded() -> Self {
        Self::build(None)
    }

    /// Build an app whose catalog document is pre-written, bypassing the
    /// default seed. Useful for starting from an empty product list.
    #[must_use]
    pub fn with_catalog(catalog: &Value) -> Self {
        Self::build(Some(catalog))
    }

    fn build(catalog: Option<&Value>) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create tempdir");
        let data_dir = dir.path().join("data");

        if let Some(catalog) = catalog {
            std::fs::create_dir_all(&data_dir).expect("Failed to create data dir");
            std::fs::write(
                data_dir.join("products.json"),
                serde_json::to_vec_pretty(catalog).expect("Failed to encode catalog"),
            )
            .expect("Failed to write catalog document");
        }

        let config = ServerConfig {
            host: "127.0.0.1".parse().expect("Invalid host"),
            port: 0,
            data_dir,
            uploads_dir: dir.path().join("uploads"),
            frontend_url: "http://localhost:3000".to_string(),
            backend_url: "http://localhost:3001".to_string(),
            email: None,
            sentry_dsn: None,
        };

        let state = AppState::new(config).expect("Failed to build application state");
        Self {
            router: routes::router(state),
            dir,
        }
    }

    /// Directory holding the JSON documents.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    /// Directory holding uploaded images.
    #[must_use]
    pub fn uploads_dir(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    /// Send a raw request through the router.
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed")
    }

    /// GET a path without credentials.
    pub async fn get(&self, uri: &str) -> Response {
        self.send(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
    }

    /// Send a JSON body without credentials.
    pub async fn json(&self, method: &str, uri: &str, body: &Value) -> Response {
        self.send(json_request(method, uri, None, body)).await
    }

    /// Send a request with the seeded admin credentials and a JSON body.
    pub async fn admin_json(&self, method: &str, uri: &str, body: &Value) -> Response {
        let auth = basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD);
        self.send(json_request(method, uri, Some(&auth), body)).await
    }

    /// Send a bodyless request with the seeded admin credentials.
    pub async fn admin(&self, method: &str, uri: &str) -> Response {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::AUTHORIZATION, basic_auth(ADMIN_USERNAME, ADMIN_PASSWORD))
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
    }
}

/// Encode a Basic Auth header value.
#[must_use]
pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{username}:{password}")))
}

/// Build a JSON request, optionally with an Authorization header.
#[must_use]
pub fn json_request(
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: &Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder
        .body(Body::from(
            serde_json::to_vec(body).expect("Failed to encode body"),
        ))
        .expect("Failed to build request")
}

/// Read a response body as JSON.
pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body is not JSON")
}

/// An empty catalog document with the default category list.
#[must_use]
pub fn empty_catalog() -> Value {
    serde_json::json!({
        "products": [],
        "categories": ["Figures", "Apparel", "Manga", "Posters", "Accessories", "Plush"],
    })
}
