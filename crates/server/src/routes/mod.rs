//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! # Public
//! GET  /api/products              - Full catalog (products + categories)
//! GET  /api/products/{id}         - Single product
//! GET  /api/categories            - Category list
//! POST /api/newsletter/subscribe  - Newsletter signup
//!
//! # Protected (Basic Auth)
//! GET    /api/auth/verify         - Credential check for the admin UI
//! POST   /api/products            - Create product (triggers notification fan-out)
//! PUT    /api/products/{id}       - Partial update
//! DELETE /api/products/{id}       - Delete product
//! POST   /api/upload              - Image upload (multipart field `image`)
//! POST   /api/categories          - Append category
//! ```
//!
//! Protection is enforced per-handler via the
//! [`RequireAdmin`](crate::middleware::RequireAdmin) extractor.

pub mod auth;
pub mod categories;
pub mod newsletter;
pub mod products;
pub mod upload;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

/// Request bodies above this are rejected at the framework level; the upload
/// handler applies its own tighter per-file ceiling.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Create the API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/products",
            get(products::index).post(products::create),
        )
        .route(
            "/api/products/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::remove),
        )
        .route(
            "/api/categories",
            get(categories::index).post(categories::create),
        )
        .route("/api/newsletter/subscribe", post(newsletter::subscribe))
        .route("/api/auth/verify", get(auth::verify))
        .route("/api/upload", post(upload::upload))
}

/// Build the full application router: API routes, static serving of the
/// uploads directory, CORS, tracing, and the request body ceiling.
pub fn router(state: AppState) -> Router {
    let uploads_dir = state.config().uploads_dir.clone();

    Router::new()
        .route("/health", get(health))
        .merge(api_routes())
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the data directory.
async fn health() -> &'static str {
    "ok"
}
