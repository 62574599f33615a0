//! Credential verification endpoint for the admin UI.

use axum::Json;
use serde_json::{Value, json};

use crate::middleware::RequireAdmin;

/// Confirm that the supplied Basic Auth credentials are valid (admin).
///
/// The admin frontend calls this on login; the `RequireAdmin` extractor does
/// all the work.
pub async fn verify(_admin: RequireAdmin) -> Json<Value> {
    Json(json!({ "success": true, "message": "Authenticated" }))
}
