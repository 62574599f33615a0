//! Image upload route handler.

use std::path::Path;

use axum::{Json, extract::Multipart, extract::State};
use rand::Rng as _;
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Per-file size ceiling (10 MB).
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// MIME types accepted for product images.
const ALLOWED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Upload response body.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Relative access path of the stored image, e.g. `/uploads/product-....jpg`.
    pub url: String,
}

/// Store an uploaded product image (admin).
///
/// Expects a multipart form with a single `image` file field. Only the MIME
/// type is validated; the image content is not sniffed.
#[instrument(skip_all)]
pub async fn upload(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field.content_type().map(str::to_owned).unwrap_or_default();
        if !ALLOWED_MIME_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::BadRequest(
                "Invalid file type. Only JPEG, PNG, GIF and WebP are allowed.".to_string(),
            ));
        }

        let extension = field
            .file_name()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;

        if data.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::BadRequest(
                "File too large. Maximum size is 10MB.".to_string(),
            ));
        }

        let filename = unique_filename(&extension);
        let uploads_dir = &state.config().uploads_dir;
        tokio::fs::create_dir_all(uploads_dir).await?;
        tokio::fs::write(uploads_dir.join(&filename), &data).await?;

        tracing::info!(file = %filename, bytes = data.len(), "Image uploaded");

        return Ok(Json(UploadResponse {
            url: format!("/uploads/{filename}"),
        }));
    }

    Err(AppError::BadRequest("No file uploaded".to_string()))
}

/// Generate a collision-resistant file name: `product-<unix-millis>-<random><ext>`.
fn unique_filename(extension: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp_millis();
    let random: u32 = rand::rng().random_range(0..1_000_000_000);
    format!("product-{timestamp}-{random}{extension}")
}
