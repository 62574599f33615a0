//! Category route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Add-category request body.
#[derive(Debug, Deserialize)]
pub struct AddCategoryRequest {
    pub category: Option<String>,
}

/// List categories (public).
pub async fn index(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalog().categories())
}

/// Append a category if absent (admin). Responds with the full list either
/// way.
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<AddCategoryRequest>,
) -> Result<Json<Vec<String>>> {
    let Some(category) = body.category.filter(|c| !c.trim().is_empty()) else {
        return Err(AppError::BadRequest(
            "Category name is required".to_string(),
        ));
    };

    let categories = state.catalog().add_category(&category)?;
    Ok(Json(categories))
}
