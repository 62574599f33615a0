//! Product CRUD route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use entre_nous_core::ProductId;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;
use crate::store::{Catalog, NewProduct, Product, ProductPatch};

/// Create-product request body. `price` accepts a JSON number or a string.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    #[serde(default, with = "entre_nous_core::price::as_number_opt")]
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub category: Option<String>,
}

/// Update-product request body: any subset of the product fields.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    #[serde(default, with = "entre_nous_core::price::as_number_opt")]
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub category: Option<String>,
}

/// List the full catalog (public).
pub async fn index(State(state): State<AppState>) -> Json<Catalog> {
    Json(state.catalog().list())
}

/// Fetch a single product (public).
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>> {
    state
        .catalog()
        .get(ProductId::new(id))
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

/// Create a product (admin).
///
/// On success the notification fan-out is spawned as a detached task; the
/// 201 response does not wait for any email to be sent.
#[instrument(skip_all, fields(name = body.name.as_deref().unwrap_or("")))]
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    let (Some(name), Some(price), Some(category)) = (
        body.name.filter(|n| !n.trim().is_empty()),
        body.price,
        body.category.filter(|c| !c.trim().is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "Name, price and category are required".to_string(),
        ));
    };

    if price < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "Price cannot be negative".to_string(),
        ));
    }

    let product = state.catalog().create(NewProduct {
        name,
        price,
        image: body.image.filter(|i| !i.is_empty()),
        category,
    })?;

    tracing::info!(id = %product.id, name = %product.name, "Product created");

    let subscribers = state.subscribers().list();
    if !subscribers.is_empty() {
        state
            .notifier()
            .notify_detached(product.clone(), subscribers);
    }

    Ok((StatusCode::CREATED, Json(product)))
}

/// Partially update a product (admin). Fields not supplied are preserved.
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    if body.price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(AppError::BadRequest(
            "Price cannot be negative".to_string(),
        ));
    }

    let patch = ProductPatch {
        name: body.name,
        price: body.price,
        image: body.image,
        category: body.category,
    };

    state
        .catalog()
        .update(ProductId::new(id), patch)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

/// Delete a product (admin). Responds with the removed record.
pub async fn remove(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    let deleted = state
        .catalog()
        .delete(ProductId::new(id))?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    tracing::info!(id = %deleted.id, name = %deleted.name, "Product deleted");

    Ok(Json(serde_json::json!({
        "success": true,
        "deleted": deleted,
    })))
}
