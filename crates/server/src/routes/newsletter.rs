//! Newsletter subscription route handler.

use axum::{Json, extract::State, http::StatusCode};
use entre_nous_core::Email;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::store::SubscribeOutcome;

/// Subscribe request body.
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: Option<String>,
}

/// Subscribe response body.
#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "alreadySubscribed")]
    pub already_subscribed: bool,
}

/// Subscribe an email to the newsletter (public).
///
/// The address is trimmed and lowercased before the dedupe check, so
/// resubmitting with different casing reports `alreadySubscribed` instead of
/// storing a second entry. First-time subscriptions respond 201, duplicates
/// 200.
#[instrument(skip(state, body))]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(body): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<SubscribeResponse>)> {
    let email = body
        .email
        .as_deref()
        .and_then(|raw| Email::parse(raw).ok())
        .ok_or_else(|| AppError::BadRequest("Valid email is required".to_string()))?;

    match state.subscribers().subscribe(&email)? {
        SubscribeOutcome::AlreadySubscribed => Ok((
            StatusCode::OK,
            Json(SubscribeResponse {
                success: true,
                message: "Email already subscribed".to_string(),
                already_subscribed: true,
            }),
        )),
        SubscribeOutcome::Added => {
            tracing::info!(email = %email, "New newsletter subscriber");
            Ok((
                StatusCode::CREATED,
                Json(SubscribeResponse {
                    success: true,
                    message: "Successfully subscribed to newsletter".to_string(),
                    already_subscribed: false,
                }),
            ))
        }
    }
}
