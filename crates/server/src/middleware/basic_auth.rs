//! HTTP Basic Auth extractor for protected admin routes.
//!
//! Every request is authenticated independently: there is no session and no
//! token. The extractor decodes the `Authorization: Basic` header and asks
//! the state's `CredentialVerifier` whether the pair matches.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;

use crate::state::AppState;

/// Challenge header value sent with every 401.
const CHALLENGE: &str = "Basic realm=\"Admin Area\"";

/// Extractor that requires a valid admin Basic Auth header.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(_admin: RequireAdmin) -> impl IntoResponse {
///     "only admins see this"
/// }
/// ```
pub struct RequireAdmin;

/// Error returned when admin authentication fails.
///
/// Both variants respond 401 with the same challenge header; the messages
/// mirror the two failure modes without revealing whether a username exists.
pub enum BasicAuthRejection {
    /// Header absent or not decodable as `Basic user:pass`.
    MissingCredentials,
    /// Header decoded but the pair did not match.
    InvalidCredentials,
}

impl IntoResponse for BasicAuthRejection {
    fn into_response(self) -> Response {
        let message = match self {
            Self::MissingCredentials => "Authentication required",
            Self::InvalidCredentials => "Invalid credentials",
        };

        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, CHALLENGE)],
            Json(json!({ "error": message })),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = BasicAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(BasicAuthRejection::MissingCredentials)?;

        let (username, password) =
            decode_basic(header).ok_or(BasicAuthRejection::MissingCredentials)?;

        if state.verifier().verify(&username, &password) {
            Ok(Self)
        } else {
            Err(BasicAuthRejection::InvalidCredentials)
        }
    }
}

/// Decode a `Basic <base64(user:pass)>` header value.
fn decode_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
