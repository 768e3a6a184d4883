//! Session endpoints: login issues the cookie, logout clears it.

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::middleware::AppState;
use crate::error::AppError;
use crate::models::{LoginRequest, SuccessResponse};
use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap},
    response::IntoResponse,
    Json,
};

/// GET / — Liveness banner
pub async fn index() -> &'static str {
    "shelfbud server is running..."
}

/// POST /jwt — Issue a session credential for the asserted identity
///
/// The identity is trusted as sent. Proving it belongs upstream of this call.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let token = state.issuer.issue(&req.email)?;
    let cookie = session_cookie(&token)
        .map_err(|e| AppError::Internal(format!("Invalid cookie value: {}", e)))?;

    tracing::info!(
        action = "session_issued",
        email = %req.email,
        ttl = state.issuer.ttl_secs(),
        "Session issued"
    );

    Ok((
        [(SET_COOKIE, cookie)],
        Json(SuccessResponse { success: true }),
    ))
}

/// POST /logout — Tell the client to drop its credential
///
/// Copies of the credential held elsewhere stay valid until they expire.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    match state.guard.authenticate(&headers) {
        Ok(identity) => tracing::info!(action = "logout", email = %identity, "Logging out"),
        Err(reason) => tracing::info!(action = "logout", reason = %reason, "Logging out without a valid session"),
    }

    (
        [(SET_COOKIE, clear_session_cookie())],
        Json(SuccessResponse { success: true }),
    )
}
