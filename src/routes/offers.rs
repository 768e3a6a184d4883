//! Offer endpoints.

use crate::auth::middleware::AppState;
use crate::error::AppError;
use crate::storage;
use axum::{extract::State, response::IntoResponse, Json};

/// GET /offers — All current offers
pub async fn list_offers(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut con = state.store().await?;
    let offers = storage::offer::list_offers(&mut con).await?;
    Ok(Json(offers))
}
