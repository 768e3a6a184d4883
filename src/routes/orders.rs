//! Order endpoints for customers and sellers.

use crate::auth::middleware::{AppState, AuthSession};
use crate::error::AppError;
use crate::models::{
    strip_reserved, CountResponse, EmailQuery, IdQuery, InsertResult, NewOrder, Order,
    OrderParty, StatusUpdate, UpdateResult, DEFAULT_ORDER_STATUS,
};
use crate::storage;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;

/// GET /bookings?email= — Orders the caller placed as a customer
pub async fn bookings(
    session: AuthSession,
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, AppError> {
    session.identity.ensure_matches(query.email.as_deref())?;

    let mut con = state.store().await?;
    let orders =
        storage::order::list_orders_by_customer(&mut con, session.identity.as_str()).await?;
    Ok(Json(orders))
}

/// GET /myOrders?email= — Orders the caller received as a seller
pub async fn my_orders(
    session: AuthSession,
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, AppError> {
    session.identity.ensure_matches(query.email.as_deref())?;

    let mut con = state.store().await?;
    let orders =
        storage::order::list_orders_by_provider(&mut con, session.identity.as_str()).await?;
    Ok(Json(orders))
}

/// GET /sellerOrderCount?email= — Number of orders a seller has received
pub async fn seller_order_count(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, AppError> {
    let Some(email) = query.email else {
        return Ok(Json(CountResponse::from(0)));
    };

    let mut con = state.store().await?;
    let count = storage::order::count_orders_by_provider(&mut con, &email).await?;
    Ok(Json(CountResponse::from(count)))
}

/// POST /orders — Place an order as the caller
pub async fn create_order(
    session: AuthSession,
    State(state): State<AppState>,
    Json(req): Json<NewOrder>,
) -> Result<impl IntoResponse, AppError> {
    session.identity.ensure_matches(req.customer_email.as_deref())?;

    let provider_email = req
        .provider_email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing provider_email".to_string()))?;

    // Server-managed keys cannot be smuggled in through the free-form details
    let mut details = req.details;
    strip_reserved(&mut details);

    let order = Order {
        id: super::new_id(),
        customer_email: session.identity.to_string(),
        provider_email,
        status: req
            .status
            .unwrap_or_else(|| DEFAULT_ORDER_STATUS.to_string()),
        created_at: Utc::now().timestamp_millis(),
        details,
    };

    let mut con = state.store().await?;
    storage::order::insert_order(&mut con, &order).await?;

    tracing::info!(
        action = "order_created",
        order_id = %order.id,
        customer = %order.customer_email,
        provider = %order.provider_email,
        "Order placed"
    );

    Ok(Json(InsertResult::new(order.id)))
}

/// PATCH /orderStatus?id= — Seller updates the status of an incoming order
///
/// An unknown id is refused like an order the caller does not provide.
pub async fn update_order_status(
    session: AuthSession,
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
    Json(req): Json<StatusUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let id = query
        .id
        .ok_or_else(|| AppError::BadRequest("Missing order id".to_string()))?;
    super::validate_id(&id, "order ID")?;

    let mut con = state.store().await?;
    let found = storage::order::get_order(&mut con, &id).await?;
    let mut order = session
        .identity
        .ensure_owns_found(found.as_ref(), OrderParty::Provider)?
        .clone();

    let modified = order.status != req.status;
    if modified {
        order.status = req.status;
        storage::order::save_order(&mut con, &order).await?;
    }

    tracing::info!(
        action = "order_status_updated",
        order_id = %order.id,
        status = %order.status,
        provider = %session.identity,
        "Order status updated"
    );

    Ok(Json(UpdateResult::matched(modified)))
}
