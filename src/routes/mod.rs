//! API route handlers.

pub mod auth;
pub mod books;
pub mod offers;
pub mod orders;

use crate::auth::middleware::AppState;
use crate::error::AppError;
use crate::middleware::{cors_layer, security_headers};
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};

/// Length of generated document ids.
pub const ID_LEN: usize = 12;

/// Attempts at a watched read-check-write before giving up.
const MAX_WRITE_ATTEMPTS: usize = 5;

/// Generate a fresh document id.
pub fn new_id() -> String {
    nanoid::nanoid!(ID_LEN)
}

/// Validate that a string is a document id (nanoid alphabet, fixed length).
pub fn validate_id(id: &str, label: &str) -> Result<(), AppError> {
    if id.len() != ID_LEN
        || !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::BadRequest(format!("Invalid {} format", label)));
    }
    Ok(())
}

/// Build the API router with all endpoints.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/", get(auth::index))
        // Session endpoints
        .route("/jwt", post(auth::login))
        .route("/logout", post(auth::logout))
        // Book endpoints
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/{id}", put(books::update_book))
        .route("/services/{id}", get(books::get_book))
        .route("/myBooks", get(books::my_books))
        .route("/bookCount", get(books::book_count))
        .route("/moreFromSeller", get(books::more_from_seller))
        .route("/deleteBook/{id}", delete(books::delete_book))
        // Order endpoints
        .route("/bookings", get(orders::bookings))
        .route("/myOrders", get(orders::my_orders))
        .route("/orders", post(orders::create_order))
        .route("/orderStatus", patch(orders::update_order_status))
        .route("/sellerOrderCount", get(orders::seller_order_count))
        // Offer endpoints
        .route("/offers", get(offers::list_offers))
}

/// Build the complete application: routes, limits, CORS, and security headers.
pub fn app(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;
    let cors = cors_layer(&state.config.allowed_origins);

    api_router()
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .layer(axum::middleware::from_fn(security_headers))
        .with_state(state)
}
