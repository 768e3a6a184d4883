//! Book listing endpoints.

use crate::auth::middleware::{AppState, AuthSession};
use crate::error::AppError;
use crate::models::{
    Book, BookFields, BookOwner, CountResponse, DeleteResult, EmailQuery, InsertResult,
    UpdateResult,
};
use crate::storage;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;

/// GET /books — All listings
pub async fn list_books(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut con = state.store().await?;
    let books = storage::book::list_books(&mut con).await?;
    Ok(Json(books))
}

/// GET /services/:id — One listing, as a zero- or one-element array
pub async fn get_book(
    _session: AuthSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_id(&id, "book ID")?;

    let mut con = state.store().await?;
    let book = storage::book::get_book(&mut con, &id).await?;
    Ok(Json(book.into_iter().collect::<Vec<Book>>()))
}

/// GET /myBooks?email= — The caller's own listings
pub async fn my_books(
    session: AuthSession,
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, AppError> {
    session.identity.ensure_matches(query.email.as_deref())?;

    let mut con = state.store().await?;
    let books = storage::book::list_books_by_seller(&mut con, session.identity.as_str()).await?;
    Ok(Json(books))
}

/// GET /bookCount?email= — Number of listings by a seller
pub async fn book_count(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, AppError> {
    let Some(email) = query.email else {
        return Ok(Json(CountResponse::from(0)));
    };

    let mut con = state.store().await?;
    let count = storage::book::count_books_by_seller(&mut con, &email).await?;
    Ok(Json(CountResponse::from(count)))
}

/// GET /moreFromSeller?email= — Public listings by a seller
pub async fn more_from_seller(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, AppError> {
    let Some(email) = query.email else {
        return Ok(Json(Vec::<Book>::new()));
    };

    let mut con = state.store().await?;
    let books = storage::book::list_books_by_seller(&mut con, &email).await?;
    Ok(Json(books))
}

/// POST /books — Create a listing owned by the caller
pub async fn create_book(
    session: AuthSession,
    State(state): State<AppState>,
    Json(mut fields): Json<BookFields>,
) -> Result<impl IntoResponse, AppError> {
    session.identity.ensure_matches(fields.email.as_deref())?;
    fields.strip_reserved();

    let book = Book {
        id: super::new_id(),
        fields,
        created_at: Utc::now().timestamp_millis(),
    };

    let mut con = state.store().await?;
    storage::book::save_book(&mut con, &book, None).await?;

    tracing::info!(action = "book_created", book_id = %book.id, seller = %session.identity, "Book listed");

    Ok(Json(InsertResult::new(book.id)))
}

/// PUT /books/:id — Update (or create) a listing
///
/// The body's seller email must be the caller, and an existing listing must
/// already belong to the caller. The read, the ownership check and the write
/// run under a WATCH on the listing, so a concurrent writer forces a retry.
pub async fn update_book(
    session: AuthSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut update): Json<BookFields>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_id(&id, "book ID")?;
    session.identity.ensure_matches(update.email.as_deref())?;
    update.strip_reserved();

    let mut con = state.store().await?;
    for _ in 0..super::MAX_WRITE_ATTEMPTS {
        storage::book::watch_book(&mut con, &id).await?;
        let existing = storage::book::get_book(&mut con, &id).await?;

        let (book, result) = match &existing {
            Some(previous) => {
                if let Err(err) = session.identity.ensure_owns(previous, BookOwner::Seller) {
                    storage::unwatch(&mut con).await?;
                    return Err(err.into());
                }

                let mut book = previous.clone();
                book.fields.apply(&update);
                if book == *previous {
                    storage::unwatch(&mut con).await?;
                    return Ok(Json(UpdateResult::matched(false)));
                }
                (book, UpdateResult::matched(true))
            }
            None => {
                let book = Book {
                    id: id.clone(),
                    fields: update.clone(),
                    created_at: Utc::now().timestamp_millis(),
                };
                (book, UpdateResult::upserted(id.clone()))
            }
        };

        if storage::book::save_book(&mut con, &book, existing.as_ref()).await? {
            tracing::info!(action = "book_updated", book_id = %id, seller = %session.identity, "Book updated");
            return Ok(Json(result));
        }
        tracing::debug!(book_id = %id, "Listing changed during update, retrying");
    }

    Err(AppError::Internal(format!(
        "Book {} kept changing during update",
        id
    )))
}

/// DELETE /deleteBook/:id — Remove one of the caller's listings
///
/// An unknown id is refused like a listing the caller does not own.
pub async fn delete_book(
    session: AuthSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    super::validate_id(&id, "book ID")?;

    let mut con = state.store().await?;
    for _ in 0..super::MAX_WRITE_ATTEMPTS {
        storage::book::watch_book(&mut con, &id).await?;
        let found = storage::book::get_book(&mut con, &id).await?;

        let book = match session
            .identity
            .ensure_owns_found(found.as_ref(), BookOwner::Seller)
        {
            Ok(book) => book,
            Err(err) => {
                storage::unwatch(&mut con).await?;
                return Err(err.into());
            }
        };

        if let Some(deleted) = storage::book::delete_book(&mut con, book).await? {
            tracing::info!(action = "book_deleted", book_id = %id, seller = %session.identity, "Book deleted");
            return Ok(Json(DeleteResult::new(deleted)));
        }
        tracing::debug!(book_id = %id, "Listing changed during delete, retrying");
    }

    Err(AppError::Internal(format!(
        "Book {} kept changing during delete",
        id
    )))
}
