//! Book listing Redis operations.
//!
//! Redis key patterns:
//! - `book:{id}` — book listing (JSON)
//! - `books` — every book id (ZSET, scored by created_at)
//! - `books:email:{email}` — book ids listed by a seller (ZSET)

use super::{load, load_many, to_json};
use crate::models::Book;
use redis::AsyncCommands;

const ALL_BOOKS: &str = "books";

fn book_key(id: &str) -> String {
    format!("book:{}", id)
}

fn seller_key(email: &str) -> String {
    format!("books:email:{}", email)
}

/// Watch a book so the next write on this connection aborts if it changes.
///
/// The connection must not be shared while the watch is held.
pub async fn watch_book<C>(con: &mut C, id: &str) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    redis::cmd("WATCH").arg(book_key(id)).query_async(con).await
}

/// Write a book and keep the seller index in step.
///
/// `previous` is the stored version being replaced, if any. When the seller
/// email changed, the id moves from the old seller's index to the new one.
/// Returns false if a watched key changed and nothing was written.
pub async fn save_book<C>(
    con: &mut C,
    book: &Book,
    previous: Option<&Book>,
) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    let json = to_json(book)?;
    let new_email = book.fields.email.as_deref();

    let mut pipe = redis::pipe();
    pipe.atomic()
        .set(book_key(&book.id), json)
        .ignore()
        .zadd(ALL_BOOKS, &book.id, book.created_at)
        .ignore();

    if let Some(old_email) = previous.and_then(|p| p.fields.email.as_deref()) {
        if Some(old_email) != new_email {
            pipe.zrem(seller_key(old_email), &book.id).ignore();
        }
    }
    if let Some(email) = new_email {
        pipe.zadd(seller_key(email), &book.id, book.created_at)
            .ignore();
    }

    // EXEC replies nil when a watched key changed
    let committed: Option<()> = pipe.query_async(con).await?;
    Ok(committed.is_some())
}

/// Get a book by ID.
pub async fn get_book<C>(con: &mut C, id: &str) -> Result<Option<Book>, redis::RedisError>
where
    C: AsyncCommands,
{
    load(con, &book_key(id)).await
}

async fn books_in<C>(con: &mut C, index: &str) -> Result<Vec<Book>, redis::RedisError>
where
    C: AsyncCommands,
{
    let ids: Vec<String> = con.zrange(index, 0, -1).await?;
    let keys: Vec<String> = ids.iter().map(|id| book_key(id)).collect();
    load_many(con, &keys).await
}

/// List every book, oldest first.
pub async fn list_books<C>(con: &mut C) -> Result<Vec<Book>, redis::RedisError>
where
    C: AsyncCommands,
{
    books_in(con, ALL_BOOKS).await
}

/// List the books a seller has listed, oldest first.
pub async fn list_books_by_seller<C>(
    con: &mut C,
    email: &str,
) -> Result<Vec<Book>, redis::RedisError>
where
    C: AsyncCommands,
{
    books_in(con, &seller_key(email)).await
}

/// Count the books a seller has listed.
pub async fn count_books_by_seller<C>(con: &mut C, email: &str) -> Result<usize, redis::RedisError>
where
    C: AsyncCommands,
{
    con.zcard(seller_key(email)).await
}

/// Delete a book and drop it from every index.
///
/// Returns whether the document existed, or `None` if a watched key changed
/// and nothing was deleted.
pub async fn delete_book<C>(con: &mut C, book: &Book) -> Result<Option<bool>, redis::RedisError>
where
    C: AsyncCommands,
{
    let mut pipe = redis::pipe();
    pipe.atomic()
        .del(book_key(&book.id))
        .zrem(ALL_BOOKS, &book.id)
        .ignore();
    if let Some(email) = book.fields.email.as_deref() {
        pipe.zrem(seller_key(email), &book.id).ignore();
    }

    let result: Option<(i64,)> = pipe.query_async(con).await?;
    Ok(result.map(|(deleted,)| deleted > 0))
}
