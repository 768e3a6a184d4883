//! Redis document store for books, orders, and offers.
//!
//! All functions are async and generic over `redis::AsyncCommands`.
//! Documents are serialized to JSON; per-owner listings are kept in sorted
//! sets scored by creation time so results come back in insertion order.

pub mod book;
pub mod offer;
pub mod order;

use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};

fn to_json<T: Serialize>(value: &T) -> Result<String, redis::RedisError> {
    serde_json::to_string(value).map_err(|e| {
        redis::RedisError::from((
            redis::ErrorKind::UnexpectedReturnType,
            "JSON serialize",
            e.to_string(),
        ))
    })
}

fn from_json<T: DeserializeOwned>(data: &str) -> Result<T, redis::RedisError> {
    serde_json::from_str(data).map_err(|e| {
        redis::RedisError::from((
            redis::ErrorKind::UnexpectedReturnType,
            "JSON deserialize",
            e.to_string(),
        ))
    })
}

/// Fetch a single JSON document.
async fn load<C, T>(con: &mut C, key: &str) -> Result<Option<T>, redis::RedisError>
where
    C: AsyncCommands,
    T: DeserializeOwned,
{
    let json: Option<String> = con.get(key).await?;
    json.as_deref().map(from_json).transpose()
}

/// Fetch many JSON documents in one round trip, skipping keys that vanished.
async fn load_many<C, T>(con: &mut C, keys: &[String]) -> Result<Vec<T>, redis::RedisError>
where
    C: AsyncCommands,
    T: DeserializeOwned,
{
    // MGET with no keys is a Redis error
    if keys.is_empty() {
        return Ok(Vec::new());
    }

    let values: Vec<Option<String>> = redis::cmd("MGET").arg(keys).query_async(con).await?;
    values
        .iter()
        .flatten()
        .map(|json| from_json(json))
        .collect()
}

/// Drop any keys watched on this connection.
pub async fn unwatch<C>(con: &mut C) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    redis::cmd("UNWATCH").query_async(con).await
}

/// Confirm the store is reachable.
pub async fn ping<C>(con: &mut C) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let _: String = redis::cmd("PING").query_async(con).await?;
    Ok(())
}
