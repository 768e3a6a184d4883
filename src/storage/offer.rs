//! Promotional offers.
//!
//! Redis key pattern:
//! - `offers` — offer documents (LIST of JSON), seeded outside the API

use super::{from_json, to_json};
use redis::AsyncCommands;
use serde_json::Value;

const OFFERS: &str = "offers";

/// List all offers in the order they were added.
pub async fn list_offers<C>(con: &mut C) -> Result<Vec<Value>, redis::RedisError>
where
    C: AsyncCommands,
{
    let raw: Vec<String> = con.lrange(OFFERS, 0, -1).await?;
    raw.iter().map(|json| from_json(json)).collect()
}

/// Append an offer. Used for seeding.
pub async fn push_offer<C>(con: &mut C, offer: &Value) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let json = to_json(offer)?;
    con.rpush::<_, _, ()>(OFFERS, json).await
}
