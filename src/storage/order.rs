//! Order Redis operations.
//!
//! Redis key patterns:
//! - `order:{id}` — order (JSON)
//! - `orders:customer:{email}` — order ids placed by a customer (ZSET)
//! - `orders:provider:{email}` — order ids received by a seller (ZSET)

use super::{load, load_many, to_json};
use crate::models::Order;
use redis::AsyncCommands;

fn order_key(id: &str) -> String {
    format!("order:{}", id)
}

fn customer_key(email: &str) -> String {
    format!("orders:customer:{}", email)
}

fn provider_key(email: &str) -> String {
    format!("orders:provider:{}", email)
}

/// Store a new order and index it under both parties.
pub async fn insert_order<C>(con: &mut C, order: &Order) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let json = to_json(order)?;

    let _: () = redis::pipe()
        .atomic()
        .set(order_key(&order.id), json)
        .ignore()
        .zadd(customer_key(&order.customer_email), &order.id, order.created_at)
        .ignore()
        .zadd(provider_key(&order.provider_email), &order.id, order.created_at)
        .ignore()
        .query_async(con)
        .await?;
    Ok(())
}

/// Overwrite an existing order document.
///
/// Party fields never change after insert, so the indexes are left alone.
pub async fn save_order<C>(con: &mut C, order: &Order) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let json = to_json(order)?;
    con.set::<_, _, ()>(order_key(&order.id), json).await
}

/// Get an order by ID.
pub async fn get_order<C>(con: &mut C, id: &str) -> Result<Option<Order>, redis::RedisError>
where
    C: AsyncCommands,
{
    load(con, &order_key(id)).await
}

async fn orders_in<C>(con: &mut C, index: &str) -> Result<Vec<Order>, redis::RedisError>
where
    C: AsyncCommands,
{
    let ids: Vec<String> = con.zrange(index, 0, -1).await?;
    let keys: Vec<String> = ids.iter().map(|id| order_key(id)).collect();
    load_many(con, &keys).await
}

/// Orders a customer has placed, oldest first.
pub async fn list_orders_by_customer<C>(
    con: &mut C,
    email: &str,
) -> Result<Vec<Order>, redis::RedisError>
where
    C: AsyncCommands,
{
    orders_in(con, &customer_key(email)).await
}

/// Orders a seller has received, oldest first.
pub async fn list_orders_by_provider<C>(
    con: &mut C,
    email: &str,
) -> Result<Vec<Order>, redis::RedisError>
where
    C: AsyncCommands,
{
    orders_in(con, &provider_key(email)).await
}

/// Count the orders a seller has received.
pub async fn count_orders_by_provider<C>(
    con: &mut C,
    email: &str,
) -> Result<usize, redis::RedisError>
where
    C: AsyncCommands,
{
    con.zcard(provider_key(email)).await
}
