//! Redis-backed cart cache.
//!
//! Carts are stored as JSON under `{key_prefix}{session_id}` with
//! `SET ... EX`, the expiry taken from the cart's `expired_at`.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::sync::Arc;

use crate::domain::cart::Cart;
use crate::domain::foundation::SessionId;
use crate::ports::{CacheError, CartCache, Clock};

#[derive(Clone)]
pub struct RedisCartCache {
    conn: MultiplexedConnection,
    key_prefix: String,
    clock: Arc<dyn Clock>,
}

impl RedisCartCache {
    pub fn new(
        conn: MultiplexedConnection,
        key_prefix: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
            clock,
        }
    }

    /// Opens a multiplexed connection to `url`.
    pub async fn connect(
        url: &str,
        key_prefix: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(backend)?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(backend)?;
        Ok(Self::new(conn, key_prefix, clock))
    }

    fn key(&self, session_id: &SessionId) -> String {
        cache_key(&self.key_prefix, session_id)
    }
}

fn cache_key(prefix: &str, session_id: &SessionId) -> String {
    format!("{}{}", prefix, session_id)
}

/// Seconds until `cart` expires, never less than one.
fn expiry_secs(cart: &Cart, now_unix: i64) -> u64 {
    (cart.expired_at.as_unix_secs() - now_unix).max(1) as u64
}

fn backend(e: redis::RedisError) -> CacheError {
    CacheError::Backend(e.to_string())
}

#[async_trait]
impl CartCache for RedisCartCache {
    async fn get(&self, session_id: &SessionId) -> Result<Cart, CacheError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(self.key(session_id)).await.map_err(backend)?;
        let raw = raw.ok_or_else(|| CacheError::NotFound(session_id.clone()))?;
        serde_json::from_str(&raw).map_err(|e| CacheError::Serialization(e.to_string()))
    }

    async fn insert(&self, cart: &Cart) -> Result<(), CacheError> {
        let value =
            serde_json::to_string(cart).map_err(|e| CacheError::Serialization(e.to_string()))?;
        let ttl = expiry_secs(cart, self.clock.now().as_unix_secs());

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(self.key(&cart.session_id), value, ttl)
            .await
            .map_err(backend)?;

        tracing::debug!(session_id = %cart.session_id, ttl_secs = ttl, "cart stored");
        Ok(())
    }
}
