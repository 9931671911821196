//! Cart cache port.
//!
//! Carts live only in a TTL-bound key-value cache keyed by session. A miss is
//! a normal outcome and is reported as [`CacheError::NotFound`] so callers
//! can tell it apart from a cache outage.

use async_trait::async_trait;

use crate::domain::cart::Cart;
use crate::domain::foundation::SessionId;

/// Errors from cart cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cart not found for session: {0}")]
    NotFound(SessionId),

    #[error("failed to serialize cart: {0}")]
    Serialization(String),

    #[error("cache backend error: {0}")]
    Backend(String),
}

impl CacheError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }
}

/// Port for storing carts.
#[async_trait]
pub trait CartCache: Send + Sync {
    /// Loads the cart for a session.
    ///
    /// # Errors
    ///
    /// - `NotFound` when no cart is stored
    /// - `Serialization` / `Backend` on failure
    async fn get(&self, session_id: &SessionId) -> Result<Cart, CacheError>;

    /// Stores a cart, replacing any previous value. The entry should expire
    /// at `cart.expired_at`.
    async fn insert(&self, cart: &Cart) -> Result<(), CacheError>;
}
