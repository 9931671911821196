//! In-memory cart cache for development and tests.
//!
//! Entries past their `expired_at` read as misses, matching the expiry a
//! real cache applies. Expired entries are dropped lazily on the next write.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::cart::Cart;
use crate::domain::foundation::SessionId;
use crate::ports::{CacheError, CartCache, Clock};

pub struct InMemoryCartCache {
    carts: RwLock<HashMap<SessionId, Cart>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCartCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            carts: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of entries held, expired or not.
    pub async fn len(&self) -> usize {
        self.carts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.carts.read().await.is_empty()
    }
}

#[async_trait]
impl CartCache for InMemoryCartCache {
    async fn get(&self, session_id: &SessionId) -> Result<Cart, CacheError> {
        let now = self.clock.now();
        self.carts
            .read()
            .await
            .get(session_id)
            .filter(|cart| !cart.is_expired(now))
            .cloned()
            .ok_or_else(|| CacheError::NotFound(session_id.clone()))
    }

    async fn insert(&self, cart: &Cart) -> Result<(), CacheError> {
        let now = self.clock.now();
        let mut carts = self.carts.write().await;
        carts.retain(|_, stored| !stored.is_expired(now));
        carts.insert(cart.session_id.clone(), cart.clone());
        Ok(())
    }
}
