//! GetCartHandler - Query handler for the session's current cart.

use std::sync::Arc;

use super::CartStore;
use crate::domain::cart::Cart;
use crate::domain::foundation::{ServiceError, SessionId};

#[derive(Debug, Clone)]
pub struct GetCartQuery {
    pub session_id: SessionId,
}

#[derive(Debug, Clone)]
pub struct GetCartResult {
    pub cart: Cart,
}

pub struct GetCartHandler {
    carts: Arc<CartStore>,
}

impl GetCartHandler {
    pub fn new(carts: Arc<CartStore>) -> Self {
        Self { carts }
    }

    pub async fn handle(&self, query: GetCartQuery) -> Result<GetCartResult, ServiceError> {
        let cart = self.carts.get(&query.session_id).await?;
        Ok(GetCartResult { cart })
    }
}
