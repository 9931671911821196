//! RemoveCartItemHandler - Command handler for taking a product out of the cart.

use std::sync::Arc;

use super::CartStore;
use crate::domain::cart::Cart;
use crate::domain::foundation::{ProductId, ServiceError, SessionId};

#[derive(Debug, Clone)]
pub struct RemoveCartItemCommand {
    pub session_id: SessionId,
    pub product_id: ProductId,
    /// Basket to remove from; 0 removes the product from every basket.
    pub box_number: u32,
}

#[derive(Debug, Clone)]
pub struct RemoveCartItemResult {
    pub cart: Cart,
}

pub struct RemoveCartItemHandler {
    carts: Arc<CartStore>,
}

impl RemoveCartItemHandler {
    pub fn new(carts: Arc<CartStore>) -> Self {
        Self { carts }
    }

    pub async fn handle(
        &self,
        cmd: RemoveCartItemCommand,
    ) -> Result<RemoveCartItemResult, ServiceError> {
        let cart = self
            .carts
            .remove_item(&cmd.session_id, &cmd.product_id, cmd.box_number)
            .await?;
        tracing::info!(
            session_id = %cmd.session_id,
            product_id = %cmd.product_id,
            box_number = cmd.box_number,
            "cart item removed"
        );
        Ok(RemoveCartItemResult { cart })
    }
}
