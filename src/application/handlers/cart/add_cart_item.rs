//! AddCartItemHandler - Command handler for putting a product in the cart.

use std::sync::Arc;

use super::CartStore;
use crate::domain::cart::Cart;
use crate::domain::foundation::{ProductId, ServiceError, SessionId};

#[derive(Debug, Clone)]
pub struct AddCartItemCommand {
    pub session_id: SessionId,
    pub product_id: ProductId,
    pub quantity: i64,
}

#[derive(Debug, Clone)]
pub struct AddCartItemResult {
    pub cart: Cart,
}

pub struct AddCartItemHandler {
    carts: Arc<CartStore>,
}

impl AddCartItemHandler {
    pub fn new(carts: Arc<CartStore>) -> Self {
        Self { carts }
    }

    pub async fn handle(&self, cmd: AddCartItemCommand) -> Result<AddCartItemResult, ServiceError> {
        let cart = self
            .carts
            .add_item(&cmd.session_id, &cmd.product_id, cmd.quantity)
            .await?;
        tracing::info!(
            session_id = %cmd.session_id,
            product_id = %cmd.product_id,
            quantity = cmd.quantity,
            "cart item added"
        );
        Ok(AddCartItemResult { cart })
    }
}
