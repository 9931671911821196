//! Order aggregate.
//!
//! Built once at checkout from the selected baskets. Afterwards only the
//! payment part changes, through gateway events.

use serde::{Deserialize, Serialize};

use super::payment::OrderPayment;
use crate::domain::cart::{BoxSize, BoxType};
use crate::domain::customer::Address;
use crate::domain::foundation::{
    CoordinatorId, FulfillmentId, OrderId, ProductId, PromotionId, SessionId, Timestamp, UserId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    Unfulfilled,
    Fulfilled,
}

/// One shipped box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFulfillment {
    pub id: FulfillmentId,
    pub box_number: u32,
    /// Shipping method.
    pub box_type: BoxType,
    pub box_size: BoxSize,
    pub box_rate: i64,
    pub shipping_address: Address,
    pub status: FulfillmentStatus,
}

/// One product line, priced at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub fulfillment_id: FulfillmentId,
    pub product_id: ProductId,
    pub product_name: String,
    pub price: i64,
    pub quantity: i64,
}

impl OrderItem {
    pub fn amount(&self) -> i64 {
        self.price.saturating_mul(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub coordinator_id: CoordinatorId,
    pub promotion_id: Option<PromotionId>,
    pub payment: OrderPayment,
    pub fulfillments: Vec<OrderFulfillment>,
    pub items: Vec<OrderItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    /// Box numbers of the baskets this order consumed.
    pub fn box_numbers(&self) -> Vec<u32> {
        self.fulfillments.iter().map(|f| f.box_number).collect()
    }

    pub fn items_of(&self, fulfillment_id: &FulfillmentId) -> impl Iterator<Item = &OrderItem> {
        let id = *fulfillment_id;
        self.items.iter().filter(move |item| item.fulfillment_id == id)
    }
}
