//! In-memory order store.
//!
//! Payment updates run the same conditional checks a database would
//! express in its `WHERE` clause: the write happens under the lock only when
//! the event is newer and the transition is valid.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, OrderId};
use crate::domain::order::{Order, PaymentStatusUpdate, RefundUpdate};
use crate::ports::OrderRepository;

#[derive(Default)]
pub struct InMemoryOrders {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrders {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrders {
    async fn create(&self, order: &Order) -> Result<(), DomainError> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id) {
            return Err(DomainError::database(format!(
                "order {} already exists",
                order.id
            )));
        }
        orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn get(&self, order_id: &OrderId) -> Result<Order, DomainError> {
        self.orders
            .read()
            .await
            .get(order_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("order", order_id))
    }

    async fn update_payment(
        &self,
        order_id: &OrderId,
        update: &PaymentStatusUpdate,
    ) -> Result<(), DomainError> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| DomainError::not_found("order", order_id))?;
        order.payment.apply_status(update)?;
        order.updated_at = update.issued_at;
        Ok(())
    }

    async fn update_refund(
        &self,
        order_id: &OrderId,
        update: &RefundUpdate,
    ) -> Result<(), DomainError> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| DomainError::not_found("order", order_id))?;
        order.payment.apply_refund(update)?;
        order.updated_at = update.issued_at;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::fixtures::order;
    use crate::domain::order::PaymentStatus;

    #[tokio::test]
    async fn create_then_get() {
        let orders = InMemoryOrders::new();
        let o = order();

        orders.create(&o).await.unwrap();

        assert_eq!(orders.get(&o.id).await.unwrap(), o);
    }

    #[tokio::test]
    async fn duplicate_create_is_rejected() {
        let orders = InMemoryOrders::new();
        let o = order();
        orders.create(&o).await.unwrap();

        assert!(orders.create(&o).await.is_err());
        assert_eq!(orders.len().await, 1);
    }

    #[tokio::test]
    async fn stale_update_is_precondition_failed_and_leaves_order() {
        let orders = InMemoryOrders::new();
        let o = order();
        orders.create(&o).await.unwrap();
        let update = PaymentStatusUpdate {
            payment_id: "pay_1".to_string(),
            status: PaymentStatus::Captured,
            issued_at: o.created_at.plus_secs(5),
        };

        orders.update_payment(&o.id, &update).await.unwrap();
        let err = orders.update_payment(&o.id, &update).await.unwrap_err();

        assert!(err.is_precondition_failed());
        let stored = orders.get(&o.id).await.unwrap();
        assert_eq!(stored.payment.status, PaymentStatus::Captured);
        assert_eq!(stored.updated_at, update.issued_at);
    }
}
