//! Order repository port.
//!
//! Orders are inserted once at checkout. Afterwards only payment state
//! changes, through conditional updates that refuse stale or invalid
//! transitions.
//!
//! # Example
//!
//! ```ignore
//! match repo.update_payment(&order_id, &update).await {
//!     Ok(()) => notify(),
//!     Err(e) if e.is_precondition_failed() => {} // replayed or out-of-order event
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId};
use crate::domain::order::{Order, PaymentStatusUpdate, RefundUpdate};

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Inserts a new order with its payment, fulfillments and items as one unit.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure (nothing is written)
    async fn create(&self, order: &Order) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `NotFound` if the order does not exist
    async fn get(&self, order_id: &OrderId) -> Result<Order, DomainError>;

    /// Applies a payment status event.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the order does not exist
    /// - `PreconditionFailed` if the transition is invalid or the event is
    ///   not newer than the last applied one
    async fn update_payment(
        &self,
        order_id: &OrderId,
        update: &PaymentStatusUpdate,
    ) -> Result<(), DomainError>;

    /// Applies a refund or cancellation event. Same conditions as
    /// [`OrderRepository::update_payment`].
    async fn update_refund(
        &self,
        order_id: &OrderId,
        update: &RefundUpdate,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn OrderRepository) {}
    }
}
