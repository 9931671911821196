//! Notifier that records the trigger in the log.
//!
//! Delivery (mail, push) belongs to another service; this adapter stands in
//! for the call that would hand the order off to it.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId};
use crate::ports::Notifier;

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn notify_order_authorized(&self, order_id: &OrderId) -> Result<(), DomainError> {
        tracing::info!(order_id = %order_id, "order notification triggered");
        Ok(())
    }
}
