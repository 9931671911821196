//! Notification port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId};

/// Triggers customer and coordinator notifications. Delivery is someone
/// else's concern; this crate only fires the trigger.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announces that payment for an order went through.
    async fn notify_order_authorized(&self, order_id: &OrderId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifier_is_object_safe() {
        fn _accepts_dyn(_notifier: &dyn Notifier) {}
    }
}
