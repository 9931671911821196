//! PaymentEventReconciler - applies gateway payment events to persisted orders.
//!
//! Every update is conditional in the store. A replayed or out-of-order
//! event comes back as `PreconditionFailed` and is treated as already
//! applied, so the gateway can retry freely.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, OrderId, ServiceError, Timestamp};
use crate::domain::order::{PaymentStatus, PaymentStatusUpdate, RefundType, RefundUpdate};
use crate::ports::{Notifier, OrderRepository, WebhookRefund};

/// Outcome of applying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The order moved to the new state.
    Applied,
    /// The event was stale or a replay; nothing changed.
    Skipped,
}

pub struct PaymentEventReconciler {
    orders: Arc<dyn OrderRepository>,
    notifier: Arc<dyn Notifier>,
}

impl PaymentEventReconciler {
    pub fn new(orders: Arc<dyn OrderRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self { orders, notifier }
    }

    /// Applies a payment status event. Entering `Captured` notifies once.
    pub async fn notify_payment_completed(
        &self,
        order_id: &OrderId,
        payment_id: &str,
        status: PaymentStatus,
        issued_at: Timestamp,
    ) -> Result<Reconciliation, ServiceError> {
        let update = PaymentStatusUpdate {
            payment_id: payment_id.to_string(),
            status,
            issued_at,
        };

        let result = self.orders.update_payment(order_id, &update).await;
        if settle(order_id, status, result)? == Reconciliation::Skipped {
            return Ok(Reconciliation::Skipped);
        }

        tracing::info!(order_id = %order_id, status = %status, "payment status updated");

        if status == PaymentStatus::Captured {
            // The update is committed; a retried event would be skipped and
            // never notify, so a failure here is only logged.
            if let Err(e) = self.notifier.notify_order_authorized(order_id).await {
                tracing::error!(
                    order_id = %order_id,
                    error = %e,
                    "failed to send order notification"
                );
            }
        }

        Ok(Reconciliation::Applied)
    }

    /// Applies a cancellation or refund event.
    pub async fn notify_payment_refunded(
        &self,
        order_id: &OrderId,
        status: PaymentStatus,
        refund_type: RefundType,
        refunds: &[WebhookRefund],
        issued_at: Timestamp,
    ) -> Result<Reconciliation, ServiceError> {
        let update = RefundUpdate {
            status,
            refund_type,
            total: refunds.iter().map(|r| r.amount).sum(),
            reason: refunds
                .iter()
                .map(|r| r.description.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            issued_at,
        };

        let result = self.orders.update_refund(order_id, &update).await;
        let outcome = settle(order_id, status, result)?;
        if outcome == Reconciliation::Applied {
            tracing::info!(
                order_id = %order_id,
                status = %status,
                refund_total = update.total,
                "refund recorded"
            );
        }
        Ok(outcome)
    }
}

fn settle(
    order_id: &OrderId,
    status: PaymentStatus,
    result: Result<(), DomainError>,
) -> Result<Reconciliation, ServiceError> {
    match result {
        Ok(()) => Ok(Reconciliation::Applied),
        Err(e) if e.is_precondition_failed() => {
            tracing::warn!(
                order_id = %order_id,
                status = %status,
                reason = %e,
                "payment event skipped"
            );
            Ok(Reconciliation::Skipped)
        }
        Err(e) => {
            tracing::error!(
                order_id = %order_id,
                status = %status,
                error = %e,
                "failed to apply payment event"
            );
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::*;
    use crate::domain::order::fixtures::order;

    fn setup() -> (Arc<MockOrders>, Arc<MockNotifier>, PaymentEventReconciler) {
        let orders = Arc::new(MockOrders::default());
        let notifier = Arc::new(MockNotifier::default());
        let reconciler = PaymentEventReconciler::new(orders.clone(), notifier.clone());
        (orders, notifier, reconciler)
    }

    fn refund(amount: i64, description: &str) -> WebhookRefund {
        WebhookRefund {
            amount,
            description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn capture_updates_order_and_notifies() {
        let (orders, notifier, reconciler) = setup();
        let o = order();
        let at = o.created_at.plus_secs(10);
        orders.put(o.clone());

        let outcome = reconciler
            .notify_payment_completed(&o.id, "pay_1", PaymentStatus::Captured, at)
            .await
            .unwrap();

        assert_eq!(outcome, Reconciliation::Applied);
        let stored = orders.find(&o.id).unwrap();
        assert_eq!(stored.payment.status, PaymentStatus::Captured);
        assert_eq!(stored.payment.payment_id.as_deref(), Some("pay_1"));
        assert_eq!(notifier.notified(), vec![o.id]);
    }

    #[tokio::test]
    async fn replayed_capture_is_ok_and_notifies_once() {
        let (orders, notifier, reconciler) = setup();
        let o = order();
        let at = o.created_at.plus_secs(10);
        orders.put(o.clone());

        reconciler
            .notify_payment_completed(&o.id, "pay_1", PaymentStatus::Captured, at)
            .await
            .unwrap();
        let second = reconciler
            .notify_payment_completed(&o.id, "pay_1", PaymentStatus::Captured, at)
            .await
            .unwrap();

        assert_eq!(second, Reconciliation::Skipped);
        assert_eq!(notifier.notified().len(), 1);
    }

    #[tokio::test]
    async fn authorization_does_not_notify() {
        let (orders, notifier, reconciler) = setup();
        let o = order();
        orders.put(o.clone());

        reconciler
            .notify_payment_completed(
                &o.id,
                "pay_1",
                PaymentStatus::Authorized,
                o.created_at.plus_secs(1),
            )
            .await
            .unwrap();

        assert_eq!(
            orders.find(&o.id).unwrap().payment.status,
            PaymentStatus::Authorized
        );
        assert!(notifier.notified().is_empty());
    }

    #[tokio::test]
    async fn older_event_after_newer_is_skipped() {
        let (orders, _, reconciler) = setup();
        let o = order();
        orders.put(o.clone());

        reconciler
            .notify_payment_completed(
                &o.id,
                "pay_1",
                PaymentStatus::Captured,
                o.created_at.plus_secs(20),
            )
            .await
            .unwrap();
        let late = reconciler
            .notify_payment_completed(
                &o.id,
                "pay_1",
                PaymentStatus::Authorized,
                o.created_at.plus_secs(10),
            )
            .await
            .unwrap();

        assert_eq!(late, Reconciliation::Skipped);
        assert_eq!(
            orders.find(&o.id).unwrap().payment.status,
            PaymentStatus::Captured
        );
    }

    #[tokio::test]
    async fn notifier_failure_does_not_fail_committed_update() {
        let (orders, notifier, reconciler) = setup();
        notifier.fail();
        let o = order();
        orders.put(o.clone());

        let outcome = reconciler
            .notify_payment_completed(
                &o.id,
                "pay_1",
                PaymentStatus::Captured,
                o.created_at.plus_secs(1),
            )
            .await
            .unwrap();

        assert_eq!(outcome, Reconciliation::Applied);
    }

    #[tokio::test]
    async fn missing_order_is_not_found() {
        let (_, _, reconciler) = setup();

        let err = reconciler
            .notify_payment_completed(
                &OrderId::new(),
                "pay_1",
                PaymentStatus::Captured,
                Timestamp::now(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn store_failure_is_internal() {
        let (orders, _, reconciler) = setup();
        let o = order();
        orders.put(o.clone());
        orders.fail_updates();

        let err = reconciler
            .notify_payment_completed(
                &o.id,
                "pay_1",
                PaymentStatus::Captured,
                o.created_at.plus_secs(1),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[tokio::test]
    async fn refund_sums_amounts_and_joins_reasons() {
        let (orders, _, reconciler) = setup();
        let o = order();
        orders.put(o.clone());
        reconciler
            .notify_payment_completed(
                &o.id,
                "pay_1",
                PaymentStatus::Captured,
                o.created_at.plus_secs(1),
            )
            .await
            .unwrap();

        let outcome = reconciler
            .notify_payment_refunded(
                &o.id,
                PaymentStatus::Refunded,
                RefundType::Refunded,
                &[refund(300, "damaged"), refund(200, "late delivery")],
                o.created_at.plus_secs(2),
            )
            .await
            .unwrap();

        assert_eq!(outcome, Reconciliation::Applied);
        let payment = orders.find(&o.id).unwrap().payment;
        assert_eq!(payment.status, PaymentStatus::Refunded);
        assert_eq!(payment.refund_type, Some(RefundType::Refunded));
        assert_eq!(payment.refund_total, 500);
        assert_eq!(payment.refund_reason, "damaged\nlate delivery");
    }

    #[tokio::test]
    async fn refund_of_failed_payment_is_skipped() {
        let (orders, _, reconciler) = setup();
        let o = order();
        orders.put(o.clone());
        reconciler
            .notify_payment_completed(
                &o.id,
                "pay_1",
                PaymentStatus::Failed,
                o.created_at.plus_secs(1),
            )
            .await
            .unwrap();

        let outcome = reconciler
            .notify_payment_refunded(
                &o.id,
                PaymentStatus::Canceled,
                RefundType::Canceled,
                &[],
                o.created_at.plus_secs(2),
            )
            .await
            .unwrap();

        assert_eq!(outcome, Reconciliation::Skipped);
    }
}
