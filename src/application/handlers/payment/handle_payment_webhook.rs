//! HandlePaymentWebhookHandler - Command handler for payment gateway callbacks.

use std::sync::Arc;

use thiserror::Error;

use super::reconcile_payment::{PaymentEventReconciler, Reconciliation};
use crate::domain::foundation::{OrderId, ServiceError};
use crate::domain::order::{PaymentStatus, RefundType};
use crate::ports::{PaymentGateway, WebhookEventType};

/// Command to handle a payment webhook.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw webhook payload.
    pub payload: Vec<u8>,
    /// Webhook signature header.
    pub signature: String,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentWebhookResult {
    /// Order payment state changed.
    Applied { order_id: OrderId },
    /// Event accepted without changing anything (replay, stale, unhandled type
    /// or an order this service does not know).
    Acknowledged,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    #[error("invalid webhook signature")]
    InvalidSignature,

    #[error(transparent)]
    Service(#[from] ServiceError),
}

pub struct HandlePaymentWebhookHandler {
    gateway: Arc<dyn PaymentGateway>,
    reconciler: Arc<PaymentEventReconciler>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, reconciler: Arc<PaymentEventReconciler>) -> Self {
        Self {
            gateway,
            reconciler,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, WebhookError> {
        // 1. Verify signature and parse
        let event = self
            .gateway
            .verify_webhook(&cmd.payload, &cmd.signature)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "rejected payment webhook");
                WebhookError::InvalidSignature
            })?;

        tracing::debug!(event_id = %event.id, event_type = ?event.event_type, "payment webhook received");

        // 2. Route by type
        let (status, refund_type) = match &event.event_type {
            WebhookEventType::PaymentAuthorized => (PaymentStatus::Authorized, None),
            WebhookEventType::PaymentCaptured => (PaymentStatus::Captured, None),
            WebhookEventType::PaymentFailed => (PaymentStatus::Failed, None),
            WebhookEventType::PaymentExpired => (PaymentStatus::Expired, None),
            WebhookEventType::PaymentCancelled => {
                (PaymentStatus::Canceled, Some(RefundType::Canceled))
            }
            WebhookEventType::PaymentRefunded => {
                (PaymentStatus::Refunded, Some(RefundType::Refunded))
            }
            WebhookEventType::Unknown(kind) => {
                tracing::debug!(event_type = %kind, "ignoring payment webhook");
                return Ok(HandlePaymentWebhookResult::Acknowledged);
            }
        };

        // 3. Resolve the order; events for orders we never created are acknowledged
        let order_id = match event.payment.order_id.parse::<OrderId>() {
            Ok(id) => id,
            Err(_) => {
                tracing::warn!(
                    event_id = %event.id,
                    order_id = %event.payment.order_id,
                    "payment webhook carries malformed order id"
                );
                return Ok(HandlePaymentWebhookResult::Acknowledged);
            }
        };

        // 4. Apply
        let result = match refund_type {
            None => {
                self.reconciler
                    .notify_payment_completed(
                        &order_id,
                        &event.payment.payment_id,
                        status,
                        event.created_at,
                    )
                    .await
            }
            Some(refund_type) => {
                self.reconciler
                    .notify_payment_refunded(
                        &order_id,
                        status,
                        refund_type,
                        &event.payment.refunds,
                        event.created_at,
                    )
                    .await
            }
        };

        match result {
            Ok(Reconciliation::Applied) => Ok(HandlePaymentWebhookResult::Applied { order_id }),
            Ok(Reconciliation::Skipped) => Ok(HandlePaymentWebhookResult::Acknowledged),
            Err(ServiceError::NotFound(reason)) => {
                tracing::warn!(
                    event_id = %event.id,
                    order_id = %order_id,
                    reason = %reason,
                    "payment webhook for unknown order"
                );
                Ok(HandlePaymentWebhookResult::Acknowledged)
            }
            Err(e) => Err(e.into()),
        }
    }
}
