//! Payment handlers.
//!
//! ## Commands
//! - Handle a payment gateway webhook
//!
//! The reconciler is shared by every event source that reports payment
//! state for an order.

mod handle_payment_webhook;
mod reconcile_payment;

pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
    WebhookError,
};
pub use reconcile_payment::{PaymentEventReconciler, Reconciliation};
