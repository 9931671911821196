//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod cart;
pub mod checkout;
pub mod payment;

#[cfg(test)]
pub(crate) mod testing;

pub use cart::{
    AddCartItemCommand, AddCartItemHandler, AddCartItemResult, CartSettings, CartStore,
    GetCartHandler, GetCartQuery, GetCartResult, RemoveCartItemCommand, RemoveCartItemHandler,
    RemoveCartItemResult,
};
pub use checkout::{
    CheckoutCommand, CheckoutContext, CheckoutHandler, CheckoutLookups, CheckoutPorts,
    CheckoutResult, PaymentInstruction,
};
pub use payment::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
    PaymentEventReconciler, Reconciliation, WebhookError,
};
