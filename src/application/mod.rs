//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (write) are kept apart from query handlers (read).

pub mod handlers;

pub use handlers::{
    // Cart
    AddCartItemCommand, AddCartItemHandler, CartSettings, CartStore, GetCartHandler, GetCartQuery,
    RemoveCartItemCommand, RemoveCartItemHandler,
    // Checkout
    CheckoutCommand, CheckoutHandler, CheckoutLookups, CheckoutPorts, PaymentInstruction,
    // Payment
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, PaymentEventReconciler,
    WebhookError,
};
