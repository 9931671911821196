//! Marche Checkout - cart and checkout orchestration for a farmers-market
//! commerce platform.
//!
//! Carts live in a TTL-bound cache keyed by session. Checkout gathers the
//! customer, addresses, cart, shipping and promotion concurrently, prices the
//! order, opens a payment session and persists the order. Payment gateway
//! webhooks move the order's payment state forward idempotently.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
