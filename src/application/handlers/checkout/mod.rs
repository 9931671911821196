//! Checkout handlers.
//!
//! ## Commands
//! - Check out a coordinator's baskets and start payment

mod aggregate;
mod process_checkout;

pub use aggregate::{CheckoutContext, CheckoutLookups};
pub use process_checkout::{
    CheckoutCommand, CheckoutHandler, CheckoutPorts, CheckoutResult, PaymentInstruction,
};
