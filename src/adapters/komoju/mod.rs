//! KOMOJU payment gateway adapter.

mod client;
mod webhook;

pub use client::{KomojuClient, KomojuConfig};
pub use webhook::{WebhookVerifier, SIGNATURE_HEADER};
