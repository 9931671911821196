//! KOMOJU webhook signature verification.
//!
//! KOMOJU signs the raw request body with HMAC-SHA256 using the webhook
//! secret and sends the hex digest in the `X-Komoju-Signature` header.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::foundation::Timestamp;
use crate::ports::{PaymentError, WebhookEvent, WebhookEventType, WebhookPayment, WebhookRefund};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "x-komoju-signature";

/// Event envelope as KOMOJU sends it.
#[derive(Debug, Deserialize)]
struct KomojuEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    /// Absent or shaped differently for `ping`.
    #[serde(default)]
    data: KomojuPayment,
    created_at: Timestamp,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct KomojuPayment {
    id: String,
    external_order_num: String,
    amount: i64,
    refunds: Vec<KomojuRefund>,
}

#[derive(Debug, Deserialize)]
struct KomojuRefund {
    amount: i64,
    #[serde(default)]
    description: Option<String>,
}

pub struct WebhookVerifier {
    secret: SecretString,
}

impl WebhookVerifier {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Checks the signature, then parses the body.
    ///
    /// # Errors
    ///
    /// `InvalidWebhook` when the signature is malformed or does not match,
    /// or the body is not an event.
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        let provided = hex::decode(signature.trim())
            .map_err(|_| PaymentError::invalid_webhook("signature is not hex"))?;
        let expected = self.compute_signature(payload)?;

        if !constant_time_compare(&expected, &provided) {
            return Err(PaymentError::invalid_webhook("signature mismatch"));
        }

        let event: KomojuEvent = serde_json::from_slice(payload).map_err(|e| {
            tracing::warn!(error = %e, "failed to parse webhook payload");
            PaymentError::invalid_webhook(format!("invalid JSON: {}", e))
        })?;

        Ok(WebhookEvent {
            event_type: WebhookEventType::parse(&event.event_type),
            id: event.id,
            payment: WebhookPayment {
                payment_id: event.data.id,
                order_id: event.data.external_order_num,
                amount: event.data.amount,
                refunds: event
                    .data
                    .refunds
                    .into_iter()
                    .map(|r| WebhookRefund {
                        amount: r.amount,
                        description: r.description.unwrap_or_default(),
                    })
                    .collect(),
            },
            created_at: event.created_at,
        })
    }

    fn compute_signature(&self, payload: &[u8]) -> Result<Vec<u8>, PaymentError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| PaymentError::invalid_webhook(format!("unusable webhook secret: {}", e)))?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Signs `payload` the way KOMOJU does.
#[cfg(test)]
pub fn sign(secret: &str, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}
