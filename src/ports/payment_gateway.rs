//! Payment gateway port.
//!
//! Defines the contract for a session-based payment gateway (KOMOJU style):
//! open a session for an order, pay it with a card or a wallet, and receive
//! signed webhook events about the resulting payment.
//!
//! # Design
//!
//! - **Session first**: the session id is stored on the order before any
//!   money moves, so every later event can be matched to it
//! - **Redirect based**: pay calls return a URL the customer follows to
//!   finish (3-D Secure, wallet app)

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::domain::customer::{Address, Customer};
use crate::domain::foundation::{OrderId, ServiceError, Timestamp};
use crate::domain::order::PaymentMethodType;

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Opens a payment session for an order.
    async fn create_session(
        &self,
        request: CreateSessionRequest,
    ) -> Result<PaymentSession, PaymentError>;

    /// Pays a session with a credit card.
    async fn pay_credit_card(
        &self,
        session_id: &str,
        card: &CreditCardDetail,
    ) -> Result<PayResult, PaymentError>;

    /// Pays a session with a redirect-based wallet.
    async fn pay_wallet(
        &self,
        session_id: &str,
        method: PaymentMethodType,
    ) -> Result<PayResult, PaymentError>;

    /// Verifies a webhook signature and parses the event.
    ///
    /// # Errors
    ///
    /// `InvalidWebhook` if the signature does not match or the body is not
    /// a well-formed event.
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError>;
}

/// Request to open a payment session.
#[derive(Debug, Clone)]
pub struct CreateSessionRequest {
    /// Sent as the gateway's external order number.
    pub order_id: OrderId,
    /// Amount to charge in yen, tax included.
    pub amount: i64,
    /// Where the customer returns after paying.
    pub callback_url: String,
    /// Gateway payment types offered in the session.
    pub payment_types: Vec<String>,
    pub customer: Customer,
    pub billing_address: Address,
    pub shipping_address: Address,
    pub line_items: Vec<LineItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    /// Unit price in yen.
    pub amount: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSession {
    /// Gateway session id. Becomes the order's transaction id.
    pub id: String,
    pub session_url: String,
}

/// Card details, passed straight through to the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditCardDetail {
    pub name: String,
    pub number: SecretString,
    pub month: u32,
    pub year: u32,
    pub verification_value: SecretString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayResult {
    /// URL the customer must visit to finish paying.
    pub redirect_url: String,
}

/// Verified webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEvent {
    pub id: String,
    pub event_type: WebhookEventType,
    pub payment: WebhookPayment,
    pub created_at: Timestamp,
}

/// Payment object carried by a webhook event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WebhookPayment {
    pub payment_id: String,
    /// Our order id, as sent in [`CreateSessionRequest::order_id`].
    pub order_id: String,
    pub amount: i64,
    pub refunds: Vec<WebhookRefund>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookRefund {
    pub amount: i64,
    pub description: String,
}

/// Types of webhook events we act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventType {
    PaymentAuthorized,
    PaymentCaptured,
    PaymentFailed,
    PaymentExpired,
    PaymentCancelled,
    PaymentRefunded,
    /// Anything else, including `ping`.
    Unknown(String),
}

impl WebhookEventType {
    /// Maps the gateway's event type string.
    pub fn parse(value: &str) -> Self {
        match value {
            "payment.authorized" => WebhookEventType::PaymentAuthorized,
            "payment.captured" => WebhookEventType::PaymentCaptured,
            "payment.failed" => WebhookEventType::PaymentFailed,
            "payment.expired" => WebhookEventType::PaymentExpired,
            "payment.cancelled" => WebhookEventType::PaymentCancelled,
            "payment.refunded" => WebhookEventType::PaymentRefunded,
            other => WebhookEventType::Unknown(other.to_string()),
        }
    }
}

/// Errors from payment gateway operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentError {
    pub code: PaymentErrorCode,
    pub message: String,
    /// Gateway's own error code, if it sent one.
    pub provider_code: Option<String>,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidRequest, message)
    }

    pub fn invalid_webhook(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidWebhook, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentErrorCode {
    NetworkError,
    AuthenticationError,
    /// The gateway refused the request as malformed.
    InvalidRequest,
    CardDeclined,
    InvalidWebhook,
    ProviderError,
}

impl PaymentErrorCode {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError | PaymentErrorCode::ProviderError
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::CardDeclined => "card_declined",
            PaymentErrorCode::InvalidWebhook => "invalid_webhook",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}

impl From<PaymentError> for ServiceError {
    fn from(err: PaymentError) -> Self {
        match err.code {
            PaymentErrorCode::CardDeclined => ServiceError::FailedPrecondition(err.message),
            PaymentErrorCode::InvalidRequest => ServiceError::InvalidArgument(err.message),
            _ => ServiceError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn PaymentGateway) {}
    }

    #[test]
    fn event_types_parse() {
        assert_eq!(
            WebhookEventType::parse("payment.captured"),
            WebhookEventType::PaymentCaptured
        );
        assert_eq!(
            WebhookEventType::parse("payment.cancelled"),
            WebhookEventType::PaymentCancelled
        );
        assert_eq!(
            WebhookEventType::parse("ping"),
            WebhookEventType::Unknown("ping".to_string())
        );
    }

    #[test]
    fn card_declined_is_a_client_error() {
        let err: ServiceError =
            PaymentError::new(PaymentErrorCode::CardDeclined, "declined").into();
        assert_eq!(err, ServiceError::FailedPrecondition("declined".to_string()));
    }

    #[test]
    fn network_errors_are_internal_and_retryable() {
        let err = PaymentError::network("timeout");
        assert!(err.code.is_retryable());
        let err: ServiceError = err.into();
        assert_eq!(err, ServiceError::Internal("network_error: timeout".to_string()));
    }
}
