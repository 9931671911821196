//! KOMOJU session API client.
//!
//! Implements `PaymentGateway` against the hosted-session endpoints:
//! `POST /api/v1/sessions` to open a session and
//! `POST /api/v1/sessions/{id}/pay` to pay it. Requests authenticate with
//! the secret key as the basic-auth user name.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use super::webhook::WebhookVerifier;
use crate::domain::customer::Address;
use crate::domain::order::PaymentMethodType;
use crate::ports::{
    CreateSessionRequest, CreditCardDetail, LineItem, PayResult, PaymentError, PaymentErrorCode,
    PaymentGateway, PaymentSession, WebhookEvent,
};

/// Provider error codes that mean the card itself was refused.
const CARD_DECLINE_CODES: &[&str] = &[
    "card_declined",
    "card_expired",
    "invalid_number",
    "bad_verification_value",
    "insufficient_funds",
];

#[derive(Clone)]
pub struct KomojuConfig {
    pub api_base_url: String,
    pub secret_key: SecretString,
    pub webhook_secret: SecretString,
    pub timeout: Duration,
}

pub struct KomojuClient {
    config: KomojuConfig,
    http_client: reqwest::Client,
    verifier: WebhookVerifier,
}

impl KomojuClient {
    pub fn new(config: KomojuConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to default HTTP client");
                reqwest::Client::new()
            });
        Self {
            verifier: WebhookVerifier::new(config.webhook_secret.clone()),
            config,
            http_client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path)
    }

    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, PaymentError> {
        let response = self
            .http_client
            .post(self.url(path))
            .basic_auth(self.config.secret_key.expose_secret(), Option::<&str>::None)
            .json(body)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let err = classify_error(status, &text);
            tracing::error!(path, status = status.as_u16(), error = %err, "KOMOJU request failed");
            return Err(err);
        }

        response
            .json()
            .await
            .map_err(|e| PaymentError::provider(format!("failed to parse KOMOJU response: {}", e)))
    }

    async fn pay(
        &self,
        session_id: &str,
        details: serde_json::Value,
    ) -> Result<PayResult, PaymentError> {
        let path = format!("/api/v1/sessions/{}/pay", session_id);
        let paid: KomojuPayResponse = self
            .post(&path, &json!({ "payment_details": details }))
            .await?;
        tracing::info!(session_id, status = %paid.status, "session payment submitted");
        Ok(PayResult {
            redirect_url: paid.redirect_url.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct KomojuSession {
    id: String,
    session_url: String,
}

#[derive(Debug, Deserialize)]
struct KomojuPayResponse {
    status: String,
    /// Absent when no further customer action is needed.
    #[serde(default)]
    redirect_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KomojuErrorBody {
    error: KomojuErrorDetail,
}

#[derive(Debug, Deserialize)]
struct KomojuErrorDetail {
    code: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct KomojuAddress<'a> {
    zipcode: &'a str,
    street_address1: &'a str,
    street_address2: &'a str,
    city: &'a str,
    state: String,
    country: &'static str,
}

impl<'a> From<&'a Address> for KomojuAddress<'a> {
    fn from(address: &'a Address) -> Self {
        Self {
            zipcode: &address.postal_code,
            street_address1: &address.address_line1,
            street_address2: &address.address_line2,
            city: &address.city,
            state: address.prefecture_code.to_string(),
            country: "JP",
        }
    }
}

fn session_body(request: &CreateSessionRequest) -> serde_json::Value {
    let line_items: Vec<serde_json::Value> = request
        .line_items
        .iter()
        .map(|item: &LineItem| {
            json!({
                "description": item.description,
                "amount": item.amount,
                "quantity": item.quantity,
            })
        })
        .collect();
    json!({
        "amount": request.amount,
        "currency": "JPY",
        "return_url": request.callback_url,
        "default_locale": "ja",
        "payment_types": request.payment_types,
        "email": request.customer.email,
        "external_order_num": request.order_id.to_string(),
        "line_items": line_items,
        "billing_address": KomojuAddress::from(&request.billing_address),
        "shipping_address": KomojuAddress::from(&request.shipping_address),
    })
}

fn classify_error(status: reqwest::StatusCode, body: &str) -> PaymentError {
    let detail = serde_json::from_str::<KomojuErrorBody>(body).ok().map(|b| b.error);
    let message = detail
        .as_ref()
        .map(|d| d.message.clone())
        .unwrap_or_else(|| format!("KOMOJU returned {}", status));

    let code = match (status.as_u16(), detail.as_ref().map(|d| d.code.as_str())) {
        (401 | 403, _) => PaymentErrorCode::AuthenticationError,
        (_, Some(c)) if CARD_DECLINE_CODES.contains(&c) => PaymentErrorCode::CardDeclined,
        (400..=499, _) => PaymentErrorCode::InvalidRequest,
        _ => PaymentErrorCode::ProviderError,
    };

    let err = PaymentError::new(code, message);
    match detail {
        Some(d) => err.with_provider_code(d.code),
        None => err,
    }
}

#[async_trait]
impl PaymentGateway for KomojuClient {
    async fn create_session(
        &self,
        request: CreateSessionRequest,
    ) -> Result<PaymentSession, PaymentError> {
        let session: KomojuSession = self
            .post("/api/v1/sessions", &session_body(&request))
            .await?;
        tracing::info!(
            order_id = %request.order_id,
            session_id = %session.id,
            amount = request.amount,
            "payment session opened"
        );
        Ok(PaymentSession {
            id: session.id,
            session_url: session.session_url,
        })
    }

    async fn pay_credit_card(
        &self,
        session_id: &str,
        card: &CreditCardDetail,
    ) -> Result<PayResult, PaymentError> {
        let details = json!({
            "type": PaymentMethodType::CreditCard.gateway_type(),
            "name": card.name,
            "number": card.number.expose_secret(),
            "month": card.month,
            "year": card.year,
            "verification_value": card.verification_value.expose_secret(),
        });
        self.pay(session_id, details).await
    }

    async fn pay_wallet(
        &self,
        session_id: &str,
        method: PaymentMethodType,
    ) -> Result<PayResult, PaymentError> {
        if !method.is_wallet() {
            return Err(PaymentError::invalid_request(format!(
                "{} is not a wallet payment method",
                method.gateway_type()
            )));
        }
        self.pay(session_id, json!({ "type": method.gateway_type() }))
            .await
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        self.verifier.verify_and_parse(payload, signature)
    }
}
