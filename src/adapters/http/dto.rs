//! Request and response bodies for the storefront API.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::application::handlers::checkout::{CheckoutCommand, PaymentInstruction};
use crate::domain::cart::{Basket, BoxSize, BoxType, Cart, CartItem};
use crate::domain::foundation::{
    AddressId, CoordinatorId, PromotionId, ServiceError, SessionId, Timestamp, UserId,
};
use crate::domain::order::PaymentMethodType;
use crate::ports::CreditCardDetail;

// ════════════════════════════════════════════════════════════════════════════════
// Cart
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartResponse {
    pub baskets: Vec<BasketResponse>,
    pub updated_at: Timestamp,
    pub expired_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketResponse {
    pub box_number: u32,
    pub box_type: BoxType,
    pub box_size: BoxSize,
    /// Fill rate of the box in percent.
    pub box_rate: i64,
    pub coordinator_id: String,
    pub items: Vec<CartItemResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemResponse {
    pub product_id: String,
    pub quantity: i64,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            baskets: cart.baskets.into_iter().map(BasketResponse::from).collect(),
            updated_at: cart.updated_at,
            expired_at: cart.expired_at,
        }
    }
}

impl From<Basket> for BasketResponse {
    fn from(basket: Basket) -> Self {
        Self {
            box_number: basket.box_number,
            box_type: basket.box_type,
            box_size: basket.box_size,
            box_rate: basket.box_rate,
            coordinator_id: basket.coordinator_id.to_string(),
            items: basket.items.into_iter().map(CartItemResponse::from).collect(),
        }
    }
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            product_id: item.product_id.to_string(),
            quantity: item.quantity,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddCartItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoveCartItemQuery {
    pub box_number: u32,
}

// ════════════════════════════════════════════════════════════════════════════════
// Checkout
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct CreditCardRequest {
    pub name: String,
    pub number: SecretString,
    pub month: u32,
    pub year: u32,
    pub verification_value: SecretString,
}

impl From<CreditCardRequest> for CreditCardDetail {
    fn from(card: CreditCardRequest) -> Self {
        Self {
            name: card.name,
            number: card.number,
            month: card.month,
            year: card.year,
            verification_value: card.verification_value,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub coordinator_id: String,
    /// 0 checks out every basket of the coordinator.
    #[serde(default)]
    pub box_number: u32,
    pub promotion_id: Option<String>,
    pub billing_address_id: String,
    pub shipping_address_id: String,
    pub callback_url: String,
    pub total: i64,
    pub payment_method: PaymentMethodType,
    /// Required when `payment_method` is `credit_card`.
    pub credit_card: Option<CreditCardRequest>,
}

impl CheckoutRequest {
    pub fn into_command(
        self,
        user_id: UserId,
        session_id: SessionId,
    ) -> Result<CheckoutCommand, ServiceError> {
        let payment = match (self.payment_method, self.credit_card) {
            (PaymentMethodType::CreditCard, Some(card)) => {
                PaymentInstruction::CreditCard(card.into())
            }
            (PaymentMethodType::CreditCard, None) => {
                return Err(ServiceError::invalid_argument(
                    "credit_card is required for credit card payments",
                ))
            }
            (method, _) => PaymentInstruction::Wallet(method),
        };

        Ok(CheckoutCommand {
            user_id,
            session_id,
            coordinator_id: CoordinatorId::new(self.coordinator_id)?,
            box_number: self.box_number,
            promotion_id: self.promotion_id.map(PromotionId::new).transpose()?,
            billing_address_id: AddressId::new(self.billing_address_id)?,
            shipping_address_id: AddressId::new(self.shipping_address_id)?,
            callback_url: self.callback_url,
            total: self.total,
            payment,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    /// Where the customer goes to finish paying.
    pub url: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════════

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn request(json: serde_json::Value) -> CheckoutRequest {
        serde_json::from_value(json).unwrap()
    }

    fn ids() -> (UserId, SessionId) {
        (UserId::new("u1").unwrap(), SessionId::new("s1").unwrap())
    }

    #[test]
    fn wallet_request_maps_to_wallet_instruction() {
        let (user, session) = ids();
        let cmd = request(serde_json::json!({
            "coordinator_id": "c1",
            "billing_address_id": "a1",
            "shipping_address_id": "a1",
            "callback_url": "https://marche.example.com/done",
            "total": 2189,
            "payment_method": "pay_pay"
        }))
        .into_command(user, session)
        .unwrap();

        assert_eq!(cmd.box_number, 0);
        assert!(cmd.promotion_id.is_none());
        assert!(matches!(
            cmd.payment,
            PaymentInstruction::Wallet(PaymentMethodType::PayPay)
        ));
    }

    #[test]
    fn card_request_carries_card_details() {
        let (user, session) = ids();
        let cmd = request(serde_json::json!({
            "coordinator_id": "c1",
            "box_number": 2,
            "promotion_id": "promo-autumn",
            "billing_address_id": "a1",
            "shipping_address_id": "a2",
            "callback_url": "https://marche.example.com/done",
            "total": 2189,
            "payment_method": "credit_card",
            "credit_card": {
                "name": "HANAKO YAMADA",
                "number": "4111111111111111",
                "month": 12,
                "year": 2030,
                "verification_value": "123"
            }
        }))
        .into_command(user, session)
        .unwrap();

        assert_eq!(cmd.box_number, 2);
        assert_eq!(cmd.promotion_id.unwrap().as_str(), "promo-autumn");
        match cmd.payment {
            PaymentInstruction::CreditCard(card) => {
                assert_eq!(card.number.expose_secret(), "4111111111111111");
            }
            other => panic!("expected card, got {:?}", other),
        }
    }

    #[test]
    fn card_method_without_card_is_invalid_argument() {
        let (user, session) = ids();
        let err = request(serde_json::json!({
            "coordinator_id": "c1",
            "billing_address_id": "a1",
            "shipping_address_id": "a1",
            "callback_url": "https://marche.example.com/done",
            "total": 2189,
            "payment_method": "credit_card"
        }))
        .into_command(user, session)
        .unwrap_err();

        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    #[test]
    fn empty_coordinator_is_invalid_argument() {
        let (user, session) = ids();
        let err = request(serde_json::json!({
            "coordinator_id": "",
            "billing_address_id": "a1",
            "shipping_address_id": "a1",
            "callback_url": "https://marche.example.com/done",
            "total": 2189,
            "payment_method": "merpay"
        }))
        .into_command(user, session)
        .unwrap_err();

        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }
}
