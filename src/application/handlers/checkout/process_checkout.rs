//! CheckoutHandler - Command handler turning cart baskets into a paid-for order.
//!
//! # Pipeline
//!
//! 1. Concurrent lookups (profile, addresses, cart, shipping, promotion)
//! 2. Promotion window check
//! 3. Basket selection
//! 4. Product reload and stock check
//! 5. Order construction and pricing
//! 6. Checksum against the total the client saw
//! 7. Payment session
//! 8. Order insert
//! 9. Pay call, yielding the redirect URL
//! 10. Cart pruning in the background

use std::collections::HashMap;
use std::sync::Arc;

use super::aggregate::CheckoutLookups;
use crate::application::handlers::cart::CartStore;
use crate::domain::cart::Basket;
use crate::domain::catalog::Product;
use crate::domain::foundation::{
    AddressId, CoordinatorId, OrderId, ProductId, PromotionId, ServiceError, SessionId, UserId,
};
use crate::domain::order::{build_order, verify_stock, Order, OrderParams, PaymentMethodType};
use crate::ports::{
    BackgroundExecutor, Clock, CreateSessionRequest, CreditCardDetail, LineItem, OrderRepository,
    PaymentGateway, ProductRepository,
};

/// How the customer wants to pay.
#[derive(Debug, Clone)]
pub enum PaymentInstruction {
    CreditCard(CreditCardDetail),
    Wallet(PaymentMethodType),
}

impl PaymentInstruction {
    pub fn method(&self) -> PaymentMethodType {
        match self {
            PaymentInstruction::CreditCard(_) => PaymentMethodType::CreditCard,
            PaymentInstruction::Wallet(method) => *method,
        }
    }
}

/// Command to check out one coordinator's baskets.
#[derive(Debug, Clone)]
pub struct CheckoutCommand {
    pub user_id: UserId,
    pub session_id: SessionId,
    pub coordinator_id: CoordinatorId,
    /// Basket to buy; 0 buys every basket of the coordinator.
    pub box_number: u32,
    pub promotion_id: Option<PromotionId>,
    pub billing_address_id: AddressId,
    pub shipping_address_id: AddressId,
    pub callback_url: String,
    /// Total the client displayed, tax included.
    pub total: i64,
    pub payment: PaymentInstruction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutResult {
    pub order_id: OrderId,
    /// Where the customer goes to finish paying.
    pub redirect_url: String,
}

/// Ports the checkout handler writes to.
pub struct CheckoutPorts {
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub clock: Arc<dyn Clock>,
    pub background: Arc<dyn BackgroundExecutor>,
}

pub struct CheckoutHandler {
    lookups: CheckoutLookups,
    carts: Arc<CartStore>,
    ports: CheckoutPorts,
}

impl CheckoutHandler {
    pub fn new(lookups: CheckoutLookups, carts: Arc<CartStore>, ports: CheckoutPorts) -> Self {
        Self {
            lookups,
            carts,
            ports,
        }
    }

    pub async fn handle(&self, cmd: CheckoutCommand) -> Result<CheckoutResult, ServiceError> {
        validate(&cmd)?;

        // 1. Lookups
        let ctx = self.lookups.gather(&cmd).await?;

        // 2. Promotion window
        let now = self.ports.clock.now();
        if let Some(promotion) = &ctx.promotion {
            if !promotion.is_enabled(now) {
                return Err(ServiceError::failed_precondition(format!(
                    "promotion is not available: {}",
                    promotion.id
                )));
            }
        }

        // 3. Basket selection
        let baskets = ctx.cart.baskets_for(&cmd.coordinator_id, cmd.box_number);
        if baskets.is_empty() {
            return Err(ServiceError::invalid_argument("no target baskets"));
        }

        // 4. Stock
        let products = self.load_products(&baskets).await?;
        verify_stock(&baskets, &products)?;

        // 5. Order
        let mut order = build_order(OrderParams {
            order_id: OrderId::new(),
            session_id: cmd.session_id.clone(),
            user_id: cmd.user_id.clone(),
            coordinator_id: cmd.coordinator_id.clone(),
            baskets: &baskets,
            products: &products,
            shipping: &ctx.shipping,
            promotion: ctx.promotion.as_ref(),
            billing_address: &ctx.billing_address,
            shipping_address: &ctx.shipping_address,
            method: cmd.payment.method(),
            now,
        })?;

        // 6. Checksum
        if order.payment.total != cmd.total {
            tracing::warn!(
                session_id = %cmd.session_id,
                expected = order.payment.total,
                submitted = cmd.total,
                "checkout total mismatch"
            );
            return Err(ServiceError::invalid_argument(format!(
                "total mismatch: expected {}, got {}",
                order.payment.total, cmd.total
            )));
        }

        // 7. Payment session
        let session = self
            .ports
            .gateway
            .create_session(session_request(&order, &cmd, ctx.customer))
            .await
            .map_err(|e| {
                tracing::error!(order_id = %order.id, error = %e, "failed to open payment session");
                ServiceError::from(e)
            })?;
        order.payment.transaction_id = session.id;

        // 8. Persist
        self.ports.orders.create(&order).await.map_err(|e| {
            tracing::error!(order_id = %order.id, error = %e, "failed to persist order");
            ServiceError::internal_from(e)
        })?;

        // 9. Pay
        let transaction_id = &order.payment.transaction_id;
        let paid = match &cmd.payment {
            PaymentInstruction::CreditCard(card) => {
                self.ports.gateway.pay_credit_card(transaction_id, card).await
            }
            PaymentInstruction::Wallet(method) => {
                self.ports.gateway.pay_wallet(transaction_id, *method).await
            }
        }
        .map_err(|e| {
            tracing::error!(order_id = %order.id, error = %e, "payment request failed");
            ServiceError::from(e)
        })?;

        tracing::info!(
            order_id = %order.id,
            session_id = %cmd.session_id,
            total = order.payment.total,
            method = order.payment.method.gateway_type(),
            "checkout completed"
        );

        // 10. Prune
        self.schedule_prune(&order);

        Ok(CheckoutResult {
            order_id: order.id,
            redirect_url: paid.redirect_url,
        })
    }

    async fn load_products(
        &self,
        baskets: &[&Basket],
    ) -> Result<HashMap<ProductId, Product>, ServiceError> {
        let mut ids: Vec<ProductId> = Vec::new();
        for item in baskets.iter().flat_map(|b| b.items.iter()) {
            if !ids.contains(&item.product_id) {
                ids.push(item.product_id.clone());
            }
        }
        let products = self.ports.products.multi_get(&ids).await?;
        Ok(products.into_iter().map(|p| (p.id.clone(), p)).collect())
    }

    fn schedule_prune(&self, order: &Order) {
        let carts = self.carts.clone();
        let session_id = order.session_id.clone();
        let order_id = order.id;
        let box_numbers = order.box_numbers();
        self.ports.background.spawn(
            "cart.prune",
            Box::pin(async move {
                if let Err(e) = carts.prune(&session_id, &box_numbers).await {
                    tracing::warn!(
                        session_id = %session_id,
                        order_id = %order_id,
                        error = %e,
                        "failed to prune cart after checkout"
                    );
                }
            }),
        );
    }
}

fn validate(cmd: &CheckoutCommand) -> Result<(), ServiceError> {
    if cmd.callback_url.trim().is_empty() {
        return Err(ServiceError::invalid_argument("callback_url is required"));
    }
    if cmd.total < 0 {
        return Err(ServiceError::invalid_argument("total must not be negative"));
    }
    if let PaymentInstruction::Wallet(PaymentMethodType::CreditCard) = cmd.payment {
        return Err(ServiceError::invalid_argument(
            "credit card payments need card details",
        ));
    }
    Ok(())
}

fn session_request(
    order: &Order,
    cmd: &CheckoutCommand,
    customer: crate::domain::customer::Customer,
) -> CreateSessionRequest {
    CreateSessionRequest {
        order_id: order.id,
        amount: order.payment.total,
        callback_url: cmd.callback_url.clone(),
        payment_types: order.payment.method.accepted_types(),
        customer,
        billing_address: order.payment.billing_address.clone(),
        shipping_address: order.payment.shipping_address.clone(),
        line_items: order
            .items
            .iter()
            .map(|item| LineItem {
                description: item.product_name.clone(),
                amount: item.price,
                quantity: item.quantity,
            })
            .collect(),
    }
}
